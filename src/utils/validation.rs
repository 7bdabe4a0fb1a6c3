//! Centralized validation and helper functions.

use crate::error::Error;

/// Normalize an identifier used as a header token value.
///
/// Every whitespace character becomes `_` and the result is lowercased.
///
/// # Examples
///
/// ```
/// use vcf_reheader::utils::validation::normalize_token;
///
/// assert_eq!(normalize_token("Somatic Mutation Calling"), "somatic_mutation_calling");
/// assert_eq!(normalize_token("VEP\tv84"), "vep_v84");
/// ```
#[must_use]
pub fn normalize_token(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Reject a required metadata field that is empty or whitespace only.
///
/// # Errors
///
/// Returns `Error::Configuration` naming the field.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::configuration(format!(
            "Required field '{field}' is empty"
        )));
    }
    Ok(())
}
