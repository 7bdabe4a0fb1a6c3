//! Parser for FASTA index (.fai) files.
//!
//! Only the first two columns are used: `name\tlength`. The remaining FAI columns
//! (`offset\tline_bases\tline_width`) are accepted and ignored, so two-column
//! "contig list" files work as well as real indexes.

use std::path::Path;

use tracing::debug;

use crate::core::contig::Contig;
use crate::error::Error;

/// Parse a FASTA index file, labelling every contig with `assembly`
///
/// # Errors
///
/// Returns `Error::Configuration` if the file does not exist or cannot be read,
/// and the errors of [`parse_fai_text`] for malformed content.
pub fn parse_fai_file(path: &Path, assembly: &str) -> Result<Vec<Contig>, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!(
            "Cannot read contig index '{}': {e}",
            path.display()
        ))
    })?;

    debug!(path = %path.display(), "Read contig index");
    parse_fai_text(&text, assembly)
}

/// Parse FAI text, preserving row order
///
/// Blank lines are skipped and trailing whitespace is ignored. Every other line
/// must carry at least two tab-separated fields with a numeric length in the
/// second. There is no cap on the number of rows.
///
/// # Errors
///
/// Returns `Error::Format` if a line has fewer than two fields, a length is not a
/// non-negative integer, or no contigs are found.
pub fn parse_fai_text(text: &str, assembly: &str) -> Result<Vec<Contig>, Error> {
    let mut contigs = Vec::new();

    for (i, line) in text.lines().enumerate() {
        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 2 {
            return Err(Error::format(format!(
                "Index line {line_num} has fewer than 2 tab-separated fields: '{line}'"
            )));
        }

        let name = fields[0];
        let length: u64 = fields[1].parse().map_err(|_| {
            Error::format(format!(
                "Invalid length for contig '{name}' on index line {line_num}: '{}'",
                fields[1]
            ))
        })?;

        contigs.push(Contig::new(name, length, assembly));
    }

    if contigs.is_empty() {
        return Err(Error::format("No contigs found in contig index"));
    }

    Ok(contigs)
}
