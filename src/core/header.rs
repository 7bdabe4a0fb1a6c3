//! Composition of the metadata block injected after `##fileformat`.
//!
//! Line order is fixed:
//!
//! | # | Line | Mode |
//! |---|------|------|
//! | 1 | `##fileDate=YYYYMMDD` | both |
//! | 2 | `##reference=<reference>` | augment only |
//! | 3 | `##center="..."` | both |
//! | 4 | `##source=<caller>` | augment only |
//! | 5 | `##gdcWorkflow=<...>` per workflow | reheader only |
//! | 6 | `##INDIVIDUAL=<NAME=...,ID=...>` | both |
//! | 7 | `##SAMPLE=<ID=NORMAL,...>` | both |
//! | 8 | `##SAMPLE=<ID=TUMOR,...>` | both |
//!
//! Workflow `ID` and `Name` values are normalized with
//! [`normalize_token`]. Descriptions, versions, barcodes and the aliquot/BAM
//! identifiers are written verbatim.

use chrono::NaiveDate;
use tracing::debug;

use crate::core::metadata::{HeaderMode, RunMetadata, Sample, Workflow};
use crate::error::Error;
use crate::utils::validation::normalize_token;

/// Institutional provenance written to `##center`
pub const CENTER: &str = "\"NCI Genomic Data Commons (GDC)\"";

/// Render a date the way `##fileDate` expects it
#[must_use]
pub fn format_file_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// Compose the metadata block for `mode`, dated `date`
///
/// # Errors
///
/// Returns `Error::Configuration` if a field required by `mode` is missing.
pub fn compose(
    metadata: &RunMetadata,
    mode: HeaderMode,
    date: NaiveDate,
) -> Result<Vec<String>, Error> {
    metadata.validate(mode)?;

    let mut lines = Vec::with_capacity(7 + metadata.workflows.len());
    lines.push(format!("##fileDate={}", format_file_date(date)));

    match mode {
        HeaderMode::AugmentAndFilter => {
            lines.push(reference_line(&metadata.reference));
            lines.push(format!("##center={CENTER}"));
            if let Some(source) = metadata.source {
                lines.push(format!("##source={source}"));
            }
        }
        HeaderMode::ReheaderOnly => {
            lines.push(format!("##center={CENTER}"));
            lines.extend(metadata.workflows.iter().map(workflow_line));
        }
    }

    lines.push(format!(
        "##INDIVIDUAL=<NAME={},ID={}>",
        metadata.patient_barcode, metadata.case_id
    ));
    lines.push(sample_line("NORMAL", &metadata.normal));
    lines.push(sample_line("TUMOR", &metadata.tumor));

    debug!(lines = lines.len(), ?mode, "Composed metadata header");
    Ok(lines)
}

/// `##reference` line for a reference FASTA name
#[must_use]
pub fn reference_line(reference: &str) -> String {
    format!("##reference={reference}")
}

fn workflow_line(workflow: &Workflow) -> String {
    format!(
        "##gdcWorkflow=<ID={},Name={},Description=\"{}\",Version={}>",
        normalize_token(&workflow.id),
        normalize_token(&workflow.name),
        workflow.description_or_default(),
        workflow.version_or_default()
    )
}

fn sample_line(role: &str, sample: &Sample) -> String {
    format!(
        "##SAMPLE=<ID={role},NAME={},ALIQUOT_ID={},BAM_ID={}>",
        sample.barcode, sample.aliquot_id, sample.bam_id
    )
}
