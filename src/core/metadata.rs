use std::fmt;

use crate::error::Error;
use crate::parsing::vcf::MetaKey;
use crate::utils::validation::require_non_empty;

/// Version written for a workflow when none is supplied
pub const DEFAULT_WORKFLOW_VERSION: &str = "unknown";

/// Which header rewrite policy the transformer applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Keep `##FILTER`/`##FORMAT`/`##INFO`, add identity and sample lines, regenerate
    /// `##contig` just before `#CHROM`
    AugmentAndFilter,
    /// Keep the wider meta allow-list, add workflow provenance, regenerate
    /// `##reference` and `##contig` just before `#CHROM`
    ReheaderOnly,
}

impl HeaderMode {
    #[must_use]
    pub fn tool_name(self) -> &'static str {
        match self {
            HeaderMode::AugmentAndFilter => "contig_filter",
            HeaderMode::ReheaderOnly => "vcf_reheader",
        }
    }

    /// Whether a known meta line survives the rewrite
    #[must_use]
    pub fn keeps(self, key: MetaKey) -> bool {
        match self {
            HeaderMode::AugmentAndFilter => {
                matches!(key, MetaKey::Filter | MetaKey::Format | MetaKey::Info)
            }
            HeaderMode::ReheaderOnly => true,
        }
    }
}

/// Variant caller that produced the input VCF
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VcfSource {
    #[value(name = "MuTect2")]
    MuTect2,
    #[value(name = "VarScan2")]
    VarScan2,
    #[value(name = "MuSE")]
    MuSE,
    #[value(name = "SomaticSniper")]
    SomaticSniper,
}

impl VcfSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VcfSource::MuTect2 => "MuTect2",
            VcfSource::VarScan2 => "VarScan2",
            VcfSource::MuSE => "MuSE",
            VcfSource::SomaticSniper => "SomaticSniper",
        }
    }
}

impl fmt::Display for VcfSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sequenced specimen (tumor or normal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub barcode: String,
    pub aliquot_id: String,
    pub bam_id: String,
}

impl Sample {
    pub fn new(
        barcode: impl Into<String>,
        aliquot_id: impl Into<String>,
        bam_id: impl Into<String>,
    ) -> Self {
        Self {
            barcode: barcode.into(),
            aliquot_id: aliquot_id.into(),
            bam_id: bam_id.into(),
        }
    }

    fn validate(&self, role: &str) -> Result<(), Error> {
        require_non_empty(&format!("{role}_barcode"), &self.barcode)?;
        require_non_empty(&format!("{role}_aliquot_id"), &self.aliquot_id)?;
        require_non_empty(&format!("{role}_bam_id"), &self.bam_id)
    }
}

/// A workflow stage recorded as provenance in the rewritten header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            version: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Description, or the empty string
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Version, or [`DEFAULT_WORKFLOW_VERSION`]
    #[must_use]
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_WORKFLOW_VERSION)
    }
}

/// Run-scoped identifiers injected into the rewritten header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunMetadata {
    pub patient_barcode: String,
    pub case_id: String,
    pub normal: Sample,
    pub tumor: Sample,
    /// Reference FASTA name for the `##reference` line
    pub reference: String,
    /// Caller written to `##source`; required in [`HeaderMode::AugmentAndFilter`]
    pub source: Option<VcfSource>,
    /// Provenance lines; only written in [`HeaderMode::ReheaderOnly`]
    pub workflows: Vec<Workflow>,
}

impl RunMetadata {
    /// Check that every field required by `mode` is present
    ///
    /// # Errors
    ///
    /// Returns `Error::Configuration` naming the first missing field.
    pub fn validate(&self, mode: HeaderMode) -> Result<(), Error> {
        require_non_empty("patient_barcode", &self.patient_barcode)?;
        require_non_empty("case_id", &self.case_id)?;
        self.normal.validate("normal")?;
        self.tumor.validate("tumor")?;
        require_non_empty("reference", &self.reference)?;

        match mode {
            HeaderMode::AugmentAndFilter => {
                if self.source.is_none() {
                    return Err(Error::configuration(
                        "Required field 'vcf_source' is missing",
                    ));
                }
            }
            HeaderMode::ReheaderOnly => {
                for workflow in &self.workflows {
                    require_non_empty("workflow_id", &workflow.id)?;
                    require_non_empty("workflow_name", &workflow.name)?;
                }
            }
        }

        Ok(())
    }
}
