//! Command-line interface for vcf-reheader.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **contig-filter**: Drop records on unapproved contigs and add identity/sample headers
//! - **reheader**: Rewrite the header with workflow provenance, regenerating `##reference`
//!   and `##contig`, and drop records on unapproved contigs
//!
//! ## Usage
//!
//! ```text
//! vcf-reheader contig-filter --input-vcf in.vcf.gz --output-vcf out.vcf.gz \
//!     --patient-barcode TCGA-AB-1234 --case-id <uuid> \
//!     --tumor-barcode ... --tumor-aliquot-uuid ... --tumor-bam-uuid ... \
//!     --normal-barcode ... --normal-aliquot-uuid ... --normal-bam-uuid ... \
//!     --vcf-source MuTect2
//!
//! vcf-reheader reheader --input-vcf in.vcf --output-vcf out.vcf ... \
//!     --caller-workflow-id ... --caller-workflow-name ... \
//!     --annotation-workflow-id ... --annotation-workflow-name ...
//! ```

use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::core::dictionary::{ContigDictionary, DEFAULT_ASSEMBLY, DEFAULT_REFERENCE};
use crate::core::metadata::{HeaderMode, RunMetadata, Sample};
use crate::core::transform::{Counts, VcfStreamTransformer};
use crate::stream::{open_input, OutputFile};

pub mod contig_filter;
pub mod reheader;

#[derive(Parser)]
#[command(name = "vcf-reheader")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Rewrite VCF headers and filter records to an approved contig set")]
#[command(
    long_about = "vcf-reheader streams a VCF (plain or .gz), replaces its ##contig and ##reference lines with ones generated from a FASTA index, injects run metadata after ##fileformat, and drops every record whose contig is not in the index."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run summary format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter contigs and augment the header with identity and sample metadata
    ContigFilter(contig_filter::ContigFilterArgs),

    /// Rewrite the header with workflow provenance and filter contigs
    Reheader(reheader::ReheaderArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Input and output paths
#[derive(Args)]
pub struct IoArgs {
    /// Input VCF (.gz for gzip)
    #[arg(long, required = true)]
    pub input_vcf: PathBuf,

    /// Output VCF (.gz for gzip)
    #[arg(long, required = true)]
    pub output_vcf: PathBuf,
}

/// Patient and sample identifiers written to the header
#[derive(Args)]
pub struct SampleArgs {
    /// Patient barcode
    #[arg(long, required = true)]
    pub patient_barcode: String,

    /// Case ID
    #[arg(long, required = true)]
    pub case_id: String,

    /// Tumor barcode
    #[arg(long, required = true)]
    pub tumor_barcode: String,

    /// Tumor aliquot UUID
    #[arg(long, required = true)]
    pub tumor_aliquot_uuid: String,

    /// Tumor BAM UUID
    #[arg(long, required = true)]
    pub tumor_bam_uuid: String,

    /// Normal barcode
    #[arg(long, required = true)]
    pub normal_barcode: String,

    /// Normal aliquot UUID
    #[arg(long, required = true)]
    pub normal_aliquot_uuid: String,

    /// Normal BAM UUID
    #[arg(long, required = true)]
    pub normal_bam_uuid: String,
}

/// Contig dictionary and reference naming
#[derive(Args)]
pub struct ReferenceArgs {
    /// FASTA index listing the contigs to keep (defaults to the bundled GRCh38.d1.vd1 index)
    #[arg(long)]
    pub fai: Option<PathBuf>,

    /// Assembly name for the ##contig lines
    #[arg(long, default_value = DEFAULT_ASSEMBLY)]
    pub assembly: String,

    /// Reference FASTA name for the ##reference line
    #[arg(long, default_value = DEFAULT_REFERENCE)]
    pub reference: String,
}

impl SampleArgs {
    /// Metadata without mode-specific fields
    fn to_metadata(&self, reference: &str) -> RunMetadata {
        RunMetadata {
            patient_barcode: self.patient_barcode.clone(),
            case_id: self.case_id.clone(),
            normal: Sample::new(
                &self.normal_barcode,
                &self.normal_aliquot_uuid,
                &self.normal_bam_uuid,
            ),
            tumor: Sample::new(
                &self.tumor_barcode,
                &self.tumor_aliquot_uuid,
                &self.tumor_bam_uuid,
            ),
            reference: reference.to_string(),
            source: None,
            workflows: Vec::new(),
        }
    }
}

/// Summary of one transform, the record handed to the metrics recorder
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub tool: &'static str,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(flatten)]
    pub counts: Counts,
    pub elapsed_secs: f64,
}

/// Load the dictionary, stream input to output, and report the counts
///
/// Every fallible preparation step happens before the output is created, and the
/// output only appears at its path after the whole stream has been written.
pub(crate) fn execute(
    mode: HeaderMode,
    metadata: &RunMetadata,
    io: &IoArgs,
    reference: &ReferenceArgs,
    format: OutputFormat,
) -> anyhow::Result<Counts> {
    let start = Instant::now();

    info!(version = env!("CARGO_PKG_VERSION"), tool = mode.tool_name(), "vcf-reheader");
    info!(input = %io.input_vcf.display(), output = %io.output_vcf.display(), "Starting");

    info!("Loading contigs...");
    let dictionary = ContigDictionary::load(reference.fai.as_deref(), &reference.assembly)?;
    info!(contigs = dictionary.len(), "Loaded contig dictionary");

    let today = chrono::Local::now().date_naive();
    let mut transformer = VcfStreamTransformer::new(mode, metadata, dictionary, today)?;

    let reader = open_input(&io.input_vcf)?;
    let mut output = OutputFile::create(&io.output_vcf)?;

    info!("Parsing VCF...");
    let counts = transformer.run(reader, &mut output)?;
    output.commit()?;

    let elapsed = start.elapsed().as_secs_f64();
    info!("Variants Analyzed={}", counts.total);
    info!("Variants Output={}", counts.kept);
    info!("Finished, took {elapsed:.3} seconds.");

    if let OutputFormat::Json = format {
        let summary = RunSummary {
            tool: mode.tool_name(),
            input: io.input_vcf.clone(),
            output: io.output_vcf.clone(),
            counts,
            elapsed_secs: elapsed,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(counts)
}
