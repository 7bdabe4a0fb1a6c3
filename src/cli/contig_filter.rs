use clap::Args;

use crate::cli::{execute, IoArgs, OutputFormat, ReferenceArgs, SampleArgs};
use crate::core::metadata::{HeaderMode, VcfSource};

#[derive(Args)]
pub struct ContigFilterArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub samples: SampleArgs,

    /// Variant caller written to ##source
    #[arg(long, required = true, value_enum)]
    pub vcf_source: VcfSource,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

/// Execute contig-filter subcommand
///
/// # Errors
///
/// Returns an error if the index or input cannot be read, the metadata is
/// incomplete, or writing the output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ContigFilterArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut metadata = args.samples.to_metadata(&args.reference.reference);
    metadata.source = Some(args.vcf_source);

    execute(
        HeaderMode::AugmentAndFilter,
        &metadata,
        &args.io,
        &args.reference,
        format,
    )?;
    Ok(())
}
