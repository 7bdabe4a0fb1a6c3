use clap::Args;

use crate::cli::{execute, IoArgs, OutputFormat, ReferenceArgs, SampleArgs};
use crate::core::metadata::{HeaderMode, Workflow};

#[derive(Args)]
pub struct ReheaderArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[command(flatten)]
    pub samples: SampleArgs,

    /// Variant calling workflow ID
    #[arg(long, required = true)]
    pub caller_workflow_id: String,

    /// Variant calling workflow name
    #[arg(long, required = true)]
    pub caller_workflow_name: String,

    /// Variant calling workflow description
    #[arg(long)]
    pub caller_workflow_description: Option<String>,

    /// Variant calling workflow version
    #[arg(long)]
    pub caller_workflow_version: Option<String>,

    /// Annotation workflow ID
    #[arg(long, required = true)]
    pub annotation_workflow_id: String,

    /// Annotation workflow name
    #[arg(long, required = true)]
    pub annotation_workflow_name: String,

    /// Annotation workflow description
    #[arg(long)]
    pub annotation_workflow_description: Option<String>,

    /// Annotation workflow version
    #[arg(long)]
    pub annotation_workflow_version: Option<String>,

    #[command(flatten)]
    pub reference: ReferenceArgs,
}

impl ReheaderArgs {
    fn workflows(&self) -> Vec<Workflow> {
        vec![
            Workflow {
                id: self.caller_workflow_id.clone(),
                name: self.caller_workflow_name.clone(),
                description: self.caller_workflow_description.clone(),
                version: self.caller_workflow_version.clone(),
            },
            Workflow {
                id: self.annotation_workflow_id.clone(),
                name: self.annotation_workflow_name.clone(),
                description: self.annotation_workflow_description.clone(),
                version: self.annotation_workflow_version.clone(),
            },
        ]
    }
}

/// Execute reheader subcommand
///
/// # Errors
///
/// Returns an error if the index or input cannot be read, the metadata is
/// incomplete, or writing the output fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ReheaderArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut metadata = args.samples.to_metadata(&args.reference.reference);
    metadata.workflows = args.workflows();

    execute(
        HeaderMode::ReheaderOnly,
        &metadata,
        &args.io,
        &args.reference,
        format,
    )?;
    Ok(())
}
