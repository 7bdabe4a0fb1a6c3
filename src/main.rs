use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcf_reheader::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("vcf_reheader=debug,info")
    } else {
        EnvFilter::new("vcf_reheader=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::ContigFilter(args) => {
            cli::contig_filter::run(args, cli.format)?;
        }
        cli::Commands::Reheader(args) => {
            cli::reheader::run(args, cli.format)?;
        }
    }

    Ok(())
}
