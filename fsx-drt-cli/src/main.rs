//! fsx-drt: create FSx for Lustre data repository tasks.
//!
//! # Usage
//!
//! ```text
//! fsx-drt run [--config <file>] [--dry-run] [--json] [--timeout <secs>] [--region <r>]
//! fsx-drt export --filesystem-id <fs-..> --paths <p1,p2> --completion-report-path <p> [...]
//! fsx-drt import --filesystem-id <fs-..> --paths <p1,p2> --completion-report-path <p> [...]
//! fsx-drt associations --filesystem-id <fs-..> [--json] [--region <r>]
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{associations::AssociationsArgs, run::RunArgs, task::TaskArgs};
use fsx_drt_core::TaskDirection;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "fsx-drt",
    version,
    about = "Create FSx data repository export and import tasks",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one invocation from the config file and environment.
    Run(RunArgs),

    /// Export file system changes to the linked repository.
    Export(TaskArgs),

    /// Import repository changes into the file system.
    Import(TaskArgs),

    /// List the data repository associations of a file system.
    Associations(AssociationsArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    match cli.command {
        Commands::Run(args) => args.run(),
        Commands::Export(args) => args.run(TaskDirection::Export),
        Commands::Import(args) => args.run(TaskDirection::Import),
        Commands::Associations(args) => args.run(),
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
