use anyhow::Result;
use clap::{Parser, Subcommand};
use fluent_diagtool::prelude::*;
use human_panic::setup_panic;
use tracing::error;

/// diagtool
///
/// Diagtool collects the environment information of a Fluentd
/// installation (installed gems, package identity) into a timestamped
/// directory that can be attached to a support ticket.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(flatten)]
    logging: LoggingOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Collect diagnostics into a timestamped workspace
    #[clap(alias("c"))]
    Collect(CollectArgs),
    /// Verify the environment before collecting (not available on Windows)
    #[clap(alias("p"))]
    Precheck(PrecheckArgs),
}

fn main() {
    setup_panic!();
    let opts = Cli::parse();

    opts.logging.configure_logging();
    let error_code = run_subcommand(&opts);

    std::process::exit(error_code);
}

fn run_subcommand(opts: &Cli) -> i32 {
    handle_command(opts).unwrap_or_else(|e| {
        error!("{}", e);
        1
    })
}

fn handle_command(opts: &Cli) -> Result<i32> {
    match &opts.command {
        Command::Collect(args) => collect_root(&opts.logging, args),
        Command::Precheck(args) => precheck_root(args),
    }
}
