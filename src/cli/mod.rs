//! Command-line interface for repo-debugger
//!
//! A single command: collect a directory, ask the model about an issue,
//! print the reply.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod debug;
mod utils;

/// Ask an LLM to debug an issue using every file in a directory as context
#[derive(Parser)]
#[command(name = "repo-debugger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    args: debug::DebugArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var("RUST_LOG").ok();
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(log_filter(cli.verbose, rust_log.as_deref()))
        .try_init();

    debug::run(cli.args)
}

/// A non-empty RUST_LOG always wins; otherwise --verbose selects DEBUG over WARN.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("warn"),
    }
}
