mod cli;
mod client;
mod form;
mod model;
mod orchestrator;
mod render;
mod spinner;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;
mod url;
mod view;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Route logs to stderr; the TUI owns the terminal, so it gets a sink instead.
fn init_tracing(args: &cli::Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if args.is_non_tui() {
        builder.with_writer(std::io::stderr).init();
    } else {
        builder.with_writer(std::io::sink).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    init_tracing(&args);
    let is_non_tui = args.is_non_tui();

    cli::run(args).await?;
    // Explicitly exit with code 0 on success, especially for non-TUI modes
    if is_non_tui {
        std::process::exit(0);
    }
    Ok(())
}
