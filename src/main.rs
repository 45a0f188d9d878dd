mod cli;
mod controller;
mod device;
mod model;
mod panel;
mod poller;
mod text_summary;
#[cfg(feature = "tui")]
mod tui;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let is_non_tui = args.is_non_tui();
    init_tracing(is_non_tui);

    match cli::run(args).await {
        Ok(()) => {
            // Explicitly exit with code 0 on success for scripting modes
            if is_non_tui {
                std::process::exit(0);
            }
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Diagnostics go to stderr. In TUI mode the terminal is in raw mode, so
/// nothing is emitted unless RUST_LOG asks for it.
fn init_tracing(non_tui: bool) {
    let filter = if non_tui {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
