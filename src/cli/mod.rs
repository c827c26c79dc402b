// CLI module
// Command-line arguments and the interactive menu driver

mod args;
pub mod console;

pub use args::CliArgs;
pub use console::{Console, MenuChoice};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments or --help), clap prints the error or
/// help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over `default_filter`. Logs go to stderr so
/// the menu on stdout stays readable.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
