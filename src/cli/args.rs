use crate::store::DEFAULT_STORE_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Interactive console bank backed by a plain-text account store
#[derive(Parser, Debug)]
#[command(name = "console-bank")]
#[command(
    about = "Interactive console bank backed by a plain-text account store",
    long_about = None
)]
pub struct CliArgs {
    /// Account store file, loaded at startup and written on save-and-exit
    #[arg(
        long = "store",
        value_name = "PATH",
        default_value = DEFAULT_STORE_PATH,
        help = "Path to the account store file"
    )]
    pub store: PathBuf,

    /// Log filter used when RUST_LOG is not set
    #[arg(
        long = "log-level",
        value_name = "LEVEL",
        default_value = "warn",
        help = "Log filter when RUST_LOG is unset (e.g. 'info', 'console_bank=debug')"
    )]
    pub log_level: String,
}
