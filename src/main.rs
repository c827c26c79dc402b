//! Console Bank CLI
//!
//! Interactive menu for managing bank accounts kept in a plain-text file.
//!
//! # Usage
//!
//! ```bash
//! cargo run
//! cargo run -- --store /var/lib/bank/accounts.txt
//! RUST_LOG=console_bank=debug cargo run
//! ```
//!
//! Accounts are loaded from the store at startup and written back when the
//! operator chooses "Save and Exit" (or closes the input).
//!
//! # Exit Codes
//!
//! - 0: Accounts saved and program exited normally
//! - 1: The store could not be read or written, or the console failed
//!
//! If the store exists but cannot be read, the session still starts with an
//! empty bank, but the store file is left untouched on exit.

use console_bank::cli::{self, Console};
use console_bank::core::{AccountStore, Bank};
use console_bank::store::TextStore;
use std::io;
use std::process::ExitCode;
use tracing::error;

fn main() -> ExitCode {
    let args = cli::parse_args();
    cli::init_tracing(&args.log_level);

    let store = TextStore::new(&args.store);

    let (mut bank, report) = match store.load() {
        Ok((bank, report)) => (bank, Some(report)),
        Err(e) => {
            error!(error = %e, "failed to load accounts");
            eprintln!("Error loading accounts: {}", e);
            (Bank::new(), None)
        }
    };

    let load_failed = report.is_none();
    let mut console = Console::new(&mut bank, &store, io::stdin().lock(), io::stdout());
    if load_failed {
        console = console.keep_store_untouched();
    }
    let result = match report {
        Some(report) => console.report_load(&report),
        None => Ok(()),
    }
    .and_then(|()| console.run());

    match result {
        Ok(()) if load_failed => ExitCode::FAILURE,
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
