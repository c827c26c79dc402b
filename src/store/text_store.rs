//! File-backed account store
//!
//! Opens the store file only for the duration of a save or a load and
//! delegates the line format to `text_format`.
//!
//! # Error Handling
//!
//! - A missing file on load is not an error: the bank starts empty
//! - Any other failure to open, read or write the file is an `IoError`
//! - Malformed lines are skipped and listed in the `LoadReport`
//!
//! Saves truncate the file in place. A crash mid-save can leave a partial
//! file behind; nothing tries to recover from that.

use crate::core::bank::Bank;
use crate::core::traits::{AccountStore, LoadReport};
use crate::store::text_format::{read_store, write_store};
use crate::types::BankError;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

/// Store file used when no path is configured
pub const DEFAULT_STORE_PATH: &str = "bank_accounts.txt";

/// Account store backed by a plain-text file
#[derive(Debug, Clone)]
pub struct TextStore {
    path: PathBuf,
}

impl Default for TextStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

impl TextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TextStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AccountStore for TextStore {
    fn save(&self, bank: &Bank) -> Result<(), BankError> {
        let file = File::create(&self.path).map_err(|e| BankError::io_at(&self.path, e))?;
        write_store(bank, file)?;

        info!(
            path = %self.path.display(),
            accounts = bank.len(),
            next_number = bank.next_number(),
            "accounts saved"
        );
        Ok(())
    }

    fn load(&self) -> Result<(Bank, LoadReport), BankError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no store found, starting empty");
                let bank = Bank::new();
                let report = LoadReport::not_found(&bank);
                return Ok((bank, report));
            }
            Err(e) => return Err(BankError::io_at(&self.path, e)),
        };

        let (bank, skipped) = read_store(file)?;

        info!(
            path = %self.path.display(),
            accounts = bank.len(),
            next_number = bank.next_number(),
            skipped = skipped.len(),
            "accounts loaded"
        );

        let report = LoadReport {
            found: true,
            accounts: bank.len(),
            next_number: bank.next_number(),
            skipped,
        };
        Ok((bank, report))
    }
}
