//! Persistence seam for the bank
//!
//! The console driver saves and restores the bank through this trait, so the
//! file-backed store can be swapped for another backend (or a test double).

use crate::core::bank::Bank;
use crate::types::{AccountNumber, BankError};

/// Outcome of loading a bank from a store
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    /// Whether a store existed at all
    ///
    /// A missing store is not an error: the bank simply starts empty.
    pub found: bool,

    /// Number of accounts restored
    pub accounts: usize,

    /// Next account number after loading
    pub next_number: AccountNumber,

    /// Lines that were skipped, one `MalformedRecord` error each
    pub skipped: Vec<BankError>,
}

impl LoadReport {
    /// Report for a store that does not exist yet
    pub fn not_found(bank: &Bank) -> Self {
        LoadReport {
            found: false,
            accounts: bank.len(),
            next_number: bank.next_number(),
            skipped: Vec::new(),
        }
    }
}

/// Trait for saving and restoring the bank
pub trait AccountStore {
    /// Persist every account and the next account number
    ///
    /// Replaces whatever the store held before.
    fn save(&self, bank: &Bank) -> Result<(), BankError>;

    /// Restore a bank from the store
    ///
    /// A missing store yields an empty bank and a report with `found == false`.
    fn load(&self) -> Result<(Bank, LoadReport), BankError>;
}
