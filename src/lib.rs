//! Console Bank Library
//! # Overview
//!
//! This library provides an in-memory account registry with PIN-gated
//! withdrawals and atomic transfers, persisted to a plain-text file between
//! runs, plus the interactive menu that drives it.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Pin, BankError)
//! - [`core`] - Business logic components:
//!   - [`core::bank`] - Account registry, numbering and transaction rules
//!   - [`core::traits`] - Persistence seam (`AccountStore`)
//! - [`store`] - Plain-text store format and its file-backed implementation
//! - [`cli`] - CLI arguments, logging setup and the menu driver
//!
//! # Operations
//!
//! - **Create**: open an account with a name, an opening balance and a 4-digit PIN
//! - **Deposit**: credit any account, no PIN needed
//! - **Withdraw**: debit an account after checking its PIN
//! - **Transfer**: debit one account and credit another, both or neither
//! - **List / Find**: read-only views of accounts
//!
//! # Invariants
//!
//! - Balances never go negative
//! - PINs stay within 1000..=9999
//! - Account numbers are unique and below the bank's next account number

pub mod cli;
pub mod core;
pub mod store;
pub mod types;

pub use core::{AccountStore, Bank, LoadReport};
pub use store::TextStore;
pub use types::{Account, AccountNumber, AccountView, BankError, Pin};
