//! Types module
//!
//! Contains core data structures used throughout the application.
//! - `account`: Account, PIN and display view
//! - `error`: Error types for the bank

pub mod account;
pub mod error;

pub use account::{Account, AccountNumber, AccountView, Money, Pin, MAX_PIN, MIN_PIN};
pub use error::BankError;
