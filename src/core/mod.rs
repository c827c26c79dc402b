//! Core business logic module
//!
//! - `bank` - The account registry and transaction rules
//! - `traits` - Persistence seam used by the console driver

pub mod bank;
pub mod traits;

pub use bank::{normalize_name, Bank, FIRST_ACCOUNT_NUMBER};
pub use traits::{AccountStore, LoadReport};
