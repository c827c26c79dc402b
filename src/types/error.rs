//! Error types for the console bank
//!
//! This module defines every error the bank core, the store and the console
//! driver can report. All of them are recoverable from the driver's point of
//! view: a failed operation leaves the bank unchanged and the menu continues.
//!
//! # Error Categories
//!
//! - **Amount Errors**: non-positive amounts, overdrafts, arithmetic overflow
//! - **Authorization Errors**: PIN mismatch, PIN outside the 4-digit range
//! - **Lookup Errors**: unknown account numbers
//! - **Store Errors**: I/O failures, malformed store lines

use super::account::{AccountNumber, Money};
use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the bank
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BankError {
    /// Amount is zero or negative
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Withdrawal or transfer exceeds the account balance
    #[error(
        "Insufficient funds in account {number}: balance {}, requested {}",
        Money(*balance),
        Money(*requested)
    )]
    InsufficientFunds {
        number: AccountNumber,
        balance: Decimal,
        requested: Decimal,
    },

    /// Candidate PIN does not match the account PIN
    #[error("Incorrect PIN for account {number}")]
    IncorrectPin { number: AccountNumber },

    /// No account with this number exists
    #[error("Account {number} not found")]
    AccountNotFound { number: AccountNumber },

    /// PIN is not a 4-digit number
    #[error("Invalid PIN {pin}: must be a 4-digit number between 1000 and 9999")]
    InvalidPinFormat { pin: u16 },

    /// Customer name is empty once whitespace is removed
    #[error("Invalid customer name: name must not be empty")]
    InvalidName,

    /// Arithmetic overflow would occur
    ///
    /// The operation is rejected to keep the balance intact.
    #[error("Arithmetic overflow in {operation} for account {number}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        number: AccountNumber,
    },

    /// A store line could not be turned into an account or a counter
    ///
    /// The line is skipped and loading continues with the next one.
    #[error(
        "Malformed store record{}: {message}",
        line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    MalformedRecord {
        /// Line number of the record (if available)
        line: Option<u64>,
        message: String,
    },

    /// I/O error while reading or writing the store or the console
    #[error("I/O error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for BankError {
    fn from(error: std::io::Error) -> Self {
        BankError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for BankError {
    fn from(error: csv::Error) -> Self {
        if error.is_io_error() {
            return BankError::IoError {
                message: error.to_string(),
            };
        }
        BankError::MalformedRecord {
            line: error.position().map(|pos| pos.line()),
            message: error.to_string(),
        }
    }
}

impl BankError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        BankError::InvalidAmount { amount }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(number: AccountNumber, balance: Decimal, requested: Decimal) -> Self {
        BankError::InsufficientFunds {
            number,
            balance,
            requested,
        }
    }

    /// Create an IncorrectPin error
    pub fn incorrect_pin(number: AccountNumber) -> Self {
        BankError::IncorrectPin { number }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(number: AccountNumber) -> Self {
        BankError::AccountNotFound { number }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, number: AccountNumber) -> Self {
        BankError::ArithmeticOverflow {
            operation: operation.to_string(),
            number,
        }
    }

    /// Create a MalformedRecord error
    pub fn malformed_record(line: Option<u64>, message: impl Into<String>) -> Self {
        BankError::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Create an IoError with the offending path in the message
    pub fn io_at(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        BankError::IoError {
            message: format!("'{}': {}", path.display(), error),
        }
    }

    /// Whether this error belongs to the invalid-amount family
    ///
    /// Non-positive amounts and overdrafts are reported the same way to the
    /// operator, so callers that only care about the kind can use this.
    pub fn is_invalid_amount(&self) -> bool {
        matches!(
            self,
            BankError::InvalidAmount { .. } | BankError::InsufficientFunds { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_amount(
        BankError::InvalidAmount { amount: Decimal::new(-500, 2) },
        "Invalid amount: -5.00"
    )]
    #[case::insufficient_funds(
        BankError::insufficient_funds(1000, Decimal::new(13000, 2), Decimal::new(50000, 2)),
        "Insufficient funds in account 1000: balance 130.00, requested 500.00"
    )]
    #[case::insufficient_funds_sub_cent(
        BankError::insufficient_funds(1000, Decimal::new(9, 3), Decimal::new(1005, 3)),
        "Insufficient funds in account 1000: balance 0.01, requested 1.01"
    )]
    #[case::incorrect_pin(
        BankError::IncorrectPin { number: 1000 },
        "Incorrect PIN for account 1000"
    )]
    #[case::account_not_found(
        BankError::AccountNotFound { number: 4242 },
        "Account 4242 not found"
    )]
    #[case::invalid_pin_format(
        BankError::InvalidPinFormat { pin: 999 },
        "Invalid PIN 999: must be a 4-digit number between 1000 and 9999"
    )]
    #[case::arithmetic_overflow(
        BankError::ArithmeticOverflow { operation: "deposit".to_string(), number: 1001 },
        "Arithmetic overflow in deposit for account 1001"
    )]
    #[case::malformed_with_line(
        BankError::MalformedRecord { line: Some(3), message: "bad pin".to_string() },
        "Malformed store record at line 3: bad pin"
    )]
    #[case::malformed_without_line(
        BankError::MalformedRecord { line: None, message: "bad pin".to_string() },
        "Malformed store record: bad pin"
    )]
    #[case::io_error(
        BankError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    fn test_error_display(#[case] error: BankError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::invalid_amount(BankError::invalid_amount(Decimal::ZERO), true)]
    #[case::insufficient_funds(
        BankError::insufficient_funds(1000, Decimal::ZERO, Decimal::ONE),
        true
    )]
    #[case::incorrect_pin(BankError::incorrect_pin(1000), false)]
    #[case::not_found(BankError::account_not_found(1000), false)]
    fn test_is_invalid_amount(#[case] error: BankError, #[case] expected: bool) {
        assert_eq!(error.is_invalid_amount(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: BankError = io_error.into();
        assert!(matches!(error, BankError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }

    #[test]
    fn test_io_at_includes_path() {
        let error = BankError::io_at(std::path::Path::new("bank_accounts.txt"), "No such file");
        assert_eq!(error.to_string(), "I/O error: 'bank_accounts.txt': No such file");
    }
}
