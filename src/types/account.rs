//! Account-related types for the console bank
//!
//! This module defines the Account structure together with its PIN and the
//! read-only view used for display.

use super::error::BankError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// Account number
///
/// Numbers are issued by the bank starting at 1000.
pub type AccountNumber = u32;

/// Lowest valid PIN
pub const MIN_PIN: u16 = 1000;

/// Highest valid PIN
pub const MAX_PIN: u16 = 9999;

/// A 4-digit PIN in the closed range 1000..=9999
///
/// A `Pin` can only be built through [`Pin::new`], so every account
/// holds a PIN that satisfies the range invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin(u16);

impl Pin {
    /// Validate and wrap a PIN
    ///
    /// # Errors
    ///
    /// Returns `InvalidPinFormat` if `value` is outside 1000..=9999.
    pub fn new(value: u16) -> Result<Self, BankError> {
        if (MIN_PIN..=MAX_PIN).contains(&value) {
            Ok(Pin(value))
        } else {
            Err(BankError::InvalidPinFormat { pin: value })
        }
    }

    pub fn value(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for Pin {
    type Error = BankError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Pin::new(value)
    }
}

/// A customer account
///
/// Holds identity, owner, balance and PIN. The balance never goes negative:
/// deposits reject non-positive amounts and withdrawals reject overdrafts.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    number: AccountNumber,
    name: String,
    pub(crate) balance: Decimal,
    pin: Pin,
}

impl Account {
    /// Create an account
    ///
    /// Callers are responsible for passing a non-negative balance; the bank
    /// and the store loader both check it before getting here.
    pub(crate) fn new(number: AccountNumber, name: String, balance: Decimal, pin: Pin) -> Self {
        Account {
            number,
            name,
            balance,
            pin,
        }
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Check a candidate PIN against the account PIN
    pub fn verify_pin(&self, candidate: u16) -> bool {
        self.pin.value() == candidate
    }

    /// Credit the account
    ///
    /// No PIN is required: anyone may add funds to an account.
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `ArithmeticOverflow` if the balance cannot hold the sum
    pub fn deposit(&mut self, amount: Decimal) -> Result<Decimal, BankError> {
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }

        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankError::arithmetic_overflow("deposit", self.number))?;

        Ok(self.balance)
    }

    /// Debit the account after checking the PIN
    ///
    /// The PIN is checked first, so a wrong PIN is reported even when the
    /// amount is also invalid.
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `IncorrectPin` if `candidate_pin` does not match
    /// - `InvalidAmount` if `amount` is zero or negative
    /// - `InsufficientFunds` if `amount` exceeds the balance
    pub fn withdraw(&mut self, amount: Decimal, candidate_pin: u16) -> Result<Decimal, BankError> {
        if !self.verify_pin(candidate_pin) {
            return Err(BankError::incorrect_pin(self.number));
        }
        if amount <= Decimal::ZERO {
            return Err(BankError::invalid_amount(amount));
        }
        if amount > self.balance {
            return Err(BankError::insufficient_funds(
                self.number,
                self.balance,
                amount,
            ));
        }

        // amount <= balance, so the difference stays non-negative
        self.balance -= amount;
        Ok(self.balance)
    }

    /// Read-only snapshot for display
    pub fn view(&self) -> AccountView {
        AccountView {
            number: self.number,
            name: self.name.clone(),
            balance: self.balance,
        }
    }
}

/// Amount formatted for display with exactly two fractional digits
///
/// Sub-cent amounts are rounded half away from zero, so `0.009` shows
/// as `0.01` and `2.345` as `2.35`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Money(pub Decimal);

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", rounded)
    }
}

/// Display snapshot of an account
///
/// Never carries the PIN.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountView {
    pub number: AccountNumber,
    pub name: String,
    pub balance: Decimal,
}

impl fmt::Display for AccountView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Account Number: {}", self.number)?;
        writeln!(f, "Customer Name: {}", self.name)?;
        write!(f, "Balance: ${}", Money(self.balance))
    }
}
