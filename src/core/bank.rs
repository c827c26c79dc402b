//! Account registry
//!
//! This module provides the `Bank`, the authoritative container of accounts
//! and the issuer of account numbers.
//!
//! The Bank is responsible for:
//! - Issuing unique, monotonically increasing account numbers
//! - Looking accounts up by number
//! - Routing deposits and PIN-checked withdrawals to the right account
//! - Transfers that either apply both legs or neither
//!
//! Accounts are never handed out mutably. Every mutation goes through a Bank
//! method keyed by account number.

use crate::types::{Account, AccountNumber, AccountView, BankError, Pin};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// First account number issued by an empty bank
pub const FIRST_ACCOUNT_NUMBER: AccountNumber = 1000;

/// Registry of accounts in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Bank {
    accounts: Vec<Account>,
    next_number: AccountNumber,
}

impl Default for Bank {
    fn default() -> Self {
        Self::new()
    }
}

impl Bank {
    /// Create an empty bank whose first account will be number 1000
    pub fn new() -> Self {
        Bank {
            accounts: Vec::new(),
            next_number: FIRST_ACCOUNT_NUMBER,
        }
    }

    /// Rebuild a bank from previously stored parts
    ///
    /// The counter is raised so that it is at least 1000 and strictly
    /// greater than every account number, whatever the stored value was.
    /// Callers must pass accounts with unique numbers below
    /// `AccountNumber::MAX`, so there is always room for a next number.
    pub(crate) fn from_parts(accounts: Vec<Account>, stored_next: AccountNumber) -> Self {
        debug_assert!(accounts
            .iter()
            .all(|account| account.number() < AccountNumber::MAX));

        let floor = accounts
            .iter()
            .map(|account| account.number().saturating_add(1))
            .max()
            .unwrap_or(FIRST_ACCOUNT_NUMBER)
            .max(FIRST_ACCOUNT_NUMBER);

        if stored_next < floor {
            warn!(
                stored_next,
                next_number = floor,
                "stored next account number is too low, raising it"
            );
        }

        Bank {
            accounts,
            next_number: stored_next.max(floor),
        }
    }

    /// Number the next created account will receive
    pub fn next_number(&self) -> AccountNumber {
        self.next_number
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Open a new account
    ///
    /// Whitespace runs inside the name are collapsed to a single `_` so the
    /// name stays a single token in the store file.
    ///
    /// # Arguments
    ///
    /// * `name` - Customer name
    /// * `initial_deposit` - Opening balance (may be zero, never negative)
    /// * `pin` - 4-digit PIN
    ///
    /// # Returns
    ///
    /// The number assigned to the new account.
    ///
    /// # Errors
    ///
    /// - `InvalidPinFormat` if `pin` is outside 1000..=9999
    /// - `InvalidAmount` if `initial_deposit` is negative
    /// - `InvalidName` if the name is blank
    /// - `ArithmeticOverflow` if the account number space is exhausted
    pub fn create(
        &mut self,
        name: &str,
        initial_deposit: Decimal,
        pin: u16,
    ) -> Result<AccountNumber, BankError> {
        let pin = Pin::new(pin)?;
        if initial_deposit < Decimal::ZERO {
            return Err(BankError::invalid_amount(initial_deposit));
        }
        let name = normalize_name(name)?;

        let number = self.next_number;
        let next_number = number
            .checked_add(1)
            .ok_or_else(|| BankError::arithmetic_overflow("create", number))?;

        self.accounts
            .push(Account::new(number, name, initial_deposit, pin));
        self.next_number = next_number;

        debug!(number, %initial_deposit, "account created");
        Ok(number)
    }

    /// Look an account up by number
    pub fn find(&self, number: AccountNumber) -> Option<&Account> {
        self.accounts
            .iter()
            .find(|account| account.number() == number)
    }

    fn position(&self, number: AccountNumber) -> Result<usize, BankError> {
        self.accounts
            .iter()
            .position(|account| account.number() == number)
            .ok_or_else(|| BankError::account_not_found(number))
    }

    /// Deposit into an account
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this number
    /// - Any error from [`Account::deposit`]
    pub fn deposit(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        let index = self.position(number)?;
        let balance = self.accounts[index].deposit(amount).inspect_err(|e| {
            warn!(number, error = %e, "deposit rejected");
        })?;

        debug!(number, %amount, %balance, "deposit applied");
        Ok(balance)
    }

    /// Withdraw from an account after checking its PIN
    ///
    /// # Returns
    ///
    /// The new balance.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this number
    /// - Any error from [`Account::withdraw`]
    pub fn withdraw(
        &mut self,
        number: AccountNumber,
        amount: Decimal,
        pin: u16,
    ) -> Result<Decimal, BankError> {
        let index = self.position(number)?;
        let balance = self.accounts[index]
            .withdraw(amount, pin)
            .inspect_err(|e| {
                warn!(number, error = %e, "withdrawal rejected");
            })?;

        debug!(number, %amount, %balance, "withdrawal applied");
        Ok(balance)
    }

    /// Move funds between two accounts
    ///
    /// Both accounts are resolved and the source PIN is checked before
    /// anything is touched. The source is then debited and the destination
    /// credited; if the credit fails the debit is undone, so either both
    /// legs apply or neither does.
    ///
    /// A transfer from an account to itself is allowed and nets to zero.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if either account is missing (source reported first)
    /// - `IncorrectPin` if `from_pin` does not match the source account
    /// - `InvalidAmount` / `InsufficientFunds` from the debit
    /// - `ArithmeticOverflow` from the credit
    pub fn transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
        from_pin: u16,
    ) -> Result<(), BankError> {
        let result = self.apply_transfer(from, to, amount, from_pin);
        match &result {
            Ok(()) => debug!(from, to, %amount, "transfer applied"),
            Err(e) => warn!(from, to, error = %e, "transfer rejected"),
        }
        result
    }

    fn apply_transfer(
        &mut self,
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
        from_pin: u16,
    ) -> Result<(), BankError> {
        let from_index = self.position(from)?;
        let to_index = self.position(to)?;

        if !self.accounts[from_index].verify_pin(from_pin) {
            return Err(BankError::incorrect_pin(from));
        }

        let source_balance = self.accounts[from_index].balance();
        self.accounts[from_index].withdraw(amount, from_pin)?;

        if let Err(e) = self.accounts[to_index].deposit(amount) {
            self.accounts[from_index].balance = source_balance;
            return Err(e);
        }

        Ok(())
    }

    /// Views of every account in insertion order
    pub fn list_all(&self) -> Vec<AccountView> {
        self.accounts.iter().map(Account::view).collect()
    }

    /// Iterate over the accounts in insertion order
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Sum of all balances
    ///
    /// Returns `None` if the sum does not fit in a `Decimal`.
    pub fn total_balance(&self) -> Option<Decimal> {
        self.accounts
            .iter()
            .try_fold(Decimal::ZERO, |sum, account| sum.checked_add(account.balance()))
    }
}

/// Make a customer name safe for the whitespace-separated store format
///
/// Trims the name and replaces every internal whitespace run with `_`.
///
/// # Errors
///
/// Returns `InvalidName` if nothing is left after trimming.
pub fn normalize_name(name: &str) -> Result<String, BankError> {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join("_");
    if normalized.is_empty() {
        return Err(BankError::InvalidName);
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    /// Bank after scenarios S1 to S3: Alice (1000) holds 130.00
    fn bank_with_alice() -> Bank {
        let mut bank = Bank::new();
        bank.create("Alice", dec(10000, 2), 4321).unwrap();
        bank.deposit(1000, dec(5000, 2)).unwrap();
        bank.withdraw(1000, dec(2000, 2), 4321).unwrap();
        bank
    }

    /// Alice (1000, 130.00, PIN 4321) and Bob (1001, 0.00, PIN 1111)
    fn bank_with_alice_and_bob() -> Bank {
        let mut bank = bank_with_alice();
        bank.create("Bob", Decimal::ZERO, 1111).unwrap();
        bank
    }

    fn balance(bank: &Bank, number: AccountNumber) -> Decimal {
        bank.find(number).unwrap().balance()
    }

    #[test]
    fn test_new_bank_is_empty() {
        let bank = Bank::new();
        assert!(bank.is_empty());
        assert_eq!(bank.len(), 0);
        assert_eq!(bank.next_number(), FIRST_ACCOUNT_NUMBER);
        assert!(bank.list_all().is_empty());
    }

    #[test]
    fn test_create_assigns_sequential_numbers() {
        let mut bank = Bank::new();

        for expected in 1000..1005 {
            let before = bank.next_number();
            let number = bank.create("Someone", Decimal::ZERO, 1234).unwrap();
            assert_eq!(number, expected);
            assert_eq!(number, before);
            assert_eq!(bank.next_number(), before + 1);
        }
        assert_eq!(bank.len(), 5);
    }

    #[test]
    fn test_create_then_deposit() {
        let mut bank = Bank::new();

        let number = bank.create("Alice", dec(10000, 2), 4321).unwrap();
        assert_eq!(number, 1000);
        assert_eq!(bank.next_number(), 1001);

        let new_balance = bank.deposit(1000, dec(5000, 2)).unwrap();
        assert_eq!(new_balance, dec(15000, 2));
        assert!(bank.find(1000).unwrap().view().to_string().contains("150.00"));
    }

    #[rstest]
    #[case::pin_too_small(999, dec(100, 0), BankError::InvalidPinFormat { pin: 999 })]
    #[case::pin_too_large(10000, dec(100, 0), BankError::InvalidPinFormat { pin: 10000 })]
    #[case::negative_deposit(4321, dec(-1, 0), BankError::InvalidAmount { amount: dec(-1, 0) })]
    fn test_create_rejections_leave_bank_unchanged(
        #[case] pin: u16,
        #[case] initial_deposit: Decimal,
        #[case] expected: BankError,
    ) {
        let mut bank = Bank::new();

        let result = bank.create("Alice", initial_deposit, pin);

        assert_eq!(result, Err(expected));
        assert!(bank.is_empty());
        assert_eq!(bank.next_number(), FIRST_ACCOUNT_NUMBER);
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let mut bank = Bank::new();
        assert_eq!(bank.create("   ", Decimal::ZERO, 4321), Err(BankError::InvalidName));
        assert_eq!(bank.next_number(), FIRST_ACCOUNT_NUMBER);
    }

    #[rstest]
    #[case::single_token("Alice", "Alice")]
    #[case::two_words("Alice Smith", "Alice_Smith")]
    #[case::padded("  Alice   Smith \t", "Alice_Smith")]
    #[case::tab_inside("Mary\tJane Doe", "Mary_Jane_Doe")]
    fn test_normalize_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_name(input).unwrap(), expected);
    }

    #[test]
    fn test_create_stores_normalized_name() {
        let mut bank = Bank::new();
        let number = bank.create("Alice Smith", Decimal::ZERO, 4321).unwrap();
        assert_eq!(bank.find(number).unwrap().name(), "Alice_Smith");
    }

    #[test]
    fn test_find_missing_account() {
        let bank = bank_with_alice();
        assert!(bank.find(1001).is_none());
        assert!(bank.find(999).is_none());
    }

    #[test]
    fn test_find_and_list_have_no_side_effects() {
        let bank = bank_with_alice_and_bob();
        let before = bank.clone();

        let _ = bank.find(1000);
        let _ = bank.find(4242);
        let _ = bank.list_all();
        let _ = bank.list_all();

        assert_eq!(bank, before);
    }

    #[test]
    fn test_deposit_unknown_account() {
        let mut bank = Bank::new();
        assert_eq!(
            bank.deposit(1000, dec(100, 0)),
            Err(BankError::AccountNotFound { number: 1000 })
        );
    }

    #[test]
    fn test_withdraw_pin_gate() {
        let mut bank = Bank::new();
        bank.create("Alice", dec(10000, 2), 4321).unwrap();
        bank.deposit(1000, dec(5000, 2)).unwrap();

        let result = bank.withdraw(1000, dec(2000, 2), 0);
        assert_eq!(result, Err(BankError::IncorrectPin { number: 1000 }));
        assert_eq!(balance(&bank, 1000), dec(15000, 2));

        let result = bank.withdraw(1000, dec(2000, 2), 4321);
        assert_eq!(result, Ok(dec(13000, 2)));
    }

    #[test]
    fn test_withdraw_overdraft_rejected() {
        let mut bank = bank_with_alice();

        let result = bank.withdraw(1000, dec(50000, 2), 4321);

        assert!(result.unwrap_err().is_invalid_amount());
        assert_eq!(balance(&bank, 1000), dec(13000, 2));
    }

    #[test]
    fn test_withdraw_unknown_account() {
        let mut bank = bank_with_alice();
        assert_eq!(
            bank.withdraw(2000, dec(1, 0), 4321),
            Err(BankError::AccountNotFound { number: 2000 })
        );
    }

    #[test]
    fn test_transfer_bad_pin_changes_nothing() {
        let mut bank = bank_with_alice_and_bob();
        assert_eq!(bank.find(1001).unwrap().number(), 1001);

        let result = bank.transfer(1000, 1001, dec(3000, 2), 9999);

        assert_eq!(result, Err(BankError::IncorrectPin { number: 1000 }));
        assert_eq!(balance(&bank, 1000), dec(13000, 2));
        assert_eq!(balance(&bank, 1001), Decimal::ZERO);
    }

    #[test]
    fn test_transfer_success_conserves_total() {
        let mut bank = bank_with_alice_and_bob();
        let total_before = bank.total_balance().unwrap();

        bank.transfer(1000, 1001, dec(3000, 2), 4321).unwrap();

        assert_eq!(balance(&bank, 1000), dec(10000, 2));
        assert_eq!(balance(&bank, 1001), dec(3000, 2));
        assert_eq!(total_before, dec(13000, 2));
        assert_eq!(bank.total_balance().unwrap(), total_before);
    }

    #[rstest]
    #[case::source_missing(4000, 1001, dec(10, 0), 4321)]
    #[case::destination_missing(1000, 4000, dec(10, 0), 4321)]
    #[case::wrong_pin(1000, 1001, dec(10, 0), 1111)]
    #[case::overdraft(1000, 1001, dec(13001, 2), 4321)]
    #[case::zero_amount(1000, 1001, Decimal::ZERO, 4321)]
    #[case::negative_amount(1000, 1001, dec(-10, 0), 4321)]
    fn test_failed_transfer_leaves_balances(
        #[case] from: AccountNumber,
        #[case] to: AccountNumber,
        #[case] amount: Decimal,
        #[case] pin: u16,
    ) {
        let mut bank = bank_with_alice_and_bob();
        let before = bank.clone();

        assert!(bank.transfer(from, to, amount, pin).is_err());

        assert_eq!(bank, before);
    }

    #[test]
    fn test_transfer_missing_destination_reports_not_found_before_pin() {
        let mut bank = bank_with_alice();
        assert_eq!(
            bank.transfer(1000, 1001, dec(10, 0), 0),
            Err(BankError::AccountNotFound { number: 1001 })
        );
    }

    #[test]
    fn test_transfer_rolls_back_when_credit_overflows() {
        let mut bank = Bank::new();
        bank.create("Alice", dec(100, 0), 4321).unwrap();
        bank.create("Rich", Decimal::MAX, 1111).unwrap();
        let before = bank.clone();

        let result = bank.transfer(1000, 1001, dec(1, 0), 4321);

        assert!(matches!(result, Err(BankError::ArithmeticOverflow { .. })));
        assert_eq!(bank, before);
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let mut bank = bank_with_alice();

        bank.transfer(1000, 1000, dec(5000, 2), 4321).unwrap();

        assert_eq!(balance(&bank, 1000), dec(13000, 2));
    }

    #[test]
    fn test_self_transfer_still_checks_funds() {
        let mut bank = bank_with_alice();
        assert!(bank
            .transfer(1000, 1000, dec(50000, 2), 4321)
            .unwrap_err()
            .is_invalid_amount());
    }

    #[test]
    fn test_list_all_preserves_insertion_order() {
        let mut bank = Bank::new();
        bank.create("Carol", Decimal::ZERO, 3333).unwrap();
        bank.create("Alice", Decimal::ZERO, 1111).unwrap();
        bank.create("Bob", Decimal::ZERO, 2222).unwrap();

        let names: Vec<_> = bank.list_all().into_iter().map(|v| v.name).collect();
        assert_eq!(names, ["Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_invariants_hold_after_mixed_operations() {
        let mut bank = bank_with_alice_and_bob();
        let _ = bank.withdraw(1001, dec(1, 0), 1111);
        let _ = bank.deposit(1001, dec(-5, 0));
        let _ = bank.transfer(1001, 1000, dec(1, 0), 1111);
        let _ = bank.transfer(1000, 1001, dec(13000, 2), 4321);
        let _ = bank.withdraw(1000, dec(1, 2), 4321);
        let _ = bank.create("Dave", dec(-1, 0), 5555);

        for account in bank.accounts() {
            assert!(account.balance() >= Decimal::ZERO);
            assert!((1000..=9999).contains(&account.pin().value()));
            assert!(account.number() < bank.next_number());
        }
    }

    #[test]
    fn test_from_parts_raises_low_counter() {
        let accounts = vec![
            Account::new(1000, "Alice".to_string(), dec(1, 0), Pin::new(4321).unwrap()),
            Account::new(1007, "Bob".to_string(), dec(2, 0), Pin::new(1111).unwrap()),
        ];

        let bank = Bank::from_parts(accounts, 1003);

        assert_eq!(bank.next_number(), 1008);
    }

    #[rstest]
    #[case::keeps_higher_counter(1500, 1500)]
    #[case::raises_to_floor(10, FIRST_ACCOUNT_NUMBER)]
    fn test_from_parts_without_accounts(
        #[case] stored: AccountNumber,
        #[case] expected: AccountNumber,
    ) {
        let bank = Bank::from_parts(Vec::new(), stored);
        assert_eq!(bank.next_number(), expected);
    }
}
