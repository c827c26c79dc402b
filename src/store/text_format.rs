//! Line format of the account store
//!
//! This module centralizes the store format, providing:
//! - AccountLine structure for deserialization
//! - Validation of account lines into domain accounts
//! - Reading a whole store into a bank and writing a bank back out
//!
//! The format is one account per line, `<number> <name> <balance> <pin>`,
//! followed by a line holding only the next account number. Fields are
//! written separated by single spaces with no header, and every line ends
//! with `\n`. On read, any run of ASCII whitespace separates fields.
//!
//! Functions work on any `Read`/`Write`, so they are tested without files.

use crate::core::bank::{Bank, FIRST_ACCOUNT_NUMBER};
use crate::types::{Account, AccountNumber, BankError, Pin};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::{Read, Write};
use std::str::FromStr;
use tracing::warn;

/// Account line structure for deserialization
///
/// The balance stays a string here and is parsed into a `Decimal`
/// during validation.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AccountLine {
    pub number: AccountNumber,
    pub name: String,
    pub balance: String,
    pub pin: u16,
}

/// A single meaningful line of the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLine {
    Account(Account),
    NextNumber(AccountNumber),
}

/// Convert an AccountLine into an Account
///
/// Rejects lines that would break an account invariant: an unparseable or
/// negative balance, a PIN outside 1000..=9999, or an account number with
/// no successor to use as the next account number.
pub fn convert_account_line(line: AccountLine) -> Result<Account, String> {
    if line.number.checked_add(1).is_none() {
        return Err(format!(
            "account number {} leaves no next account number",
            line.number
        ));
    }

    let balance = Decimal::from_str(line.balance.trim())
        .map_err(|_| format!("invalid balance '{}' for account {}", line.balance, line.number))?;
    if balance < Decimal::ZERO {
        return Err(format!(
            "negative balance {} for account {}",
            balance, line.number
        ));
    }

    let pin = Pin::new(line.pin).map_err(|e| format!("account {}: {}", line.number, e))?;

    Ok(Account::new(line.number, line.name, balance, pin))
}

/// Classify a line by its non-empty fields
///
/// Four fields make an account record, a single field is the next
/// account number. Anything else is malformed.
pub fn parse_store_line(fields: &StringRecord) -> Result<StoreLine, String> {
    match fields.len() {
        4 => {
            let line: AccountLine = fields
                .deserialize(None)
                .map_err(|e| format!("invalid account record: {}", e))?;
            convert_account_line(line).map(StoreLine::Account)
        }
        1 => fields[0]
            .parse::<AccountNumber>()
            .map(StoreLine::NextNumber)
            .map_err(|_| format!("invalid next account number '{}'", &fields[0])),
        n => Err(format!(
            "expected 4 fields or a single number, found {} fields",
            n
        )),
    }
}

/// Read a whole store into a bank
///
/// Blank lines are ignored. Lines that fail to parse, fail validation or
/// repeat an account number already seen are skipped and returned as
/// `MalformedRecord` errors. The last next-number line wins; if there is
/// none the counter is derived from the accounts.
///
/// # Errors
///
/// Returns `IoError` if the underlying reader fails.
pub fn read_store<R: Read>(input: R) -> Result<(Bank, Vec<BankError>), BankError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(input);

    let mut accounts = Vec::new();
    let mut seen = HashSet::new();
    let mut stored_next = None;
    let mut skipped = Vec::new();

    for result in reader.records() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let error = BankError::from(e);
                warn!(error = %error, "skipping unreadable store line");
                skipped.push(error);
                continue;
            }
        };

        let line = record.position().map(|pos| pos.line());
        // Only spaces split the raw record; tabs and repeated spaces are
        // handled here
        let fields: StringRecord = record
            .iter()
            .flat_map(|field| field.split_ascii_whitespace())
            .collect();
        if fields.is_empty() {
            continue;
        }

        let parsed = parse_store_line(&fields).and_then(|parsed| match parsed {
            StoreLine::Account(account) if !seen.insert(account.number()) => Err(format!(
                "duplicate account number {}",
                account.number()
            )),
            other => Ok(other),
        });

        match parsed {
            Ok(StoreLine::Account(account)) => accounts.push(account),
            Ok(StoreLine::NextNumber(number)) => stored_next = Some(number),
            Err(message) => {
                let error = BankError::malformed_record(line, message);
                warn!(error = %error, "skipping store line");
                skipped.push(error);
            }
        }
    }

    let bank = Bank::from_parts(accounts, stored_next.unwrap_or(FIRST_ACCOUNT_NUMBER));
    Ok((bank, skipped))
}

/// Write a bank in store format
///
/// Balances keep their full scale so a later read restores them exactly.
///
/// # Errors
///
/// Returns `IoError` if writing or flushing fails.
pub fn write_store<W: Write>(bank: &Bank, output: W) -> Result<(), BankError> {
    let mut writer = WriterBuilder::new()
        .delimiter(b' ')
        .has_headers(false)
        .flexible(true)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(output);

    for account in bank.accounts() {
        writer.write_record(&[
            account.number().to_string(),
            account.name().to_string(),
            account.balance().to_string(),
            account.pin().value().to_string(),
        ])?;
    }
    writer.write_record(&[bank.next_number().to_string()])?;

    writer.flush()?;
    Ok(())
}
