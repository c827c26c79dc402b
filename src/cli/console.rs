//! Interactive menu driver
//!
//! Renders the menu, parses operator input and forwards the parsed requests
//! to the bank. Bank errors are printed and the menu comes back; only I/O
//! failures on the console itself, or a failed save, end the session with
//! an error.
//!
//! The driver is generic over its input and output so whole sessions can
//! be scripted in tests.

use crate::core::{AccountStore, Bank, LoadReport};
use crate::types::{AccountNumber, BankError, Money, Pin};
use rust_decimal::Decimal;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{info, warn};

const MENU: &str = "\
***** Welcome to Banking System *****
1. Create a New Account
2. Deposit Money
3. Withdraw Money
4. Balance Inquiry
5. Fund Transfer
6. View All Accounts
7. Save and Exit
-------------------------------------
";

const SEPARATOR: &str = "--------------------------";

/// Menu entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    CreateAccount,
    Deposit,
    Withdraw,
    BalanceInquiry,
    Transfer,
    ListAccounts,
    SaveAndExit,
}

impl MenuChoice {
    /// Map the operator's menu number to an entry
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(MenuChoice::CreateAccount),
            "2" => Some(MenuChoice::Deposit),
            "3" => Some(MenuChoice::Withdraw),
            "4" => Some(MenuChoice::BalanceInquiry),
            "5" => Some(MenuChoice::Transfer),
            "6" => Some(MenuChoice::ListAccounts),
            "7" => Some(MenuChoice::SaveAndExit),
            _ => None,
        }
    }
}

/// Result of a single prompt
enum Prompted<T> {
    Value(T),
    Invalid(String),
    Closed,
}

/// Unwrap a prompt or leave the current action
///
/// Invalid input is reported before returning to the menu.
macro_rules! prompt_or_return {
    ($self:ident, $prompt:expr) => {
        match $prompt? {
            Prompted::Value(value) => value,
            Prompted::Invalid(raw) => {
                writeln!($self.output, "Invalid input '{}'!", raw)?;
                return Ok(());
            }
            Prompted::Closed => return Ok(()),
        }
    };
}

/// Menu driver bound to a bank, a store and a console
pub struct Console<'a, S, R, W> {
    bank: &'a mut Bank,
    store: &'a S,
    input: R,
    output: W,
    save_enabled: bool,
}

impl<'a, S, R, W> Console<'a, S, R, W>
where
    S: AccountStore,
    R: BufRead,
    W: Write,
{
    pub fn new(bank: &'a mut Bank, store: &'a S, input: R, output: W) -> Self {
        Console {
            bank,
            store,
            input,
            output,
            save_enabled: true,
        }
    }

    /// Never write the store on exit
    ///
    /// Used when the store exists but could not be loaded: the bank then
    /// starts empty, and saving it would wipe the accounts on disk.
    pub fn keep_store_untouched(mut self) -> Self {
        self.save_enabled = false;
        self
    }

    /// Print the outcome of the startup load
    pub fn report_load(&mut self, report: &LoadReport) -> Result<(), BankError> {
        if !report.found {
            writeln!(
                self.output,
                "No saved accounts found. Starting with an empty bank."
            )?;
            return Ok(());
        }

        writeln!(
            self.output,
            "Accounts loaded from file successfully! {} account(s), next account number: {}",
            report.accounts, report.next_number
        )?;
        for skipped in &report.skipped {
            writeln!(self.output, "Warning: {}", skipped)?;
        }
        Ok(())
    }

    /// Run the menu loop until the operator saves and exits
    ///
    /// End of input at the menu is treated like "Save and Exit".
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the console cannot be read or written, or if
    /// the final save fails (after reporting it to the operator).
    pub fn run(&mut self) -> Result<(), BankError> {
        loop {
            write!(self.output, "{}Enter your choice: ", MENU)?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                writeln!(self.output)?;
                info!("input closed, saving before exit");
                return self.save_and_exit();
            };

            match MenuChoice::from_input(&line) {
                Some(MenuChoice::CreateAccount) => self.create_account()?,
                Some(MenuChoice::Deposit) => self.deposit()?,
                Some(MenuChoice::Withdraw) => self.withdraw()?,
                Some(MenuChoice::BalanceInquiry) => self.balance_inquiry()?,
                Some(MenuChoice::Transfer) => self.transfer()?,
                Some(MenuChoice::ListAccounts) => self.list_accounts()?,
                Some(MenuChoice::SaveAndExit) => return self.save_and_exit(),
                None => writeln!(self.output, "Invalid choice! Please try again.")?,
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, BankError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>, BankError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        self.read_line()
    }

    fn prompt<T: FromStr>(&mut self, prompt: &str) -> Result<Prompted<T>, BankError> {
        Ok(match self.prompt_line(prompt)? {
            None => Prompted::Closed,
            Some(line) => match line.trim().parse::<T>() {
                Ok(value) => Prompted::Value(value),
                Err(_) => Prompted::Invalid(line.trim().to_string()),
            },
        })
    }

    fn prompt_amount(&mut self, prompt: &str) -> Result<Prompted<Decimal>, BankError> {
        Ok(match self.prompt_line(prompt)? {
            None => Prompted::Closed,
            Some(line) => match Decimal::from_str(line.trim()) {
                Ok(amount) => Prompted::Value(amount),
                Err(_) => Prompted::Invalid(line.trim().to_string()),
            },
        })
    }

    /// Keep asking until a PIN in 1000..=9999 is entered
    fn prompt_new_pin(&mut self) -> Result<Option<Pin>, BankError> {
        loop {
            match self.prompt::<u16>("Set a 4-digit PIN: ")? {
                Prompted::Value(value) => {
                    if let Ok(pin) = Pin::new(value) {
                        return Ok(Some(pin));
                    }
                }
                Prompted::Invalid(_) => {}
                Prompted::Closed => return Ok(None),
            }
            writeln!(self.output, "Invalid PIN! Please enter a 4-digit number.")?;
        }
    }

    fn report_error(&mut self, error: &BankError) -> Result<(), BankError> {
        writeln!(self.output, "Error: {}", error)?;
        Ok(())
    }

    fn create_account(&mut self) -> Result<(), BankError> {
        let Some(name) = self.prompt_line("Enter Customer Name: ")? else {
            return Ok(());
        };
        let initial_deposit =
            prompt_or_return!(self, self.prompt_amount("Enter Initial Deposit: "));
        let Some(pin) = self.prompt_new_pin()? else {
            return Ok(());
        };

        match self.bank.create(&name, initial_deposit, pin.value()) {
            Ok(number) => writeln!(
                self.output,
                "Account created successfully! Your account number is {}.",
                number
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn deposit(&mut self) -> Result<(), BankError> {
        let number: AccountNumber = prompt_or_return!(self, self.prompt("Enter Account Number: "));
        let amount = prompt_or_return!(self, self.prompt_amount("Enter Deposit Amount: "));

        match self.bank.deposit(number, amount) {
            Ok(balance) => writeln!(
                self.output,
                "Deposit successful! New balance: ${}",
                Money(balance)
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn withdraw(&mut self) -> Result<(), BankError> {
        let number: AccountNumber = prompt_or_return!(self, self.prompt("Enter Account Number: "));
        let amount = prompt_or_return!(self, self.prompt_amount("Enter Withdrawal Amount: "));
        let pin: u16 = prompt_or_return!(self, self.prompt("Enter PIN: "));

        match self.bank.withdraw(number, amount, pin) {
            Ok(balance) => writeln!(
                self.output,
                "Withdrawal successful! New balance: ${}",
                Money(balance)
            )?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn balance_inquiry(&mut self) -> Result<(), BankError> {
        let number: AccountNumber = prompt_or_return!(self, self.prompt("Enter Account Number: "));

        match self.bank.find(number) {
            Some(account) => writeln!(self.output, "{}", account.view())?,
            None => self.report_error(&BankError::account_not_found(number))?,
        }
        Ok(())
    }

    fn transfer(&mut self) -> Result<(), BankError> {
        let from: AccountNumber =
            prompt_or_return!(self, self.prompt("Enter Source Account Number: "));
        let to: AccountNumber =
            prompt_or_return!(self, self.prompt("Enter Destination Account Number: "));
        let amount = prompt_or_return!(self, self.prompt_amount("Enter Transfer Amount: "));
        let pin: u16 = prompt_or_return!(
            self,
            self.prompt(&format!("Enter PIN for Account {}: ", from))
        );

        match self.bank.transfer(from, to, amount, pin) {
            Ok(()) => writeln!(self.output, "Transfer successful!")?,
            Err(e) => self.report_error(&e)?,
        }
        Ok(())
    }

    fn list_accounts(&mut self) -> Result<(), BankError> {
        let views = self.bank.list_all();
        if views.is_empty() {
            writeln!(self.output, "No accounts available.")?;
            return Ok(());
        }
        for view in views {
            writeln!(self.output, "{}", view)?;
            writeln!(self.output, "{}", SEPARATOR)?;
        }
        Ok(())
    }

    fn save_and_exit(&mut self) -> Result<(), BankError> {
        if !self.save_enabled {
            warn!("store was not loaded, skipping save");
            writeln!(
                self.output,
                "Accounts not saved: the store could not be loaded and was left untouched."
            )?;
            writeln!(self.output, "Exiting...")?;
            self.output.flush()?;
            return Ok(());
        }

        let result = self.store.save(self.bank);
        match &result {
            Ok(()) => writeln!(self.output, "Accounts saved to file successfully!")?,
            Err(e) => {
                warn!(error = %e, "save failed");
                writeln!(self.output, "Error saving accounts: {}", e)?;
            }
        }
        writeln!(self.output, "Exiting...")?;
        self.output.flush()?;
        result
    }
}
