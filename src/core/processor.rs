//! Transaction processing
//!
//! [`TransactionProcessor`] runs deposits, withdrawals and transfers as
//! straight-line pipelines of checks. The first failing check aborts the
//! operation with a specific [`LedgerError`]; no balance is touched until
//! every check has passed.
//!
//! # Audit rule
//!
//! Every call to `deposit`, `withdraw`, `transfer` or `apply_interest`
//! appends exactly one [`Transaction`] to the ledger: `Successful` with the
//! committed amount and fee, or `Failed` with the rejection reason. The
//! append happens after the account lock is released, using the committed
//! values. Storage faults are the exception: they propagate as
//! `LedgerError::Storage` and leave no ledger entry.
//!
//! # Critical sections
//!
//! The daily-limit rollover, the limit check, the fee and balance check, the
//! debit and the usage update all run inside a single
//! [`AccountStore::with_exclusive_access`] call (or the ordered two-account
//! variant for transfers). Existence, PIN and status are checked up front on
//! a snapshot; status is checked again under the lock since it may have
//! changed in between.

use crate::config::LedgerConfig;
use crate::core::account_store::AccountStore;
use crate::core::clock::SystemClock;
use crate::core::interest::InterestCalculator;
use crate::core::ledger::TransactionLedger;
use crate::core::limit_tracker::LimitTracker;
use crate::core::statement::Statement;
use crate::core::traits::{AccountRepository, Clock, TransactionRepository};
use crate::storage::{InMemoryAccountRepository, InMemoryTransactionRepository};
use crate::types::{
    Account, AccountStatus, LedgerCommand, LedgerError, LimitKind, OpenAccount, Outcome, Pin,
    StorageError, Transaction, TransactionDraft, TransactionKind, TransferSide,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Orchestrates ledger operations over the account store and the ledger
pub struct TransactionProcessor {
    accounts: AccountStore,
    ledger: TransactionLedger,
    clock: Arc<dyn Clock>,
    config: LedgerConfig,
}

/// Positive, and no finer than cents
fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO || amount.normalize().scale() > 2 {
        return Err(LedgerError::invalid_amount(amount));
    }
    Ok(())
}

fn verify_pin(account: &Account, pin: &str) -> Result<(), LedgerError> {
    if !account.pin.matches(pin) {
        return Err(LedgerError::invalid_pin(&account.number));
    }
    Ok(())
}

fn ensure_active(account: &Account, side: Option<TransferSide>) -> Result<(), LedgerError> {
    if !account.is_active() {
        return Err(LedgerError::account_not_active(
            &account.number,
            account.status,
            side,
        ));
    }
    Ok(())
}

fn describe(description: Option<&str>, default: impl FnOnce() -> String) -> String {
    match description {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => default(),
    }
}

impl TransactionProcessor {
    /// Create a processor over the given collaborators
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        transactions: Arc<dyn TransactionRepository>,
        clock: Arc<dyn Clock>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            accounts: AccountStore::new(accounts),
            ledger: TransactionLedger::new(transactions),
            clock,
            config,
        }
    }

    /// Processor over fresh in-memory stores, the system clock and default terms
    pub fn in_memory() -> Self {
        Self::in_memory_with_clock(Arc::new(SystemClock))
    }

    /// Processor over fresh in-memory stores and default terms
    pub fn in_memory_with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryTransactionRepository::new()),
            clock,
            LedgerConfig::default(),
        )
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Route a command to the matching operation
    ///
    /// Returns the ledger record for money-moving commands and `None` for
    /// account management (open, status change).
    pub fn execute(&self, command: LedgerCommand) -> Result<Option<Transaction>, LedgerError> {
        match command {
            LedgerCommand::Open(request) => self.open_account(request).map(|_| None),
            LedgerCommand::Deposit {
                account,
                amount,
                description,
            } => self
                .deposit(&account, amount, description.as_deref())
                .map(Some),
            LedgerCommand::Withdraw {
                account,
                pin,
                amount,
                description,
            } => self
                .withdraw(&account, &pin, amount, description.as_deref())
                .map(Some),
            LedgerCommand::Transfer {
                from,
                pin,
                to,
                amount,
                description,
            } => self
                .transfer(&from, &pin, &to, amount, description.as_deref())
                .map(Some),
            LedgerCommand::SetStatus { account, status } => {
                self.set_status(&account, status).map(|_| None)
            }
            LedgerCommand::ApplyInterest { account } => self.apply_interest(&account).map(Some),
        }
    }

    /// Open a new account
    ///
    /// Validates the request, applies the configured terms for the account
    /// type and stores the account as `Active` at version 0. Opening does not
    /// write a ledger record.
    ///
    /// # Errors
    ///
    /// - `InvalidAccountNumber` if the number is blank
    /// - `InvalidAmount` if the initial deposit is negative or finer than cents
    /// - `DuplicateAccount` if the number is taken
    /// - `InvalidPinFormat` if the PIN is not four digits
    /// - `InvalidHolderName` if the holder name is blank
    pub fn open_account(&self, request: OpenAccount) -> Result<Account, LedgerError> {
        let number = request.number.trim();
        if number.is_empty() {
            return Err(LedgerError::InvalidAccountNumber);
        }
        if request.initial_deposit < Decimal::ZERO
            || request.initial_deposit.normalize().scale() > 2
        {
            return Err(LedgerError::invalid_amount(request.initial_deposit));
        }
        if self.accounts.exists(number)? {
            return Err(LedgerError::DuplicateAccount {
                account: number.to_string(),
            });
        }
        if !Pin::is_well_formed(&request.pin) {
            return Err(LedgerError::InvalidPinFormat);
        }
        let holder_name = request.holder_name.trim();
        if holder_name.is_empty() {
            return Err(LedgerError::InvalidHolderName);
        }

        let terms = self.config.terms_for(request.account_type);
        let account = Account {
            number: number.to_string(),
            holder_name: holder_name.to_string(),
            kind: self.config.kind_for(request.account_type),
            status: AccountStatus::Active,
            pin: Pin::new(request.pin),
            balance: request.initial_deposit,
            daily_withdrawal_limit: terms.daily_withdrawal_limit,
            daily_transfer_limit: terms.daily_transfer_limit,
            withdrawn_today: Decimal::ZERO,
            transferred_today: Decimal::ZERO,
            last_limit_reset: self.clock.today(),
            version: 0,
        };

        self.accounts
            .insert(account.clone())
            .map_err(|e| match e {
                StorageError::AlreadyExists { account } => LedgerError::DuplicateAccount { account },
                other => LedgerError::Storage(other),
            })?;

        info!(
            account = %account.number,
            kind = %account.account_type(),
            balance = %account.balance,
            "account opened"
        );
        Ok(account)
    }

    /// Change an account's status
    ///
    /// Returns the previous status. `Closed` is terminal.
    pub fn set_status(
        &self,
        number: &str,
        status: AccountStatus,
    ) -> Result<AccountStatus, LedgerError> {
        let previous = self.accounts.with_exclusive_access(number, |acc| {
            if !acc.status.can_transition_to(status) {
                return Err(LedgerError::InvalidStatusTransition {
                    account: acc.number.clone(),
                    from: acc.status,
                    to: status,
                });
            }
            let previous = acc.status;
            acc.status = status;
            Ok(previous)
        })?;

        info!(account = %number, from = %previous, to = %status, "account status changed");
        Ok(previous)
    }

    /// Credit an active account
    pub fn deposit(
        &self,
        account: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let draft = TransactionDraft::new(
            TransactionKind::Deposit,
            amount,
            describe(description, || "Deposit".to_string()),
        )
        .to_account(account);

        let result = self.run_deposit(account, amount);
        self.settle(draft, result)
    }

    fn run_deposit(&self, account: &str, amount: Decimal) -> Result<Decimal, LedgerError> {
        validate_amount(amount)?;
        let snapshot = self.accounts.find(account)?;
        ensure_active(&snapshot, None)?;

        self.accounts.with_exclusive_access(account, |acc| {
            ensure_active(acc, None)?;
            acc.balance = acc
                .balance
                .checked_add(amount)
                .ok_or_else(|| LedgerError::arithmetic_overflow("deposit", &acc.number))?;
            Ok(Decimal::ZERO)
        })
    }

    /// Debit `amount` plus the withdrawal fee from a PIN-verified account
    pub fn withdraw(
        &self,
        account: &str,
        pin: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let draft = TransactionDraft::new(
            TransactionKind::Withdrawal,
            amount,
            describe(description, || "Withdrawal".to_string()),
        )
        .from_account(account);

        let result = self.run_withdrawal(account, pin, amount);
        self.settle(draft, result)
    }

    fn run_withdrawal(
        &self,
        account: &str,
        pin: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        validate_amount(amount)?;
        let snapshot = self.accounts.find(account)?;
        verify_pin(&snapshot, pin)?;
        ensure_active(&snapshot, None)?;

        let today = self.clock.today();
        let fees = self.config.fees;
        self.accounts.with_exclusive_access(account, |acc| {
            ensure_active(acc, None)?;

            let remaining = LimitTracker::remaining_withdrawal(acc, today);
            if amount > remaining {
                return Err(LedgerError::daily_limit_exceeded(
                    LimitKind::Withdrawal,
                    remaining,
                ));
            }

            let fee = fees.withdrawal_fee(amount);
            let total = amount
                .checked_add(fee)
                .ok_or_else(|| LedgerError::arithmetic_overflow("withdrawal", &acc.number))?;
            if acc.balance < total {
                return Err(LedgerError::insufficient_funds(acc.balance, total));
            }

            LimitTracker::record_withdrawal(acc, total)?;
            acc.balance -= total;
            debug!(account = %acc.number, %total, balance = %acc.balance, "withdrawal debited");
            Ok(fee)
        })
    }

    /// Move `amount` between two accounts, charging the transfer fee to the source
    ///
    /// The fee is retained by the bank; the destination receives exactly
    /// `amount`. Both balances are committed as one unit.
    pub fn transfer(
        &self,
        from: &str,
        pin: &str,
        to: &str,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Transaction, LedgerError> {
        let draft = TransactionDraft::new(
            TransactionKind::Transfer,
            amount,
            describe(description, || format!("Transfer from {} to {}", from, to)),
        )
        .from_account(from)
        .to_account(to);

        let result = self.run_transfer(from, pin, to, amount);
        self.settle(draft, result)
    }

    fn find_side(&self, number: &str, side: TransferSide) -> Result<Account, LedgerError> {
        self.accounts
            .try_find(number)?
            .ok_or_else(|| LedgerError::account_not_found(number, Some(side)))
    }

    fn run_transfer(
        &self,
        from: &str,
        pin: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Decimal, LedgerError> {
        validate_amount(amount)?;
        if from == to {
            return Err(LedgerError::same_account_transfer(from));
        }

        let source = self.find_side(from, TransferSide::Source)?;
        let destination = self.find_side(to, TransferSide::Destination)?;
        verify_pin(&source, pin)?;
        ensure_active(&source, Some(TransferSide::Source))?;
        ensure_active(&destination, Some(TransferSide::Destination))?;

        let today = self.clock.today();
        let fees = self.config.fees;
        self.accounts
            .with_exclusive_access_ordered(from, to, |src, dst| {
                ensure_active(src, Some(TransferSide::Source))?;
                ensure_active(dst, Some(TransferSide::Destination))?;

                let remaining = LimitTracker::remaining_transfer(src, today);
                if amount > remaining {
                    return Err(LedgerError::daily_limit_exceeded(
                        LimitKind::Transfer,
                        remaining,
                    ));
                }

                let fee = fees.transfer_fee(amount);
                let total = amount
                    .checked_add(fee)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &src.number))?;
                if src.balance < total {
                    return Err(LedgerError::insufficient_funds(src.balance, total));
                }

                dst.balance = dst
                    .balance
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::arithmetic_overflow("transfer", &dst.number))?;
                LimitTracker::record_transfer(src, total)?;
                src.balance -= total;
                debug!(from = %src.number, to = %dst.number, %total, "transfer staged");
                Ok(fee)
            })
    }

    /// Credit one month of interest to a savings account
    ///
    /// Recorded as a fee-free deposit. An account that earns nothing gets a
    /// failed record with `NoInterestDue`.
    pub fn apply_interest(&self, account: &str) -> Result<Transaction, LedgerError> {
        let mut draft = TransactionDraft::new(
            TransactionKind::Deposit,
            Decimal::ZERO,
            "Monthly interest".to_string(),
        )
        .to_account(account);

        let result = self.accounts.with_exclusive_access(account, |acc| {
            let interest = InterestCalculator::monthly_interest(acc)?;
            if interest <= Decimal::ZERO {
                return Err(LedgerError::NoInterestDue {
                    account: acc.number.clone(),
                });
            }
            acc.balance = acc
                .balance
                .checked_add(interest)
                .ok_or_else(|| LedgerError::arithmetic_overflow("interest", &acc.number))?;
            Ok((interest, acc.kind.interest_rate()))
        });

        let result = result.map(|(interest, rate)| {
            draft.amount = interest;
            draft.description = format!("Monthly interest {} at {}%", interest, rate);
            Decimal::ZERO
        });
        self.settle(draft, result)
    }

    /// Credit monthly interest to every eligible account
    ///
    /// Accounts that earn nothing are skipped without a ledger record.
    /// Business failures on individual accounts are logged and skipped;
    /// storage faults abort the run. Returns the number of accounts credited.
    pub fn apply_interest_to_all(&self) -> Result<usize, LedgerError> {
        let mut credited = 0;
        for account in self.accounts.all()? {
            if matches!(
                InterestCalculator::monthly_interest(&account),
                Ok(interest) if interest <= Decimal::ZERO
            ) {
                continue;
            }
            match self.apply_interest(&account.number) {
                Ok(_) => credited += 1,
                Err(e) if e.is_business() => {
                    warn!(account = %account.number, error = %e, "interest not applied");
                }
                Err(e) => return Err(e),
            }
        }
        info!(credited, "interest run finished");
        Ok(credited)
    }

    /// Write the outcome of an operation to the ledger
    ///
    /// `result` carries the fee on success. Business failures are recorded
    /// and returned; storage faults are returned without a record.
    fn settle(
        &self,
        mut draft: TransactionDraft,
        result: Result<Decimal, LedgerError>,
    ) -> Result<Transaction, LedgerError> {
        match result {
            Ok(fee) => {
                draft.fee = fee;
                let transaction = draft.finish(self.clock.now(), Outcome::Successful);
                self.ledger.append(transaction.clone())?;
                info!(
                    id = %transaction.id,
                    kind = %transaction.kind,
                    amount = %transaction.amount,
                    fee = %transaction.fee,
                    "transaction committed"
                );
                Ok(transaction)
            }
            Err(LedgerError::Storage(fault)) => {
                error!(kind = %draft.kind, error = %fault, "storage fault, operation aborted");
                Err(LedgerError::Storage(fault))
            }
            Err(reason) => {
                let kind = draft.kind;
                let transaction =
                    draft.finish(self.clock.now(), Outcome::Failed(reason.clone()));
                self.ledger.append(transaction)?;
                warn!(%kind, reason = reason.code(), "transaction rejected: {}", reason);
                Err(reason)
            }
        }
    }

    /// Current balance of an account
    pub fn balance_of(&self, account: &str) -> Result<Decimal, LedgerError> {
        Ok(self.accounts.find(account)?.balance)
    }

    /// Snapshot of an account
    pub fn account(&self, account: &str) -> Result<Account, LedgerError> {
        self.accounts.find(account)
    }

    /// Snapshot of all accounts, sorted by account number
    pub fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.accounts.all()?)
    }

    /// Every ledger record involving the account, in insertion order
    ///
    /// Works on the audit trail alone: a number that was never opened still
    /// returns the failed attempts made against it, or nothing.
    pub fn history_of(&self, account: &str) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.ledger.history_for(account)?)
    }

    /// Successful ledger records involving the account, in insertion order
    pub fn successful_history_of(&self, account: &str) -> Result<Vec<Transaction>, LedgerError> {
        let mut history = self.history_of(account)?;
        history.retain(Transaction::is_successful);
        Ok(history)
    }

    /// Statement over the account's full history, most recent first
    pub fn statement_for(&self, account: &str) -> Result<Statement, LedgerError> {
        Ok(Statement::new(account, self.history_of(account)?))
    }

    /// Every ledger record, in insertion order
    pub fn transactions(&self) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self.ledger.all()?)
    }
}
