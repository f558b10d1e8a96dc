//! Error types for the banking ledger
//!
//! Business-rule violations and storage faults are kept apart:
//!
//! - **Business errors** (`InvalidAmount`, `InsufficientFunds`, ...) are the
//!   outcome of a validation step. Every one of them is also written to the
//!   ledger as the reason of a failed transaction.
//! - **Storage errors** come from the persistence collaborator. They abort the
//!   current operation and are never written to the ledger.

use crate::types::account::{AccountNumber, AccountStatus};
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which side of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    Source,
    Destination,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSide::Source => write!(f, "source"),
            TransferSide::Destination => write!(f, "destination"),
        }
    }
}

/// Which daily allowance was exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    Withdrawal,
    Transfer,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitKind::Withdrawal => write!(f, "withdrawal"),
            LimitKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// Faults raised by the persistence collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// The stored record changed since it was read
    #[error("Version conflict on account {account}: expected {expected}, found {found}")]
    VersionConflict {
        account: AccountNumber,
        expected: u64,
        found: u64,
    },

    /// Insert of a record whose key is already taken
    #[error("Account {account} already exists in storage")]
    AlreadyExists { account: AccountNumber },

    /// Update of a record that is not stored
    #[error("Account {account} is not present in storage")]
    NotFound { account: AccountNumber },

    /// Backend failure (I/O, connection, ...)
    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

/// Main error type for ledger operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount is zero, negative, or has more than two decimals
    #[error("Invalid amount {amount}: must be positive with at most two decimals")]
    InvalidAmount { amount: Decimal },

    /// Account number does not resolve to an account
    #[error("{}ccount not found: {account}", side_prefix(side))]
    AccountNotFound {
        account: AccountNumber,
        side: Option<TransferSide>,
    },

    /// Supplied PIN does not match
    ///
    /// Deliberately carries no balance or limit information.
    #[error("Invalid PIN for account {account}")]
    InvalidPin { account: AccountNumber },

    /// Account is suspended or closed
    #[error("{}ccount {account} is not active (status: {status})", side_prefix(side))]
    AccountNotActive {
        account: AccountNumber,
        status: AccountStatus,
        side: Option<TransferSide>,
    },

    /// Requested amount exceeds what is left of today's allowance
    #[error("Daily {limit} limit exceeded. Remaining limit: {remaining}")]
    DailyLimitExceeded { limit: LimitKind, remaining: Decimal },

    /// Balance does not cover amount + fee
    #[error("Insufficient funds. Current balance: {balance}, required (amount + fee): {required}")]
    InsufficientFunds { balance: Decimal, required: Decimal },

    /// Source and destination are the same account
    #[error("Cannot transfer account {account} to itself")]
    SameAccountTransfer { account: AccountNumber },

    /// Account number already taken when opening
    #[error("Account number already exists: {account}")]
    DuplicateAccount { account: AccountNumber },

    /// Account number is blank
    #[error("Account number cannot be blank")]
    InvalidAccountNumber,

    /// PIN is not exactly four digits
    #[error("PIN must be exactly 4 digits")]
    InvalidPinFormat,

    /// Holder name is blank
    #[error("Holder name cannot be empty")]
    InvalidHolderName,

    /// Status change not allowed (leaving `Closed`)
    #[error("Account {account} cannot change status from {from} to {to}")]
    InvalidStatusTransition {
        account: AccountNumber,
        from: AccountStatus,
        to: AccountStatus,
    },

    /// A balance or running total would leave the representable range
    ///
    /// Recoverable: the operation is rejected and the account is unchanged.
    #[error("Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        operation: &'static str,
        account: AccountNumber,
    },

    /// Interest run found nothing to credit
    #[error("No interest due for account {account}")]
    NoInterestDue { account: AccountNumber },

    /// Persistence fault; fatal for the current operation
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn side_prefix(side: &Option<TransferSide>) -> &'static str {
    match side {
        Some(TransferSide::Source) => "Source a",
        Some(TransferSide::Destination) => "Destination a",
        None => "A",
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Whether this is a business-rule rejection (as opposed to a storage fault)
    pub fn is_business(&self) -> bool {
        !matches!(self, LedgerError::Storage(_))
    }

    /// Short machine-friendly name of the failure kind
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::AccountNotFound { .. } => "account_not_found",
            LedgerError::InvalidPin { .. } => "invalid_pin",
            LedgerError::AccountNotActive { .. } => "account_not_active",
            LedgerError::DailyLimitExceeded { .. } => "daily_limit_exceeded",
            LedgerError::InsufficientFunds { .. } => "insufficient_funds",
            LedgerError::SameAccountTransfer { .. } => "same_account_transfer",
            LedgerError::DuplicateAccount { .. } => "duplicate_account",
            LedgerError::InvalidAccountNumber => "invalid_account_number",
            LedgerError::InvalidPinFormat => "invalid_pin_format",
            LedgerError::InvalidHolderName => "invalid_holder_name",
            LedgerError::InvalidStatusTransition { .. } => "invalid_status_transition",
            LedgerError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            LedgerError::NoInterestDue { .. } => "no_interest_due",
            LedgerError::Storage(_) => "storage",
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        LedgerError::InvalidAmount { amount }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: &str, side: Option<TransferSide>) -> Self {
        LedgerError::AccountNotFound {
            account: account.to_string(),
            side,
        }
    }

    /// Create an InvalidPin error
    pub fn invalid_pin(account: &str) -> Self {
        LedgerError::InvalidPin {
            account: account.to_string(),
        }
    }

    /// Create an AccountNotActive error
    pub fn account_not_active(
        account: &str,
        status: AccountStatus,
        side: Option<TransferSide>,
    ) -> Self {
        LedgerError::AccountNotActive {
            account: account.to_string(),
            status,
            side,
        }
    }

    /// Create a DailyLimitExceeded error
    pub fn daily_limit_exceeded(limit: LimitKind, remaining: Decimal) -> Self {
        LedgerError::DailyLimitExceeded { limit, remaining }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(balance: Decimal, required: Decimal) -> Self {
        LedgerError::InsufficientFunds { balance, required }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &'static str, account: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation,
            account: account.to_string(),
        }
    }

    /// Create a SameAccountTransfer error
    pub fn same_account_transfer(account: &str) -> Self {
        LedgerError::SameAccountTransfer {
            account: account.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_amount(
        LedgerError::invalid_amount(Decimal::new(-500, 2)),
        "Invalid amount -5.00: must be positive with at most two decimals"
    )]
    #[case::not_found_plain(
        LedgerError::account_not_found("CHK-1", None),
        "Account not found: CHK-1"
    )]
    #[case::not_found_destination(
        LedgerError::account_not_found("CHK-2", Some(TransferSide::Destination)),
        "Destination account not found: CHK-2"
    )]
    #[case::not_active_source(
        LedgerError::account_not_active("SAV-1", AccountStatus::Suspended, Some(TransferSide::Source)),
        "Source account SAV-1 is not active (status: suspended)"
    )]
    #[case::not_active_plain(
        LedgerError::account_not_active("SAV-1", AccountStatus::Closed, None),
        "Account SAV-1 is not active (status: closed)"
    )]
    #[case::daily_limit(
        LedgerError::daily_limit_exceeded(LimitKind::Transfer, Decimal::new(40000, 2)),
        "Daily transfer limit exceeded. Remaining limit: 400.00"
    )]
    #[case::insufficient_funds(
        LedgerError::insufficient_funds(Decimal::new(30000, 2), Decimal::new(50250, 2)),
        "Insufficient funds. Current balance: 300.00, required (amount + fee): 502.50"
    )]
    #[case::invalid_pin(LedgerError::invalid_pin("SAV-1"), "Invalid PIN for account SAV-1")]
    #[case::overflow(
        LedgerError::arithmetic_overflow("deposit", "CHK-9"),
        "Arithmetic overflow in deposit for account CHK-9"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn test_storage_error_is_not_business() {
        let error: LedgerError = StorageError::Unavailable {
            message: "disk full".to_string(),
        }
        .into();
        assert!(!error.is_business());
        assert_eq!(error.code(), "storage");
        assert_eq!(error.to_string(), "Storage unavailable: disk full");
        assert!(LedgerError::invalid_pin("A").is_business());
    }
}
