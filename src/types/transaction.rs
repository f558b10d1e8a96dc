//! Transaction-related types for the banking ledger
//!
//! A [`Transaction`] is the audit record of one attempted operation. It is
//! created exactly once per call into the processor, whatever the outcome,
//! and never changes afterwards.

use crate::types::account::AccountNumber;
use crate::types::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Transaction identifier (time-ordered UUID v7)
pub type TransactionId = Uuid;

/// Money-moving operation kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Credit to one account, no fee
    Deposit,
    /// Debit of amount + fee from one account
    Withdrawal,
    /// Debit of amount + fee from the source, credit of amount to the destination
    Transfer,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Deposit => write!(f, "deposit"),
            TransactionKind::Withdrawal => write!(f, "withdrawal"),
            TransactionKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// Result of an attempted operation
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Successful,
    /// Rejected by the given business rule; nothing was mutated
    Failed(LedgerError),
}

impl Outcome {
    pub fn is_successful(&self) -> bool {
        matches!(self, Outcome::Successful)
    }

    /// The rejection reason, if any
    pub fn reason(&self) -> Option<&LedgerError> {
        match self {
            Outcome::Successful => None,
            Outcome::Failed(reason) => Some(reason),
        }
    }
}

/// Ledger record of one attempted operation
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,

    pub kind: TransactionKind,

    /// Amount as requested by the caller
    pub amount: Decimal,

    /// Fee charged on top of `amount`; zero for deposits and failed attempts
    pub fee: Decimal,

    /// Debited account (absent for deposits)
    pub from: Option<AccountNumber>,

    /// Credited account (absent for withdrawals)
    pub to: Option<AccountNumber>,

    pub description: String,

    pub timestamp: DateTime<Utc>,

    pub outcome: Outcome,
}

impl Transaction {
    /// Whether the record references `account` as source or destination
    pub fn involves(&self, account: &str) -> bool {
        self.from.as_deref() == Some(account) || self.to.as_deref() == Some(account)
    }

    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }

    /// Amount plus fee, i.e. what the source account is debited
    pub fn total_debit(&self) -> Decimal {
        self.amount.saturating_add(self.fee)
    }
}

/// Transaction being assembled by the processor before its outcome is known
#[derive(Debug, Clone)]
pub(crate) struct TransactionDraft {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub fee: Decimal,
    pub from: Option<AccountNumber>,
    pub to: Option<AccountNumber>,
    pub description: String,
}

impl TransactionDraft {
    pub fn new(kind: TransactionKind, amount: Decimal, description: String) -> Self {
        Self {
            kind,
            amount,
            fee: Decimal::ZERO,
            from: None,
            to: None,
            description,
        }
    }

    pub fn from_account(mut self, account: &str) -> Self {
        self.from = Some(account.to_string());
        self
    }

    pub fn to_account(mut self, account: &str) -> Self {
        self.to = Some(account.to_string());
        self
    }

    /// Seal the draft into an immutable record
    pub fn finish(self, timestamp: DateTime<Utc>, outcome: Outcome) -> Transaction {
        Transaction {
            id: Uuid::now_v7(),
            kind: self.kind,
            amount: self.amount,
            fee: self.fee,
            from: self.from,
            to: self.to,
            description: self.description,
            timestamp,
            outcome,
        }
    }
}
