//! Account-related types for the banking ledger
//!
//! This module defines the Account record together with its kind, status and
//! PIN credential. Accounts are only ever mutated through the
//! [`TransactionProcessor`](crate::core::TransactionProcessor) or an explicit
//! status change; they are never deleted.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account identifier as presented to customers (e.g. `"SAV-0001"`)
pub type AccountNumber = String;

/// Plain account type, as requested when opening an account
///
/// The terms attached to each type (limits, interest) come from
/// [`LedgerConfig`](crate::config::LedgerConfig) and end up in [`AccountKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Interest-bearing account with an advisory minimum balance
    Savings,
    /// Day-to-day account, no interest
    Checking,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Savings => write!(f, "savings"),
            AccountType::Checking => write!(f, "checking"),
        }
    }
}

/// Account kind with the terms that only make sense for that kind
#[derive(Debug, Clone, PartialEq)]
pub enum AccountKind {
    /// Savings account
    Savings {
        /// Annual interest rate in percent (`2.5` means 2.5 %)
        interest_rate: Decimal,
        /// Advisory minimum balance; reported, never enforced on debits
        minimum_balance: Decimal,
    },
    /// Checking account
    Checking,
}

impl AccountKind {
    /// The plain type of this kind
    pub fn account_type(&self) -> AccountType {
        match self {
            AccountKind::Savings { .. } => AccountType::Savings,
            AccountKind::Checking => AccountType::Checking,
        }
    }

    /// Interest rate in percent, zero for checking accounts
    pub fn interest_rate(&self) -> Decimal {
        match self {
            AccountKind::Savings { interest_rate, .. } => *interest_rate,
            AccountKind::Checking => Decimal::ZERO,
        }
    }
}

/// Lifecycle status of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account can perform transactions
    Active,
    /// Temporarily blocked; can be reactivated
    Suspended,
    /// Permanently inactive; terminal
    Closed,
}

impl AccountStatus {
    /// Whether a change from `self` to `next` is allowed
    ///
    /// `Closed` is terminal. Staying in the same status is always allowed.
    pub fn can_transition_to(self, next: AccountStatus) -> bool {
        self == next || self != AccountStatus::Closed
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "active"),
            AccountStatus::Suspended => write!(f, "suspended"),
            AccountStatus::Closed => write!(f, "closed"),
        }
    }
}

/// PIN credential
///
/// Compared by exact match only. Hashing or encoding, if any, is done by
/// whoever stores the value. The `Debug` output is redacted so a PIN never
/// ends up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Pin(String);

impl Pin {
    /// Wrap a stored credential
    pub fn new(value: impl Into<String>) -> Self {
        Pin(value.into())
    }

    /// A PIN must be exactly four ASCII digits
    pub fn is_well_formed(value: &str) -> bool {
        value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit())
    }

    /// Exact-match comparison against a supplied PIN
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

/// Bank account record
///
/// `balance` is a 2-digit fixed-point amount and never negative. The daily
/// usage counters are only meaningful for `last_limit_reset`; see
/// [`LimitTracker`](crate::core::LimitTracker) for the rollover rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Unique account number
    pub number: AccountNumber,

    /// Account holder's full name
    pub holder_name: String,

    /// Savings or checking, with kind-specific terms
    pub kind: AccountKind,

    /// Current lifecycle status
    pub status: AccountStatus,

    /// PIN credential
    pub pin: Pin,

    /// Current balance
    pub balance: Decimal,

    /// Maximum cumulative withdrawal debit (amount + fee) per day
    pub daily_withdrawal_limit: Decimal,

    /// Maximum cumulative transfer debit (amount + fee) per day
    pub daily_transfer_limit: Decimal,

    /// Withdrawal debits recorded on `last_limit_reset`
    pub withdrawn_today: Decimal,

    /// Transfer debits recorded on `last_limit_reset`
    pub transferred_today: Decimal,

    /// Day the usage counters belong to
    pub last_limit_reset: NaiveDate,

    /// Optimistic version, incremented on every persisted mutation
    pub version: u64,
}

impl Account {
    /// Whether the account can take part in transactions
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    /// Whether this is a savings account
    pub fn is_savings(&self) -> bool {
        matches!(self.kind, AccountKind::Savings { .. })
    }

    /// The plain account type
    pub fn account_type(&self) -> AccountType {
        self.kind.account_type()
    }
}
