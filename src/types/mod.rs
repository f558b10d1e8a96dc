//! Types module
//!
//! Contains core data structures used throughout the ledger:
//! - `account`: Account record, kind, status and PIN credential
//! - `transaction`: Audit records of attempted operations
//! - `command`: Requests routed by the processor
//! - `error`: Business and storage error types

pub mod account;
pub mod command;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountKind, AccountNumber, AccountStatus, AccountType, Pin};
pub use command::{LedgerCommand, OpenAccount};
pub use error::{LedgerError, LimitKind, StorageError, TransferSide};
pub use transaction::{Outcome, Transaction, TransactionId, TransactionKind};
pub(crate) use transaction::TransactionDraft;
