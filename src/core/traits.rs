//! Collaborator seams of the ledger core
//!
//! The processor never touches a concrete store or the system clock directly.
//! Everything it consumes from its environment goes through these traits, so
//! tests can substitute in-memory stores and a manual clock while production
//! wires a durable backend behind the same contract.

use crate::types::{Account, StorageError, Transaction};
use chrono::{DateTime, NaiveDate, Utc};

/// Durable keyed store of accounts
///
/// Writes carry the version the caller read; a store must reject a write when
/// the stored version differs (`StorageError::VersionConflict`). This is a
/// second line of defence against writers that bypass
/// [`AccountStore`](crate::core::AccountStore) locking.
pub trait AccountRepository: Send + Sync {
    /// Look up an account by number
    fn find(&self, number: &str) -> Result<Option<Account>, StorageError>;

    /// Whether an account with this number exists
    fn exists_by_account_number(&self, number: &str) -> Result<bool, StorageError>;

    /// Store a new account; fails with `AlreadyExists` if the number is taken
    fn insert(&self, account: Account) -> Result<(), StorageError>;

    /// Replace a stored account, provided it is still at `expected_version`
    fn save(&self, account: &Account, expected_version: u64) -> Result<(), StorageError>;

    /// Replace several accounts as one unit
    ///
    /// Either every write is applied or none is.
    fn save_all(&self, writes: &[(&Account, u64)]) -> Result<(), StorageError>;

    /// Snapshot of every stored account
    fn all(&self) -> Result<Vec<Account>, StorageError>;
}

/// Append-only store of transaction records
pub trait TransactionRepository: Send + Sync {
    /// Persist a record
    fn append(&self, transaction: Transaction) -> Result<(), StorageError>;

    /// Records referencing `number` as source or destination, in insertion order
    fn find_by_account(&self, number: &str) -> Result<Vec<Transaction>, StorageError>;

    /// Every record, in insertion order
    fn all(&self) -> Result<Vec<Transaction>, StorageError>;
}

/// Source of the current date and time
pub trait Clock: Send + Sync {
    /// Current calendar day, used for daily limit rollover
    fn today(&self) -> NaiveDate;

    /// Current instant, used for transaction timestamps
    fn now(&self) -> DateTime<Utc>;
}
