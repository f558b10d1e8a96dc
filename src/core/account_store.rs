//! Account access with per-account mutual exclusion
//!
//! [`AccountStore`] wraps an [`AccountRepository`] and is the only way the
//! processor reads-modifies-writes an account. Every mutation runs inside
//! [`AccountStore::with_exclusive_access`] (or its two-account variant), which:
//!
//! 1. takes the account's lock,
//! 2. loads the current record,
//! 3. hands a working copy to the caller's closure,
//! 4. persists the copy with a bumped version if the closure succeeded,
//! 5. releases the lock.
//!
//! If the closure fails nothing is written, so a rejected operation leaves no
//! trace on the account.
//!
//! # Lock ordering
//!
//! Two-account operations lock in lexicographic order of account number,
//! whichever side is the source. Two opposite-direction transfers between the
//! same pair therefore queue on the same first lock instead of each holding
//! one and waiting for the other.
//!
//! # Thread Safety
//!
//! Locks live in a `DashMap` keyed by account number and are created on first
//! use. Operations on different accounts never contend.

use crate::core::traits::AccountRepository;
use crate::types::{Account, AccountNumber, LedgerError, StorageError};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::trace;

/// Keyed accounts with per-account exclusive access
pub struct AccountStore {
    /// Backing persistence collaborator
    repository: Arc<dyn AccountRepository>,

    /// One mutex per account number, created on demand
    locks: DashMap<AccountNumber, Arc<Mutex<()>>>,
}

impl AccountStore {
    /// Create a store over the given repository
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self {
            repository,
            locks: DashMap::new(),
        }
    }

    /// Look up an account snapshot
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if no account has this number
    /// - `Storage` if the repository fails
    pub fn find(&self, number: &str) -> Result<Account, LedgerError> {
        self.repository
            .find(number)?
            .ok_or_else(|| LedgerError::account_not_found(number, None))
    }

    /// Look up an account snapshot, `None` if it does not exist
    pub fn try_find(&self, number: &str) -> Result<Option<Account>, StorageError> {
        self.repository.find(number)
    }

    pub fn exists(&self, number: &str) -> Result<bool, StorageError> {
        self.repository.exists_by_account_number(number)
    }

    /// Store a freshly opened account
    pub fn insert(&self, account: Account) -> Result<(), StorageError> {
        let lock = self.lock_for(&account.number);
        let _guard = lock.lock();
        self.repository.insert(account)
    }

    /// Snapshot of all accounts, sorted by account number
    pub fn all(&self) -> Result<Vec<Account>, StorageError> {
        let mut accounts = self.repository.all()?;
        accounts.sort_by(|a, b| a.number.cmp(&b.number));
        Ok(accounts)
    }

    fn lock_for(&self, number: &str) -> Arc<Mutex<()>> {
        if let Some(lock) = self.locks.get(number) {
            return Arc::clone(&lock);
        }
        Arc::clone(&self.locks.entry(number.to_string()).or_default())
    }

    /// Lock of an account that exists
    ///
    /// Unknown numbers never get a lock entry. Accounts are never removed,
    /// so an entry, once created, stays valid.
    fn existing_lock_for(&self, number: &str) -> Result<Arc<Mutex<()>>, LedgerError> {
        if let Some(lock) = self.locks.get(number) {
            return Ok(Arc::clone(&lock));
        }
        if !self.exists(number)? {
            return Err(LedgerError::account_not_found(number, None));
        }
        Ok(self.lock_for(number))
    }

    /// Run `f` on an account while holding its lock, then persist the result
    ///
    /// The closure receives a working copy of the current record. If it
    /// returns `Ok`, the copy is saved with `version + 1`; if it returns
    /// `Err`, the copy is dropped and nothing is written.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` if the account does not exist
    /// - whatever error `f` returns
    /// - `Storage` if loading or saving fails (including a version conflict
    ///   caused by a writer that bypassed this store)
    pub fn with_exclusive_access<T, F>(&self, number: &str, f: F) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account) -> Result<T, LedgerError>,
    {
        let lock = self.existing_lock_for(number)?;
        let _guard = lock.lock();
        trace!(account = %number, "lock acquired");

        let mut account = self.find(number)?;
        let expected_version = account.version;

        let value = f(&mut account)?;

        account.version = expected_version + 1;
        self.repository.save(&account, expected_version)?;
        Ok(value)
    }

    /// Two-account variant of [`with_exclusive_access`](Self::with_exclusive_access)
    ///
    /// Locks are taken in lexicographic order of account number. The closure
    /// still receives the accounts in the caller's order (`first`, `second`).
    /// Both records are persisted with one all-or-nothing `save_all`; if it
    /// fails neither side is changed.
    ///
    /// # Errors
    ///
    /// - `SameAccountTransfer` if both numbers are equal
    /// - `AccountNotFound` if either account does not exist
    /// - whatever error `f` returns
    /// - `Storage` if loading or saving fails
    pub fn with_exclusive_access_ordered<T, F>(
        &self,
        first: &str,
        second: &str,
        f: F,
    ) -> Result<T, LedgerError>
    where
        F: FnOnce(&mut Account, &mut Account) -> Result<T, LedgerError>,
    {
        if first == second {
            return Err(LedgerError::same_account_transfer(first));
        }

        let (low, high) = if first < second {
            (first, second)
        } else {
            (second, first)
        };
        let low_lock = self.existing_lock_for(low)?;
        let high_lock = self.existing_lock_for(high)?;
        let _low_guard = low_lock.lock();
        let _high_guard = high_lock.lock();
        trace!(first = %low, second = %high, "ordered locks acquired");

        let mut first_account = self.find(first)?;
        let mut second_account = self.find(second)?;
        let first_version = first_account.version;
        let second_version = second_account.version;

        let value = f(&mut first_account, &mut second_account)?;

        first_account.version = first_version + 1;
        second_account.version = second_version + 1;
        self.repository.save_all(&[
            (&first_account, first_version),
            (&second_account, second_version),
        ])?;
        Ok(value)
    }
}
