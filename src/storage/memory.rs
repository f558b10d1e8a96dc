//! In-memory repositories
//!
//! Both stores keep their data behind a single `RwLock`, which is enough to
//! make `save_all` atomic: every expected version is checked before any
//! record is replaced, all under the same write guard.

use crate::core::traits::{AccountRepository, TransactionRepository};
use crate::types::{Account, AccountNumber, StorageError, Transaction};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Account store backed by a `HashMap`
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    accounts: RwLock<HashMap<AccountNumber, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

fn check_version(
    stored: Option<&Account>,
    account: &Account,
    expected_version: u64,
) -> Result<(), StorageError> {
    let stored = stored.ok_or_else(|| StorageError::NotFound {
        account: account.number.clone(),
    })?;
    if stored.version != expected_version {
        return Err(StorageError::VersionConflict {
            account: account.number.clone(),
            expected: expected_version,
            found: stored.version,
        });
    }
    Ok(())
}

impl AccountRepository for InMemoryAccountRepository {
    fn find(&self, number: &str) -> Result<Option<Account>, StorageError> {
        Ok(self.accounts.read().get(number).cloned())
    }

    fn exists_by_account_number(&self, number: &str) -> Result<bool, StorageError> {
        Ok(self.accounts.read().contains_key(number))
    }

    fn insert(&self, account: Account) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&account.number) {
            return Err(StorageError::AlreadyExists {
                account: account.number,
            });
        }
        accounts.insert(account.number.clone(), account);
        Ok(())
    }

    fn save(&self, account: &Account, expected_version: u64) -> Result<(), StorageError> {
        self.save_all(&[(account, expected_version)])
    }

    fn save_all(&self, writes: &[(&Account, u64)]) -> Result<(), StorageError> {
        let mut accounts = self.accounts.write();

        for (account, expected_version) in writes {
            check_version(accounts.get(&account.number), account, *expected_version)?;
        }

        for (account, _) in writes {
            accounts.insert(account.number.clone(), (*account).clone());
        }
        Ok(())
    }

    fn all(&self) -> Result<Vec<Account>, StorageError> {
        Ok(self.accounts.read().values().cloned().collect())
    }
}

/// Append-only transaction log backed by a `Vec`
#[derive(Debug, Default)]
pub struct InMemoryTransactionRepository {
    transactions: RwLock<Vec<Transaction>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

impl TransactionRepository for InMemoryTransactionRepository {
    fn append(&self, transaction: Transaction) -> Result<(), StorageError> {
        self.transactions.write().push(transaction);
        Ok(())
    }

    fn find_by_account(&self, number: &str) -> Result<Vec<Transaction>, StorageError> {
        Ok(self
            .transactions
            .read()
            .iter()
            .filter(|tx| tx.involves(number))
            .cloned()
            .collect())
    }

    fn all(&self) -> Result<Vec<Transaction>, StorageError> {
        Ok(self.transactions.read().clone())
    }
}
