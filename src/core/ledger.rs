//! Append-only audit trail
//!
//! The ledger records every attempted operation, successful or not. It only
//! fails for storage faults; there is no business rule that can reject an
//! append. Appends need no per-account lock and may run concurrently.

use crate::core::traits::TransactionRepository;
use crate::types::{StorageError, Transaction};
use std::sync::Arc;
use tracing::error;

/// Append-only record of every attempted transaction
pub struct TransactionLedger {
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionLedger {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    /// Persist a record
    ///
    /// # Errors
    ///
    /// Only storage faults, which are fatal to the calling operation.
    pub fn append(&self, transaction: Transaction) -> Result<(), StorageError> {
        let id = transaction.id;
        self.repository.append(transaction).inspect_err(|e| {
            error!(transaction = %id, error = %e, "failed to append ledger record");
        })
    }

    /// All records referencing the account as source or destination
    ///
    /// Records come back in insertion order; reverse for most-recent-first.
    pub fn history_for(&self, account: &str) -> Result<Vec<Transaction>, StorageError> {
        self.repository.find_by_account(account)
    }

    /// Every record in insertion order
    pub fn all(&self) -> Result<Vec<Transaction>, StorageError> {
        self.repository.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryTransactionRepository;
    use crate::types::{Outcome, TransactionDraft, TransactionKind};
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn record(from: Option<&str>, to: Option<&str>, cents: i64) -> Transaction {
        let mut draft = TransactionDraft::new(
            TransactionKind::Transfer,
            Decimal::new(cents, 2),
            "t".to_string(),
        );
        if let Some(from) = from {
            draft = draft.from_account(from);
        }
        if let Some(to) = to {
            draft = draft.to_account(to);
        }
        draft.finish(Utc::now(), Outcome::Successful)
    }

    #[test]
    fn test_history_in_insertion_order() {
        let ledger = TransactionLedger::new(Arc::new(InMemoryTransactionRepository::new()));

        ledger.append(record(None, Some("A"), 100)).unwrap();
        ledger.append(record(Some("B"), Some("C"), 200)).unwrap();
        ledger.append(record(Some("A"), Some("B"), 300)).unwrap();
        ledger.append(record(Some("A"), None, 400)).unwrap();

        let amounts: Vec<Decimal> = ledger
            .history_for("A")
            .unwrap()
            .into_iter()
            .map(|tx| tx.amount)
            .collect();
        assert_eq!(
            amounts,
            vec![Decimal::new(100, 2), Decimal::new(300, 2), Decimal::new(400, 2)]
        );
        assert_eq!(ledger.history_for("C").unwrap().len(), 1);
        assert!(ledger.history_for("Z").unwrap().is_empty());
        assert_eq!(ledger.all().unwrap().len(), 4);
    }
}
