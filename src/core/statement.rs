//! Account statements
//!
//! A [`Statement`] is a filtered view of one account's ledger history,
//! ordered most recent first. [`StatementSummary`] totals the successful
//! entries from the account's point of view: a transfer counts as "out" when
//! the account is the source and "in" when it is the destination.

use crate::types::{AccountNumber, Transaction, TransactionKind};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

/// Filtered, most-recent-first view of an account's history
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub account: AccountNumber,
    pub transactions: Vec<Transaction>,
}

impl Statement {
    /// Statement over the full history (given in insertion order)
    pub fn new(account: &str, mut history: Vec<Transaction>) -> Self {
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        Self {
            account: account.to_string(),
            transactions: history,
        }
    }

    fn retain(mut self, keep: impl Fn(&Transaction) -> bool) -> Self {
        self.transactions.retain(|tx| keep(tx));
        self
    }

    /// Entries dated within `[start, end]` (inclusive days)
    pub fn between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.retain(|tx| {
            let day = tx.timestamp.date_naive();
            day >= start && day <= end
        })
    }

    /// Entries in the calendar month containing `day`
    pub fn for_month_of(self, day: NaiveDate) -> Self {
        self.retain(|tx| {
            let date = tx.timestamp.date_naive();
            date.year() == day.year() && date.month() == day.month()
        })
    }

    /// Entries of one kind
    pub fn of_kind(self, kind: TransactionKind) -> Self {
        self.retain(|tx| tx.kind == kind)
    }

    /// Entries whose requested amount lies in `[min, max]`
    pub fn with_amount_between(self, min: Decimal, max: Decimal) -> Self {
        self.retain(|tx| tx.amount >= min && tx.amount <= max)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Totals over the successful entries
    pub fn summary(&self) -> StatementSummary {
        StatementSummary::from_transactions(&self.account, &self.transactions)
    }
}

/// Totals over an account's successful transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatementSummary {
    pub total_transactions: usize,
    pub total_deposits: Decimal,
    /// Withdrawals including fees
    pub total_withdrawals: Decimal,
    /// Outgoing transfers including fees
    pub total_transfers_out: Decimal,
    pub total_transfers_in: Decimal,
    /// Fees paid by this account
    pub total_fees: Decimal,
    /// deposits + transfers in - withdrawals - transfers out
    pub net_amount: Decimal,
}

impl StatementSummary {
    /// Totals saturate at `Decimal::MAX` rather than panic
    pub fn from_transactions(account: &str, transactions: &[Transaction]) -> Self {
        let mut summary = StatementSummary::default();

        for tx in transactions.iter().filter(|tx| tx.is_successful()) {
            let outgoing = tx.from.as_deref() == Some(account);
            let incoming = tx.to.as_deref() == Some(account);
            summary.total_transactions += 1;

            let total = match tx.kind {
                TransactionKind::Deposit if incoming => &mut summary.total_deposits,
                TransactionKind::Withdrawal if outgoing => &mut summary.total_withdrawals,
                TransactionKind::Transfer if outgoing => &mut summary.total_transfers_out,
                TransactionKind::Transfer if incoming => &mut summary.total_transfers_in,
                _ => continue,
            };
            let value = if outgoing { tx.total_debit() } else { tx.amount };
            *total = total.saturating_add(value);
            if outgoing {
                summary.total_fees = summary.total_fees.saturating_add(tx.fee);
            }
        }

        summary.net_amount = summary
            .total_deposits
            .saturating_add(summary.total_transfers_in)
            .saturating_sub(summary.total_withdrawals)
            .saturating_sub(summary.total_transfers_out);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LedgerError, Outcome, TransactionDraft};
    use chrono::{NaiveTime, TimeZone, Utc};

    fn at(day: u32) -> chrono::DateTime<Utc> {
        Utc.from_utc_datetime(
            &NaiveDate::from_ymd_opt(2025, 4, day)
                .unwrap()
                .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap()),
        )
    }

    fn tx(
        kind: TransactionKind,
        cents: i64,
        fee_cents: i64,
        from: Option<&str>,
        to: Option<&str>,
        day: u32,
        ok: bool,
    ) -> Transaction {
        let mut draft = TransactionDraft::new(kind, Decimal::new(cents, 2), String::new());
        draft.fee = Decimal::new(fee_cents, 2);
        if let Some(from) = from {
            draft = draft.from_account(from);
        }
        if let Some(to) = to {
            draft = draft.to_account(to);
        }
        let outcome = if ok {
            Outcome::Successful
        } else {
            Outcome::Failed(LedgerError::invalid_pin("A"))
        };
        draft.finish(at(day), outcome)
    }

    fn history() -> Vec<Transaction> {
        vec![
            tx(TransactionKind::Deposit, 100000, 0, None, Some("A"), 1, true),
            tx(TransactionKind::Withdrawal, 20000, 200, Some("A"), None, 3, true),
            tx(TransactionKind::Withdrawal, 5000, 0, Some("A"), None, 4, false),
            tx(TransactionKind::Transfer, 10000, 50, Some("A"), Some("B"), 10, true),
            tx(TransactionKind::Transfer, 30000, 150, Some("B"), Some("A"), 20, true),
        ]
    }

    #[test]
    fn test_statement_is_most_recent_first() {
        let statement = Statement::new("A", history());
        let days: Vec<u32> = statement
            .transactions
            .iter()
            .map(|tx| tx.timestamp.day())
            .collect();
        assert_eq!(days, vec![20, 10, 4, 3, 1]);
    }

    #[test]
    fn test_filters() {
        let start = NaiveDate::from_ymd_opt(2025, 4, 3).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 4, 10).unwrap();
        assert_eq!(Statement::new("A", history()).between(start, end).len(), 3);

        assert_eq!(
            Statement::new("A", history())
                .of_kind(TransactionKind::Transfer)
                .len(),
            2
        );
        assert_eq!(
            Statement::new("A", history())
                .with_amount_between(Decimal::new(5000, 2), Decimal::new(20000, 2))
                .len(),
            3
        );
        assert_eq!(Statement::new("A", history()).for_month_of(start).len(), 5);
        let may = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert!(Statement::new("A", history()).for_month_of(may).is_empty());
    }

    #[test]
    fn test_summary_from_account_point_of_view() {
        let summary = Statement::new("A", history()).summary();

        assert_eq!(summary.total_transactions, 4);
        assert_eq!(summary.total_deposits, Decimal::new(100000, 2));
        assert_eq!(summary.total_withdrawals, Decimal::new(20200, 2));
        assert_eq!(summary.total_transfers_out, Decimal::new(10050, 2));
        assert_eq!(summary.total_transfers_in, Decimal::new(30000, 2));
        // The incoming transfer's fee was paid by B
        assert_eq!(summary.total_fees, Decimal::new(250, 2));
        assert_eq!(summary.net_amount, Decimal::new(99750, 2));
    }
}
