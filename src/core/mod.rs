//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - Persistence and clock seams
//! - `fee_policy` - Fee computation
//! - `limit_tracker` - Daily usage accounting and rollover
//! - `account_store` - Per-account exclusive access over the account repository
//! - `ledger` - Append-only transaction record
//! - `processor` - Deposit, withdrawal and transfer orchestration
//! - `interest` / `statement` - Savings interest and account statements
//! - `batch_processor` - Concurrent replay of command batches

pub mod account_store;
pub mod batch_processor;
pub mod clock;
pub mod fee_policy;
pub mod interest;
pub mod ledger;
pub mod limit_tracker;
pub mod processor;
pub mod statement;
pub mod traits;

pub use account_store::AccountStore;
pub use batch_processor::{BatchProcessor, ProcessingResult};
pub use clock::{ManualClock, SystemClock};
pub use fee_policy::{FeeBand, FeePolicy};
pub use interest::InterestCalculator;
pub use ledger::TransactionLedger;
pub use limit_tracker::LimitTracker;
pub use processor::TransactionProcessor;
pub use statement::{Statement, StatementSummary};
pub use traits::{AccountRepository, Clock, TransactionRepository};
