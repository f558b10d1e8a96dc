//! Banking Ledger Library
//!
//! # Overview
//!
//! A transaction ledger for a small bank: savings and checking accounts,
//! deposits, PIN-authorised withdrawals and transfers with clamped fees,
//! daily limits that roll over at midnight, and an append-only audit trail
//! recording every attempt, successful or not.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, LedgerError, ...)
//! - [`config`] - Account terms and fee schedule
//! - [`core`] - Business logic components:
//!   - [`core::FeePolicy`] - Fee computation
//!   - [`core::LimitTracker`] - Daily usage accounting
//!   - [`core::AccountStore`] - Per-account exclusive access
//!   - [`core::TransactionLedger`] - Audit trail
//!   - [`core::TransactionProcessor`] - Operation orchestration
//! - [`storage`] - In-memory repositories
//! - [`cli`], [`io`], [`strategy`], [`logging`] - CSV replay binary support
//!
//! # Example
//!
//! ```
//! use banking_ledger::core::TransactionProcessor;
//! use banking_ledger::types::{AccountType, OpenAccount};
//! use rust_decimal::Decimal;
//!
//! let processor = TransactionProcessor::in_memory();
//! processor
//!     .open_account(OpenAccount {
//!         number: "SAV-1".to_string(),
//!         holder_name: "Ada Lovelace".to_string(),
//!         account_type: AccountType::Savings,
//!         pin: "1234".to_string(),
//!         initial_deposit: Decimal::new(100000, 2),
//!     })
//!     .unwrap();
//!
//! let tx = processor
//!     .withdraw("SAV-1", "1234", Decimal::new(20000, 2), None)
//!     .unwrap();
//! assert_eq!(tx.fee, Decimal::new(200, 2));
//! assert_eq!(processor.balance_of("SAV-1").unwrap(), Decimal::new(79800, 2));
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod logging;
pub mod storage;
pub mod strategy;
pub mod types;

pub use config::{AccountTerms, LedgerConfig};
pub use core::{FeePolicy, TransactionProcessor};
pub use types::{
    Account, AccountNumber, AccountStatus, AccountType, LedgerCommand, LedgerError, Outcome,
    Transaction, TransactionId, TransactionKind,
};
