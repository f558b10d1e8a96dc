//! Storage backends
//!
//! Implementations of [`AccountRepository`](crate::core::traits::AccountRepository)
//! and [`TransactionRepository`](crate::core::traits::TransactionRepository).
//! Only the in-memory backend ships with the crate; durable backends plug in
//! behind the same traits.

pub mod memory;

pub use memory::{InMemoryAccountRepository, InMemoryTransactionRepository};
