//! Concurrent replay of command batches
//!
//! [`BatchProcessor`] splits a batch into groups of commands that share
//! accounts, directly or through a chain of transfers. Groups are disjoint in
//! the accounts they touch, so they can run concurrently without changing any
//! outcome; commands within a group run in their original order.
//!
//! ```text
//! batch ──► partition_by_accounts ──► group 0 ─┐
//!                                     group 1 ─┼─► spawn_blocking (≤ max_concurrent)
//!                                     group n ─┘
//! ```
//!
//! Processor operations are synchronous and take blocking locks, so each
//! group runs on the blocking thread pool. A semaphore bounds how many groups
//! are in flight.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error};

use super::TransactionProcessor;
use crate::types::{LedgerCommand, LedgerError, Transaction};

/// Outcome of replaying one command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Position of the command in its batch
    pub index: usize,

    /// The command that was replayed
    pub command: LedgerCommand,

    /// What the processor returned
    pub result: Result<Option<Transaction>, LedgerError>,
}

/// Commands of one connected account group, with their batch positions
type Group = Vec<(usize, LedgerCommand)>;

/// Batch replayer with account-group partitioning
#[derive(Clone)]
pub struct BatchProcessor {
    processor: Arc<TransactionProcessor>,
    permits: Arc<Semaphore>,
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn join(parent: &mut [usize], a: usize, b: usize) {
    let ra = find_root(parent, a);
    let rb = find_root(parent, b);
    if ra != rb {
        parent[ra.max(rb)] = ra.min(rb);
    }
}

impl BatchProcessor {
    /// Create a batch processor running at most `max_concurrent` groups at once
    ///
    /// A limit of zero is treated as one.
    pub fn new(processor: Arc<TransactionProcessor>, max_concurrent: usize) -> Self {
        Self {
            processor,
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    /// Split a batch into groups of commands connected through shared accounts
    ///
    /// Groups come out in order of their first command; each group keeps its
    /// commands in batch order.
    pub fn partition_by_accounts(batch: Vec<LedgerCommand>) -> Vec<Group> {
        let mut parent: Vec<usize> = (0..batch.len()).collect();
        let mut first_seen: HashMap<String, usize> = HashMap::new();

        for (i, command) in batch.iter().enumerate() {
            for account in command.accounts() {
                match first_seen.get(account) {
                    Some(&j) => join(&mut parent, i, j),
                    None => {
                        first_seen.insert(account.to_string(), i);
                    }
                }
            }
        }

        let mut groups: Vec<Group> = Vec::new();
        let mut slots: HashMap<usize, usize> = HashMap::new();
        for (i, command) in batch.into_iter().enumerate() {
            let root = find_root(&mut parent, i);
            let slot = *slots.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push((i, command));
        }
        groups
    }

    /// Replay one group in order
    pub fn process_group(processor: &TransactionProcessor, group: Group) -> Vec<ProcessingResult> {
        group
            .into_iter()
            .map(|(index, command)| {
                let result = processor.execute(command.clone());
                ProcessingResult {
                    index,
                    command,
                    result,
                }
            })
            .collect()
    }

    /// Replay a batch, running disjoint account groups concurrently
    ///
    /// Results are returned in batch order. A group whose task panics is
    /// logged and its results are missing from the output.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let size = batch.len();
        let groups = Self::partition_by_accounts(batch);
        debug!(commands = size, groups = groups.len(), "batch partitioned");

        let mut tasks = Vec::with_capacity(groups.len());
        for group in groups {
            // The semaphore is never closed, so acquisition only fails on shutdown
            let permit = Arc::clone(&self.permits).acquire_owned().await.ok();
            let processor = Arc::clone(&self.processor);
            tasks.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                Self::process_group(&processor, group)
            }));
        }

        let mut results = Vec::with_capacity(size);
        for task in tasks {
            match task.await {
                Ok(group_results) => results.extend(group_results),
                Err(e) => error!(error = %e, "account group task failed"),
            }
        }
        results.sort_by_key(|r| r.index);
        results
    }
}
