//! Asynchronous batch replay strategy
//!
//! Rows are read in batches with csv-async. Each batch is handed to the
//! [`BatchProcessor`], which replays disjoint account groups concurrently.
//! Batches run one after another, so a group whose commands span two batches
//! still sees them in file order.
//!
//! # Configuration
//!
//! - `batch_size`: rows per batch (default 1000)
//! - `max_concurrent`: account groups in flight, also the number of runtime
//!   worker threads (default: CPU cores)

use crate::core::{BatchProcessor, TransactionProcessor};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{write_results, ProcessingStrategy};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Batch replay configuration
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub max_concurrent: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a configuration, replacing zero values with the defaults
    pub fn new(batch_size: usize, max_concurrent: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent = if max_concurrent == 0 {
            warn!(
                max_concurrent,
                default = default.max_concurrent,
                "invalid concurrency limit, using default"
            );
            default.max_concurrent
        } else {
            max_concurrent
        };

        Self {
            batch_size,
            max_concurrent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    ledger_path: Option<PathBuf>,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, ledger_path: Option<PathBuf>) -> Self {
        Self {
            config,
            ledger_path,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let processor = Arc::new(TransactionProcessor::in_memory());

        runtime.block_on(async {
            let batch_processor =
                BatchProcessor::new(Arc::clone(&processor), self.config.max_concurrent);

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| format!("Failed to open file '{}': {}", input_path.display(), e))?;
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }

                for outcome in batch_processor.process_batch(batch).await {
                    match outcome.result {
                        Ok(_) => {}
                        Err(e) if e.is_business() => debug!(
                            command = outcome.command.name(),
                            error = %e,
                            "command rejected"
                        ),
                        Err(e) => return Err(format!("Storage failure: {}", e)),
                    }
                }
            }

            Ok::<(), String>(())
        })?;

        write_results(&processor, output, self.ledger_path.as_deref())
    }
}
