//! Replay strategy module
//!
//! A strategy is a complete replay pipeline: read commands from a CSV file,
//! run them through a [`TransactionProcessor`], then write the final account
//! states (and optionally the audit log). The sync and async strategies
//! produce identical results; they differ only in how rows are scheduled.

use crate::cli::StrategyType;
use crate::core::TransactionProcessor;
use crate::io::{write_accounts_csv, write_ledger_csv};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Complete replay pipeline
pub trait ProcessingStrategy: Send + Sync {
    /// Replay the commands in `input_path` and write account states to `output`
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be opened, if the tokio runtime
    /// cannot be built, or if output cannot be written. Rejected commands
    /// and malformed rows are logged and do not fail the run.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String>;
}

/// Write the final account states and, if requested, the audit log
pub(crate) fn write_results(
    processor: &TransactionProcessor,
    output: &mut dyn Write,
    ledger_path: Option<&Path>,
) -> Result<(), String> {
    let accounts = processor
        .accounts()
        .map_err(|e| format!("Failed to read accounts: {}", e))?;
    write_accounts_csv(&accounts, output)?;

    if let Some(path) = ledger_path {
        let transactions = processor
            .transactions()
            .map_err(|e| format!("Failed to read ledger: {}", e))?;
        let file = File::create(path)
            .map_err(|e| format!("Failed to create ledger file '{}': {}", path.display(), e))?;
        let mut writer = BufWriter::new(file);
        write_ledger_csv(&transactions, &mut writer)?;
        writer
            .flush()
            .map_err(|e| format!("Failed to flush ledger file: {}", e))?;
    }
    Ok(())
}

/// Create a replay strategy
///
/// # Arguments
///
/// * `strategy_type` - Sync or Async
/// * `config` - Batch configuration (ignored for sync)
/// * `ledger_path` - Where to write the audit log, if anywhere
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    ledger_path: Option<PathBuf>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger_path)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, ledger_path))
        }
    }
}
