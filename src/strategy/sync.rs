//! Synchronous replay strategy
//!
//! Rows are read with [`SyncReader`] and executed one after another on the
//! calling thread.

use crate::core::TransactionProcessor;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{write_results, ProcessingStrategy};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    ledger_path: Option<PathBuf>,
}

impl SyncProcessingStrategy {
    pub fn new(ledger_path: Option<PathBuf>) -> Self {
        Self { ledger_path }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), String> {
        let processor = TransactionProcessor::in_memory();
        let reader = SyncReader::new(input_path)?;

        for result in reader {
            match result {
                Ok(command) => {
                    let name = command.name();
                    match processor.execute(command) {
                        Ok(_) => debug!(command = name, "command replayed"),
                        Err(e) if e.is_business() => {
                            debug!(command = name, error = %e, "command rejected")
                        }
                        Err(e) => return Err(format!("Storage failure: {}", e)),
                    }
                }
                Err(e) => warn!(error = %e, "skipping row"),
            }
        }

        write_results(&processor, output, self.ledger_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_strategy_replays_commands() {
        let file = create_temp_csv(
            "op,account,to,amount,pin,kind,holder,status,description\n\
             open,SAV-1,,1000.00,1234,savings,Ada Lovelace,,\n\
             withdraw,SAV-1,,200.00,1234,,,,\n\
             withdraw,SAV-1,,50.00,9999,,,,\n",
        );

        let mut output = Vec::new();
        SyncProcessingStrategy::default()
            .process(file.path(), &mut output)
            .unwrap();

        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("SAV-1,Ada Lovelace,savings,active,798.00,202.00,0.00"));
    }

    #[test]
    fn test_sync_strategy_writes_ledger() {
        let file = create_temp_csv(
            "op,account,to,amount,pin,kind,holder,status,description\n\
             open,A,,10.00,1234,checking,Ada,,\n\
             deposit,A,,5.00,,,,,\n\
             deposit,B,,5.00,,,,,\n",
        );
        let ledger = NamedTempFile::new().unwrap();

        let strategy = SyncProcessingStrategy::new(Some(ledger.path().to_path_buf()));
        let mut output = Vec::new();
        strategy.process(file.path(), &mut output).unwrap();

        let log = std::fs::read_to_string(ledger.path()).unwrap();
        assert_eq!(log.lines().count(), 3);
        assert!(log.contains("failed,Account not found: B"));
    }

    #[test]
    fn test_sync_strategy_handles_missing_file() {
        let mut output = Vec::new();
        let result =
            SyncProcessingStrategy::default().process(Path::new("nonexistent.csv"), &mut output);
        assert!(result.unwrap_err().contains("Failed to open file"));
    }
}
