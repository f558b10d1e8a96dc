//! Synchronous CSV reader with iterator interface
//!
//! Streams ledger commands from a CSV file one row at a time, delegating
//! format concerns to the csv_format module.
//!
//! ```no_run
//! use banking_ledger::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::new(Path::new("commands.csv")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(command) => println!("replaying {}", command.name()),
//!         Err(e) => eprintln!("skipped: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - Fatal errors (file not found) are returned from `new()`
//! - Row errors are yielded as `Err` items carrying the line number

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Iterator over the commands of a CSV file
#[derive(Debug)]
pub struct SyncReader {
    reader: csv::Reader<File>,

    /// Data rows read so far (the header is line 1)
    line_num: usize,
}

impl SyncReader {
    /// Open a CSV file for reading
    ///
    /// # Errors
    ///
    /// Returns a message if the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .buffer_capacity(8 * 1024)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for SyncReader {
    type Item = Result<LedgerCommand, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvRecord>();
        let row = deserializer.next()?;
        self.line_num += 1;
        let line = self.line_num + 1;

        Some(match row {
            Ok(csv_record) => {
                convert_csv_record(csv_record).map_err(|e| format!("Line {}: {}", line, e))
            }
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "op,account,to,amount,pin,kind,holder,status,description\n";

    fn create_temp_csv(rows: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(HEADER.as_bytes())
            .expect("Failed to write to temp file");
        file.write_all(rows.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_sync_reader_fails_on_missing_file() {
        let result = SyncReader::new(Path::new("nonexistent.csv"));
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_sync_reader_iterates_commands_in_order() {
        let file = create_temp_csv(
            "open,A,,10.00,1234,checking,Ada,,\n\
             deposit, A ,,5.25,,,,,\n\
             transfer,A,B,1.00,1234,,,,gift\n",
        );

        let commands: Vec<LedgerCommand> = SyncReader::new(file.path())
            .unwrap()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0].name(), "open");
        assert_eq!(
            commands[1],
            LedgerCommand::Deposit {
                account: "A".to_string(),
                amount: Decimal::new(525, 2),
                description: None,
            }
        );
        assert_eq!(commands[2].accounts(), vec!["A", "B"]);
    }

    #[test]
    fn test_sync_reader_includes_line_numbers_in_errors() {
        let file = create_temp_csv(
            "deposit,A,,1.00,,,,,\n\
             deposit,A,,lots,,,,,\n\
             deposit,A,,2.00,,,,,\n",
        );

        let records: Vec<_> = SyncReader::new(file.path()).unwrap().collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3"));
        assert!(error.contains("Invalid amount"));
        assert!(records[2].is_ok());
    }

    #[test]
    fn test_sync_reader_empty_file() {
        let file = create_temp_csv("");
        assert_eq!(SyncReader::new(file.path()).unwrap().count(), 0);
    }
}
