//! Asynchronous CSV reader with batch interface
//!
//! Reads ledger commands from any `futures::io::AsyncRead` with csv-async,
//! in batches sized for the batch processor.
//!
//! ```text
//! CSV source → AsyncReader → Vec<LedgerCommand> batches
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```
//!
//! Malformed rows are logged and skipped; they never end a batch early.

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Batch reader over an async CSV source
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self { csv_reader }
    }

    /// Read up to `batch_size` valid commands
    ///
    /// Returns an empty batch once the source is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => match convert_csv_record(csv_record) {
                    Ok(command) => batch.push(command),
                    Err(e) => warn!(error = %e, "skipping row"),
                },
                Some(Err(e)) => warn!(error = %e, "skipping unparseable row"),
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "op,account,to,amount,pin,kind,holder,status,description\n";

    fn reader(rows: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, rows).into_bytes()))
    }

    #[tokio::test]
    async fn test_async_reader_read_batch() {
        let mut async_reader = reader(
            "deposit,A,,1.00,,,,,\n\
             withdraw,A,,0.50,1234,,,,\n\
             deposit,B,,2.00,,,,,\n",
        );

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].name(), "deposit");
        assert_eq!(batch[1].name(), "withdraw");

        let batch = async_reader.read_batch(2).await;
        assert_eq!(
            batch,
            vec![LedgerCommand::Deposit {
                account: "B".to_string(),
                amount: Decimal::new(200, 2),
                description: None,
            }]
        );

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_async_reader_skips_invalid_rows() {
        let mut async_reader = reader(
            "refund,A,,1.00,,,,,\n\
             deposit,A,,1.00,,,,,\n\
             status,A,,,,,,frozen,\n\
             interest,A,,,,,,,\n",
        );

        let batch = async_reader.read_batch(10).await;
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[1].name(), "interest");
    }

    #[tokio::test]
    async fn test_async_reader_empty_csv() {
        let mut async_reader = reader("");
        assert!(async_reader.read_batch(10).await.is_empty());
    }
}
