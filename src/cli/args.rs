use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the ledger replay tool
///
/// # Examples
///
/// ```bash
/// banking-ledger commands.csv > accounts.csv
/// banking-ledger --strategy sync --ledger audit.csv commands.csv > accounts.csv
/// banking-ledger --batch-size 500 --max-concurrent 8 commands.csv > accounts.csv
/// ```
#[derive(Parser, Debug)]
#[command(name = "banking-ledger")]
#[command(about = "Replay banking commands against an in-memory ledger", long_about = None)]
pub struct CliArgs {
    #[arg(value_name = "INPUT", help = "Path to the input CSV file of commands")]
    pub input_file: PathBuf,

    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "async",
        help = "Replay strategy: 'sync' for one thread or 'async' for concurrent account groups"
    )]
    pub strategy: StrategyType,

    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of account groups replayed concurrently (default: CPU cores)"
    )]
    pub max_concurrent: Option<usize>,

    #[arg(
        long = "ledger",
        value_name = "PATH",
        help = "Also write the full audit log as CSV to this file"
    )]
    pub ledger: Option<PathBuf>,

    #[arg(long = "log-json", help = "Emit logs to stderr as JSON")]
    pub log_json: bool,
}

/// Replay strategy selection
#[derive(Clone, Debug, PartialEq, ValueEnum)]
pub enum StrategyType {
    /// Rows replayed in order on one thread
    Sync,
    /// Batches replayed with account groups in parallel
    Async,
}

impl CliArgs {
    /// Build the batch configuration, falling back to defaults for absent values
    pub fn to_batch_config(&self) -> BatchConfig {
        let default = BatchConfig::default();
        BatchConfig::new(
            self.batch_size.unwrap_or(default.batch_size),
            self.max_concurrent.unwrap_or(default.max_concurrent),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.csv"], StrategyType::Async)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::all_defaults(&["program", "input.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "input.csv"], 2000, num_cpus::get())]
    #[case::custom_max_concurrent(&["program", "--max-concurrent", "8", "input.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "input.csv"], 1000, num_cpus::get())]
    #[case::zero_max_concurrent(&["program", "--max-concurrent", "0", "input.csv"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_max_concurrent: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.max_concurrent, expected_max_concurrent);
    }

    #[test]
    fn test_ledger_and_log_flags() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--ledger",
            "audit.csv",
            "--log-json",
            "input.csv",
        ])
        .unwrap();

        assert_eq!(parsed.ledger, Some(PathBuf::from("audit.csv")));
        assert!(parsed.log_json);
        assert_eq!(parsed.input_file, PathBuf::from("input.csv"));
    }

    #[rstest]
    #[case::missing_input(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "input.csv"])]
    #[case::non_numeric_batch(&["program", "--batch-size", "many", "input.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
