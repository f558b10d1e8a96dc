//! End-to-end integration tests
//!
//! Each test replays `input.csv` from a fixture directory and compares the
//! printed account states with `expected.csv`:
//!
//! - `happy_path` - deposits, fee-bearing withdrawal and transfer
//! - `rejections` - wrong PIN, insufficient funds, self transfer, bad amounts
//! - `daily_limits` - withdrawal and transfer allowances including fees
//! - `account_lifecycle` - open validation, suspension, interest, closing
//! - `malformed_data` - unparseable rows are skipped
//! - `transfer_chains` - accounts linked through transfers
//!
//! Every fixture runs with both replay strategies.

#[cfg(test)]
mod tests {
    use banking_ledger::cli::StrategyType;
    use banking_ledger::strategy::{create_strategy, BatchConfig};
    use rstest::rstest;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Replay a fixture and compare with its expected output
    ///
    /// The async strategy uses tiny batches so that account groups span
    /// several batches.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let input_path = format!("{}/input.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        assert!(
            Path::new(&input_path).exists(),
            "Input file not found: {}",
            input_path
        );

        let strategy = create_strategy(strategy_type.clone(), Some(BatchConfig::new(3, 4)), None);
        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");

        strategy
            .process(Path::new(&input_path), &mut temp_output)
            .unwrap_or_else(|e| panic!("Failed to replay commands: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    #[rstest]
    #[case("happy_path")]
    #[case("rejections")]
    #[case("daily_limits")]
    #[case("account_lifecycle")]
    #[case("malformed_data")]
    #[case("transfer_chains")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy);
    }

    /// Every money-moving row leaves exactly one audit record
    #[rstest]
    #[case::rejections("rejections", 7, 0)]
    #[case::happy_path("happy_path", 3, 3)]
    #[case::lifecycle("account_lifecycle", 6, 2)]
    fn test_ledger_output(
        #[case] fixture: &str,
        #[case] expected_records: usize,
        #[case] expected_successful: usize,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let input_path = format!("tests/fixtures/{}/input.csv", fixture);
        let ledger = NamedTempFile::new().expect("Failed to create temp file");

        let strategy = create_strategy(strategy, None, Some(ledger.path().to_path_buf()));
        let mut output = Vec::new();
        strategy
            .process(Path::new(&input_path), &mut output)
            .unwrap_or_else(|e| panic!("Failed to replay commands: {}", e));

        let log = fs::read_to_string(ledger.path()).unwrap();
        let records: Vec<&str> = log.lines().skip(1).collect();
        assert_eq!(records.len(), expected_records);
        assert_eq!(
            records
                .iter()
                .filter(|line| line.contains(",successful,"))
                .count(),
            expected_successful
        );
    }
}
