//! End-to-end integration tests
//!
//! These tests validate the complete reconciliation pipeline using predefined
//! fixtures. Each test:
//! 1. Reads statement.csv and settlement.csv from a fixture directory
//! 2. Reconciles them with the selected strategy
//! 3. Writes the classified view (and excluded rows, when expected) as CSV
//! 4. Compares the output with expected.csv / expected_excluded.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - Matched, settlement-only and statement-only transactions
//! - Duplicate PINs on either side
//! - Row-level errors (zero or non-numeric rates, missing PINs, blank rows)
//! - Schema violations
//!
//! Each test is run twice: once with the sequential strategy and once with the
//! parallel one.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use settlement_reconciler::cli::StrategyType;
    use settlement_reconciler::io::{write_classified_csv, write_excluded_csv};
    use settlement_reconciler::strategy::create_strategy;
    use settlement_reconciler::types::{Category, Feed, ReconcileError};
    use std::fs;
    use std::path::{Path, PathBuf};

    fn fixture_path(fixture_name: &str, file: &str) -> PathBuf {
        let path = Path::new("tests/fixtures").join(fixture_name).join(file);
        assert!(path.exists(), "Fixture file not found: {}", path.display());
        path
    }

    /// Run a fixture and compare the classified (and excluded) output
    ///
    /// # Panics
    ///
    /// Panics if fixture files cannot be read or the output does not match.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType) {
        let statement_path = fixture_path(fixture_name, "statement.csv");
        let settlement_path = fixture_path(fixture_name, "settlement.csv");
        let expected_path = fixture_path(fixture_name, "expected.csv");

        let strategy = create_strategy(strategy_type.clone(), None);
        let result = strategy
            .process(&statement_path, &settlement_path)
            .unwrap_or_else(|e| panic!("Failed to reconcile fixture {}: {}", fixture_name, e));

        let mut output = Vec::new();
        write_classified_csv(&result, &[], &mut output).expect("Failed to write output");
        let actual_output = String::from_utf8(output).expect("Output is not UTF-8");

        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", expected_path.display(), e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );

        let expected_excluded_path = Path::new("tests/fixtures")
            .join(fixture_name)
            .join("expected_excluded.csv");
        if expected_excluded_path.exists() {
            let mut excluded = Vec::new();
            write_excluded_csv(&result.excluded, &mut excluded).expect("Failed to write excluded");
            let actual_excluded = String::from_utf8(excluded).expect("Output is not UTF-8");
            let expected_excluded = fs::read_to_string(&expected_excluded_path)
                .expect("Failed to read expected_excluded.csv");

            assert_eq!(
                actual_excluded, expected_excluded,
                "\n\nExcluded rows mismatch for fixture: {} (strategy: {:?})",
                fixture_name, strategy_type
            );
        } else {
            assert!(
                result.excluded.is_empty(),
                "Unexpected excluded rows in {}: {:?}",
                fixture_name,
                result.excluded
            );
        }
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("happy_path")]
    #[case("duplicate_pins")]
    #[case("row_errors")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy);
    }

    #[rstest]
    fn test_missing_column_aborts_run(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let strategy = create_strategy(strategy, None);
        let result = strategy.process(
            &fixture_path("missing_rate_column", "statement.csv"),
            &fixture_path("missing_rate_column", "settlement.csv"),
        );

        let error = result.unwrap_err();
        assert!(matches!(
            error,
            ReconcileError::Schema {
                feed: Feed::Settlement,
                ..
            }
        ));
        assert_eq!(
            error.to_string(),
            "Schema error in settlement sheet: missing 'APIRate' column"
        );
    }

    #[test]
    fn test_category_filter_on_fixture() {
        let strategy = create_strategy(StrategyType::Sync, None);
        let result = strategy
            .process(
                &fixture_path("happy_path", "statement.csv"),
                &fixture_path("happy_path", "settlement.csv"),
            )
            .unwrap();

        let mut output = Vec::new();
        write_classified_csv(&result, &[Category::SettlementOnly], &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();

        let rows: Vec<&str> = output.lines().skip(1).collect();
        assert_eq!(
            rows,
            vec!["6,Present in Settlement but not in Statement,100000004,,6,,false,,1000.0000,80.0000,12.5000,"]
        );
    }

    #[test]
    fn test_missing_input_file() {
        let strategy = create_strategy(StrategyType::Sync, None);
        let result = strategy.process(
            Path::new("tests/fixtures/happy_path/missing.xlsx"),
            &fixture_path("happy_path", "settlement.csv"),
        );

        assert!(matches!(result, Err(ReconcileError::FileNotFound { .. })));
    }
}
