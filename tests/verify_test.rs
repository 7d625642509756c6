//! Integration tests for the verify pass.
//!
//! Tests cover:
//! - A freshly generated dataset passes all 14 relationship checks
//! - A single corrupted FK fails exactly its relationship with 1 invalid key
//! - Offending-example lists are capped at 5 entries
//! - Missing artifacts and missing columns fail only their relationships
//! - JSON serialization of the summary

use chrono::{NaiveDate, NaiveDateTime};
use csv_forge::csvio;
use csv_forge::generator::{Generator, GeneratorConfig};
use csv_forge::verify::{CheckStatus, Verifier};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn as_of() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn write_dataset(rows: usize) -> TempDir {
    let dir = TempDir::new().unwrap();
    Generator::new(GeneratorConfig::new(42, rows, as_of()))
        .generate()
        .unwrap()
        .write_to(dir.path())
        .unwrap();
    dir
}

/// Replace the value of `column` with `new_value` in the first `n` data rows
fn corrupt_column(dir: &Path, file: &str, column: &str, new_value: impl Fn(usize) -> String, n: usize) {
    let path = dir.join(file);
    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();

    let header = csvio::parse_line(&lines[0]);
    let idx = header.iter().position(|h| h == column).unwrap();

    for (i, line) in lines.iter_mut().skip(1).take(n).enumerate() {
        let mut fields = csvio::parse_line(line);
        fields[idx] = new_value(i);
        *line = fields.join(",");
    }

    fs::write(&path, lines.join("\n") + "\n").unwrap();
}

#[test]
fn test_generated_dataset_passes_verification() {
    let dir = write_dataset(150);
    let summary = Verifier::new(dir.path()).verify();

    assert_eq!(summary.checked, 14);
    assert_eq!(summary.passed, 14);
    assert_eq!(summary.failed, 0);
    assert!(summary.all_passed);
}

#[test]
fn test_single_corrupted_fk_fails_only_its_relationship() {
    let dir = write_dataset(150);
    corrupt_column(
        dir.path(),
        "Orders.csv",
        "customer_id",
        |_| "00000000-0000-4000-8000-000000000000".to_string(),
        1,
    );

    let summary = Verifier::new(dir.path()).verify();
    assert!(!summary.all_passed);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.passed, 13);

    let failure = &summary.failures()[0];
    assert_eq!(failure.relationship.child_table, "Orders");
    assert_eq!(failure.relationship.child_key, "customer_id");
    assert_eq!(failure.relationship.parent_table, "Customers");

    match &failure.status {
        CheckStatus::InvalidKeys { count, examples } => {
            assert_eq!(*count, 1);
            assert_eq!(
                examples,
                &vec!["00000000-0000-4000-8000-000000000000".to_string()]
            );
        }
        other => panic!("expected InvalidKeys, got {:?}", other),
    }
}

#[test]
fn test_invalid_key_examples_are_capped_at_five() {
    let dir = write_dataset(150);
    corrupt_column(
        dir.path(),
        "OrderItems.csv",
        "order_id",
        |i| format!("bad-key-{}", i),
        7,
    );

    let summary = Verifier::new(dir.path()).verify();
    let failures = summary.failures();
    assert_eq!(failures.len(), 1);

    match &failures[0].status {
        CheckStatus::InvalidKeys { count, examples } => {
            assert_eq!(*count, 7);
            assert_eq!(examples.len(), 5);
            assert_eq!(examples[0], "bad-key-0");
        }
        other => panic!("expected InvalidKeys, got {:?}", other),
    }
}

#[test]
fn test_missing_artifact_fails_only_its_relationships() {
    let dir = write_dataset(100);
    fs::remove_file(dir.path().join("Shipments.csv")).unwrap();

    let summary = Verifier::new(dir.path()).verify();

    // Shipments is the child of 3 relationships and the parent of 1
    assert_eq!(summary.failed, 4);
    assert_eq!(summary.passed, 10);

    for report in &summary.reports {
        let touches_shipments = report.relationship.parent_table == "Shipments"
            || report.relationship.child_table == "Shipments";
        if touches_shipments {
            assert!(matches!(report.status, CheckStatus::LoadFailed { .. }));
        } else {
            assert!(report.status.passed(), "{} should pass", report.relationship);
        }
    }
}

#[test]
fn test_missing_column_is_a_schema_failure() {
    let dir = write_dataset(100);
    fs::write(
        dir.path().join("Customers.csv"),
        "id,name\n1,Alice\n",
    )
    .unwrap();

    let summary = Verifier::new(dir.path()).verify();
    assert_eq!(summary.failed, 1);

    let failure = &summary.failures()[0];
    assert_eq!(failure.relationship.parent_table, "Customers");
    match &failure.status {
        CheckStatus::MissingColumn { table, column } => {
            assert_eq!(table, "Customers");
            assert_eq!(column, "customer_id");
        }
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_summary_serializes_to_json() {
    let dir = write_dataset(60);
    let summary = Verifier::new(dir.path()).verify();

    let json = serde_json::to_string_pretty(&summary).unwrap();
    assert!(json.contains("\"all_passed\": true"));
    assert!(json.contains("\"status\": \"passed\""));
    assert!(json.contains("\"child_table\": \"Orders\""));
}
