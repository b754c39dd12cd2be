//! Tests for error types

use packstat::Error;
use std::path::PathBuf;

#[test]
fn test_missing_table_error_names_file_and_remedy() {
    let error = Error::MissingTable {
        path: PathBuf::from("results/epsilon_n1024.csv"),
        remediation: "Run the experiment driver first.".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Result table not found"));
    assert!(error_str.contains("results/epsilon_n1024.csv"));
    assert!(error_str.contains("experiment driver"));
}

#[test]
fn test_table_unreadable_error_keeps_source() {
    let error = Error::TableUnreadable {
        path: PathBuf::from("results/time_n1024.csv"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("time_n1024.csv"));
    assert!(error_str.contains("denied"));
    assert!(std::error::Error::source(&error).is_some());
}

#[test]
fn test_no_valid_tasks_error() {
    let error = Error::NoValidTasks { rejected: 12 };
    let error_str = format!("{error}");
    assert!(error_str.contains("No valid tasks read"));
    assert!(error_str.contains("12 lines rejected"));
    assert!(error_str.contains("run_time num_procs"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("universe must be positive".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("universe must be positive"));
}

#[test]
fn test_config_error() {
    let error = Error::Config("bad pattern".to_string());
    assert!(format!("{error}").contains("Configuration error: bad pattern"));
}

#[test]
fn test_storage_error() {
    let error = Error::StorageError("schema mismatch".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("schema mismatch"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_error_debug() {
    let error = Error::NoValidTasks { rejected: 0 };
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("NoValidTasks"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> packstat::Result<i32> {
        Err(Error::InvalidInput("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}
