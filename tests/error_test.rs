//! Tests for error types

use anneal_tuner::Error;

#[test]
fn test_invalid_schedule_error() {
    let error = Error::InvalidSchedule("slope 2.5 exceeds 2".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid anneal schedule"));
    assert!(error_str.contains("slope 2.5"));
    assert!(error.is_recoverable());
}

#[test]
fn test_solver_invocation_error() {
    let error = Error::SolverInvocation {
        backend: "QPU".to_string(),
        message: "timeout".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("'QPU'"));
    assert!(error_str.contains("timeout"));
    assert!(!error.is_recoverable());
}

#[test]
fn test_missing_results_error() {
    let error = Error::MissingResults { num_nodes: 8 };
    let error_str = format!("{error}");
    assert!(error_str.contains("num_nodes=8"));
    assert!(error_str.contains("write_results"));
}

#[test]
fn test_missing_trial_logs_error() {
    let error = Error::MissingTrialLogs { num_nodes: 12 };
    let error_str = format!("{error}");
    assert!(error_str.contains("num_nodes=12"));
    assert!(error_str.contains("tuning"));
}

#[test]
fn test_configuration_error() {
    let error = Error::Configuration("unknown mode 9".to_string());
    assert_eq!(format!("{error}"), "Configuration error: unknown mode 9");
    assert!(!error.is_recoverable());
}

#[test]
fn test_parse_error() {
    let error = Error::ParseError("expected a number, got 'ten'".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Parse error"));
    assert!(error_str.contains("'ten'"));
}

#[test]
fn test_storage_error() {
    let error = Error::StorageError("file not found".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Storage error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("missing file"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<Vec<f64>>("[1.0,").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_error_debug_format() {
    let error = Error::MissingResults { num_nodes: 4 };
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("MissingResults"));
}
