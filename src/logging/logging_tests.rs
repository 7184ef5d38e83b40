//! Tests for log file setup.

use super::*;
use serial_test::serial;
use std::fs;

#[test]
fn log_target_splits_directory_and_file() {
    let (directory, file) = log_target(Path::new("/var/log/notiview/app.log")).expect("valid");
    assert_eq!(directory, PathBuf::from("/var/log/notiview"));
    assert_eq!(file, "app.log");
}

#[test]
fn bare_file_name_logs_to_current_directory() {
    let (directory, file) = log_target(Path::new("notiview.log")).expect("valid");
    assert_eq!(directory, PathBuf::from("."));
    assert_eq!(file, "notiview.log");
}

#[test]
fn root_path_is_rejected() {
    assert!(matches!(
        log_target(Path::new("/")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
fn parent_dir_component_is_not_a_file_name() {
    assert!(matches!(
        log_target(Path::new("logs/..")),
        Err(LoggingError::InvalidPath(_))
    ));
}

#[test]
#[serial(tracing_init)]
fn init_creates_log_directory_if_missing() {
    let test_dir = std::env::temp_dir().join("notiview_test_logs_create");
    let log_file = test_dir.join("test.log");
    let _ = fs::remove_dir_all(&test_dir);

    // May fail with SubscriberAlreadySet; the directory is created first.
    let _ = init(&log_file);

    assert!(test_dir.exists(), "Log directory should be created: {:?}", test_dir);
    let _ = fs::remove_dir_all(&test_dir);
}

#[test]
#[serial(tracing_init)]
fn second_init_reports_subscriber_already_set() {
    let test_dir = std::env::temp_dir().join("notiview_test_logs_twice");
    let log_file = test_dir.join("twice.log");

    let _ = init(&log_file);
    assert!(matches!(
        init(&log_file),
        Err(LoggingError::SubscriberAlreadySet)
    ));

    let _ = fs::remove_dir_all(&test_dir);
}
