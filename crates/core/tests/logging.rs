//! Log file setup

use rescope_core::logging::init_logging_in;
use tempfile::TempDir;

#[test]
fn test_log_directory_is_created_and_reinit_is_harmless() {
    let temp = TempDir::new().unwrap();
    let log_dir = temp.path().join("logs");

    let guard = init_logging_in(&log_dir, "resolver", false);
    tracing::info!("first");
    let second = init_logging_in(&log_dir, "resolver", false);
    drop(second);
    drop(guard);

    assert!(log_dir.is_dir());
}
