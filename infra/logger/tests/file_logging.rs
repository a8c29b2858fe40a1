use std::time::Duration;
use tpad_logger::{LevelFilter, Logger};

#[test]
fn file_layer_creates_log_files() {
    let tmp_dir = tempfile::tempdir().expect("tempdir");
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder()
        .name("integration-file")
        .console(false)
        .path(&log_dir)
        .level(LevelFilter::INFO)
        .init()
        .expect("logger should initialize");

    assert!(logger.guard().is_some(), "file logging must hold a worker guard");

    tracing::info!("hello from the file layer");
    // Give the non-blocking worker a moment before checking the directory.
    std::thread::sleep(Duration::from_millis(20));
    logger.flush();

    assert!(log_dir.exists(), "log directory should be created by logger init");

    let has_log = std::fs::read_dir(&log_dir)
        .expect("read log dir")
        .flatten()
        .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));

    assert!(has_log, "at least one log file should be created");
}
