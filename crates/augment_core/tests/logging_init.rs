use augment_core::{init_logging, logging_status, LoggingError};

#[test]
fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
    let log_dir = tempfile::tempdir().expect("temp log dir");
    let log_dir_str = log_dir
        .path()
        .to_str()
        .expect("temp dir should be valid UTF-8")
        .to_string();
    let other_dir = tempfile::tempdir().expect("second temp log dir");
    let other_dir_str = other_dir
        .path()
        .to_str()
        .expect("temp dir should be valid UTF-8")
        .to_string();

    assert!(logging_status().is_none());
    init_logging("info", &log_dir_str).expect("first init should succeed");
    init_logging(" INFO ", &log_dir_str).expect("same config should be idempotent");

    let level_error = init_logging("debug", &log_dir_str).expect_err("level conflict should fail");
    assert!(matches!(level_error, LoggingError::AlreadyInitialized { .. }));
    assert!(level_error.to_string().contains("refusing to switch"));

    let dir_error =
        init_logging("info", &other_dir_str).expect_err("directory conflict should fail");
    assert!(matches!(dir_error, LoggingError::AlreadyInitialized { .. }));

    let active = logging_status().expect("logging should be active");
    assert_eq!(active.level(), "info");
    assert_eq!(active.log_dir(), log_dir.path());
}

#[test]
fn init_logging_rejects_invalid_input_without_starting() {
    assert_eq!(
        init_logging("loud", "/tmp").unwrap_err(),
        LoggingError::UnsupportedLevel("loud".to_string())
    );
    assert!(matches!(
        init_logging("info", "relative/logs").unwrap_err(),
        LoggingError::RelativeLogDir(_)
    ));
}
