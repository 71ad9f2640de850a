use slack_relay::errors::RelayError;
use slack_relay::setup_logging;

#[test]
fn test_logging_setup() {
    let result = std::panic::catch_unwind(|| {
        setup_logging("info").unwrap();
        // A second call must not panic on the already-installed subscriber
        setup_logging("debug").unwrap();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}

#[test]
fn test_logging_rejects_unknown_level() {
    let err = setup_logging("chatty").unwrap_err();
    assert!(matches!(err, RelayError::Config(ref m) if m.contains("LOG_LEVEL")));
}

#[test]
fn test_logging_accepts_logrus_level_names() {
    for level in ["warning", "fatal", "panic", "WARN", "Info"] {
        assert!(setup_logging(level).is_ok(), "{level} should be accepted");
    }
}
