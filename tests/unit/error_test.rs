//! Tests for error types

use std::time::Duration;

use konofan_pipeline::core::{QueueError, TranslationError};
use konofan_pipeline::transform::parse_table;

#[test]
fn test_invalid_limit_error() {
    let err = QueueError::InvalidLimit(0);
    assert_eq!(format!("{}", err), "invalid concurrency limit: 0");
}

#[test]
fn test_admission_timeout_error() {
    let err = QueueError::AdmissionTimeout(Duration::from_millis(250));
    assert_eq!(format!("{}", err), "admission timed out after 250ms");
}

#[test]
fn test_invalid_config_error() {
    let err = QueueError::InvalidConfig("at least one queue must be defined".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid queue configuration: at least one queue must be defined"
    );
}

#[test]
fn test_translation_source_error() {
    let err = TranslationError::Source {
        table: "text".to_string(),
        reason: "HTTP 503".to_string(),
    };
    assert_eq!(format!("{}", err), "translation source `text` unavailable: HTTP 503");
}

#[test]
fn test_malformed_error_keeps_source() {
    let err = parse_table("assetname", "[{\"text_english\": \"no id\"}]").unwrap_err();
    assert!(format!("{}", err).starts_with("translation source `assetname` malformed:"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_queue_error_into_anyhow() {
    let result: konofan_pipeline::core::AppResult<()> = Err(QueueError::InvalidLimit(0).into());
    assert_eq!(result.unwrap_err().to_string(), "invalid concurrency limit: 0");
}
