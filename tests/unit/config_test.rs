//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use konofan_pipeline::config::{PipelineConfig, QueueConfig, DEFAULT_MAX_CONCURRENT, DEFAULT_QUEUE};

fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_queue_config_default() {
    let cfg = QueueConfig::default();
    assert_eq!(cfg.max_concurrent, DEFAULT_MAX_CONCURRENT);
    assert_eq!(cfg.admission_timeout(), None);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_queue_config_invalid_limit() {
    let invalid = QueueConfig {
        max_concurrent: 0,
        admission_timeout_secs: None,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_queue_config_invalid_timeout() {
    let invalid = QueueConfig {
        max_concurrent: 4,
        admission_timeout_secs: Some(0),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_pipeline_config_empty_queues() {
    let config = PipelineConfig {
        queues: HashMap::new(),
        strip_zero_props: false,
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_pipeline_config_reports_queue_name() {
    let mut queues = HashMap::new();
    queues.insert(
        "wiki".to_string(),
        QueueConfig {
            max_concurrent: 0,
            admission_timeout_secs: None,
        },
    );
    let err = PipelineConfig {
        queues,
        strip_zero_props: false,
    }
    .validate()
    .unwrap_err();
    assert!(err.contains("queue `wiki` invalid"));
}

#[test]
fn test_pipeline_config_from_json() {
    let json = r#"{
        "queues": {
            "tables": { "max_concurrent": 24 },
            "repo_trees": { "max_concurrent": 25, "admission_timeout_secs": 30 }
        },
        "strip_zero_props": true
    }"#;

    let config = PipelineConfig::from_json_str(json).unwrap();
    assert!(config.strip_zero_props);
    assert_eq!(config.queues["tables"].max_concurrent, 24);
    assert_eq!(
        config.queues["repo_trees"].admission_timeout(),
        Some(Duration::from_secs(30))
    );
}

#[test]
fn test_pipeline_config_from_json_rejects_invalid() {
    assert!(PipelineConfig::from_json_str(r#"{"queues": {}}"#).is_err());
    assert!(PipelineConfig::from_json_str("not json").is_err());
}

#[test]
fn test_from_lookup_defaults() {
    let config = PipelineConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config, PipelineConfig::default());
}

#[test]
fn test_from_lookup_overrides() {
    let config = PipelineConfig::from_lookup(lookup_from(&[
        ("KONOFAN_MAX_CONCURRENT", "8"),
        ("KONOFAN_ADMISSION_TIMEOUT_SECS", " 15 "),
        ("KONOFAN_STRIP_ZERO_PROPS", "true"),
    ]))
    .unwrap();
    let queue = &config.queues[DEFAULT_QUEUE];
    assert_eq!(queue.max_concurrent, 8);
    assert_eq!(queue.admission_timeout_secs, Some(15));
    assert!(config.strip_zero_props);
}

#[test]
fn test_from_lookup_rejects_bad_values() {
    let err = PipelineConfig::from_lookup(lookup_from(&[("KONOFAN_MAX_CONCURRENT", "lots")])).unwrap_err();
    assert!(err.starts_with("KONOFAN_MAX_CONCURRENT: invalid value `lots`"));

    let err = PipelineConfig::from_lookup(lookup_from(&[("KONOFAN_MAX_CONCURRENT", "0")])).unwrap_err();
    assert!(err.contains("max_concurrent must be greater than 0"));
}

#[test]
fn test_finish_table_strips_when_enabled() {
    let cfg = PipelineConfig {
        strip_zero_props: true,
        ..PipelineConfig::default()
    };
    let table = serde_json::json!([
        {"id": "101", "skill_id": "0", "details": [{"lv": "1", "bonus": "0"}]},
    ]);
    assert_eq!(
        cfg.finish_table(table),
        serde_json::json!([{"id": "101", "details": [{"lv": "1"}]}])
    );
}

#[test]
fn test_finish_table_passes_through_when_disabled() {
    let cfg = PipelineConfig::default();
    let table = serde_json::json!([{"id": "101", "skill_id": "0"}]);
    assert_eq!(cfg.finish_table(table.clone()), table);
}

#[test]
fn test_finish_table_follows_env_flag() {
    let cfg = PipelineConfig::from_lookup(lookup_from(&[("KONOFAN_STRIP_ZERO_PROPS", "true")])).unwrap();
    let out = cfg.finish_table(serde_json::json!({"id": "7", "rarity": "0"}));
    assert_eq!(out, serde_json::json!({"id": "7"}));
}
