//! Queue and pipeline configuration structures.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::transform::strip_zero_props;

/// Concurrency cap used by the data fetch fan-out when nothing else is set.
pub const DEFAULT_MAX_CONCURRENT: usize = 25;

/// Name of the queue built by [`PipelineConfig::from_env`].
pub const DEFAULT_QUEUE: &str = "default";

/// Environment variable overriding [`QueueConfig::max_concurrent`].
pub const ENV_MAX_CONCURRENT: &str = "KONOFAN_MAX_CONCURRENT";
/// Environment variable overriding [`QueueConfig::admission_timeout_secs`].
pub const ENV_ADMISSION_TIMEOUT_SECS: &str = "KONOFAN_ADMISSION_TIMEOUT_SECS";
/// Environment variable overriding [`PipelineConfig::strip_zero_props`].
pub const ENV_STRIP_ZERO_PROPS: &str = "KONOFAN_STRIP_ZERO_PROPS";

/// Single queue configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Maximum concurrently running tasks.
    pub max_concurrent: usize,
    /// Give up waiting for admission after this many seconds.
    #[serde(default)]
    pub admission_timeout_secs: Option<u64>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            admission_timeout_secs: None,
        }
    }
}

impl QueueConfig {
    /// Validate queue configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_concurrent == 0 {
            return Err("max_concurrent must be greater than 0".into());
        }
        if self.admission_timeout_secs == Some(0) {
            return Err("admission_timeout_secs must be greater than 0 when set".into());
        }
        Ok(())
    }

    /// Admission timeout as a `Duration`.
    #[must_use]
    pub fn admission_timeout(&self) -> Option<Duration> {
        self.admission_timeout_secs.map(Duration::from_secs)
    }
}

/// Root pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Map of queue name to configuration.
    pub queues: HashMap<String, QueueConfig>,
    /// Remove `"0"` sentinel fields from emitted tables.
    #[serde(default)]
    pub strip_zero_props: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            queues: HashMap::from([(DEFAULT_QUEUE.to_string(), QueueConfig::default())]),
            strip_zero_props: false,
        }
    }
}

impl PipelineConfig {
    /// Validate all queues and ensure at least one queue exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.queues.is_empty() {
            return Err("at least one queue must be defined".into());
        }
        for (name, queue) in &self.queues {
            queue
                .validate()
                .map_err(|e| format!("queue `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Final shaping step for a table about to be written. Strips `"0"`
    /// sentinel fields when [`strip_zero_props`](Self::strip_zero_props) is
    /// set and returns the table untouched otherwise.
    #[must_use]
    pub fn finish_table(&self, table: Value) -> Value {
        if self.strip_zero_props {
            strip_zero_props(table)
        } else {
            table
        }
    }

    /// Parse pipeline configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a single-queue configuration from the process environment,
    /// loading a `.env` file first if one exists.
    pub fn from_env() -> Result<Self, String> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a single-queue configuration from an arbitrary variable lookup.
    /// Unset variables fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut queue = QueueConfig::default();
        if let Some(raw) = lookup(ENV_MAX_CONCURRENT) {
            queue.max_concurrent = parse_var(ENV_MAX_CONCURRENT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ADMISSION_TIMEOUT_SECS) {
            queue.admission_timeout_secs = Some(parse_var(ENV_ADMISSION_TIMEOUT_SECS, &raw)?);
        }
        let strip_zero_props = match lookup(ENV_STRIP_ZERO_PROPS) {
            Some(raw) => parse_var(ENV_STRIP_ZERO_PROPS, &raw)?,
            None => false,
        };

        let cfg = Self {
            queues: HashMap::from([(DEFAULT_QUEUE.to_string(), queue)]),
            strip_zero_props,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| format!("{key}: invalid value `{raw}`: {e}"))
}
