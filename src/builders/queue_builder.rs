//! Builders to construct task queues from configuration.

use std::collections::HashMap;

use crate::config::{PipelineConfig, QueueConfig};
use crate::core::{QueueError, TaskQueue};

/// Build one queue from its configuration.
pub fn build_queue(cfg: &QueueConfig) -> Result<TaskQueue, QueueError> {
    cfg.validate().map_err(QueueError::InvalidConfig)?;
    TaskQueue::with_admission_timeout(cfg.max_concurrent, cfg.admission_timeout())
}

/// Build every configured queue, keyed by name.
pub fn build_queues(cfg: &PipelineConfig) -> Result<HashMap<String, TaskQueue>, QueueError> {
    cfg.validate()
        .map_err(|e| QueueError::InvalidConfig(format!("config invalid: {e}")))?;

    let mut queues = HashMap::with_capacity(cfg.queues.len());
    for (name, queue_cfg) in &cfg.queues {
        let queue = build_queue(queue_cfg)?;
        tracing::debug!(
            "built queue `{}` (limit {}, admission timeout {:?})",
            name,
            queue.limit(),
            queue.admission_timeout()
        );
        queues.insert(name.clone(), queue);
    }
    Ok(queues)
}
