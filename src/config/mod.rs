//! Configuration models for queues and the pipeline.

pub mod queue;

pub use queue::{PipelineConfig, QueueConfig, DEFAULT_MAX_CONCURRENT, DEFAULT_QUEUE};
