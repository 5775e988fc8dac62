//! Builders to construct pipeline components from configuration.

pub mod queue_builder;

pub use queue_builder::{build_queue, build_queues};
