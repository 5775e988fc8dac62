//! Core scheduling: the bounded task queue and batch aggregation.

pub mod error;
pub mod settle;
pub mod task_queue;

pub use error::{AppResult, QueueError, TranslationError};
pub use settle::{settle_all, Settled};
pub use task_queue::{Permit, QueueStats, TaskQueue};
