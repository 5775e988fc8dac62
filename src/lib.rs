//! # KonoFan Pipeline
//!
//! Scheduling and data-shaping building blocks for the KonoFan static-data
//! build: the job that pulls game master-data tables, wiki metadata and asset
//! repository listings, joins them, and writes the JSON documents the
//! companion site serves.
//!
//! ## Core Problem Solved
//!
//! The build fans out to dozens of remote tables and thousands of directory
//! listings. Firing all of those requests at once trips rate limits, so every
//! fetch goes through a [`TaskQueue`](crate::core::TaskQueue) that caps concurrency:
//!
//! - **Bounded**: at most `limit` tasks run at once
//! - **FIFO**: tasks that had to wait are admitted in arrival order, and a new
//!   submission never overtakes a waiting one
//! - **Leak-free**: a slot is released however its task ends, including errors,
//!   panics and dropped futures
//! - **Transparent**: a task's output, error values included, comes back to its
//!   caller unchanged
//!
//! ## Example
//!
//! ```rust,ignore
//! use konofan_pipeline::core::{settle_all, TaskQueue};
//!
//! let queue = TaskQueue::new(24)?;
//! let settled = settle_all(&queue, tables.iter().map(|name| move || fetch_table(name))).await;
//! for (index, err) in &settled.failed {
//!     tracing::error!("{} failed: {}", tables[*index], err);
//! }
//! ```
//!
//! ## Data utilities
//!
//! The per-route transforms share three helpers, found in [`transform`]:
//! sentinel-field removal, a build-once translation table, and keyed
//! reconciliation of partial records from different sources.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Bounded task queue, batch aggregation and error types.
pub mod core;
/// Configuration models for queues and the pipeline.
pub mod config;
/// Builders to construct queues from configuration.
pub mod builders;
/// Shared data transforms.
pub mod transform;
/// Shared utilities.
pub mod util;
