//! Fan-out/fan-in helper: run a batch through a [`TaskQueue`] and collect
//! successes and failures separately.

use std::future::Future;

use futures::future::join_all;
use tracing::info;

use crate::core::TaskQueue;

/// Outcome of a settled batch. Each entry keeps the index of the task in the
/// submitted batch, and both lists are ordered by that index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settled<T, E> {
    /// Tasks that produced `Ok`.
    pub succeeded: Vec<(usize, T)>,
    /// Tasks that produced `Err`.
    pub failed: Vec<(usize, E)>,
}

impl<T, E> Settled<T, E> {
    /// Number of settled tasks.
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    /// True when no task failed.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Drop the indices and keep only the success values.
    #[must_use]
    pub fn into_values(self) -> Vec<T> {
        self.succeeded.into_iter().map(|(_, value)| value).collect()
    }
}

impl<T, E> Default for Settled<T, E> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Submit every task through `queue`, wait for all of them, and split the
/// outcomes. A failure never cancels its siblings.
pub async fn settle_all<I, F, Fut, T, E>(queue: &TaskQueue, tasks: I) -> Settled<T, E>
where
    I: IntoIterator<Item = F>,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let outcomes = join_all(tasks.into_iter().map(|task| queue.submit(task))).await;

    let mut settled = Settled::default();
    for (index, outcome) in outcomes.into_iter().enumerate() {
        match outcome {
            Ok(value) => settled.succeeded.push((index, value)),
            Err(err) => settled.failed.push((index, err)),
        }
    }
    info!(
        succeeded = settled.succeeded.len(),
        failed = settled.failed.len(),
        "batch settled"
    );
    settled
}
