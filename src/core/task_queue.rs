//! Bounded-concurrency task queue with FIFO admission.
//!
//! A [`TaskQueue`] runs at most `limit` units of async work at once. Callers
//! that arrive while every slot is taken park in a FIFO line and are admitted
//! one by one as running work completes. A completed unit hands its slot
//! directly to the head of the line, so a fresh submission can never overtake
//! a caller that is already waiting.
//!
//! The queue is a pure scheduling layer: it never inspects, wraps, or logs the
//! output of the work it admits.
//!
//! ```rust,ignore
//! use konofan_pipeline::core::TaskQueue;
//!
//! let queue = TaskQueue::new(25)?;
//! let body = queue.submit(|| fetch_table("equip_weapon")).await?;
//! ```

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::core::QueueError;

/// A parked caller waiting for admission.
#[derive(Debug)]
struct Waiter {
    ticket: u64,
    wake: oneshot::Sender<()>,
}

/// Shared admission state, only ever touched under the queue mutex.
#[derive(Debug, Default)]
struct QueueState {
    /// Slots currently held by running work (or granted to a woken waiter).
    active: usize,
    /// Monotonic ticket counter used to find a waiter again on cancellation.
    next_ticket: u64,
    /// Parked callers in arrival order.
    waiters: VecDeque<Waiter>,
}

impl QueueState {
    /// Give up one slot. If anyone is waiting the slot moves straight to the
    /// head waiter and `active` is left unchanged.
    fn release(&mut self) {
        while let Some(waiter) = self.waiters.pop_front() {
            if waiter.wake.send(()).is_ok() {
                debug!(
                    ticket = waiter.ticket,
                    waiting = self.waiters.len(),
                    "slot handed to waiter"
                );
                return;
            }
        }
        self.active = self.active.saturating_sub(1);
        debug!(active = self.active, "slot released");
    }
}

/// Point-in-time view of a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    /// Maximum concurrently running units.
    pub limit: usize,
    /// Units currently running.
    pub active: usize,
    /// Callers waiting for admission.
    pub waiting: usize,
}

/// Bounded-concurrency FIFO task queue.
///
/// Cloning is cheap; clones share the same slots and waiting line.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    limit: usize,
    admission_timeout: Option<Duration>,
    state: Arc<Mutex<QueueState>>,
}

impl TaskQueue {
    /// Create a queue that runs at most `limit` units concurrently.
    ///
    /// A zero limit would park every submission forever, so it is rejected.
    pub fn new(limit: usize) -> Result<Self, QueueError> {
        Self::with_admission_timeout(limit, None)
    }

    /// Create a queue whose [`submit_configured`](Self::submit_configured)
    /// callers give up after `admission_timeout` when it is set.
    pub fn with_admission_timeout(
        limit: usize,
        admission_timeout: Option<Duration>,
    ) -> Result<Self, QueueError> {
        if limit == 0 {
            return Err(QueueError::InvalidLimit(limit));
        }
        if admission_timeout == Some(Duration::ZERO) {
            return Err(QueueError::InvalidConfig(
                "admission timeout must be greater than 0".into(),
            ));
        }
        Ok(Self {
            limit,
            admission_timeout,
            state: Arc::new(Mutex::new(QueueState::default())),
        })
    }

    /// Maximum number of concurrently running units.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Admission deadline applied by the `*_configured` methods.
    #[must_use]
    pub const fn admission_timeout(&self) -> Option<Duration> {
        self.admission_timeout
    }

    /// Units currently running.
    #[must_use]
    pub fn active(&self) -> usize {
        self.state.lock().active
    }

    /// Callers currently waiting for admission.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().waiters.len()
    }

    /// Consistent snapshot of the queue counters.
    #[must_use]
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            limit: self.limit,
            active: state.active,
            waiting: state.waiters.len(),
        }
    }

    /// Wait for a slot and return a guard that holds it.
    ///
    /// The slot is released when the [`Permit`] is dropped. Dropping this
    /// future before it resolves withdraws the caller from the line without
    /// disturbing the order of the other waiters.
    pub async fn acquire(&self) -> Permit {
        loop {
            let mut pending = {
                let mut state = self.state.lock();
                if state.active < self.limit && state.waiters.is_empty() {
                    state.active += 1;
                    debug!(active = state.active, limit = self.limit, "admitted immediately");
                    return Permit {
                        state: Arc::clone(&self.state),
                    };
                }
                let ticket = state.next_ticket;
                state.next_ticket += 1;
                let (wake, admitted) = oneshot::channel();
                state.waiters.push_back(Waiter { ticket, wake });
                debug!(ticket, waiting = state.waiters.len(), "queued for admission");
                PendingAdmission {
                    state: Arc::clone(&self.state),
                    ticket,
                    admitted,
                    granted: false,
                }
            };

            if pending.wait().await {
                return Permit {
                    state: Arc::clone(&self.state),
                };
            }
            warn!(ticket = pending.ticket, "admission signal lost, re-queueing");
        }
    }

    /// Like [`acquire`](Self::acquire), but gives up after `wait`.
    pub async fn acquire_timeout(&self, wait: Duration) -> Result<Permit, QueueError> {
        tokio::time::timeout(wait, self.acquire()).await.map_err(|_| {
            warn!(?wait, "admission timed out");
            QueueError::AdmissionTimeout(wait)
        })
    }

    /// Run `task` once a slot is free and return exactly what it produced.
    ///
    /// The slot is released however the task ends: with a value, with an
    /// error value, by panicking, or by the caller dropping this future.
    pub async fn submit<F, Fut, T>(&self, task: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire().await;
        task().await
    }

    /// Run `task` if it is admitted within `wait`.
    ///
    /// The deadline only bounds admission. Once running, the task always
    /// runs to completion.
    pub async fn submit_timeout<F, Fut, T>(&self, wait: Duration, task: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire_timeout(wait).await?;
        Ok(task().await)
    }

    /// Acquire using the queue's own admission timeout, waiting without a
    /// deadline when none was configured.
    pub async fn acquire_configured(&self) -> Result<Permit, QueueError> {
        match self.admission_timeout {
            Some(wait) => self.acquire_timeout(wait).await,
            None => Ok(self.acquire().await),
        }
    }

    /// Run `task` under the queue's own admission timeout.
    pub async fn submit_configured<F, Fut, T>(&self, task: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let _permit = self.acquire_configured().await?;
        Ok(task().await)
    }
}

/// A slot held in a [`TaskQueue`]. Dropping it releases the slot.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct Permit {
    state: Arc<Mutex<QueueState>>,
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.state.lock().release();
    }
}

/// A caller parked in the waiting line.
struct PendingAdmission {
    state: Arc<Mutex<QueueState>>,
    ticket: u64,
    admitted: oneshot::Receiver<()>,
    granted: bool,
}

impl PendingAdmission {
    /// Returns `true` once a slot has been handed over.
    async fn wait(&mut self) -> bool {
        self.granted = (&mut self.admitted).await.is_ok();
        self.granted
    }
}

impl Drop for PendingAdmission {
    fn drop(&mut self) {
        if self.granted {
            return;
        }
        let mut state = self.state.lock();
        if let Some(pos) = state.waiters.iter().position(|w| w.ticket == self.ticket) {
            state.waiters.remove(pos);
            debug!(ticket = self.ticket, "waiter withdrawn");
        } else if self.admitted.try_recv().is_ok() {
            // Granted after the caller stopped listening: pass the slot on.
            state.release();
        }
    }
}
