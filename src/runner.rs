//! Background task runner
//!
//! Units of work run on a tokio runtime, bounded by a semaphore sized to the
//! configured worker count. Each unit stores its result in a [`TaskSlot`] and
//! then emits exactly one [`Completion`] on an unbounded channel. The thread
//! that owns the session drains that channel and reads the slot, so results
//! never cross back to the UI thread through the notification itself.

use crate::error::{Error, Result};
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Semaphore, mpsc};

/// Which coordinator a unit of work belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskKind {
    /// Metadata + payload fetch
    Fetch,
    /// Save to disk
    Transfer,
}

/// Identifier assigned to each submitted unit of work
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Completion notification (carries no result)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    /// Task that finished
    pub id: TaskId,
    /// Coordinator it belongs to
    pub kind: TaskKind,
}

/// Shared slot a unit of work stores its result into
#[derive(Debug)]
pub struct TaskSlot<T> {
    inner: Arc<Mutex<Option<Result<T>>>>,
}

impl<T> Clone for TaskSlot<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for TaskSlot<T> {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> TaskSlot<T> {
    /// Store a result, replacing any unread one
    pub fn store(&self, result: Result<T>) {
        *self.inner.lock().unwrap_or_else(PoisonError::into_inner) = Some(result);
    }

    /// Take the stored result, leaving the slot empty
    pub fn take(&self) -> Option<Result<T>> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Receiving end of the completion channel, owned by the UI thread
pub type CompletionReceiver = mpsc::UnboundedReceiver<Completion>;

/// Runs units of work off the UI thread
#[derive(Debug)]
pub struct TaskRunner {
    handle: tokio::runtime::Handle,
    pool: Arc<Semaphore>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    next_id: AtomicU64,
}

impl TaskRunner {
    /// Create a runner on a runtime with `pool_size` concurrent workers
    pub fn new(handle: tokio::runtime::Handle, pool_size: usize) -> (Self, CompletionReceiver) {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let runner = Self {
            handle,
            pool: Arc::new(Semaphore::new(pool_size.max(1))),
            completion_tx,
            next_id: AtomicU64::new(1),
        };
        (runner, completion_rx)
    }

    /// Submit a unit of work
    ///
    /// The result (or a panic converted into [`Error::TaskPanicked`]) is
    /// stored in `slot`, then one completion is sent. If the receiver is gone
    /// the unit still runs to completion and the notification is dropped.
    pub fn submit<T, F>(&self, kind: TaskKind, slot: TaskSlot<T>, work: F) -> TaskId
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let pool = Arc::clone(&self.pool);
        let completion_tx = self.completion_tx.clone();

        tracing::debug!(task_id = id.0, kind = ?kind, "submitting unit of work");

        self.handle.spawn(async move {
            // The semaphore is never closed, so acquire only fails after a bug.
            let permit = pool.acquire_owned().await.ok();

            let result = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    tracing::error!(task_id = id.0, kind = ?kind, panic = %message, "unit of work panicked");
                    Err(Error::TaskPanicked(message))
                }
            };

            if let Err(e) = &result {
                tracing::warn!(task_id = id.0, kind = ?kind, error = %e, "unit of work failed");
            }
            slot.store(result);
            drop(permit);

            if completion_tx.send(Completion { id, kind }).is_err() {
                tracing::debug!(task_id = id.0, "session closed before completion was delivered");
            }
        });

        id
    }

    /// Number of workers currently idle
    pub fn idle_workers(&self) -> usize {
        self.pool.available_permits()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
