//! Worker entity: a named unit with optional init/run/end lifecycle slots.
//!
//! A worker carries up to three async handlers, one per lifecycle phase.
//! Any slot may be absent, in which case dispatching that phase is a silent
//! no-op. The worker itself holds no execution state machine — the manager
//! decides when each phase fires.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Maximum worker name length in characters; longer names are truncated.
pub const WORKER_NAME_MAX_LEN: usize = 64;

/// Boxed async handler for one lifecycle slot.
///
/// Each invocation produces a fresh future; captured context lives in the
/// closure itself.
pub type LifecycleHandler = Box<dyn Fn() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Execution status of a worker.
///
/// Reserved field: nothing in the scheduler currently reads or writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerStatus {
    /// Worker is not being scheduled.
    Idle,
    /// Worker is registered and being scheduled.
    Active,
}

/// A named unit of work with optional init/run/end handlers.
///
/// Build one with [`Worker::builder`]; register it with a manager at a
/// priority level. The manager only ever borrows workers through `Arc`,
/// so a worker outlives its registrations by construction.
pub struct Worker {
    name: String,
    status: WorkerStatus,
    init: Option<LifecycleHandler>,
    run: Option<LifecycleHandler>,
    end: Option<LifecycleHandler>,
}

impl Worker {
    /// Start building a worker with the given name.
    ///
    /// Names longer than [`WORKER_NAME_MAX_LEN`] characters are truncated
    /// on a character boundary.
    pub fn builder(name: impl Into<String>) -> WorkerBuilder {
        WorkerBuilder {
            name: truncate_name(name.into()),
            init: None,
            run: None,
            end: None,
        }
    }

    /// The worker's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The worker's status (reserved, currently always [`WorkerStatus::Idle`]).
    pub fn status(&self) -> WorkerStatus {
        self.status
    }

    /// Invoke the init handler, if one is set.
    pub async fn init(&self) {
        if let Some(handler) = &self.init {
            handler().await;
        }
    }

    /// Invoke the run handler, if one is set.
    pub async fn run(&self) {
        if let Some(handler) = &self.run {
            handler().await;
        }
    }

    /// Invoke the end handler, if one is set.
    pub async fn end(&self) {
        if let Some(handler) = &self.end {
            handler().await;
        }
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("init", &self.init.is_some())
            .field("run", &self.run.is_some())
            .field("end", &self.end.is_some())
            .finish()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        tracing::debug!(worker = %self.name, "worker dropped");
    }
}

/// Fluent builder for a [`Worker`].
///
/// ```
/// use workman::worker::Worker;
///
/// let worker = Worker::builder("heartbeat")
///     .on_run(|| async {
///         // periodic work goes here
///     })
///     .build();
/// assert_eq!(worker.name(), "heartbeat");
/// ```
pub struct WorkerBuilder {
    name: String,
    init: Option<LifecycleHandler>,
    run: Option<LifecycleHandler>,
    end: Option<LifecycleHandler>,
}

impl WorkerBuilder {
    /// Set the handler invoked once during the bucket's bootstrap pass.
    pub fn on_init<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.init = Some(Box::new(move || Box::pin(handler())));
        self
    }

    /// Set the handler invoked on every run pass.
    pub fn on_run<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.run = Some(Box::new(move || Box::pin(handler())));
        self
    }

    /// Set the handler invoked once during the bucket's drain pass.
    pub fn on_end<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.end = Some(Box::new(move || Box::pin(handler())));
        self
    }

    /// Finish building the worker.
    pub fn build(self) -> Worker {
        Worker {
            name: self.name,
            status: WorkerStatus::Idle,
            init: self.init,
            run: self.run,
            end: self.end,
        }
    }
}

fn truncate_name(name: String) -> String {
    if name.chars().count() <= WORKER_NAME_MAX_LEN {
        return name;
    }
    name.chars().take(WORKER_NAME_MAX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn long_names_are_truncated() {
        let worker = Worker::builder("x".repeat(200)).build();
        assert_eq!(worker.name().chars().count(), WORKER_NAME_MAX_LEN);

        let worker = Worker::builder("short").build();
        assert_eq!(worker.name(), "short");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let name: String = "é".repeat(100);
        let worker = Worker::builder(name).build();
        assert_eq!(worker.name().chars().count(), WORKER_NAME_MAX_LEN);
        assert!(worker.name().chars().all(|c| c == 'é'));
    }

    #[tokio::test]
    async fn absent_handlers_are_noops() {
        let worker = Worker::builder("bare").build();
        worker.init().await;
        worker.run().await;
        worker.end().await;
    }

    #[tokio::test]
    async fn each_slot_dispatches_independently() {
        let inits = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));
        let ends = Arc::new(AtomicUsize::new(0));

        let worker = Worker::builder("counted")
            .on_init({
                let inits = Arc::clone(&inits);
                move || {
                    let inits = Arc::clone(&inits);
                    async move {
                        inits.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
            .on_run({
                let runs = Arc::clone(&runs);
                move || {
                    let runs = Arc::clone(&runs);
                    async move {
                        runs.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
            .on_end({
                let ends = Arc::clone(&ends);
                move || {
                    let ends = Arc::clone(&ends);
                    async move {
                        ends.fetch_add(1, Ordering::SeqCst);
                    }
                }
            })
            .build();

        worker.init().await;
        worker.run().await;
        worker.run().await;
        worker.end().await;

        assert_eq!(inits.load(Ordering::SeqCst), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(ends.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn new_workers_start_idle() {
        let worker = Worker::builder("idle").build();
        assert_eq!(worker.status(), WorkerStatus::Idle);
    }
}
