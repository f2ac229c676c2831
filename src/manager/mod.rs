//! Fixed-priority worker manager.
//!
//! One long-lived task per priority bucket, each repeatedly walking its own
//! locked worker list: an init pass at startup, a run pass every poll
//! interval, and an end pass when the manager shuts down. Registration,
//! removal, and interval changes mutate the same lists under the same
//! per-bucket locks.

mod bucket;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::ManagerConfig;
use crate::error::ManagerError;
use crate::list::List;
use crate::worker::Worker;

use bucket::BucketTask;

/// Per-priority bucket state owned by the manager.
struct Bucket {
    /// Worker registrations, in insertion order. Shared with the bucket's
    /// task; every access goes through this lock.
    workers: Arc<Mutex<List<Arc<Worker>>>>,
    /// Sleep between run passes, in microseconds. Read by the task before
    /// each sleep, so updates apply from the next pass.
    interval_us: Arc<AtomicU64>,
    /// The bucket's task, present while the manager is running.
    handle: StdMutex<Option<JoinHandle<()>>>,
}

/// Start/shutdown progress of a manager. A manager is single-shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Running,
    Stopped,
}

/// Handle owning the per-priority buckets and their tasks.
///
/// Managers are explicit values, not process-wide state: tests and
/// applications can run several independently and tear each one down
/// deterministically with [`shutdown`](WorkerManager::shutdown).
///
/// Workers are held as `Arc` references; the manager never owns worker
/// lifetime and dropping a manager never runs worker handlers.
pub struct WorkerManager {
    buckets: Vec<Bucket>,
    running: Arc<AtomicBool>,
    phase: StdMutex<Phase>,
}

impl WorkerManager {
    /// Build a manager with one bucket per configured priority level.
    ///
    /// No tasks are spawned yet; workers may already be registered, and
    /// anything registered before [`start`](WorkerManager::start) is
    /// covered by its bucket's bootstrap init pass.
    pub fn new(config: ManagerConfig) -> Self {
        let interval_us = duration_to_us(config.poll_interval);
        let buckets = (0..config.priority_levels)
            .map(|_| Bucket {
                workers: Arc::new(Mutex::new(List::new())),
                interval_us: Arc::new(AtomicU64::new(interval_us)),
                handle: StdMutex::new(None),
            })
            .collect();

        Self {
            buckets,
            running: Arc::new(AtomicBool::new(false)),
            phase: StdMutex::new(Phase::Idle),
        }
    }

    /// Number of priority buckets.
    pub fn priority_levels(&self) -> usize {
        self.buckets.len()
    }

    /// Whether the manager is between `start` and `shutdown`.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Set the running flag and spawn one dedicated task per bucket.
    ///
    /// Each task makes a single init pass over its bucket's current
    /// registrations, then loops run passes at the bucket's poll interval.
    /// Fails with [`ManagerError::AlreadyStarted`] on a second call; a
    /// stopped manager cannot be restarted.
    pub fn start(&self) -> Result<(), ManagerError> {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        match *phase {
            Phase::Idle => {}
            Phase::Running => return Err(ManagerError::AlreadyStarted),
            Phase::Stopped => return Err(ManagerError::ShutDown),
        }

        self.running.store(true, Ordering::SeqCst);
        for (priority, bucket) in self.buckets.iter().enumerate() {
            let task = BucketTask {
                priority,
                workers: Arc::clone(&bucket.workers),
                interval_us: Arc::clone(&bucket.interval_us),
                running: Arc::clone(&self.running),
            };
            let handle = tokio::spawn(task.drive());
            *bucket.handle.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        }
        *phase = Phase::Running;

        info!(buckets = self.buckets.len(), "worker manager started");
        Ok(())
    }

    /// Append a worker at the tail of the given priority bucket.
    ///
    /// The worker joins that bucket's next run pass. If the bucket's task
    /// has already made its bootstrap pass, the worker's init handler is
    /// never invoked — only workers registered before `start` get init.
    pub async fn add_worker(
        &self,
        worker: Arc<Worker>,
        priority: usize,
    ) -> Result<(), ManagerError> {
        let bucket = self.bucket(priority)?;
        let mut workers = bucket.workers.lock().await;
        debug!(worker = worker.name(), priority, "worker registered");
        workers.push_back(worker);
        Ok(())
    }

    /// De-schedule a worker: scan buckets in ascending priority order and
    /// unlink the first registration that is pointer-identical to `worker`.
    ///
    /// Exactly one registration is removed; duplicates in the same bucket
    /// or registrations in later buckets stay. The worker's end handler
    /// does not run on this path.
    pub async fn remove_worker(&self, worker: &Arc<Worker>) -> Result<(), ManagerError> {
        for (priority, bucket) in self.buckets.iter().enumerate() {
            let mut workers = bucket.workers.lock().await;
            if let Some(removed) = workers.remove_first(|w| Arc::ptr_eq(w, worker)) {
                debug!(worker = removed.name(), priority, "worker removed");
                return Ok(());
            }
        }

        warn!(worker = worker.name(), "remove: worker not registered");
        Err(ManagerError::WorkerNotFound {
            name: worker.name().to_string(),
        })
    }

    /// Change a bucket's sleep between run passes.
    ///
    /// Takes effect on the bucket's next sleep; an in-progress sleep keeps
    /// its old duration.
    pub fn set_poll_interval(
        &self,
        priority: usize,
        interval: Duration,
    ) -> Result<(), ManagerError> {
        let bucket = self.bucket(priority)?;
        let interval_us = duration_to_us(interval);
        bucket.interval_us.store(interval_us, Ordering::Relaxed);
        debug!(priority, interval_us, "poll interval updated");
        Ok(())
    }

    /// The sleep currently configured for a bucket.
    pub fn poll_interval(&self, priority: usize) -> Result<Duration, ManagerError> {
        let bucket = self.bucket(priority)?;
        Ok(Duration::from_micros(
            bucket.interval_us.load(Ordering::Relaxed),
        ))
    }

    /// Number of workers currently registered at a priority.
    pub async fn worker_count(&self, priority: usize) -> Result<usize, ManagerError> {
        let bucket = self.bucket(priority)?;
        Ok(bucket.workers.lock().await.len())
    }

    /// Snapshot of a bucket's workers, in registration order.
    pub async fn workers(&self, priority: usize) -> Result<Vec<Arc<Worker>>, ManagerError> {
        let bucket = self.bucket(priority)?;
        Ok(bucket.workers.lock().await.iter().cloned().collect())
    }

    /// Stop every bucket task and discard all registrations.
    ///
    /// Clears the running flag — each bucket task leaves its run loop
    /// within at most one poll interval — then joins the tasks and empties
    /// the bucket lists. Each surviving worker's end handler has already
    /// run exactly once, in its bucket task's drain pass; nothing on this
    /// path invokes it again.
    pub async fn shutdown(&self) -> Result<(), ManagerError> {
        {
            let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
            match *phase {
                Phase::Running => *phase = Phase::Stopped,
                Phase::Idle => return Err(ManagerError::NotRunning),
                Phase::Stopped => return Err(ManagerError::ShutDown),
            }
        }

        self.running.store(false, Ordering::SeqCst);

        for (priority, bucket) in self.buckets.iter().enumerate() {
            let handle = bucket
                .handle
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take();
            if let Some(handle) = handle {
                if let Err(e) = handle.await {
                    warn!(priority, error = %e, "bucket task join failed");
                }
            }

            let mut workers = bucket.workers.lock().await;
            let drained = workers.len();
            workers.clear();
            if drained > 0 {
                debug!(priority, drained, "bucket registrations discarded");
            }
        }

        info!("worker manager stopped");
        Ok(())
    }

    fn bucket(&self, priority: usize) -> Result<&Bucket, ManagerError> {
        self.buckets.get(priority).ok_or_else(|| {
            warn!(
                priority,
                levels = self.buckets.len(),
                "priority out of range"
            );
            ManagerError::PriorityOutOfRange {
                priority,
                levels: self.buckets.len(),
            }
        })
    }
}

impl Default for WorkerManager {
    fn default() -> Self {
        Self::new(ManagerConfig::default())
    }
}

fn duration_to_us(interval: Duration) -> u64 {
    u64::try_from(interval.as_micros()).unwrap_or(u64::MAX)
}
