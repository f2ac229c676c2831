//! Per-bucket execution task.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use crate::list::List;
use crate::worker::Worker;

/// Everything a bucket task needs, handed over when the manager starts.
///
/// Mirrors the manager's per-bucket state: the shared worker list and its
/// lock, the interval cell, and the manager-wide running flag.
pub(crate) struct BucketTask {
    pub(crate) priority: usize,
    pub(crate) workers: Arc<Mutex<List<Arc<Worker>>>>,
    pub(crate) interval_us: Arc<AtomicU64>,
    pub(crate) running: Arc<AtomicBool>,
}

impl BucketTask {
    /// Bucket lifecycle: one bootstrap init pass, the run loop, then a
    /// drain pass once the running flag clears.
    pub(crate) async fn drive(self) {
        // Bootstrap: init whatever is registered at this moment. Workers
        // added after this pass never receive an init call.
        if self.running.load(Ordering::SeqCst) {
            let workers = self.workers.lock().await;
            for worker in workers.iter() {
                worker.init().await;
            }
            debug!(
                priority = self.priority,
                workers = workers.len(),
                "bootstrap pass complete"
            );
        }

        while self.running.load(Ordering::SeqCst) {
            {
                let workers = self.workers.lock().await;
                for worker in workers.iter() {
                    worker.run().await;
                }
            }
            // The flag is only rechecked after a full sleep: reaction
            // latency to shutdown is bounded by the current interval.
            let interval = Duration::from_micros(self.interval_us.load(Ordering::Relaxed));
            tokio::time::sleep(interval).await;
        }

        // Drain: each surviving worker's end handler runs here, exactly
        // once. Shutdown only clears the list afterwards.
        let workers = self.workers.lock().await;
        for worker in workers.iter() {
            worker.end().await;
        }
        debug!(
            priority = self.priority,
            workers = workers.len(),
            "bucket drained"
        );
    }
}
