// Bounded worker pool with a stop-and-drain barrier

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Fixed-capacity executor for independent units of work.
///
/// Sized once per execution; units are spawned eagerly but gated by a
/// semaphore so at most `capacity` run at a time. `drain` consumes the pool
/// (no further submissions) and blocks until every submitted unit finishes.
/// No priority, no preemption, no per-unit timeout.
pub struct WorkerPool {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> Self {
        WorkerPool {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            handles: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Submit a unit of work. Never blocks the caller; the unit waits for a
    /// permit inside its own task.
    pub fn submit<F>(&mut self, unit: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        debug_assert!(self.capacity > 0, "submit on a zero-capacity pool");
        let semaphore = self.semaphore.clone();
        self.handles.push(tokio::spawn(async move {
            // The semaphore outlives every unit and is never closed.
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("pool semaphore closed");
            unit.await;
        }));
    }

    /// Stop accepting work and wait for every submitted unit to finish.
    /// Returns the number of units that panicked instead of completing.
    pub async fn drain(self) -> usize {
        let mut panicked = 0;
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "worker unit failed");
                panicked += 1;
            }
        }
        panicked
    }
}
