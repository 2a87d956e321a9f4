//! Dispatch context that marshals work onto the owner thread.
//!
//! Components that receive callbacks from other threads post closures through
//! a `Dispatcher`; the thread that owns the view-models drains the matching
//! `DispatchQueue`, so view-model state is only ever touched from one place.

use std::fmt::{Debug, Formatter, Result as FmtResult};

use {
    async_channel::{Receiver, Sender, unbounded},
    tracing::debug,
};

/// A unit of work scheduled onto the owner thread.
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Cloneable handle used to post work onto the owner thread.
#[derive(Clone)]
pub struct Dispatcher {
    /// Sender side of the job queue.
    tx: Sender<Job>,
}

/// Owner-thread side of the dispatch context.
pub struct DispatchQueue {
    /// Receiver side of the job queue.
    rx: Receiver<Job>,
}

/// Creates a connected dispatcher and queue.
///
/// # Returns
///
/// A `(Dispatcher, DispatchQueue)` pair sharing one unbounded job queue.
#[must_use]
pub fn dispatch_channel() -> (Dispatcher, DispatchQueue) {
    let (tx, rx) = unbounded();
    (Dispatcher { tx }, DispatchQueue { rx })
}

impl Dispatcher {
    /// Posts a job to run on the owner thread.
    ///
    /// # Arguments
    ///
    /// * `job` - Closure to run when the queue is drained.
    ///
    /// # Returns
    ///
    /// `false` if the queue has been dropped and the job was discarded.
    pub fn post<F>(&self, job: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        match self.tx.try_send(Box::new(job)) {
            Ok(()) => true,
            Err(e) => {
                debug!("Dispatcher: discarding job, queue is gone: {e}");
                false
            }
        }
    }
}

impl DispatchQueue {
    /// Runs every job currently queued without waiting for more.
    ///
    /// # Returns
    ///
    /// The number of jobs that ran.
    pub fn run_pending(&self) -> usize {
        let mut count = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            count += 1;
        }
        count
    }

    /// Runs jobs as they arrive until every `Dispatcher` has been dropped.
    pub async fn run(&self) {
        while let Ok(job) = self.rx.recv().await {
            job();
        }
        debug!("DispatchQueue: all dispatchers dropped, stopping");
    }

    /// Number of jobs waiting to run.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether no jobs are waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Debug for Dispatcher {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Dispatcher")
            .field("pending", &self.tx.len())
            .finish()
    }
}

impl Debug for DispatchQueue {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DispatchQueue")
            .field("pending", &self.rx.len())
            .finish()
    }
}
