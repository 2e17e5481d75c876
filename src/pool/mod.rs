//! A fixed pool of worker threads sorting one sequence at a time through a shared job queue.
//!
//! The caller seeds the queue with a single job covering the whole sequence. Workers claim jobs, run
//! [`process_range`] on them without holding the lock, and hand back up to two follow-up jobs. The sort
//! is done when the queue is empty and no worker is mid-job. Both facts are only ever read together,
//! under the one lock that guards them.
//!
//! The sequence itself is not locked: the ranges of all claimed jobs are pairwise disjoint, since a job
//! is only ever split into the two sides of its pivot.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread::{self, JoinHandle},
};

use log::{debug, error, trace};
use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::{
    par::cached_available_parallelism,
    partition::{process_range, SEQUENTIAL_THRESHOLD},
    sequence::ensure_sorted,
    SortError,
};

pub mod queue;
pub(crate) mod shared;

use queue::{Job, QueueState};
use shared::SharedSlice;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PoolConfig {
    /// Number of worker threads, at least one.
    pub threads: usize,
    /// Ranges shorter than this are sorted directly instead of being partitioned.
    pub sequential_threshold: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: cached_available_parallelism(),
            sequential_threshold: SEQUENTIAL_THRESHOLD,
        }
    }
}

impl PoolConfig {
    pub fn validate(&self) -> Result<(), SortError> {
        if self.threads == 0 {
            return Err(SortError::Configuration {
                threads: self.threads,
            });
        }
        Ok(())
    }
}

struct Shared<T> {
    state: Mutex<QueueState<T>>,
    /// Signalled when a job is queued or the pool is stopping.
    work_available: Condvar,
    /// Signalled when the queue is empty and no worker is active.
    finished: Condvar,
}

/// Quicksort running on a fixed set of worker threads.
///
/// Workers are spawned once in [`QuicksortPool::with_config`] and reused by every [`QuicksortPool::sort`]
/// call until the pool is shut down or dropped.
pub struct QuicksortPool<T: Ord + Send + 'static> {
    shared: Arc<Shared<T>>,
    workers: Vec<JoinHandle<()>>,
    config: PoolConfig,
}

impl<T: Ord + Send + 'static> QuicksortPool<T> {
    /// Pool with `threads` workers and the default sequential threshold.
    pub fn new(threads: usize) -> Result<Self, SortError> {
        Self::with_config(PoolConfig {
            threads,
            ..Default::default()
        })
    }

    pub fn with_config(config: PoolConfig) -> Result<Self, SortError> {
        config.validate()?;

        let mut pool = Self {
            shared: Arc::new(Shared {
                state: Mutex::new(QueueState::new()),
                work_available: Condvar::new(),
                finished: Condvar::new(),
            }),
            workers: Vec::with_capacity(config.threads),
            config,
        };

        for id in 0..config.threads {
            let shared = Arc::clone(&pool.shared);
            let threshold = config.sequential_threshold;
            // If this fails, dropping `pool` stops the workers spawned so far
            let handle = thread::Builder::new()
                .name(format!("quicksort-worker-{id}"))
                .spawn(move || worker_loop(id, &shared, threshold))?;
            pool.workers.push(handle);
        }

        debug!(
            "spawned {} quicksort workers, sequential threshold {}",
            config.threads, config.sequential_threshold
        );
        Ok(pool)
    }

    #[inline(always)]
    pub fn threads(&self) -> usize {
        self.config.threads
    }

    /// Sorts `data` in place, blocking until every worker is done with it.
    ///
    /// The order of equal elements is not preserved.
    ///
    /// # Errors
    /// [`SortError::WorkerPanicked`] if comparing elements panicked in a worker, in which case `data` holds the
    /// same elements in an unspecified order. [`SortError::InvariantViolation`] if the result is not sorted.
    pub fn sort(&mut self, data: &mut [T]) -> Result<(), SortError> {
        crate::scope_print_major!("QuicksortPool::sort");
        if data.len() < 2 {
            return Ok(());
        }

        let len = data.len();
        debug!("sorting {len} elements on {} workers", self.threads());

        let failed = {
            let mut state = self.shared.state.lock();
            state.seed(SharedSlice::new(data), Job::new(0, len));
            self.shared.work_available.notify_one();

            while !state.is_complete() {
                self.shared.finished.wait(&mut state);
            }
            state.release()
        };

        if failed {
            return Err(SortError::WorkerPanicked);
        }

        ensure_sorted(data)?;
        debug!("sorted {len} elements");
        Ok(())
    }

    /// Stops and joins every worker. Dropping the pool does the same.
    pub fn shutdown(mut self) {
        self.stop_workers();
    }

    fn stop_workers(&mut self) {
        if self.workers.is_empty() {
            return;
        }

        self.shared.state.lock().request_stop();
        self.shared.work_available.notify_all();

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("quicksort worker exited with a panic");
            }
        }
        debug!("quicksort workers stopped");
    }
}

impl<T: Ord + Send + 'static> Drop for QuicksortPool<T> {
    fn drop(&mut self) {
        self.stop_workers();
    }
}

fn worker_loop<T: Ord + Send>(id: usize, shared: &Shared<T>, threshold: usize) {
    let mut state = shared.state.lock();
    loop {
        while !state.has_work() && !state.is_stopping() {
            shared.work_available.wait(&mut state);
        }

        if state.should_exit() {
            break;
        }

        debug_assert!(state.has_buffer(), "jobs queued without a sequence installed");
        let Some((job, buffer)) = state.claim() else {
            continue;
        };
        trace!(
            "worker {id} claimed {job:?} of {}, {} queued, {} active",
            buffer.len(),
            state.queued(),
            state.active()
        );

        // Partition without holding the lock
        let outcome = MutexGuard::unlocked(&mut state, || {
            crate::scope!("process_range");
            // SAFETY: `job` was just claimed, so no other worker holds an overlapping range, and the sort call
            // that installed `buffer` waits for this job to be finished before returning.
            let data = unsafe { buffer.range_mut(job) };
            panic::catch_unwind(AssertUnwindSafe(|| process_range(data, job.start, threshold)))
        });

        let finish = match outcome {
            Ok(split) => state.finish(job, split.children(job)),
            Err(_) => {
                error!("worker {id} panicked while processing {job:?}");
                state.mark_failed();
                state.finish(job, [])
            }
        };

        for _ in 0..finish.published {
            shared.work_available.notify_one();
        }
        if finish.complete {
            shared.finished.notify_all();
        }
    }
    trace!("worker {id} exiting");
}
