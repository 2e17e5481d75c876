use std::collections::VecDeque;

use crate::pool::shared::SharedSlice;

/// Half-open range `[start, end)` of the sequence still to be processed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Job {
    pub start: usize,
    pub end: usize,
}

impl Job {
    #[inline(always)]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &Job) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// What a worker has to signal after handing a job back.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct Finish {
    /// Follow-up jobs that were queued.
    pub published: usize,
    /// Queue empty and no worker mid-job.
    pub complete: bool,
}

/// Everything guarded by the pool lock. Never touched without holding it.
pub(crate) struct QueueState<T> {
    jobs: VecDeque<Job>,
    active: usize,
    stop: bool,
    failed: bool,
    buffer: Option<SharedSlice<T>>,
    // Ranges of the jobs currently being processed, pairwise disjoint
    #[cfg(debug_assertions)]
    claimed: Vec<Job>,
}

impl<T> QueueState<T> {
    pub fn new() -> Self {
        Self {
            jobs: VecDeque::new(),
            active: 0,
            stop: false,
            failed: false,
            buffer: None,
            #[cfg(debug_assertions)]
            claimed: Vec::new(),
        }
    }

    /// Installs the sequence of a new sort call together with its root job.
    pub fn seed(&mut self, buffer: SharedSlice<T>, job: Job) {
        debug_assert!(self.is_complete() && self.buffer.is_none());
        self.buffer = Some(buffer);
        self.failed = false;
        self.push(job);
    }

    fn push(&mut self, job: Job) -> bool {
        if job.len() < 2 {
            return false;
        }
        self.jobs.push_back(job);
        true
    }

    /// Takes the oldest job and counts the caller as active.
    pub fn claim(&mut self) -> Option<(Job, SharedSlice<T>)> {
        let buffer = self.buffer?;
        let job = self.jobs.pop_front()?;
        #[cfg(debug_assertions)]
        {
            assert!(
                self.claimed.iter().all(|other| !other.overlaps(&job)),
                "{job:?} overlaps an active job: {:?}",
                self.claimed
            );
            self.claimed.push(job);
        }
        self.active += 1;
        Some((job, buffer))
    }

    /// Hands `job` back, queueing its follow-up jobs in the same step.
    pub fn finish(&mut self, job: Job, children: impl IntoIterator<Item = Job>) -> Finish {
        debug_assert!(self.active > 0);
        #[cfg(debug_assertions)]
        if let Some(index) = self.claimed.iter().position(|claimed| *claimed == job) {
            self.claimed.swap_remove(index);
        }

        let mut published = 0;
        for child in children {
            debug_assert!(job.start <= child.start && child.end <= job.end);
            if self.push(child) {
                published += 1;
            }
        }
        self.active -= 1;

        Finish {
            published,
            complete: self.is_complete(),
        }
    }

    /// Detaches the sequence once the sort call is complete. Returns whether a worker panicked.
    pub fn release(&mut self) -> bool {
        debug_assert!(self.is_complete());
        self.buffer = None;
        std::mem::take(&mut self.failed)
    }

    pub fn mark_failed(&mut self) {
        self.failed = true;
    }

    pub fn request_stop(&mut self) {
        self.stop = true;
    }

    #[inline(always)]
    pub fn has_work(&self) -> bool {
        !self.jobs.is_empty()
    }

    /// A sequence is installed. Queued jobs always imply one.
    #[inline(always)]
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    #[inline(always)]
    pub fn is_stopping(&self) -> bool {
        self.stop
    }

    #[inline(always)]
    pub fn is_complete(&self) -> bool {
        self.jobs.is_empty() && self.active == 0
    }

    #[inline(always)]
    pub fn should_exit(&self) -> bool {
        self.stop && self.jobs.is_empty()
    }

    #[inline(always)]
    pub fn active(&self) -> usize {
        self.active
    }

    #[inline(always)]
    pub fn queued(&self) -> usize {
        self.jobs.len()
    }
}
