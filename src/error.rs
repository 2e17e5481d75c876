use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortError {
    /// Rejected at construction, before any sort runs.
    #[error("a sorting pool needs at least one worker thread, got {threads}")]
    Configuration { threads: usize },

    /// The sequence came back unsorted. Always a bug in the partitioning or scheduling code.
    #[error("internal invariant violated: sequence of length {len} is not sorted after all jobs drained")]
    InvariantViolation { len: usize },

    /// The element comparison panicked inside a worker. The sequence still holds the same elements.
    #[error("a worker panicked while processing a job")]
    WorkerPanicked,

    #[error("failed to build rayon thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn worker thread")]
    Spawn(#[from] std::io::Error),
}

impl SortError {
    /// True when the error can only come from a defect in this crate, not from its inputs.
    pub fn is_engine_bug(&self) -> bool {
        matches!(self, SortError::InvariantViolation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invariant_violation_is_an_engine_bug() {
        assert!(SortError::InvariantViolation { len: 3 }.is_engine_bug());
        assert!(!SortError::Configuration { threads: 0 }.is_engine_bug());
        assert!(!SortError::WorkerPanicked.is_engine_bug());
    }

    #[test]
    fn configuration_message_names_thread_count() {
        let err = SortError::Configuration { threads: 0 };
        assert_eq!(
            err.to_string(),
            "a sorting pool needs at least one worker thread, got 0"
        );
    }
}
