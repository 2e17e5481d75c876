//! Input generation, validation and the fallback sort used on small ranges.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::SortError;

/// Reproducible sequence of `size` integers for a given `seed`.
pub fn generate_sequence(size: usize, seed: u64) -> Vec<i32> {
    crate::scope!("generate_sequence");
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.random()).collect()
}

/// True if every adjacent pair is non-decreasing.
#[inline]
pub fn is_sorted<T: Ord>(data: &[T]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

#[inline]
pub fn fallback_sort<T: Ord>(data: &mut [T]) {
    data.sort_unstable();
}

/// Post-sort check shared by every scheduler.
pub(crate) fn ensure_sorted<T: Ord>(data: &[T]) -> Result<(), SortError> {
    crate::scope!("ensure_sorted");
    if is_sorted(data) {
        Ok(())
    } else {
        log::error!("sequence of length {} is not sorted", data.len());
        Err(SortError::InvariantViolation { len: data.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_sequence_is_reproducible() {
        let a = generate_sequence(1000, 42);
        let b = generate_sequence(1000, 42);
        let c = generate_sequence(1000, 43);
        assert_eq!(a.len(), 1000);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(generate_sequence(0, 42).is_empty());
    }

    #[test]
    fn is_sorted_edges() {
        assert!(is_sorted::<i32>(&[]));
        assert!(is_sorted(&[5]));
        assert!(is_sorted(&[1, 1, 2, 2, 3]));
        assert!(!is_sorted(&[1, 3, 2]));
    }

    #[test]
    fn ensure_sorted_reports_invariant_violation() {
        assert!(ensure_sorted(&[1, 2, 3]).is_ok());
        let err = ensure_sorted(&[2, 1]).unwrap_err();
        assert!(matches!(err, SortError::InvariantViolation { len: 2 }));
    }
}
