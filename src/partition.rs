//! The sequential step every worker runs on a claimed range.
//!
//! A range is either small enough to be handed to [`fallback_sort`], or it is split in place around
//! its last element with a Lomuto partition. The two sides of the pivot never overlap, so they can be
//! handed to different workers.
//!
//! ## Characteristics
//!
//!  * in-place
//!  * unstable
//!  * single-threaded

use crate::{pool::queue::Job, sequence::fallback_sort};

/// Ranges shorter than this are not partitioned any further. A range of exactly this length is.
pub const SEQUENTIAL_THRESHOLD: usize = 1000;

/// Outcome of processing one range.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Split {
    /// The range is sorted, nothing to follow up.
    Done,
    /// The range was partitioned; holds the absolute index of the pivot.
    Pivot(usize),
}

impl Split {
    /// Follow-up jobs for `job`. Sides with fewer than two elements are already sorted and are skipped.
    #[inline]
    pub fn children(self, job: Job) -> impl Iterator<Item = Job> {
        let sides = match self {
            Split::Done => [None, None],
            Split::Pivot(p) => {
                debug_assert!(job.start <= p && p < job.end);
                [Job::new(job.start, p), Job::new(p + 1, job.end)].map(Some)
            }
        };
        sides.into_iter().flatten().filter(|side| side.len() >= 2)
    }
}

/// Lomuto partition around the last element. Elements equal to the pivot go left.
///
/// Returns the final position of the pivot, relative to `data`. `data` must hold at least two elements.
#[inline]
pub fn partition<T: Ord>(data: &mut [T]) -> usize {
    crate::scope!("partition");
    debug_assert!(data.len() >= 2);
    let hi = data.len() - 1;
    let mut i = 0;
    for j in 0..hi {
        if data[j] <= data[hi] {
            data.swap(i, j);
            i += 1;
        }
    }
    data.swap(i, hi);
    i
}

/// Sorts or partitions `data`, which starts at absolute index `lo` of the whole sequence.
#[inline]
pub fn process_range<T: Ord>(data: &mut [T], lo: usize, threshold: usize) -> Split {
    if data.len() < 2 {
        return Split::Done;
    }

    if data.len() < threshold {
        fallback_sort(data);
        return Split::Done;
    }

    Split::Pivot(lo + partition(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_places_pivot() {
        let mut data = [3, 1, 2];
        assert_eq!(partition(&mut data), 1);
        assert_eq!(data, [1, 2, 3]);
    }

    #[test]
    fn partition_sends_ties_left() {
        let mut data = [2, 2, 1, 2];
        // Everything is <= the pivot, so it stays at the end
        assert_eq!(partition(&mut data), 3);
        assert_eq!(data, [2, 2, 1, 2]);
    }

    #[test]
    fn partition_with_smallest_pivot() {
        let mut data = [5, 4, 3, 1];
        assert_eq!(partition(&mut data), 0);
        assert_eq!(data, [1, 4, 3, 5]);
    }

    #[test]
    fn partition_splits_around_pivot() {
        let mut data = [9, 7, 0, 3, 8, 1, 6, 2, 5];
        let p = partition(&mut data);
        assert_eq!(data[p], 5);
        assert!(data[..p].iter().all(|&v| v <= 5));
        assert!(data[p + 1..].iter().all(|&v| v > 5));
    }

    #[test]
    fn process_range_short_ranges() {
        let mut empty: [i32; 0] = [];
        assert_eq!(process_range(&mut empty, 0, 2), Split::Done);

        let mut one = [4];
        assert_eq!(process_range(&mut one, 7, 2), Split::Done);

        let mut small = [4, 3, 2, 1];
        assert_eq!(process_range(&mut small, 0, 5), Split::Done);
        assert_eq!(small, [1, 2, 3, 4]);
    }

    #[test]
    fn threshold_boundary_is_exclusive() {
        let mut below = (0..SEQUENTIAL_THRESHOLD - 1).rev().collect::<Vec<_>>();
        assert_eq!(process_range(&mut below, 0, SEQUENTIAL_THRESHOLD), Split::Done);
        assert!(crate::is_sorted(&below));

        // A range exactly at the threshold is partitioned, the reversed input puts the pivot first
        let mut at = (0..SEQUENTIAL_THRESHOLD).rev().collect::<Vec<_>>();
        assert_eq!(process_range(&mut at, 0, SEQUENTIAL_THRESHOLD), Split::Pivot(0));
    }

    #[test]
    fn process_range_offsets_pivot() {
        let mut data = [4, 0, 3, 1, 2];
        assert_eq!(process_range(&mut data, 10, 2), Split::Pivot(12));
        assert_eq!(data[2], 2);
    }

    #[test]
    fn children_skip_boundary_pivots() {
        let job = Job::new(0, 4);
        assert_eq!(
            Split::Pivot(0).children(job).collect::<Vec<_>>(),
            vec![Job::new(1, 4)]
        );
        assert_eq!(
            Split::Pivot(3).children(job).collect::<Vec<_>>(),
            vec![Job::new(0, 3)]
        );
        assert_eq!(
            Split::Pivot(1).children(job).collect::<Vec<_>>(),
            vec![Job::new(2, 4)]
        );
    }

    #[test]
    fn children_of_tiny_ranges() {
        assert_eq!(Split::Pivot(1).children(Job::new(0, 2)).count(), 0);
        assert_eq!(Split::Pivot(1).children(Job::new(0, 3)).count(), 0);
        assert_eq!(Split::Done.children(Job::new(0, 100)).count(), 0);
    }

    #[test]
    fn children_are_disjoint_and_cover_the_rest() {
        let job = Job::new(10, 20);
        let children = Split::Pivot(14).children(job).collect::<Vec<_>>();
        assert_eq!(children, vec![Job::new(10, 14), Job::new(15, 20)]);
        assert!(!children[0].overlaps(&children[1]));
    }
}
