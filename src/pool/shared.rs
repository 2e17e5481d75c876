use std::{ptr::NonNull, slice};

use crate::pool::queue::Job;

/// Lifetime-erased handle on the sequence of the sort call in progress.
///
/// Only lives in the pool state between the call installing it and the call observing completion,
/// which is strictly inside the `&mut [T]` borrow it was created from.
pub(crate) struct SharedSlice<T> {
    ptr: NonNull<T>,
    len: usize,
}

impl<T> Clone for SharedSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SharedSlice<T> {}

// SAFETY: Workers only ever access disjoint ranges through this handle, the same access a `&mut [T]` split
// with `split_at_mut` would grant, which is `Send` when `T: Send`.
unsafe impl<T: Send> Send for SharedSlice<T> {}

impl<T> SharedSlice<T> {
    pub fn new(data: &mut [T]) -> Self {
        let len = data.len();
        Self {
            ptr: NonNull::from(data).cast(),
            len,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// # Safety
    /// The caller must have exclusive access to `job`'s range for the lifetime of the returned slice, and the
    /// sequence this handle was created from must still be borrowed by the sort call.
    #[inline(always)]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn range_mut(&self, job: Job) -> &mut [T] {
        debug_assert!(job.start <= job.end && job.end <= self.len);
        // SAFETY: In bounds per the assert above, exclusivity is upheld by the caller.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().add(job.start), job.len()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disjoint_ranges_write_through() {
        let mut data = vec![0u32; 10];
        let shared = SharedSlice::new(&mut data);
        assert_eq!(shared.len(), 10);
        std::thread::scope(|s| {
            for job in [Job::new(0, 3), Job::new(3, 9), Job::new(9, 10)] {
                s.spawn(move || {
                    // SAFETY: The three jobs don't overlap and `data` outlives the scope
                    let range = unsafe { shared.range_mut(job) };
                    range.fill(job.start as u32 + 1);
                });
            }
        });
        assert_eq!(data, [1, 1, 1, 4, 4, 4, 4, 4, 4, 10]);
    }
}
