use std::thread;

use crate::{
    par::par_sequential,
    partition::{process_range, Split},
};

/// Forks a scoped std thread at each split until there is about one branch per thread.
#[inline(always)]
pub fn sort<T: Ord + Send>(data: &mut [T], threshold: usize, threads: usize) {
    crate::scope!("par_raw::sort");
    let splits = threads.max(1).next_power_of_two().trailing_zeros();
    recursive_split(data, threshold, splits);
}

fn recursive_split<T: Ord + Send>(data: &mut [T], threshold: usize, splits_left: u32) {
    if splits_left == 0 {
        par_sequential::sort(data, threshold);
        return;
    }

    if let Split::Pivot(p) = process_range(data, 0, threshold) {
        let (left, right) = data.split_at_mut(p);
        let right = &mut right[1..];
        thread::scope(|s| {
            s.spawn(move || recursive_split(left, threshold, splits_left - 1));
            recursive_split(right, threshold, splits_left - 1) // Run the last one on this thread
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_sequence, is_sorted};

    #[test]
    fn sorts_with_any_thread_count() {
        for threads in [1, 2, 3, 8, 25] {
            let mut data = generate_sequence(50_000, threads as u64);
            sort(&mut data, 32, threads);
            assert!(is_sorted(&data), "threads: {threads}");
        }
    }
}
