use rayon::ThreadPoolBuilder;

use crate::{
    par::{par_sequential, MAX_JOIN_DEPTH},
    partition::{process_range, Split},
    SortError,
};

/// Fork-join quicksort on a rayon pool sized to `threads`.
#[inline(always)]
pub fn sort<T: Ord + Send>(
    data: &mut [T],
    threshold: usize,
    threads: usize,
) -> Result<(), SortError> {
    crate::scope!("par_rayon::sort");
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("rayon-quicksort-{i}"))
        .build()?;
    pool.install(|| recursive_split(data, threshold, MAX_JOIN_DEPTH));
    Ok(())
}

fn recursive_split<T: Ord + Send>(data: &mut [T], threshold: usize, depth_left: u32) {
    if depth_left == 0 {
        par_sequential::sort(data, threshold);
        return;
    }

    if let Split::Pivot(p) = process_range(data, 0, threshold) {
        let (left, right) = data.split_at_mut(p);
        let right = &mut right[1..];
        rayon::join(
            || recursive_split(left, threshold, depth_left - 1),
            || recursive_split(right, threshold, depth_left - 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_sequence, is_sorted};

    #[test]
    fn sorts_on_sized_pool() {
        let mut data = generate_sequence(100_000, 11);
        sort(&mut data, 128, 4).unwrap();
        assert!(is_sorted(&data));
    }

    #[test]
    fn deep_input_falls_back_to_sequential() {
        let mut data = (0..10_000).rev().collect::<Vec<i64>>();
        sort(&mut data, 2, 2).unwrap();
        assert!(is_sorted(&data));
    }
}
