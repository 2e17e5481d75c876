use crate::{
    par::{par_sequential, MAX_JOIN_DEPTH},
    partition::{process_range, Split},
};

/// Fork-join quicksort on chili's global pool, which is sized to the machine.
#[inline(always)]
pub fn sort<T: Ord + Send>(data: &mut [T], threshold: usize) {
    crate::scope!("par_chili::sort");
    let mut scope = chili::Scope::global();
    recursive_split(&mut scope, data, threshold, MAX_JOIN_DEPTH);
}

fn recursive_split<T: Ord + Send>(
    worker: &mut chili::Scope,
    data: &mut [T],
    threshold: usize,
    depth_left: u32,
) {
    if depth_left == 0 {
        par_sequential::sort(data, threshold);
        return;
    }

    if let Split::Pivot(p) = process_range(data, 0, threshold) {
        let (left, right) = data.split_at_mut(p);
        let right = &mut right[1..];
        worker.join(
            |worker| recursive_split(worker, left, threshold, depth_left - 1),
            |worker| recursive_split(worker, right, threshold, depth_left - 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{generate_sequence, is_sorted};

    #[test]
    fn sorts_on_global_scope() {
        let mut data = generate_sequence(100_000, 17);
        sort(&mut data, 128);
        assert!(is_sorted(&data));
    }
}
