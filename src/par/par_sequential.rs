use crate::{partition::process_range, pool::queue::Job};

/// Same jobs as the pool, drained from a stack on the calling thread.
#[inline(always)]
pub fn sort<T: Ord>(data: &mut [T], threshold: usize) {
    crate::scope!("par_sequential::sort");
    let mut jobs = vec![Job::new(0, data.len())];
    while let Some(job) = jobs.pop() {
        let split = process_range(&mut data[job.start..job.end], job.start, threshold);
        jobs.extend(split.children(job));
    }
}
