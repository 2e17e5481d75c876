use std::{str::FromStr, sync::OnceLock};

use crate::{pool::PoolConfig, sequence::ensure_sorted, QuicksortPool, SortError};

pub mod par_chili;
pub mod par_raw;
pub mod par_rayon;
pub mod par_sequential;

static AVAILABLE_PARALLELISM: OnceLock<usize> = OnceLock::new();

#[inline(always)]
pub fn cached_available_parallelism() -> usize {
    *AVAILABLE_PARALLELISM.get_or_init(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

/// Join-based schedulers stop forking past this depth and finish the range sequentially. Keeps the
/// call stack bounded on inputs where the last-element pivot splits off a single element each time.
pub const MAX_JOIN_DEPTH: u32 = 48;

/// Strategy used to drive the partition step over a whole sequence.
#[derive(PartialEq, Eq, Default, Clone, Copy, Debug)]
pub enum Scheduler {
    /// Shared job queue drained by a fixed set of worker threads.
    #[default]
    Pool,
    Sequential,
    /// A scoped std thread per split, up to one split level per doubling of the thread count.
    Raw,
    Rayon,
    Chili,
}

impl FromStr for Scheduler {
    type Err = String;

    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pool" => Ok(Self::Pool),
            "seq" => Ok(Self::Sequential),
            "raw" => Ok(Self::Raw),
            "rayon" => Ok(Self::Rayon),
            "chili" => Ok(Self::Chili),
            _ => Err(format!(
                "Unknown mode: '{s}', valid modes: 'pool', 'seq', 'raw', 'rayon', 'chili'"
            )),
        }
    }
}

impl Scheduler {
    pub const ALL: [Scheduler; 5] = [
        Scheduler::Pool,
        Scheduler::Sequential,
        Scheduler::Raw,
        Scheduler::Rayon,
        Scheduler::Chili,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scheduler::Pool => "pool",
            Scheduler::Sequential => "seq",
            Scheduler::Raw => "raw",
            Scheduler::Rayon => "rayon",
            Scheduler::Chili => "chili",
        }
    }

    /// Sorts `data` in place and checks the result.
    ///
    /// `Pool` spawns and joins its workers inside this call; keep a [`QuicksortPool`] around instead to
    /// reuse them across sorts.
    pub fn sort<T>(self, data: &mut [T], config: &PoolConfig) -> Result<(), SortError>
    where
        T: Ord + Send + 'static,
    {
        crate::scope_print_major!("Scheduler::sort");
        config.validate()?;
        let threshold = config.sequential_threshold;

        match self {
            Scheduler::Pool => return QuicksortPool::with_config(*config)?.sort(data),
            Scheduler::Sequential => par_sequential::sort(data, threshold),
            Scheduler::Raw => par_raw::sort(data, threshold, config.threads),
            Scheduler::Rayon => par_rayon::sort(data, threshold, config.threads)?,
            Scheduler::Chili => par_chili::sort(data, threshold),
        }

        ensure_sorted(data)
    }
}
