use std::time::{Duration, Instant};

use argh::FromArgs;

pub mod error;
pub mod par;
pub mod partition;
pub mod pool;
pub mod sequence;

pub use error::SortError;
pub use par::Scheduler;
pub use partition::SEQUENTIAL_THRESHOLD;
pub use pool::{PoolConfig, QuicksortPool};
pub use sequence::{generate_sequence, is_sorted};

/// Profiling span, only emitted with the `profile` feature.
#[doc(hidden)]
#[macro_export]
macro_rules! scope {
    ($name:expr) => {
        #[cfg(feature = "profile")]
        profiling::scope!($name);
    };
}

/// Profiling span that also logs its duration with the `scope_print` feature.
#[doc(hidden)]
#[macro_export]
macro_rules! scope_print {
    ($name:expr) => {
        $crate::scope!($name);
        #[cfg(feature = "scope_print")]
        let _scope_print = $crate::ScopePrint::new($name);
    };
}

/// Like `scope_print!` but for the coarse phases, enabled by `scope_print_major`.
#[doc(hidden)]
#[macro_export]
macro_rules! scope_print_major {
    ($name:expr) => {
        $crate::scope!($name);
        #[cfg(feature = "scope_print_major")]
        let _scope_print = $crate::ScopePrint::new($name);
    };
}

#[derive(FromArgs, Debug)]
/// Sort a generated sequence of integers and report how long each scheduler takes.
pub struct Args {
    /// number of worker threads
    #[argh(option, short = 't', default = "par::cached_available_parallelism()")]
    pub threads: usize,

    /// length of the generated sequence
    #[argh(option, short = 'n', default = "1_000_000")]
    pub size: usize,

    /// seed for the generated sequence
    #[argh(option, default = "42")]
    pub seed: u64,

    /// ranges shorter than this are handed to the fallback sort
    #[argh(option, default = "SEQUENTIAL_THRESHOLD")]
    pub threshold: usize,

    /// scheduler to run: 'pool', 'seq', 'raw', 'rayon', 'chili'. All of them if omitted.
    #[argh(option)]
    pub sch: Option<Scheduler>,

    /// how many times each scheduler sorts a fresh copy of the sequence
    #[argh(option, default = "3")]
    pub rounds: usize,
}

impl Args {
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig {
            threads: self.threads,
            sequential_threshold: self.threshold,
        }
    }
}

/// A wrapper struct for `std::time::Duration` to provide pretty-printing of durations.
#[doc(hidden)]
pub struct PrettyDuration(pub Duration);

impl std::fmt::Display for PrettyDuration {
    /// Durations are formatted as follows:
    /// - If the duration is greater than or equal to 1 second, it is formatted in seconds (s).
    /// - If the duration is greater than or equal to 1 millisecond but less than 1 second, it is formatted in milliseconds (ms).
    /// - If the duration is less than 1 millisecond, it is formatted in microseconds (µs).
    ///   In the case of seconds & milliseconds, the duration is always printed with a precision of two decimal places.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let duration = self.0;
        if duration.as_secs() > 0 {
            let seconds =
                duration.as_secs() as f64 + f64::from(duration.subsec_nanos()) / 1_000_000_000.0;
            write!(f, "{seconds:.2}s ")
        } else if duration.subsec_millis() > 0 {
            let milliseconds =
                duration.as_millis() as f64 + f64::from(duration.subsec_micros() % 1_000) / 1_000.0;
            write!(f, "{milliseconds:.2}ms")
        } else {
            let microseconds = duration.as_micros();
            write!(f, "{microseconds}µs")
        }
    }
}

/// Logs the time between its creation and drop. Created by the `scope_print` macros.
#[doc(hidden)]
pub struct ScopePrint {
    name: &'static str,
    start: Instant,
}

impl ScopePrint {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }
}

impl Drop for ScopePrint {
    fn drop(&mut self) {
        log::info!(target: "scope_print", "{}: {}", self.name, PrettyDuration(self.start.elapsed()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_duration_picks_unit() {
        assert_eq!(
            PrettyDuration(Duration::from_millis(1500)).to_string(),
            "1.50s "
        );
        assert_eq!(
            PrettyDuration(Duration::from_micros(2_250)).to_string(),
            "2.25ms"
        );
        assert_eq!(PrettyDuration(Duration::from_micros(42)).to_string(), "42µs");
    }

    #[test]
    fn args_convert_to_pool_config() {
        let args = Args::from_args(&["race"], &["-t", "8", "--threshold", "64", "--sch", "pool"])
            .expect("valid arguments");
        assert_eq!(args.sch, Some(Scheduler::Pool));
        assert_eq!(args.size, 1_000_000);
        let config = args.pool_config();
        assert_eq!(config.threads, 8);
        assert_eq!(config.sequential_threshold, 64);
    }
}
