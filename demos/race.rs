use std::time::Instant;

use log::info;
use pool_quicksort::{generate_sequence, Args, PrettyDuration, QuicksortPool, Scheduler, SortError};

fn main() -> Result<(), SortError> {
    env_logger::init();
    let args: Args = argh::from_env();
    let config = args.pool_config();
    info!("{args:?}");

    let input = generate_sequence(args.size, args.seed);
    let schedulers = match args.sch {
        Some(scheduler) => vec![scheduler],
        None => Scheduler::ALL.to_vec(),
    };

    for scheduler in schedulers {
        // Spawn the pool once so its rounds only time the sort itself
        let mut pool = match scheduler {
            Scheduler::Pool => Some(QuicksortPool::with_config(config)?),
            _ => None,
        };

        for round in 0..args.rounds {
            let mut data = input.clone();
            let start = Instant::now();
            match pool.as_mut() {
                Some(pool) => pool.sort(&mut data)?,
                None => scheduler.sort(&mut data, &config)?,
            }
            println!(
                "{:>6} round {round}: {} elements on {} threads in {}",
                scheduler.name(),
                data.len(),
                config.threads,
                PrettyDuration(start.elapsed())
            );
        }

        if let Some(pool) = pool {
            pool.shutdown();
        }
    }

    Ok(())
}
