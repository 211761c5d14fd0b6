use std::sync::atomic::AtomicU64;

use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;
use crate::domain::optimizer::dual_agent::{self, DualState};
use crate::domain::optimizer::worker_pool::{PoolError, WorkerPool};
use crate::domain::optimizer::{SearchOptions, SearchOutcome, SearchStats, start_row};
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};

/// Dual-agent optimum computed by `worker_count` threads.
///
/// Returns the same value as [`dual_agent::optimize_dual`] for any worker count.
pub fn optimize_dual_parallel(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet, time_budget: u32, worker_count: usize) -> Result<u64> {
    Ok(optimize_dual_parallel_with(table, entry, candidates, time_budget, worker_count, SearchOptions::default())?.best)
}

/// Fixes the first target of each agent (one task per unordered pair of
/// candidates, plus one per single target with the second agent idle),
/// searches every seed to completion on the worker pool and keeps the maximum.
///
/// With pruning on, tasks publish their best value to each other as a shared
/// lower bound.
pub fn optimize_dual_parallel_with(
    table: &DistanceTable,
    entry: &NodeId,
    candidates: CandidateSet,
    time_budget: u32,
    worker_count: usize,
    options: SearchOptions,
) -> Result<SearchOutcome> {
    let entry_row = start_row(table, entry, candidates)?;
    if worker_count == 0 {
        return Err(Error::InvalidConfig("worker count must be positive".to_string()));
    }

    // Without a pair to split on there is nothing to parallelise.
    if candidates.len() < 2 {
        log::debug!("{} candidates, searching on the calling thread.", candidates.len());
        return dual_agent::optimize_dual_with(table, entry, candidates, time_budget, options);
    }

    let seeds = dual_agent::seeds(table, entry_row, candidates, time_budget);
    let pool = WorkerPool::new("dual-search", worker_count);
    log::info!("Dispatching {} seeded dual-agent searches to {} workers.", seeds.len(), pool.worker_count());

    let shared_best = AtomicU64::new(0);
    let hint = options.pruning.then_some(&shared_best);

    let outcomes = pool
        .run(seeds.clone(), |seed| dual_agent::run_from(table, time_budget, options, hint, seed))
        .map_err(|e| aborted(e, &seeds, time_budget))?;

    let mut best = 0;
    let mut stats = SearchStats::default();
    for (index, outcome) in outcomes.iter().enumerate() {
        log::debug!("Seed {} finished: best {}, {} states, {} pruned.", index, outcome.best, outcome.stats.visited, outcome.stats.pruned);
        best = best.max(outcome.best);
        stats += outcome.stats;
    }

    log::debug!("Parallel dual-agent search: best {}, {} states, {} pruned.", best, stats.visited, stats.pruned);
    Ok(SearchOutcome { best, stats })
}

fn aborted(error: PoolError, seeds: &[DualState], time_budget: u32) -> Error {
    match error {
        PoolError::Spawn(e) => Error::IoError(e),
        PoolError::WorkerPanicked { worker, job } => {
            let seed = &seeds[job];
            let error = Error::SearchAborted { worker, candidates: seed.candidates.len(), remaining: seed.remaining(time_budget) };
            log::error!("{}", error);
            error
        }
    }
}
