pub mod bound;
pub mod dual_agent;
pub mod parallel;
pub mod single_agent;
pub mod worker_pool;

use std::ops::AddAssign;

use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};

/// Knobs shared by all optimizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Skip branches whose optimistic bound cannot beat the best value found.
    /// Never changes the result, only the amount of work.
    pub pruning: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { pruning: true }
    }
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Search states entered.
    pub visited: u64,
    /// States abandoned because of the bound.
    pub pruned: u64,
}

impl AddAssign for SearchStats {
    fn add_assign(&mut self, other: SearchStats) {
        self.visited += other.visited;
        self.pruned += other.pruned;
    }
}

/// Best total reward found plus the work it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: u64,
    pub stats: SearchStats,
}

/// Resolves the starting row and checks `candidates` against the table.
pub(crate) fn start_row(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet) -> Result<usize> {
    let row = table.origin_row(entry).ok_or_else(|| Error::UnknownNode(entry.to_string()))?;

    if let Some(stray) = candidates.iter().find(|&index| index >= table.reward_count()) {
        return Err(Error::UnknownNode(format!("reward index {}", stray)));
    }
    Ok(row)
}
