use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;
use crate::domain::optimizer::bound::{earliest_activation, optimistic_gain};
use crate::domain::optimizer::{SearchOptions, SearchOutcome, SearchStats, start_row};
use crate::domain::utils::id::NodeId;
use crate::error::Result;

/// Best total reward one agent starting at `entry` can collect within `time_budget` ticks.
pub fn optimize(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet, time_budget: u32) -> Result<u64> {
    Ok(optimize_with(table, entry, candidates, time_budget, SearchOptions::default())?.best)
}

pub fn optimize_with(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet, time_budget: u32, options: SearchOptions) -> Result<SearchOutcome> {
    let row = start_row(table, entry, candidates)?;

    let mut search = SingleAgentSearch::new(table, options);
    search.explore(SearchState { position: row, remaining: time_budget, rate: 0, candidates, accumulated: 0 });

    log::debug!(
        "Single-agent search from '{}' ({} candidates, {} ticks): best {}, {} states, {} pruned.",
        entry,
        candidates.len(),
        time_budget,
        search.best,
        search.stats.visited,
        search.stats.pruned
    );
    Ok(SearchOutcome { best: search.best, stats: search.stats })
}

/// One node of the search tree.
#[derive(Debug, Clone, Copy)]
struct SearchState {
    /// Origin row of the last activated node (or the entry).
    position: usize,
    remaining: u32,
    /// Sum of the rates of all activated nodes.
    rate: u64,
    candidates: CandidateSet,
    /// Reward earned before this state.
    accumulated: u64,
}

struct SingleAgentSearch<'a> {
    table: &'a DistanceTable,
    pruning: bool,
    best: u64,
    stats: SearchStats,
}

impl<'a> SingleAgentSearch<'a> {
    fn new(table: &'a DistanceTable, options: SearchOptions) -> Self {
        Self { table, pruning: options.pruning, best: 0, stats: SearchStats::default() }
    }

    fn explore(&mut self, state: SearchState) {
        self.stats.visited += 1;

        // Value if nothing else is ever activated.
        let baseline = state.accumulated.saturating_add(state.rate.saturating_mul(u64::from(state.remaining)));
        self.best = self.best.max(baseline);

        if state.remaining == 0 || state.candidates.is_empty() {
            return;
        }

        if self.pruning {
            let Some(first) = earliest_activation(self.table, state.position, state.candidates) else {
                return;
            };
            let gain = optimistic_gain(self.table, state.candidates, state.remaining, &mut [first]);
            if baseline.saturating_add(gain) <= self.best {
                self.stats.pruned += 1;
                return;
            }
        }

        // High rates first so good totals are found early and prune more.
        for &next in self.table.indices_by_rate() {
            if !state.candidates.contains(next) {
                continue;
            }
            let Some(time) = self.table.time(state.position, next) else { continue };
            if time > state.remaining {
                continue;
            }

            self.explore(SearchState {
                position: next,
                remaining: state.remaining - time,
                rate: state.rate.saturating_add(self.table.reward_rate(next)),
                candidates: state.candidates.without(next),
                accumulated: state.accumulated.saturating_add(state.rate.saturating_mul(u64::from(time))),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scenario_dto::NodeRecordDto;
    use crate::domain::graph::Graph;
    use crate::error::Error;

    fn build(records: Vec<NodeRecordDto>) -> DistanceTable {
        DistanceTable::build(&Graph::build(records, "AA").unwrap()).unwrap()
    }

    fn run(table: &DistanceTable, budget: u32, pruning: bool) -> u64 {
        let candidates = CandidateSet::all(table);
        optimize_with(table, &NodeId::new("AA"), candidates, budget, SearchOptions { pruning }).unwrap().best
    }

    #[test]
    fn test_single_neighbor() {
        // Reach BB in 2 ticks, then 8 ticks at rate 5.
        let table = build(vec![NodeRecordDto::new("AA", 0, &["BB"]), NodeRecordDto::new("BB", 5, &["AA"])]);
        assert_eq!(run(&table, 10, true), 40);
        assert_eq!(run(&table, 10, false), 40);
    }

    #[test]
    fn test_budget_equal_to_activation_time_yields_nothing() {
        let table = build(vec![NodeRecordDto::new("AA", 0, &["BB"]), NodeRecordDto::new("BB", 5, &["AA"])]);
        assert_eq!(run(&table, 2, true), 0);
        assert_eq!(run(&table, 1, true), 0);
    }

    #[test]
    fn test_prefers_better_order() {
        // BB(1) right next to AA, CC(50) two edges the other way.
        let table = build(vec![
            NodeRecordDto::new("AA", 0, &["BB", "XX"]),
            NodeRecordDto::new("BB", 1, &["AA"]),
            NodeRecordDto::new("XX", 0, &["AA", "CC"]),
            NodeRecordDto::new("CC", 50, &["XX"]),
        ]);
        // CC done at tick 3 earns 50 * 7, BB done at tick 7 adds 1 * 3.
        assert_eq!(run(&table, 10, true), 353);
        assert_eq!(run(&table, 10, false), 353);
    }

    #[test]
    fn test_rewarding_entry_can_be_activated_in_place() {
        let table = build(vec![NodeRecordDto::new("AA", 3, &["BB"]), NodeRecordDto::new("BB", 0, &["AA"])]);
        assert_eq!(run(&table, 5, true), 12);
    }

    #[test]
    fn test_pruning_reduces_work() {
        let table = build(vec![
            NodeRecordDto::new("AA", 0, &["BB", "CC", "DD", "EE"]),
            NodeRecordDto::new("BB", 9, &["AA", "CC"]),
            NodeRecordDto::new("CC", 7, &["AA", "BB", "DD"]),
            NodeRecordDto::new("DD", 4, &["AA", "CC", "EE"]),
            NodeRecordDto::new("EE", 2, &["AA", "DD"]),
        ]);
        let entry = NodeId::new("AA");
        let all = CandidateSet::all(&table);

        let pruned = optimize_with(&table, &entry, all, 20, SearchOptions { pruning: true }).unwrap();
        let full = optimize_with(&table, &entry, all, 20, SearchOptions { pruning: false }).unwrap();

        assert_eq!(pruned.best, full.best);
        assert!(pruned.stats.visited < full.stats.visited);
        assert_eq!(full.stats.pruned, 0);
    }

    #[test]
    fn test_huge_rates_saturate() {
        let table = build(vec![
            NodeRecordDto::new("AA", 0, &["BB", "CC"]),
            NodeRecordDto::new("BB", u64::MAX / 2, &["AA"]),
            NodeRecordDto::new("CC", u64::MAX / 2, &["AA"]),
        ]);
        assert_eq!(run(&table, 10, true), u64::MAX);
        assert_eq!(run(&table, 10, false), u64::MAX);
    }

    #[test]
    fn test_unknown_entry() {
        let table = build(vec![NodeRecordDto::new("AA", 0, &["BB"]), NodeRecordDto::new("BB", 5, &["AA"])]);
        let err = optimize(&table, &NodeId::new("ZZ"), CandidateSet::all(&table), 10).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(_)));
    }
}
