use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;

/// Fewest ticks between two activations by the same agent: distinct nodes
/// are at least one edge apart, plus the activation tick.
pub(crate) const MIN_ACTIVATION_GAP: u32 = 2;

/// Optimistic estimate of the reward `candidates` can still add.
///
/// `first_slots` holds, per working agent, the earliest tick offset at which
/// its next activation could complete. Later activations by the same agent
/// come at least [`MIN_ACTIVATION_GAP`] ticks apart. Rates are matched to the
/// earliest slots in descending order, which can only overestimate what any
/// real schedule achieves, so the result is an upper bound.
pub(crate) fn optimistic_gain(table: &DistanceTable, candidates: CandidateSet, remaining: u32, first_slots: &mut [u32]) -> u64 {
    if first_slots.is_empty() || candidates.is_empty() {
        return 0;
    }

    let mut gain = 0;
    for &index in table.indices_by_rate() {
        if !candidates.contains(index) {
            continue;
        }

        let Some((agent, &slot)) = first_slots.iter().enumerate().min_by_key(|(_, slot)| **slot) else {
            break;
        };
        if slot >= remaining {
            break;
        }

        gain = table.reward_rate(index).saturating_mul(u64::from(remaining - slot)).saturating_add(gain);
        first_slots[agent] = slot.saturating_add(MIN_ACTIVATION_GAP);
    }
    gain
}

/// Earliest activation an agent at `row` can complete among `candidates`.
pub(crate) fn earliest_activation(table: &DistanceTable, row: usize, candidates: CandidateSet) -> Option<u32> {
    candidates.iter().filter_map(|dest| table.time(row, dest)).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scenario_dto::NodeRecordDto;
    use crate::domain::graph::Graph;

    /// Star around AA: BB(10), CC(5), DD(1), each one edge away.
    fn star() -> DistanceTable {
        let records = vec![
            NodeRecordDto::new("AA", 0, &["BB", "CC", "DD"]),
            NodeRecordDto::new("BB", 10, &["AA"]),
            NodeRecordDto::new("CC", 5, &["AA"]),
            NodeRecordDto::new("DD", 1, &["AA"]),
        ];
        DistanceTable::build(&Graph::build(records, "AA").unwrap()).unwrap()
    }

    #[test]
    fn test_single_agent_slots() {
        let table = star();
        let all = CandidateSet::all(&table);

        // Slots at 2, 4, 6 with 10 ticks left: 10*8 + 5*6 + 1*4.
        let gain = optimistic_gain(&table, all, 10, &mut [2]);
        assert_eq!(gain, 80 + 30 + 4);
    }

    #[test]
    fn test_two_agents_share_slots() {
        let table = star();
        let all = CandidateSet::all(&table);

        // Slots at 2, 2, 4: 10*8 + 5*8 + 1*6.
        let gain = optimistic_gain(&table, all, 10, &mut [2, 2]);
        assert_eq!(gain, 80 + 40 + 6);
    }

    #[test]
    fn test_slots_past_budget_add_nothing() {
        let table = star();
        let all = CandidateSet::all(&table);

        assert_eq!(optimistic_gain(&table, all, 3, &mut [2]), 10);
        assert_eq!(optimistic_gain(&table, all, 2, &mut [2]), 0);
        assert_eq!(optimistic_gain(&table, all, 10, &mut []), 0);
    }

    #[test]
    fn test_bound_covers_real_schedule() {
        let table = star();
        let all = CandidateSet::all(&table);
        let entry = table.entry_row();

        // Real best from AA with 10 ticks: BB at 2, CC at 5, DD at 8 => 80 + 25 + 2.
        let first = earliest_activation(&table, entry, all).unwrap();
        assert_eq!(first, 2);
        assert!(optimistic_gain(&table, all, 10, &mut [first]) >= 107);
    }
}
