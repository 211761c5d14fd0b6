use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::candidate_set::CandidateSet;
use crate::domain::distance_table::DistanceTable;
use crate::domain::optimizer::bound::{MIN_ACTIVATION_GAP, earliest_activation, optimistic_gain};
use crate::domain::optimizer::{SearchOptions, SearchOutcome, SearchStats, start_row};
use crate::domain::utils::id::NodeId;
use crate::error::Result;

/// Best total reward two cooperating agents starting at `entry` can collect
/// within `time_budget` ticks, searched on the calling thread.
///
/// The agents share one clock and one candidate pool. A node claimed by one
/// agent is never targeted by the other.
pub fn optimize_dual(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet, time_budget: u32) -> Result<u64> {
    Ok(optimize_dual_with(table, entry, candidates, time_budget, SearchOptions::default())?.best)
}

pub fn optimize_dual_with(table: &DistanceTable, entry: &NodeId, candidates: CandidateSet, time_budget: u32, options: SearchOptions) -> Result<SearchOutcome> {
    let row = start_row(table, entry, candidates)?;

    let outcome = run_from(table, time_budget, options, None, DualState::root(row, candidates));

    log::debug!(
        "Dual-agent search from '{}' ({} candidates, {} ticks): best {}, {} states, {} pruned.",
        entry,
        candidates.len(),
        time_budget,
        outcome.best,
        outcome.stats.visited,
        outcome.stats.pruned
    );
    Ok(outcome)
}

/// Runs the search below `state` to completion.
///
/// `shared_best` is a value some other search has already reached; it only
/// tightens pruning. The returned best never drops below zero and may stay
/// below the true optimum of this subtree when `shared_best` cut it short.
pub(crate) fn run_from(table: &DistanceTable, time_budget: u32, options: SearchOptions, shared_best: Option<&AtomicU64>, state: DualState) -> SearchOutcome {
    let mut search = DualAgentSearch { table, time_budget, pruning: options.pruning, best: 0, stats: SearchStats::default(), shared_best };
    search.explore(state);
    SearchOutcome { best: search.best, stats: search.stats }
}

/// Starting states that together cover the whole dual-agent search.
///
/// Both agents start at the same row, so swapping their roles gives the same
/// value: only unordered target pairs are needed, and the plans where one
/// agent stays home are covered by agent 1 idling.
pub(crate) fn seeds(table: &DistanceTable, entry_row: usize, candidates: CandidateSet, time_budget: u32) -> Vec<DualState> {
    let root = DualState::root(entry_row, candidates);

    let mut seeds = Vec::new();
    for a in candidates.iter() {
        let Some(time_a) = feasible(table, entry_row, a, time_budget) else { continue };
        for b in candidates.iter().filter(|&b| b > a) {
            let Some(time_b) = feasible(table, entry_row, b, time_budget) else { continue };
            seeds.push(root.advance([AgentTask::heading(a, time_a), AgentTask::heading(b, time_b)]));
        }
    }

    for c in candidates.iter() {
        if let Some(time) = feasible(table, entry_row, c, time_budget) {
            seeds.push(root.advance([AgentTask::heading(c, time), AgentTask::Idle]));
        }
    }
    seeds
}

/// What an agent is doing between two decision points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AgentTask {
    /// Waiting for an assignment.
    Free,
    /// Travelling to `target`; it is activated when `ticks_left` reaches 0.
    Heading { target: usize, ticks_left: u32 },
    /// Will never be assigned again.
    Idle,
}

impl AgentTask {
    fn heading(target: usize, ticks_left: u32) -> Self {
        AgentTask::Heading { target, ticks_left }
    }

    fn ticks_left(&self) -> Option<u32> {
        match self {
            AgentTask::Heading { ticks_left, .. } => Some(*ticks_left),
            _ => None,
        }
    }

    fn target(&self) -> Option<usize> {
        match self {
            AgentTask::Heading { target, .. } => Some(*target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Agent {
    /// Origin row of the last node this agent activated (or the entry).
    pub(crate) position: usize,
    pub(crate) task: AgentTask,
}

/// One node of the dual-agent search tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DualState {
    pub(crate) agents: [Agent; 2],
    /// Nodes not activated yet, including the targets agents are heading to.
    pub(crate) candidates: CandidateSet,
    pub(crate) rate: u64,
    /// 1-based minute this state starts in.
    pub(crate) minute: u32,
    pub(crate) accumulated: u64,
}

impl DualState {
    pub(crate) fn root(entry_row: usize, candidates: CandidateSet) -> Self {
        let agent = Agent { position: entry_row, task: AgentTask::Free };
        Self { agents: [agent; 2], candidates, rate: 0, minute: 1, accumulated: 0 }
    }

    pub(crate) fn remaining(&self, time_budget: u32) -> u32 {
        (time_budget + 1).saturating_sub(self.minute)
    }

    /// Gives the agents `tasks` and moves the clock to the first completion.
    fn advance(&self, tasks: [AgentTask; 2]) -> DualState {
        let step = tasks.iter().filter_map(AgentTask::ticks_left).min().unwrap_or(0);

        let mut next = *self;
        for (agent, task) in next.agents.iter_mut().zip(tasks) {
            agent.task = match task {
                AgentTask::Heading { target, ticks_left } => AgentTask::Heading { target, ticks_left: ticks_left - step },
                other => other,
            };
        }
        next.minute += step;
        next.accumulated = next.accumulated.saturating_add(self.rate.saturating_mul(u64::from(step)));
        next
    }

    /// Agents whose travel just finished activate their target.
    fn activate_arrivals(&mut self, table: &DistanceTable) {
        for agent in self.agents.iter_mut() {
            if let AgentTask::Heading { target, ticks_left: 0 } = agent.task {
                self.rate = self.rate.saturating_add(table.reward_rate(target));
                self.candidates.remove(target);
                agent.position = target;
                agent.task = AgentTask::Free;
            }
        }
    }

    /// With both agents free and one candidate left, only the agent closer to
    /// it stays in play; the other idles for good.
    fn apply_last_candidate_rule(&mut self, table: &DistanceTable) {
        if self.agents.iter().any(|a| a.task != AgentTask::Free) || self.candidates.len() != 1 {
            return;
        }
        let Some(last) = self.candidates.iter().next() else { return };

        let first = table.time(self.agents[0].position, last);
        let second = table.time(self.agents[1].position, last);
        let idle = match (first, second) {
            (Some(a), Some(b)) if b < a => 0,
            (None, Some(_)) => 0,
            _ => 1,
        };
        self.agents[idle].task = AgentTask::Idle;
    }
}

/// Activation time from `row` to `dest` if it fits in `remaining`.
#[inline]
fn feasible(table: &DistanceTable, row: usize, dest: usize, remaining: u32) -> Option<u32> {
    table.time(row, dest).filter(|&time| time <= remaining)
}

/// Members of `set`, highest rate first.
fn by_rate(table: &DistanceTable, set: CandidateSet) -> impl Iterator<Item = usize> + '_ {
    table.indices_by_rate().iter().copied().filter(move |&index| set.contains(index))
}

struct DualAgentSearch<'a> {
    table: &'a DistanceTable,
    time_budget: u32,
    pruning: bool,
    best: u64,
    stats: SearchStats,
    shared_best: Option<&'a AtomicU64>,
}

impl<'a> DualAgentSearch<'a> {
    fn explore(&mut self, mut state: DualState) {
        self.stats.visited += 1;

        state.activate_arrivals(self.table);
        state.apply_last_candidate_rule(self.table);

        let remaining = state.remaining(self.time_budget);
        let baseline = state.accumulated.saturating_add(state.rate.saturating_mul(u64::from(remaining)));
        self.record(baseline);

        if remaining == 0 {
            return;
        }
        if self.pruning && self.cannot_improve(&state, remaining, baseline) {
            self.stats.pruned += 1;
            return;
        }

        match (state.agents[0].task, state.agents[1].task) {
            (AgentTask::Free, AgentTask::Free) => self.assign_both(&state, remaining),
            (AgentTask::Free, other) => self.assign_one(&state, 0, other, remaining),
            (other, AgentTask::Free) => self.assign_one(&state, 1, other, remaining),
            _ => {}
        }
    }

    /// Every ordered pair of distinct reachable targets, then every single
    /// target for one agent while the other idles for good.
    fn assign_both(&mut self, state: &DualState, remaining: u32) {
        let table = self.table;
        let [first, second] = state.agents;

        for a in by_rate(table, state.candidates) {
            let Some(time_a) = feasible(table, first.position, a, remaining) else { continue };
            for b in by_rate(table, state.candidates.without(a)) {
                let Some(time_b) = feasible(table, second.position, b, remaining) else { continue };
                self.explore(state.advance([AgentTask::heading(a, time_a), AgentTask::heading(b, time_b)]));
            }
        }

        for c in by_rate(table, state.candidates) {
            if let Some(time) = feasible(table, first.position, c, remaining) {
                self.explore(state.advance([AgentTask::heading(c, time), AgentTask::Idle]));
            }
            if let Some(time) = feasible(table, second.position, c, remaining) {
                self.explore(state.advance([AgentTask::Idle, AgentTask::heading(c, time)]));
            }
        }
    }

    /// Agent `free` picks any unclaimed reachable target while the other keeps
    /// its task. It may also idle for good and leave the rest to its partner,
    /// in which case the clock runs to the partner's activation.
    fn assign_one(&mut self, state: &DualState, free: usize, other: AgentTask, remaining: u32) {
        let table = self.table;
        let position = state.agents[free].position;
        let available = match other.target() {
            Some(claimed) => state.candidates.without(claimed),
            None => state.candidates,
        };

        let mut tasks = [other; 2];

        for c in by_rate(table, available) {
            let Some(time) = feasible(table, position, c, remaining) else { continue };
            tasks[free] = AgentTask::heading(c, time);
            self.explore(state.advance(tasks));
        }

        if other.target().is_some() {
            tasks[free] = AgentTask::Idle;
            self.explore(state.advance(tasks));
        }
    }

    fn record(&mut self, value: u64) {
        if value > self.best {
            self.best = value;
            if let Some(shared) = self.shared_best {
                shared.fetch_max(value, Ordering::Relaxed);
            }
        }
    }

    fn best_known(&self) -> u64 {
        match self.shared_best {
            Some(shared) => self.best.max(shared.load(Ordering::Relaxed)),
            None => self.best,
        }
    }

    /// True when even the optimistic bound of this state cannot beat the best
    /// value known so far.
    fn cannot_improve(&self, state: &DualState, remaining: u32, baseline: u64) -> bool {
        let mut future = state.candidates;
        let mut pending = 0;
        let mut slots = [0u32; 2];
        let mut working = 0;

        for agent in &state.agents {
            if let AgentTask::Heading { target, ticks_left } = agent.task {
                future.remove(target);
                pending = self.table.reward_rate(target).saturating_mul(u64::from(remaining - ticks_left)).saturating_add(pending);
                slots[working] = ticks_left + MIN_ACTIVATION_GAP;
                working += 1;
            }
        }
        for agent in &state.agents {
            if agent.task == AgentTask::Free {
                if let Some(first) = earliest_activation(self.table, agent.position, future) {
                    slots[working] = first;
                    working += 1;
                }
            }
        }

        let gain = optimistic_gain(self.table, future, remaining, &mut slots[..working]);
        baseline.saturating_add(pending).saturating_add(gain) <= self.best_known()
    }
}
