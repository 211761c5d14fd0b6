use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::graph::Graph;
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};

/// Upper limit on reward-bearing nodes, set by the 64-bit candidate set.
pub const MAX_REWARD_NODES: usize = 64;

/// Activation times between every origin and every reward-bearing node.
///
/// Origins are the entry node plus all reward-bearing nodes. The activation
/// time from an origin to a destination is the shortest edge count between
/// them plus one tick for the activation itself, so it is never below 1.
/// Destinations that cannot be reached from an origin have no entry.
///
/// Reward-bearing nodes are numbered `0..reward_count()` in id order; the
/// same number is used as their origin row. A non-rewarding entry gets the
/// extra row `reward_count()`.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    reward_ids: Vec<NodeId>,
    reward_index: HashMap<NodeId, usize>,
    rates: Vec<u64>,
    /// Reward indices ordered by descending rate, ties by index.
    by_rate: Vec<usize>,
    rows: Vec<Vec<Option<u32>>>,
    entry: NodeId,
    entry_row: usize,
}

impl DistanceTable {
    /// Runs one breadth-first search per origin over the whole graph.
    pub fn build(graph: &Graph) -> Result<DistanceTable> {
        let reward_nodes = graph.reward_nodes();
        if reward_nodes.len() > MAX_REWARD_NODES {
            return Err(Error::TooManyRewardNodes { count: reward_nodes.len(), max: MAX_REWARD_NODES });
        }

        let reward_ids: Vec<NodeId> = reward_nodes.iter().map(|n| n.id.clone()).collect();
        let rates: Vec<u64> = reward_nodes.iter().map(|n| n.reward_rate).collect();
        let reward_index: HashMap<NodeId, usize> = reward_ids.iter().cloned().enumerate().map(|(index, id)| (id, index)).collect();

        let mut origins = reward_ids.clone();
        let entry = graph.entry().clone();
        let entry_row = match reward_index.get(&entry) {
            Some(&index) => index,
            None => {
                origins.push(entry.clone());
                origins.len() - 1
            }
        };

        let rows = origins.iter().map(|origin| DistanceTable::bfs_row(graph, origin, &reward_index)).collect();

        let mut by_rate: Vec<usize> = (0..rates.len()).collect();
        by_rate.sort_by(|&a, &b| rates[b].cmp(&rates[a]).then(a.cmp(&b)));

        let table = DistanceTable { reward_ids, reward_index, rates, by_rate, rows, entry, entry_row };

        let unreachable = (0..table.reward_count()).filter(|&dest| table.rows[entry_row][dest].is_none()).count();
        if unreachable > 0 {
            log::warn!("{} reward-bearing nodes cannot be reached from entry '{}'.", unreachable, table.entry);
        }
        log::info!("Distance table built: {} origins, {} reward-bearing destinations.", table.rows.len(), table.reward_count());

        Ok(table)
    }

    /// Unit-cost breadth-first search from `origin`, following declared neighbor lists.
    fn bfs_row(graph: &Graph, origin: &NodeId, reward_index: &HashMap<NodeId, usize>) -> Vec<Option<u32>> {
        let mut row = vec![None; reward_index.len()];
        let mut visited: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<(&NodeId, u32)> = VecDeque::new();

        visited.insert(origin);
        queue.push_back((origin, 0));

        while let Some((current, distance)) = queue.pop_front() {
            if let Some(&index) = reward_index.get(current) {
                row[index] = Some(distance + 1);
            }

            let Some(node) = graph.node(current) else { continue };
            for neighbor in &node.neighbors {
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, distance + 1));
                }
            }
        }

        log::debug!("BFS from '{}': {} of {} reward-bearing nodes reachable.", origin, row.iter().flatten().count(), row.len());
        row
    }

    pub fn entry(&self) -> &NodeId {
        &self.entry
    }

    pub(crate) fn entry_row(&self) -> usize {
        self.entry_row
    }

    pub fn reward_count(&self) -> usize {
        self.rates.len()
    }

    pub fn reward_index(&self, id: &NodeId) -> Option<usize> {
        self.reward_index.get(id).copied()
    }

    pub fn reward_id(&self, index: usize) -> Option<&NodeId> {
        self.reward_ids.get(index)
    }

    pub fn reward_rate(&self, index: usize) -> u64 {
        self.rates[index]
    }

    pub(crate) fn indices_by_rate(&self) -> &[usize] {
        &self.by_rate
    }

    /// Origin row of `id`: its reward index, or the entry row.
    pub fn origin_row(&self, id: &NodeId) -> Option<usize> {
        match self.reward_index(id) {
            Some(index) => Some(index),
            None if *id == self.entry => Some(self.entry_row()),
            None => None,
        }
    }

    /// Activation time from origin row `row` to reward index `dest`.
    #[inline]
    pub(crate) fn time(&self, row: usize, dest: usize) -> Option<u32> {
        self.rows[row][dest]
    }

    /// Ticks to travel from `from` to `to` and activate it.
    ///
    /// `None` if `from` is not an origin, `to` is not reward-bearing, or `to`
    /// is unreachable from `from`.
    pub fn activation_time(&self, from: &NodeId, to: &NodeId) -> Option<u32> {
        let row = self.origin_row(from)?;
        let dest = self.reward_index(to)?;
        self.time(row, dest)
    }

    /// All reachable reward-bearing destinations of `from` with their activation times.
    pub fn destinations(&self, from: &NodeId) -> HashMap<NodeId, u32> {
        let Some(row) = self.origin_row(from) else {
            return HashMap::new();
        };

        self.rows[row]
            .iter()
            .enumerate()
            .filter_map(|(dest, time)| Some((self.reward_id(dest)?.clone(), (*time)?)))
            .collect()
    }
}
