use std::collections::HashMap;

use crate::api::scenario_dto::NodeRecordDto;
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};

/// A location in the graph.
///
/// Nodes with a zero reward rate are pass-through only: they can be walked
/// across but are never worth activating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub reward_rate: u64,
    pub neighbors: Vec<NodeId>,
}

impl Node {
    pub fn is_reward_bearing(&self) -> bool {
        self.reward_rate > 0
    }
}

/// Immutable node graph with a designated entry node.
///
/// Cycles are allowed. Every neighbor reference is guaranteed to resolve to a
/// node of the graph, and the entry node is guaranteed to exist.
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    entry: NodeId,
}

impl Graph {
    /// Builds and validates a graph from raw node records.
    ///
    /// Fails with `DuplicateNode` if two records share an id, `MalformedInput`
    /// if a neighbor list names an undefined node, and `UnreachableEntry` if
    /// `entry` is not among the records.
    pub fn build(records: Vec<NodeRecordDto>, entry: &str) -> Result<Graph> {
        let mut nodes: HashMap<NodeId, Node> = HashMap::with_capacity(records.len());

        for record in records {
            let id = NodeId::new(record.id);
            if nodes.contains_key(&id) {
                return Err(Error::DuplicateNode(id.into()));
            }
            let neighbors = record.neighbors.into_iter().map(NodeId::new).collect();
            nodes.insert(id.clone(), Node { id, reward_rate: record.reward_rate, neighbors });
        }

        Graph::check_neighbors(&nodes)?;

        let entry = NodeId::new(entry);
        if !nodes.contains_key(&entry) {
            return Err(Error::UnreachableEntry(entry.into()));
        }

        let graph = Graph { nodes, entry };
        log::info!(
            "Graph built: {} nodes, {} reward-bearing, entry '{}'.",
            graph.len(),
            graph.reward_nodes().len(),
            graph.entry
        );
        Ok(graph)
    }

    /// Reports the first undefined neighbor, scanning nodes in id order so the
    /// error is the same on every run.
    fn check_neighbors(nodes: &HashMap<NodeId, Node>) -> Result<()> {
        let mut ids: Vec<&NodeId> = nodes.keys().collect();
        ids.sort();

        for id in ids {
            let node = &nodes[id];
            if let Some(missing) = node.neighbors.iter().find(|n| !nodes.contains_key(*n)) {
                return Err(Error::MalformedInput { node: id.to_string(), neighbor: missing.to_string() });
            }
        }
        Ok(())
    }

    pub fn entry(&self) -> &NodeId {
        &self.entry
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Nodes with a positive reward rate, ordered by id.
    pub fn reward_nodes(&self) -> Vec<&Node> {
        let mut reward_nodes: Vec<&Node> = self.nodes.values().filter(|n| n.is_reward_bearing()).collect();
        reward_nodes.sort_by(|a, b| a.id.cmp(&b.id));
        reward_nodes
    }
}
