use std::fmt;

use crate::domain::distance_table::DistanceTable;
use crate::domain::utils::id::NodeId;
use crate::error::{Error, Result};

/// Reward-bearing nodes that have not been activated yet, as a bitset over
/// the reward indices of a [`DistanceTable`].
///
/// The set is `Copy`; a branch of the search takes its own copy and removes
/// from it, siblings never see each other's changes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CandidateSet {
    bits: u64,
}

impl CandidateSet {
    pub fn empty() -> Self {
        Self { bits: 0 }
    }

    /// Every reward-bearing node of the table.
    pub fn all(table: &DistanceTable) -> Self {
        let count = table.reward_count();
        let bits = if count >= 64 { u64::MAX } else { (1u64 << count) - 1 };
        Self { bits }
    }

    /// The given nodes only. Fails with `UnknownNode` for an id that is not
    /// reward-bearing in `table`.
    pub fn from_ids<'a>(table: &DistanceTable, ids: impl IntoIterator<Item = &'a NodeId>) -> Result<Self> {
        let mut set = CandidateSet::empty();
        for id in ids {
            let index = table.reward_index(id).ok_or_else(|| Error::UnknownNode(id.to_string()))?;
            set.insert(index);
        }
        Ok(set)
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        index < 64 && self.bits & (1u64 << index) != 0
    }

    #[inline]
    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < 64);
        self.bits |= 1u64 << index;
    }

    #[inline]
    pub fn remove(&mut self, index: usize) {
        if index < 64 {
            self.bits &= !(1u64 << index);
        }
    }

    /// Copy of this set without `index`.
    #[inline]
    pub fn without(&self, index: usize) -> Self {
        let mut next = *self;
        next.remove(index);
        next
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Reward indices in ascending order.
    pub fn iter(&self) -> CandidateIter {
        CandidateIter { bits: self.bits }
    }

    pub fn ids<'a>(&self, table: &'a DistanceTable) -> Vec<&'a NodeId> {
        self.iter().filter_map(|index| table.reward_id(index)).collect()
    }
}

impl fmt::Debug for CandidateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

pub struct CandidateIter {
    bits: u64,
}

impl Iterator for CandidateIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.bits == 0 {
            return None;
        }
        let index = self.bits.trailing_zeros() as usize;
        self.bits &= self.bits - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for CandidateIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::scenario_dto::NodeRecordDto;
    use crate::domain::graph::Graph;

    fn table() -> DistanceTable {
        let records = vec![
            NodeRecordDto::new("AA", 0, &["BB", "CC", "DD"]),
            NodeRecordDto::new("BB", 1, &["AA"]),
            NodeRecordDto::new("CC", 2, &["AA"]),
            NodeRecordDto::new("DD", 3, &["AA"]),
        ];
        DistanceTable::build(&Graph::build(records, "AA").unwrap()).unwrap()
    }

    #[test]
    fn test_all_covers_every_reward_node() {
        let set = CandidateSet::all(&table());
        assert_eq!(set.len(), 3);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_without_leaves_original_untouched() {
        let set = CandidateSet::all(&table());
        let branch = set.without(1);

        assert_eq!(set.len(), 3);
        assert_eq!(branch.len(), 2);
        assert!(!branch.contains(1));
        assert!(branch.contains(0) && branch.contains(2));
    }

    #[test]
    fn test_from_ids() {
        let table = table();
        let ids = [NodeId::new("DD"), NodeId::new("BB")];
        let set = CandidateSet::from_ids(&table, &ids).unwrap();

        let names: Vec<&str> = set.ids(&table).iter().map(|id| id.as_str()).collect();
        assert_eq!(names, vec!["BB", "DD"]);
    }

    #[test]
    fn test_from_ids_rejects_zero_rate_node() {
        let table = table();
        let err = CandidateSet::from_ids(&table, &[NodeId::new("AA")]).unwrap_err();
        assert!(matches!(err, Error::UnknownNode(ref id) if id == "AA"));
    }

    #[test]
    fn test_full_width_set() {
        let mut set = CandidateSet::empty();
        for i in 0..64 {
            set.insert(i);
        }
        assert_eq!(set.len(), 64);
        assert_eq!(set.iter().last(), Some(63));
        assert_eq!(set.without(63).len(), 63);
    }
}
