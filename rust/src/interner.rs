//! Dense indexing of task ids.
//!
//! Maps `TaskId`s to contiguous indices so per-task data can live in plain
//! vectors indexed by position.

use rustc_hash::FxHashMap;

use crate::models::TaskId;

/// Bidirectional `TaskId` <-> index mapping, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex {
    to_index: FxHashMap<TaskId, usize>,
    ids: Vec<TaskId>,
}

impl TaskIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Insert an id, returning `None` if it was already present.
    pub fn insert(&mut self, id: TaskId) -> Option<usize> {
        if self.to_index.contains_key(&id) {
            return None;
        }
        let idx = self.ids.len();
        self.ids.push(id);
        self.to_index.insert(id, idx);
        Some(idx)
    }

    #[inline]
    pub fn get(&self, id: TaskId) -> Option<usize> {
        self.to_index.get(&id).copied()
    }

    /// Id at a position. Panics on an index this map never handed out.
    #[inline]
    pub fn id(&self, idx: usize) -> TaskId {
        self.ids[idx]
    }

    /// All ids in insertion order.
    pub fn ids(&self) -> &[TaskId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_resolve() {
        let mut index = TaskIndex::with_capacity(4);

        assert_eq!(index.insert(TaskId(10)), Some(0));
        assert_eq!(index.insert(TaskId(3)), Some(1));
        assert_eq!(index.insert(TaskId(10)), None); // duplicate

        assert_eq!(index.get(TaskId(3)), Some(1));
        assert_eq!(index.get(TaskId(99)), None);
        assert_eq!(index.id(0), TaskId(10));
        assert_eq!(index.ids(), &[TaskId(10), TaskId(3)]);
        assert_eq!(index.len(), 2);
    }
}
