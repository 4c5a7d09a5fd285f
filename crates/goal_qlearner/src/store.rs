//! Per-goal Q-table storage.

use crate::goal::GoalKey;
use crate::table::QTable;
use std::collections::HashMap;

/// Owns one [`QTable`] per goal, all with the same shape.
///
/// Tables are created lazily on first use and are only dropped when the whole
/// store is cleared or reset for a new environment.
#[derive(Debug, Clone, Default)]
pub struct QTableStore {
    state_count: usize,
    action_count: usize,
    tables: HashMap<GoalKey, QTable>,
}

impl QTableStore {
    /// Creates an empty store whose tables will be `[state_count][action_count]`.
    pub fn new(state_count: usize, action_count: usize) -> Self {
        Self {
            state_count,
            action_count,
            tables: HashMap::new(),
        }
    }

    /// Returns the table for `key`, allocating a zero table if there is none.
    pub fn get_or_create(&mut self, key: &GoalKey) -> &mut QTable {
        let (states, actions) = (self.state_count, self.action_count);
        self.tables.entry(key.clone()).or_insert_with(|| {
            log::debug!("Creating Q-table {}x{} for goal {}", states, actions, key);
            QTable::zeros(states, actions)
        })
    }

    /// Returns the table for `key`, if it exists.
    pub fn get(&self, key: &GoalKey) -> Option<&QTable> {
        self.tables.get(key)
    }

    /// Returns `true` when a table exists for `key`.
    pub fn contains(&self, key: &GoalKey) -> bool {
        self.tables.contains_key(key)
    }

    /// Number of stored tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns `true` when no table has been created yet.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Keys of all stored tables, in no particular order.
    pub fn goals(&self) -> impl Iterator<Item = &GoalKey> {
        self.tables.keys()
    }

    /// `(state_count, action_count)` of the tables in this store.
    pub fn shape(&self) -> (usize, usize) {
        (self.state_count, self.action_count)
    }

    /// Drops every table, keeping the shape.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Drops every table and changes the shape of future tables.
    pub fn reset(&mut self, state_count: usize, action_count: usize) {
        self.tables.clear();
        self.state_count = state_count;
        self.action_count = action_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::Goal;

    fn key(targets: &[i64]) -> GoalKey {
        Goal::new(targets.to_vec()).unwrap().key()
    }

    #[test]
    fn test_get_or_create_allocates_zero_table() {
        let mut store = QTableStore::new(16, 4);
        assert!(store.is_empty());

        let table = store.get_or_create(&key(&[2, 3]));
        assert_eq!(table.shape(), (16, 4));
        assert!(table.is_zero());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut store = QTableStore::new(4, 2);
        let k = key(&[3]);

        store.get_or_create(&k).set(1, 1, 0.9).unwrap();
        let again = store.get_or_create(&k);
        assert_eq!(again.get(1, 1).unwrap(), 0.9);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_tables_are_disjoint_per_goal() {
        let mut store = QTableStore::new(4, 2);
        store.get_or_create(&key(&[2, 13])).set(0, 0, 1.0).unwrap();
        store.get_or_create(&key(&[21, 3]));

        assert_eq!(store.len(), 2);
        assert!(store.get(&key(&[21, 3])).unwrap().is_zero());
        assert!(store.contains(&key(&[2, 13])));
        assert!(!store.contains(&key(&[2, 1, 3])));
    }

    #[test]
    fn test_reset_changes_shape() {
        let mut store = QTableStore::new(4, 2);
        store.get_or_create(&key(&[1]));
        store.reset(9, 3);

        assert!(store.is_empty());
        assert_eq!(store.shape(), (9, 3));
        assert_eq!(store.get_or_create(&key(&[1])).shape(), (9, 3));
    }

    #[test]
    fn test_clear_keeps_shape() {
        let mut store = QTableStore::new(4, 2);
        store.get_or_create(&key(&[1]));
        store.get_or_create(&key(&[2]));
        assert_eq!(store.goals().count(), 2);

        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.shape(), (4, 2));
    }
}
