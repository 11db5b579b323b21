//! Per-kind component tables
//!
//! A table is indexed directly by entity id, which the bounded pool keeps
//! small, and tracks its occupied ids in ascending order. Iteration and query
//! candidates therefore come out lowest id first without any sorting.

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// Anything `'static + Send + Sync` can be stored in a table.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Every table in a world, keyed by component kind.
pub(crate) type Tables = HashMap<TypeId, Box<dyn ComponentTable>>;

/// Kind-erased operations the world needs across all tables.
pub(crate) trait ComponentTable: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Drop the entry for `id`. Returns whether there was one.
    fn purge(&mut self, id: u32) -> bool;
    /// Occupied ids, ascending.
    fn ids(&self) -> &[u32];
}

pub(crate) struct Table<T> {
    slots: Vec<Option<T>>,
    ids: Vec<u32>,
}

impl<T: Component> Table<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            ids: Vec::new(),
        }
    }

    /// Store `value` for `id`, handing back whatever it replaced.
    pub fn insert(&mut self, id: u32, value: T) -> Option<T> {
        let slot = id as usize;
        if slot >= self.slots.len() {
            self.slots.resize_with(slot + 1, || None);
        }
        let replaced = self.slots[slot].replace(value);
        if replaced.is_none() {
            if let Err(at) = self.ids.binary_search(&id) {
                self.ids.insert(at, id);
            }
        }
        replaced
    }

    pub fn take(&mut self, id: u32) -> Option<T> {
        let value = self.slots.get_mut(id as usize)?.take()?;
        if let Ok(at) = self.ids.binary_search(&id) {
            self.ids.remove(at);
        }
        Some(value)
    }

    pub fn get(&self, id: u32) -> Option<&T> {
        self.slots.get(id as usize)?.as_ref()
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// `(id, value)` pairs, lowest id first.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &T)> + '_ {
        self.ids
            .iter()
            .filter_map(|&id| self.get(id).map(|value| (id, value)))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

impl<T: Component> ComponentTable for Table<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn purge(&mut self, id: u32) -> bool {
        self.take(id).is_some()
    }

    fn ids(&self) -> &[u32] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_and_reports_previous() {
        let mut table = Table::new();
        assert_eq!(table.insert(3, 'a'), None);
        assert_eq!(table.insert(3, 'b'), Some('a'));
        assert_eq!(table.get(3), Some(&'b'));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn ids_stay_ascending_regardless_of_insert_order() {
        let mut table = Table::new();
        for id in [7, 2, 9, 0, 4] {
            table.insert(id, id * 10);
        }
        assert_eq!(table.ids(), &[0, 2, 4, 7, 9]);

        assert!(table.purge(4));
        table.insert(1, 10);
        assert_eq!(table.ids(), &[0, 1, 2, 7, 9]);
        let values: Vec<_> = table.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![0, 10, 20, 70, 90]);
    }

    #[test]
    fn purge_absent_is_noop() {
        let mut table: Table<u8> = Table::new();
        assert!(!table.purge(99));
        table.insert(1, 5);
        assert!(table.purge(1));
        assert!(!table.purge(1));
        assert!(!table.contains(1));
        assert!(table.ids().is_empty());
    }

    #[test]
    fn take_returns_value() {
        let mut table = Table::new();
        table.insert(0, String::from("kept"));
        assert_eq!(table.take(0).as_deref(), Some("kept"));
        assert_eq!(table.take(0), None);
        assert_eq!(table.len(), 0);
    }
}
