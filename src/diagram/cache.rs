use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use crate::models::{StationId, Stop};

/// Station timetables fetched during one viewing session
///
/// Clones share the same entries. Entries are immutable once written and only
/// dropped all at once, when the server snapshot changes.
#[derive(Debug, Clone, Default)]
pub struct StationCache {
    entries: Rc<RefCell<HashMap<StationId, Rc<Vec<Stop>>>>>,
}

impl StationCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, station: &StationId) -> Option<Rc<Vec<Stop>>> {
        self.entries.borrow().get(station).cloned()
    }

    /// Store `rows` unless the station is already cached; returns the cached rows
    pub fn insert(&self, station: StationId, rows: Vec<Stop>) -> Rc<Vec<Stop>> {
        Rc::clone(self.entries.borrow_mut().entry(station).or_insert_with(|| Rc::new(rows)))
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Reference train routes fetched during one viewing session, by train number
///
/// Shares the snapshot scoping of [`StationCache`]: cleared together with it.
#[derive(Debug, Clone, Default)]
pub struct RouteCache {
    entries: Rc<RefCell<HashMap<String, Rc<Vec<Stop>>>>>,
}

impl RouteCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, train_number: &str) -> Option<Rc<Vec<Stop>>> {
        self.entries.borrow().get(train_number).cloned()
    }

    pub fn insert(&self, train_number: &str, route: Vec<Stop>) -> Rc<Vec<Stop>> {
        Rc::clone(
            self.entries
                .borrow_mut()
                .entry(train_number.to_string())
                .or_insert_with(|| Rc::new(route)),
        )
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let cache = StationCache::new();
        let shared = cache.clone();
        cache.insert(StationId::from("124"), vec![Stop::new("1", "124")]);
        assert_eq!(shared.len(), 1);
        assert!(shared.get(&StationId::from("124")).is_some());
    }

    #[test]
    fn test_entries_are_not_overwritten() {
        let cache = StationCache::new();
        cache.insert(StationId::from("124"), vec![Stop::new("1", "124")]);
        let rows = cache.insert(StationId::from("124"), vec![Stop::new("2", "124"), Stop::new("3", "124")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].train_number, "1");
    }

    #[test]
    fn test_clear_drops_everything() {
        let cache = StationCache::new();
        cache.insert(StationId::from("124"), Vec::new());
        cache.insert(StationId::from("719"), Vec::new());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_routes_are_shared_and_kept() {
        let routes = RouteCache::new();
        let shared = routes.clone();
        routes.insert("4423", vec![Stop::new("4423", "S1"), Stop::new("4423", "S2")]);
        let kept = shared.insert("4423", Vec::new());
        assert_eq!(kept.len(), 2);
        assert!(shared.get("4422").is_none());
        shared.clear();
        assert!(routes.is_empty());
    }
}
