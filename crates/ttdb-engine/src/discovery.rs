use std::collections::HashSet;

use ttdb_core::{Database, RecordId};

use crate::store::DiscoveryStore;

// Progressive discovery: only previously visited records are listed,
// searched, or toured. Order always follows file order, never visit order.
#[derive(Debug)]
pub struct DiscoveryTracker {
    store: DiscoveryStore,
    discovered: Vec<RecordId>,
    first_id: Option<RecordId>,
}

impl DiscoveryTracker {
    pub fn new(store: DiscoveryStore) -> Self {
        Self {
            store,
            discovered: Vec::new(),
            first_id: None,
        }
    }

    pub fn first_id(&self) -> Option<&RecordId> {
        self.first_id.as_ref()
    }

    pub fn discovered_order(&self) -> &[RecordId] {
        &self.discovered
    }

    pub fn len(&self) -> usize {
        self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discovered.is_empty()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.discovered.iter().any(|other| other == id)
    }

    // Intersect the persisted set with the current graph and make sure the
    // first record in file order is always discovered.
    pub fn reload(&mut self, db: &Database) {
        self.first_id = db.first_id().cloned();
        let mut set: HashSet<RecordId> = self
            .store
            .load()
            .into_iter()
            .map(RecordId::new)
            .filter(|id| db.contains(id))
            .collect();
        if let Some(first) = &self.first_id {
            set.insert(first.clone());
        }
        self.discovered = db.order.iter().filter(|id| set.contains(*id)).cloned().collect();
        self.store.save(&self.discovered);
    }

    pub fn discover(&mut self, db: &Database, id: &RecordId) -> bool {
        if !db.contains(id) {
            return false;
        }
        let mut set: HashSet<RecordId> = self.discovered.iter().cloned().collect();
        let mut changed = false;
        if let Some(first) = &self.first_id {
            if db.contains(first) && set.insert(first.clone()) {
                changed = true;
            }
        }
        if set.insert(id.clone()) {
            changed = true;
        }
        if !changed {
            return false;
        }
        self.discovered = db.order.iter().filter(|other| set.contains(*other)).cloned().collect();
        self.store.save(&self.discovered);
        true
    }

    pub fn reset(&mut self, db: &Database) {
        self.store.clear();
        self.reload(db);
    }

    // Missing backing file: drop runtime state without touching the store.
    pub fn clear(&mut self) {
        self.discovered.clear();
        self.first_id = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_database;
    use tempfile::tempdir;

    fn sample_db() -> Database {
        parse_database("@a\n---\n@b\n---\n@c")
    }

    fn tracker(dir: &tempfile::TempDir) -> DiscoveryTracker {
        DiscoveryTracker::new(DiscoveryStore::new(dir.path().join("discovery.json")))
    }

    #[test]
    fn first_record_is_always_discovered() {
        let dir = tempdir().expect("tempdir");
        let mut tracker = tracker(&dir);
        tracker.reload(&sample_db());
        let order: Vec<&str> = tracker.discovered_order().iter().map(RecordId::as_str).collect();
        assert_eq!(order, vec!["@a"]);
    }

    #[test]
    fn discovery_follows_file_order_not_visit_order() {
        let dir = tempdir().expect("tempdir");
        let db = sample_db();
        let mut tracker = tracker(&dir);
        tracker.reload(&db);

        assert!(tracker.discover(&db, &RecordId::new("@c")));
        assert!(tracker.discover(&db, &RecordId::new("@b")));
        let order: Vec<&str> = tracker.discovered_order().iter().map(RecordId::as_str).collect();
        assert_eq!(order, vec!["@a", "@b", "@c"]);
    }

    #[test]
    fn discover_is_a_noop_for_known_or_unknown_ids() {
        let dir = tempdir().expect("tempdir");
        let db = sample_db();
        let mut tracker = tracker(&dir);
        tracker.reload(&db);

        assert!(tracker.discover(&db, &RecordId::new("@b")));
        assert!(!tracker.discover(&db, &RecordId::new("@b")));
        assert!(!tracker.discover(&db, &RecordId::new("@missing")));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn discovery_is_monotonic_until_reset() {
        let dir = tempdir().expect("tempdir");
        let db = sample_db();
        let mut tracker = tracker(&dir);
        tracker.reload(&db);

        let mut sizes = vec![tracker.len()];
        tracker.discover(&db, &RecordId::new("@c"));
        sizes.push(tracker.len());
        tracker.discover(&db, &RecordId::new("@b"));
        sizes.push(tracker.len());
        assert!(sizes.windows(2).all(|pair| pair[0] <= pair[1]));

        tracker.reset(&db);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn persisted_ids_survive_reload_but_unknown_ids_do_not() {
        let dir = tempdir().expect("tempdir");
        let db = sample_db();
        {
            let mut tracker = tracker(&dir);
            tracker.reload(&db);
            tracker.discover(&db, &RecordId::new("@c"));
        }

        let mut tracker = tracker(&dir);
        let smaller = parse_database("@a\n---\n@b");
        tracker.reload(&smaller);
        let order: Vec<&str> = tracker.discovered_order().iter().map(RecordId::as_str).collect();
        assert_eq!(order, vec!["@a"]);
    }
}
