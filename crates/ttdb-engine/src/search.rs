use std::collections::HashMap;

use ttdb_core::{Database, RecordId};

// One case-folded blob per record (title + header + body). Filtering is a
// plain substring test over the discovered order.
#[derive(Debug, Default)]
pub struct SearchIndex {
    blobs: HashMap<RecordId, String>,
}

impl SearchIndex {
    pub fn rebuild(&mut self, db: &Database) {
        self.blobs.clear();
        for id in &db.order {
            let Some(record) = db.get(id) else {
                continue;
            };
            let mut blob = String::new();
            for part in [record.title.as_deref().unwrap_or(""), &record.header, &record.body] {
                if part.is_empty() {
                    continue;
                }
                if !blob.is_empty() {
                    blob.push('\n');
                }
                blob.push_str(part);
            }
            self.blobs.insert(id.clone(), blob.to_lowercase());
        }
    }

    pub fn blob(&self, id: &RecordId) -> Option<&str> {
        self.blobs.get(id).map(String::as_str)
    }

    // `term` is expected trimmed and lower-cased; empty means "everything".
    pub fn filter(&self, term: &str, discovered: &[RecordId]) -> Vec<RecordId> {
        if term.is_empty() {
            return discovered.to_vec();
        }
        discovered
            .iter()
            .filter(|id| self.blobs.get(*id).is_some_and(|blob| blob.contains(term)))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_database;

    fn indexed() -> (Database, SearchIndex) {
        let db = parse_database(
            "@a\n## Alpha Term\nAbout WIDGETS.\n---\n@b\n## Beta\nAbout gears.\n---\n@c\nwidgets again",
        );
        let mut index = SearchIndex::default();
        index.rebuild(&db);
        (db, index)
    }

    #[test]
    fn empty_term_returns_discovered_order() {
        let (db, index) = indexed();
        let hits = index.filter("", &db.order);
        assert_eq!(hits, db.order);
    }

    #[test]
    fn filter_is_case_folded_and_order_preserving() {
        let (db, index) = indexed();
        let filtered = index.filter("widgets", &db.order);
        let hits: Vec<&str> = filtered.iter().map(RecordId::as_str).collect();
        assert_eq!(hits, vec!["@a", "@c"]);
    }

    #[test]
    fn filter_respects_the_given_subset() {
        let (_db, index) = indexed();
        let discovered = vec![RecordId::new("@c")];
        let filtered = index.filter("widgets", &discovered);
        let hits: Vec<&str> = filtered.iter().map(RecordId::as_str).collect();
        assert_eq!(hits, vec!["@c"]);
    }

    #[test]
    fn title_and_header_are_searchable() {
        let (db, index) = indexed();
        assert_eq!(index.filter("alpha term", &db.order).len(), 1);
        assert_eq!(index.filter("@b", &db.order).len(), 1);
    }
}
