//! In-memory record store.

use super::model::Record;
use std::collections::HashSet;

/// A record removed by [`RecordStore::remove_many`], kept for rollback.
#[derive(Debug, Clone, PartialEq)]
pub struct RemovedRecord {
    /// Position the record occupied before removal
    pub index: usize,
    pub record: Record,
}

/// Ordered, in-memory collection of API records.
///
/// Uniqueness of IDs is the caller's responsibility; lookups act on every
/// record sharing an ID. `version` grows on every content change and keys the
/// memoized hierarchy view.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    version: u64,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `records` in the given order.
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            version: 1,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Content version, bumped by every mutation that changes the records.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Appends a record. No uniqueness check.
    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
        self.touch();
    }

    /// Removes every record with the given ID. Returns how many were removed.
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.id() != id);
        let removed = before - self.records.len();
        if removed > 0 {
            self.touch();
        }
        removed
    }

    /// Shallow-merges `record` into the entries sharing its ID.
    ///
    /// Returns `false` (and leaves the store untouched) when the ID is absent.
    pub fn update(&mut self, record: Record) -> bool {
        let mut matched = false;
        for existing in self.records.iter_mut().filter(|r| r.id() == record.id()) {
            existing.merge(record.clone());
            matched = true;
        }
        if matched {
            self.touch();
        }
        matched
    }

    /// Removes every record whose ID is in `ids`.
    ///
    /// The removed records are returned with their former positions so a
    /// failed persistence call can put them back with [`RecordStore::restore`].
    pub fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Vec<RemovedRecord> {
        let ids: HashSet<&str> = ids.iter().map(|id| id.as_ref()).collect();
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.records.len());

        for (index, record) in std::mem::take(&mut self.records).into_iter().enumerate() {
            if ids.contains(record.id()) {
                removed.push(RemovedRecord { index, record });
            } else {
                kept.push(record);
            }
        }

        self.records = kept;
        if !removed.is_empty() {
            self.touch();
        }
        removed
    }

    /// Updates the record if its ID exists, inserts it otherwise.
    pub fn upsert(&mut self, record: Record) {
        if self.contains(record.id()) {
            self.update(record);
        } else {
            self.insert(record);
        }
    }

    /// Replaces the whole content, e.g. after a bulk fetch.
    pub fn replace_all(&mut self, records: Vec<Record>) {
        self.records = records;
        self.touch();
    }

    /// Drops every record. Used when the identity goes away.
    pub fn clear(&mut self) {
        if !self.records.is_empty() {
            self.records.clear();
            self.touch();
        }
    }

    /// Reinserts previously removed records at their former positions.
    ///
    /// Positions are clamped to the current length, so records removed
    /// concurrently with other mutations still come back.
    pub fn restore(&mut self, mut removed: Vec<RemovedRecord>) {
        if removed.is_empty() {
            return;
        }
        removed.sort_by_key(|r| r.index);
        for RemovedRecord { index, record } in removed {
            let index = index.min(self.records.len());
            self.records.insert(index, record);
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use crate::record::model::{ApiRecord, CollectionRecord};

    fn api(id: &str, name: &str) -> Record {
        Record::Api(ApiRecord {
            id: id.to_string(),
            name: name.to_string(),
            collection_id: None,
            owner_id: None,
            created_ts: 1,
            updated_ts: 1,
            data: Entry::empty(),
        })
    }

    fn collection(id: &str) -> Record {
        Record::Collection(CollectionRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            collection_id: None,
            description: None,
            owner_id: None,
            created_ts: 1,
            updated_ts: 1,
            children: Vec::new(),
        })
    }

    fn ids(store: &RecordStore) -> Vec<&str> {
        store.records().iter().map(|r| r.id()).collect()
    }

    #[test]
    fn test_insert_appends_without_uniqueness_check() {
        let mut store = RecordStore::new();
        store.insert(api("a", "one"));
        store.insert(api("a", "two"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = RecordStore::from_records(vec![api("a", "one")]);
        let version = store.version();

        assert_eq!(store.remove("zzz"), 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_update_merges_existing_entry_only() {
        let mut store = RecordStore::from_records(vec![api("a", "one"), api("b", "two")]);

        assert!(store.update(api("b", "renamed")));
        assert!(!store.update(api("c", "ghost")));

        assert_eq!(store.get("a").unwrap().name(), "one");
        assert_eq!(store.get("b").unwrap().name(), "renamed");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_upsert_existing_keeps_length() {
        let mut store = RecordStore::from_records(vec![api("a", "one"), collection("c")]);

        store.upsert(api("a", "changed"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().name(), "changed");
    }

    #[test]
    fn test_upsert_new_id_grows_by_one() {
        let mut store = RecordStore::from_records(vec![api("a", "one")]);

        store.upsert(api("b", "two"));

        assert_eq!(store.len(), 2);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_many_keeps_non_members() {
        let mut store = RecordStore::from_records(vec![
            api("a", "1"),
            collection("b"),
            api("c", "3"),
            api("d", "4"),
        ]);

        let removed = store.remove_many(&["b", "d", "missing"]);

        assert_eq!(ids(&store), vec!["a", "c"]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].index, 1);
        assert_eq!(removed[1].index, 3);
    }

    #[test]
    fn test_remove_many_unknown_ids_is_noop() {
        let mut store = RecordStore::from_records(vec![api("a", "1")]);
        let version = store.version();

        let removed = store.remove_many(&["x", "y"]);

        assert!(removed.is_empty());
        assert_eq!(store.version(), version);
        assert_eq!(ids(&store), vec!["a"]);
    }

    #[test]
    fn test_restore_puts_records_back_in_place() {
        let mut store = RecordStore::from_records(vec![
            api("a", "1"),
            api("b", "2"),
            api("c", "3"),
        ]);

        let removed = store.remove_many(&["a", "c"]);
        store.restore(removed);

        assert_eq!(ids(&store), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_version_tracks_changes() {
        let mut store = RecordStore::new();
        let v0 = store.version();
        store.insert(api("a", "1"));
        let v1 = store.version();
        store.clear();
        let v2 = store.version();
        store.clear();

        assert!(v1 > v0);
        assert!(v2 > v1);
        assert_eq!(store.version(), v2);
    }
}
