//! Append-only request history.

use super::store::HistoryStore;
use crate::entry::Entry;
use crate::error::{ClientError, Result};
use std::sync::Arc;

/// In-memory history of executed requests, mirrored to a [`HistoryStore`].
///
/// Append-only apart from [`HistoryLog::clear`]. Persistence failures are
/// logged and never undo the in-memory change, so an entry may be visible
/// for the session yet missing after a reload.
pub struct HistoryLog {
    entries: Vec<Entry>,
    store: Arc<dyn HistoryStore>,
}

impl HistoryLog {
    /// Creates an empty log backed by `store` without reading it.
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self {
            entries: Vec::new(),
            store,
        }
    }

    /// Creates a log seeded with the persisted history.
    ///
    /// A failed read yields an empty log.
    pub async fn load(store: Arc<dyn HistoryStore>) -> Self {
        let entries = match store.read_history().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read persisted history: {}", e);
                Vec::new()
            }
        };
        tracing::debug!("Loaded {} history entries", entries.len());
        Self { entries, store }
    }

    /// Appends `entry` in memory and to the store.
    pub async fn append(&mut self, entry: Entry) {
        if let Err(e) = self.store.append_history(&entry).await {
            tracing::warn!("Failed to persist history entry: {}", e);
        }
        self.entries.push(entry);
    }

    /// Empties the log and the store.
    ///
    /// Both happen under the same `&mut` borrow, so no caller observes one
    /// cleared without the other.
    pub async fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.clear_history().await {
            tracing::warn!("Failed to clear persisted history: {}", e);
        }
    }

    /// Returns the entry at `index`, or `OutOfRange`.
    pub fn select_at(&self, index: usize) -> Result<&Entry> {
        self.entries.get(index).ok_or(ClientError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Lenient lookup; stale indices yield `None`.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for HistoryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryLog")
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{Request, RequestMethod};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock HistoryStore for testing
    #[derive(Default)]
    struct MockHistoryStore {
        entries: Mutex<Vec<Entry>>,
        fail_writes: bool,
    }

    #[async_trait]
    impl HistoryStore for MockHistoryStore {
        async fn append_history(&self, entry: &Entry) -> Result<()> {
            if self.fail_writes {
                return Err(ClientError::io("disk full"));
            }
            self.entries.lock().unwrap().push(entry.clone());
            Ok(())
        }

        async fn clear_history(&self) -> Result<()> {
            self.entries.lock().unwrap().clear();
            Ok(())
        }

        async fn read_history(&self) -> Result<Vec<Entry>> {
            Ok(self.entries.lock().unwrap().clone())
        }
    }

    fn entry(url: &str) -> Entry {
        Entry::from_request(Request::new(RequestMethod::Get, url))
    }

    #[tokio::test]
    async fn test_append_then_clear_empties_both() {
        let store = Arc::new(MockHistoryStore::default());
        let mut log = HistoryLog::load(store.clone()).await;

        log.append(entry("https://a.test")).await;
        log.append(entry("https://b.test")).await;
        assert_eq!(log.len(), 2);
        assert_eq!(store.read_history().await.unwrap().len(), 2);

        log.clear().await;

        assert_eq!(log.len(), 0);
        assert!(store.read_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_memory_entry() {
        let store = Arc::new(MockHistoryStore {
            fail_writes: true,
            ..Default::default()
        });
        let mut log = HistoryLog::new(store.clone());

        log.append(entry("https://a.test")).await;

        assert_eq!(log.len(), 1);
        assert!(store.read_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_reads_persisted_entries() {
        let store = Arc::new(MockHistoryStore::default());
        store.append_history(&entry("https://persisted.test")).await.unwrap();

        let log = HistoryLog::load(store).await;

        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].request.url, "https://persisted.test");
    }

    #[tokio::test]
    async fn test_select_at_bounds() {
        let store = Arc::new(MockHistoryStore::default());
        let mut log = HistoryLog::new(store);
        log.append(entry("https://a.test")).await;

        assert_eq!(log.select_at(0).unwrap().request.url, "https://a.test");
        assert_eq!(
            log.select_at(1).unwrap_err(),
            ClientError::OutOfRange { index: 1, len: 1 }
        );
        assert!(log.get(7).is_none());
    }
}
