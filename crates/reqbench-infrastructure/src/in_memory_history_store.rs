//! Process-local HistoryStore, used when history persistence is disabled.

use async_trait::async_trait;
use reqbench_core::entry::Entry;
use reqbench_core::error::Result;
use reqbench_core::history::HistoryStore;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: Mutex<Vec<Entry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append_history(&self, entry: &Entry) -> Result<()> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }

    async fn clear_history(&self) -> Result<()> {
        self.entries.lock().await.clear();
        Ok(())
    }

    async fn read_history(&self) -> Result<Vec<Entry>> {
        Ok(self.entries.lock().await.clone())
    }
}
