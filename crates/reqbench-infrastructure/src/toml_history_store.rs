//! TOML-file backed HistoryStore implementation.

use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use reqbench_core::entry::Entry;
use reqbench_core::error::{ClientError, Result};
use reqbench_core::history::HistoryStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// On-disk layout of the history file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryFile {
    #[serde(default)]
    entries: Vec<Entry>,
}

/// Persists request history as a single TOML file.
///
/// Blocking file I/O runs on the blocking thread pool; every write is an
/// atomic read-modify-write under a lock file.
#[derive(Clone)]
pub struct TomlHistoryStore {
    file: Arc<AtomicTomlFile<HistoryFile>>,
}

impl TomlHistoryStore {
    /// Creates a store for the file at `path`. The file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path)),
        }
    }

    async fn run_blocking<R, F>(&self, op: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<HistoryFile>) -> Result<R> + Send + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || op(&file))
            .await
            .map_err(|e| ClientError::internal(format!("Failed to join task: {}", e)))?
    }
}

#[async_trait]
impl HistoryStore for TomlHistoryStore {
    async fn append_history(&self, entry: &Entry) -> Result<()> {
        let entry = entry.clone();
        self.run_blocking(move |file| {
            file.update(HistoryFile::default(), |history| {
                history.entries.push(entry);
                Ok(())
            })
        })
        .await
    }

    async fn clear_history(&self) -> Result<()> {
        self.run_blocking(|file| file.save(&HistoryFile::default()))
            .await?;
        tracing::debug!("Cleared history file {:?}", self.file.path());
        Ok(())
    }

    async fn read_history(&self) -> Result<Vec<Entry>> {
        self.run_blocking(|file| Ok(file.load()?.unwrap_or_default().entries))
            .await
    }
}
