//! Loads `config.toml` and builds the collaborators it configures.

use crate::in_memory_history_store::InMemoryHistoryStore;
use crate::paths::ReqbenchPaths;
use crate::storage::AtomicTomlFile;
use crate::toml_history_store::TomlHistoryStore;
use reqbench_core::config::ClientConfig;
use reqbench_core::error::{ClientError, Result};
use reqbench_core::history::HistoryStore;
use std::sync::Arc;

/// Reads and writes the client configuration.
pub struct ConfigService {
    paths: ReqbenchPaths,
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    /// Creates a service for the config file resolved by `paths`.
    pub fn new(paths: ReqbenchPaths) -> Result<Self> {
        let config_file = paths
            .config_file()
            .map_err(|e| ClientError::config(e.to_string()))?;
        Ok(Self {
            paths,
            file: AtomicTomlFile::new(config_file),
        })
    }

    /// Loads the configuration, falling back to defaults when the file is
    /// missing or empty.
    pub fn load(&self) -> Result<ClientConfig> {
        match self.file.load()? {
            Some(config) => Ok(config),
            None => {
                tracing::debug!("No config file at {:?}, using defaults", self.file.path());
                Ok(ClientConfig::default())
            }
        }
    }

    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file.save(config)
    }

    /// Builds the history store selected by `config.history`.
    pub fn history_store(&self, config: &ClientConfig) -> Result<Arc<dyn HistoryStore>> {
        if !config.history.persist {
            return Ok(Arc::new(InMemoryHistoryStore::new()));
        }

        let path = self
            .paths
            .history_file(&config.history.file_name)
            .map_err(|e| ClientError::config(e.to_string()))?;
        tracing::info!("Persisting history to {:?}", path);
        Ok(Arc::new(TomlHistoryStore::new(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqbench_core::entry::Entry;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()))).unwrap();

        assert_eq!(service.load().unwrap(), ClientConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::new(ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()))).unwrap();
        let mut config = ClientConfig::default();
        config.debug.log_level = "debug".to_string();
        config.history.file_name = "requests.toml".to_string();

        service.save(&config).unwrap();

        assert_eq!(service.load().unwrap(), config);
    }

    #[tokio::test]
    async fn test_persistent_history_store_writes_configured_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()));
        let service = ConfigService::new(paths.clone()).unwrap();

        let store = service.history_store(&ClientConfig::default()).unwrap();
        store.append_history(&Entry::empty()).await.unwrap();

        assert!(paths.history_file("history.toml").unwrap().exists());
    }

    #[tokio::test]
    async fn test_disabled_persistence_uses_memory() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()));
        let service = ConfigService::new(paths.clone()).unwrap();
        let mut config = ClientConfig::default();
        config.history.persist = false;

        let store = service.history_store(&config).unwrap();
        store.append_history(&Entry::empty()).await.unwrap();

        assert_eq!(store.read_history().await.unwrap().len(), 1);
        assert!(!paths.history_file("history.toml").unwrap().exists());
    }
}
