//! History persisted through the configured store survives a reload.

use reqbench_core::config::ClientConfig;
use reqbench_core::entry::{Entry, Request, RequestMethod};
use reqbench_core::history::HistoryLog;
use reqbench_infrastructure::{ConfigService, ReqbenchPaths};
use tempfile::TempDir;

fn entry(url: &str) -> Entry {
    Entry::from_request(Request::new(RequestMethod::Get, url))
}

#[tokio::test]
async fn test_history_survives_reload() {
    let temp_dir = TempDir::new().unwrap();
    let service = ConfigService::new(ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()))).unwrap();
    let config = service.load().unwrap();

    let mut log = HistoryLog::load(service.history_store(&config).unwrap()).await;
    log.append(entry("https://one.test")).await;
    log.append(entry("https://two.test")).await;

    let reloaded = HistoryLog::load(service.history_store(&config).unwrap()).await;
    assert_eq!(reloaded.entries(), &[entry("https://one.test"), entry("https://two.test")]);
}

#[tokio::test]
async fn test_clear_empties_store_and_log() {
    let temp_dir = TempDir::new().unwrap();
    let service = ConfigService::new(ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()))).unwrap();
    let store = service.history_store(&ClientConfig::default()).unwrap();

    let mut log = HistoryLog::load(store.clone()).await;
    log.append(entry("https://one.test")).await;
    log.append(entry("https://two.test")).await;
    log.clear().await;

    assert_eq!(log.len(), 0);
    assert!(store.read_history().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_history_file_loads_empty() {
    let temp_dir = TempDir::new().unwrap();
    let paths = ReqbenchPaths::new(Some(temp_dir.path().to_path_buf()));
    let service = ConfigService::new(paths.clone()).unwrap();
    let history_path = paths.history_file("history.toml").unwrap();
    std::fs::create_dir_all(history_path.parent().unwrap()).unwrap();
    std::fs::write(&history_path, "entries = [[[ not toml").unwrap();

    let log = HistoryLog::load(service.history_store(&ClientConfig::default()).unwrap()).await;

    assert!(log.is_empty());
}
