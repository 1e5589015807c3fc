pub mod config_service;
pub mod in_memory_history_store;
pub mod in_memory_record_repository;
pub mod paths;
pub mod storage;
pub mod toml_history_store;

pub use crate::config_service::ConfigService;
pub use crate::in_memory_history_store::InMemoryHistoryStore;
pub use crate::in_memory_record_repository::InMemoryRecordRepository;
pub use crate::paths::ReqbenchPaths;
pub use crate::toml_history_store::TomlHistoryStore;
