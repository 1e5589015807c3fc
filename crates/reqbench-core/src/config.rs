use serde::{Deserialize, Serialize};

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub history: HistorySettings,
    #[serde(default)]
    pub debug: DebugSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct HistorySettings {
    /// Mirror history to disk; in-memory only when `false`
    #[serde(default = "default_persist")]
    pub persist: bool,
    #[serde(default = "default_history_file")]
    pub file_name: String,
}

fn default_persist() -> bool {
    true
}

fn default_history_file() -> String {
    "history.toml".to_string()
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            persist: default_persist(),
            file_name: default_history_file(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct DebugSettings {
    /// `tracing` filter directive, e.g. `info` or `reqbench_core=debug`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}
