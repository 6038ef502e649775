//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript file; no transcript when unset
    pub conversation_log: Option<PathBuf>,
    /// Append to an existing transcript instead of truncating it
    pub append: bool,
}
