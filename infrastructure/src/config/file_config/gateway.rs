//! Producer gateway from TOML (`[gateway]` section)
//!
//! ```toml
//! [gateway]
//! kind = "command"            # or "rehearsal"
//! command = "llm"
//! args = ["-m", "{model}"]
//! timeout_seconds = 180
//! ```
//!
//! `{model}` in `args` is replaced with the participant's model profile.

use serde::{Deserialize, Serialize};

/// Which gateway adapter backs the producers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileGatewayKind {
    /// External program per request
    Command,
    /// Deterministic offline producer
    #[default]
    Rehearsal,
}

/// Raw gateway configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub kind: FileGatewayKind,
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Per-call timeout; `None` waits forever
    pub timeout_seconds: Option<u64>,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            kind: FileGatewayKind::default(),
            command: None,
            args: Vec::new(),
            timeout_seconds: Some(180),
        }
    }
}
