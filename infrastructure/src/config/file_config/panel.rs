//! Panel and moderator from TOML (`[[panel.participants]]`, `[moderator]`)
//!
//! ```toml
//! [[panel.participants]]
//! name = "爸爸"
//! model = "qwen-max"
//! instructions = "你是一位即将给儿子起名字的父亲……"
//!
//! [moderator]
//! name = "主持人"
//! model = "qwen-max"
//! ```
//!
//! An empty participant list selects the built-in panel.

use roundtable_domain::{DEFAULT_MODEL, DEFAULT_MODERATOR, DomainError, Panel, Participant};
use serde::{Deserialize, Serialize};

/// One `[[panel.participants]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileParticipantConfig {
    pub name: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub instructions: String,
}

impl FileParticipantConfig {
    fn to_participant(&self) -> Participant {
        Participant::new(self.name.trim(), self.model.trim(), self.instructions.clone())
    }
}

/// Raw `[panel]` configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePanelConfig {
    pub participants: Vec<FileParticipantConfig>,
}

impl FilePanelConfig {
    /// Build the panel; no configured participants means the built-in panel.
    pub fn to_panel(&self) -> Result<Panel, DomainError> {
        if self.participants.is_empty() {
            return Ok(Panel::default_panel());
        }
        Panel::new(
            self.participants
                .iter()
                .map(FileParticipantConfig::to_participant)
                .collect(),
        )
    }
}

/// Raw `[moderator]` configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModeratorConfig {
    pub name: String,
    pub model: String,
    /// Extra instructions appended to the moderator's system prompt
    pub instructions: String,
}

impl Default for FileModeratorConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODERATOR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            instructions: String::new(),
        }
    }
}

impl FileModeratorConfig {
    pub fn to_participant(&self) -> Participant {
        Participant::new(self.name.trim(), self.model.trim(), self.instructions.clone())
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
