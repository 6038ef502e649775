//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain/application
//! types by [`FileConfig`]'s `to_*` methods.

mod discussion;
mod gateway;
mod logging;
mod output;
mod panel;

pub use discussion::FileDiscussionConfig;
pub use gateway::{FileGatewayConfig, FileGatewayKind};
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use panel::{FileModeratorConfig, FileParticipantConfig, FilePanelConfig};

use roundtable_application::RunParams;
use roundtable_domain::{DomainError, Panel, Participant, TrackerConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("model name cannot be empty")]
    EmptyModelName,

    #[error("max_rounds cannot be 0")]
    InvalidMaxRounds,

    #[error("gateway.kind = \"command\" requires gateway.command")]
    MissingCommand,

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Thresholds, round limit, name prefix
    pub discussion: FileDiscussionConfig,
    /// Participants (empty means the built-in panel)
    pub panel: FilePanelConfig,
    pub moderator: FileModeratorConfig,
    /// Producer backend
    pub gateway: FileGatewayConfig,
    /// Output settings
    pub output: FileOutputConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.gateway.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.discussion.max_rounds == 0 {
            return Err(ConfigValidationError::InvalidMaxRounds);
        }
        if self.gateway.kind == FileGatewayKind::Command
            && self
                .gateway
                .command
                .as_deref()
                .is_none_or(|c| c.trim().is_empty())
        {
            return Err(ConfigValidationError::MissingCommand);
        }

        let models = self
            .panel
            .participants
            .iter()
            .map(|p| p.model.as_str())
            .chain(std::iter::once(self.moderator.model.as_str()));
        for model in models {
            if model.trim().is_empty() {
                return Err(ConfigValidationError::EmptyModelName);
            }
        }

        self.to_tracker_config()?.validate()?;
        self.to_panel()?;
        Ok(())
    }

    pub fn to_tracker_config(&self) -> Result<TrackerConfig, DomainError> {
        self.discussion.to_tracker_config()
    }

    pub fn to_panel(&self) -> Result<Panel, DomainError> {
        self.panel.to_panel()
    }

    pub fn to_moderator(&self) -> Participant {
        self.moderator.to_participant()
    }

    pub fn to_run_params(&self) -> RunParams {
        RunParams::default()
            .with_max_rounds(self.discussion.max_rounds)
            .with_vote_retry_budget(self.discussion.vote_retry_budget)
            .with_interactive(self.discussion.interactive)
            .with_call_timeout(self.gateway.timeout_seconds.map(Duration::from_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::OutputFormat;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[discussion]
topic = "给女儿起名字"
convergence_threshold = 12
ballot_size = 3
max_rounds = 20
name_prefix = "李"
interactive = true

[[panel.participants]]
name = "妈妈"
model = "qwen-max"
instructions = "你是孩子的母亲。"

[[panel.participants]]
name = "诗人"
model = "qwen-plus"

[moderator]
model = "qwen-max"

[gateway]
kind = "command"
command = "llm"
args = ["-m", "{model}"]
timeout_seconds = 60

[output]
format = "full"
color = false

[logging]
conversation_log = "logs/run.jsonl"
append = true
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_ok());

        let tracker = config.to_tracker_config().unwrap();
        assert_eq!(tracker.convergence_threshold, 12);
        assert_eq!(tracker.ballot_size, 3);
        assert_eq!(tracker.pattern.prefix(), '李');

        let panel = config.to_panel().unwrap();
        assert_eq!(panel.names(), vec!["妈妈", "诗人"]);
        assert_eq!(config.to_moderator().name, "主持人");

        let params = config.to_run_params();
        assert_eq!(params.max_rounds, 20);
        assert_eq!(params.vote_retry_budget, 2);
        assert!(params.interactive);
        assert_eq!(params.call_timeout, Some(Duration::from_secs(60)));

        assert_eq!(config.output.format, Some(OutputFormat::Full));
        assert!(!config.output.color);
        assert!(config.logging.conversation_log.is_some());
        assert!(config.logging.append);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.kind, FileGatewayKind::Rehearsal);
        assert_eq!(config.to_panel().unwrap().len(), 8);
        assert!(config.output.color);
        assert!(config.logging.conversation_log.is_none());
        assert!(!config.logging.append);
    }

    #[test]
    fn test_validate_zero_timeout() {
        let toml_str = r#"
[gateway]
timeout_seconds = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn test_validate_empty_model_name() {
        let toml_str = r#"
[[panel.participants]]
name = "爸爸"
model = " "
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::EmptyModelName)
        ));
    }

    #[test]
    fn test_validate_command_requires_program() {
        let toml_str = r#"
[gateway]
kind = "command"
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingCommand)
        ));
    }

    #[test]
    fn test_validate_zero_threshold() {
        let toml_str = r#"
[discussion]
convergence_threshold = 0
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::Domain(DomainError::InvalidSetting(_)))
        ));
    }
}
