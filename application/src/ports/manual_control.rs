//! Manual control port for steering a running discussion.
//!
//! In interactive mode the user may stop the discussion or name the next
//! speaker at two points: when the moderator suggests ending, and after
//! each moderator summary.
//!
//! ```text
//! moderator says [结束] ──▶ ManualControlPort::request_decision()
//!                             ├─ Stop          → run ends (StoppedByUser)
//!                             ├─ Speaker(name) → next round uses `name`
//!                             └─ Continue      → round robin continues
//! ```
//!
//! For interactive use, see `InteractiveManualControl` in the presentation layer.

use async_trait::async_trait;
use thiserror::Error;

/// What the user wants to happen next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManualDecision {
    /// Keep the automatic flow
    Continue,
    /// End the discussion now
    Stop,
    /// Force the next speaker (raw input, resolved against the panel)
    Speaker(String),
}

impl ManualDecision {
    /// Interpret a line of user input: blank continues, `stop` stops,
    /// anything else names a speaker.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            ManualDecision::Continue
        } else if trimmed.eq_ignore_ascii_case("stop") {
            ManualDecision::Stop
        } else {
            ManualDecision::Speaker(trimmed.to_string())
        }
    }
}

/// Errors while asking for a decision (not the decision itself).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManualControlError {
    #[error("Operation cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    IoError(String),
}

/// Port for asking the user how the discussion should continue.
#[async_trait]
pub trait ManualControlPort: Send + Sync {
    /// Ask for a decision, showing `prompt` to the user.
    async fn request_decision(&self, prompt: &str) -> Result<ManualDecision, ManualControlError>;
}

/// Never intervenes; used for non-interactive runs.
pub struct AutoContinue;

#[async_trait]
impl ManualControlPort for AutoContinue {
    async fn request_decision(&self, _prompt: &str) -> Result<ManualDecision, ManualControlError> {
        Ok(ManualDecision::Continue)
    }
}
