//! Discussion settings from TOML (`[discussion]` section)
//!
//! ```toml
//! [discussion]
//! topic = "给一个即将出生的男孩起名字"
//! convergence_threshold = 30
//! ballot_size = 5
//! vote_retry_budget = 2
//! max_rounds = 60
//! name_prefix = "唐"
//! interactive = false
//! ```

use roundtable_application::config::{DEFAULT_MAX_ROUNDS, DEFAULT_VOTE_RETRY_BUDGET};
use roundtable_domain::prompt::DEFAULT_TOPIC;
use roundtable_domain::{
    DEFAULT_BALLOT_SIZE, DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_PREFIX, DomainError, NamePattern,
    TrackerConfig,
};
use serde::{Deserialize, Serialize};

/// Raw discussion configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub topic: String,
    /// Distinct candidates needed before the vote starts
    pub convergence_threshold: usize,
    /// Choices counted per ballot
    pub ballot_size: usize,
    /// Reminders before a ballot is synthesized
    pub vote_retry_budget: usize,
    pub max_rounds: usize,
    /// Family name every candidate starts with (one character)
    pub name_prefix: String,
    /// Ask the user after each summary
    pub interactive: bool,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            ballot_size: DEFAULT_BALLOT_SIZE,
            vote_retry_budget: DEFAULT_VOTE_RETRY_BUDGET,
            max_rounds: DEFAULT_MAX_ROUNDS,
            name_prefix: DEFAULT_PREFIX.to_string(),
            interactive: false,
        }
    }
}

impl FileDiscussionConfig {
    /// Parse the prefix into a naming pattern
    pub fn parse_pattern(&self) -> Result<NamePattern, DomainError> {
        NamePattern::from_prefix_str(self.name_prefix.trim())
    }

    /// Build the tracker configuration (roster left empty for the panel).
    pub fn to_tracker_config(&self) -> Result<TrackerConfig, DomainError> {
        Ok(TrackerConfig::default()
            .with_threshold(self.convergence_threshold)
            .with_ballot_size(self.ballot_size)
            .with_pattern(self.parse_pattern()?))
    }
}
