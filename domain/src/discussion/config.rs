//! Tracker configuration

use crate::core::error::DomainError;
use crate::naming::NamePattern;
use crate::quorum::DEFAULT_BALLOT_SIZE;
use serde::{Deserialize, Serialize};

/// Number of distinct candidates that triggers the vote.
pub const DEFAULT_CONVERGENCE_THRESHOLD: usize = 30;

/// Settings of a single discussion tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Distinct candidates needed before voting starts
    pub convergence_threshold: usize,
    /// Maximum choices counted per ballot
    pub ballot_size: usize,
    /// Candidate naming pattern
    pub pattern: NamePattern,
    /// Known participants in canonical order (voter registry fallback,
    /// "not yet spoken" hints)
    pub roster: Vec<String>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            ballot_size: DEFAULT_BALLOT_SIZE,
            pattern: NamePattern::default(),
            roster: Vec::new(),
        }
    }
}

impl TrackerConfig {
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_ballot_size(mut self, size: usize) -> Self {
        self.ballot_size = size;
        self
    }

    pub fn with_pattern(mut self, pattern: NamePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_roster<I, S>(mut self, roster: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roster = roster.into_iter().map(Into::into).collect();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.convergence_threshold == 0 {
            return Err(DomainError::InvalidSetting(
                "convergence_threshold must be at least 1".to_string(),
            ));
        }
        if self.ballot_size == 0 {
            return Err(DomainError::InvalidSetting(
                "ballot_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.convergence_threshold, 30);
        assert_eq!(config.ballot_size, 5);
        assert!(config.roster.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert!(TrackerConfig::default().with_threshold(0).validate().is_err());
        assert!(TrackerConfig::default().with_ballot_size(0).validate().is_err());
    }
}
