//! Ballot and tally types for the convergence vote.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of choices counted per ballot.
pub const DEFAULT_BALLOT_SIZE: usize = 5;

/// An accepted ballot: validated, deduplicated and capped choices.
///
/// # Example
///
/// ```
/// use roundtable_domain::quorum::Ballot;
///
/// let ballot = Ballot::new("语言学家", vec!["唐若岚".to_string(), "唐峻".to_string()]);
/// assert_eq!(ballot.len(), 2);
/// assert!(ballot.contains("唐峻"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Voter identifier
    pub voter: String,
    /// Choices in the order they were written
    pub choices: Vec<String>,
}

impl Ballot {
    pub fn new(voter: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            voter: voter.into(),
            choices,
        }
    }

    pub fn len(&self) -> usize {
        self.choices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.choices.iter().any(|c| c == candidate)
    }
}

/// One row of the vote tally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub candidate: String,
    pub votes: usize,
}

impl TallyEntry {
    pub fn new(candidate: impl Into<String>, votes: usize) -> Self {
        Self {
            candidate: candidate.into(),
            votes,
        }
    }
}

impl std::fmt::Display for TallyEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}票", self.candidate, self.votes)
    }
}

/// Why a ballot was not counted.
///
/// None of these is a fault; the submission is simply ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallotRejection {
    #[error("ballots are only accepted during the voting phase")]
    NotVotingPhase,

    #[error("voter is not registered")]
    NotRegistered,

    #[error("voter has already voted")]
    AlreadyVoted,

    #[error("ballot has no valid choices")]
    NoValidChoices,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballot_contains() {
        let ballot = Ballot::new("a", vec!["唐若岚".to_string()]);
        assert!(ballot.contains("唐若岚"));
        assert!(!ballot.contains("唐峻"));
        assert!(!ballot.is_empty());
    }

    #[test]
    fn test_tally_entry_display() {
        assert_eq!(TallyEntry::new("唐峻", 3).to_string(), "唐峻: 3票");
    }

    #[test]
    fn test_tally_entry_serializes() {
        let json = serde_json::to_value(TallyEntry::new("唐峻", 2)).unwrap();
        assert_eq!(json["candidate"], "唐峻");
        assert_eq!(json["votes"], 2);
    }

    #[test]
    fn test_rejection_display() {
        assert_eq!(
            BallotRejection::AlreadyVoted.to_string(),
            "voter has already voted"
        );
    }
}
