//! Type definitions for the RunDiscussion use case.

use crate::config::RunParams;
use crate::ports::llm_gateway::GatewayError;
use roundtable_domain::prompt::DEFAULT_TOPIC;
use roundtable_domain::{
    Ballot, DiscussionPhase, DomainError, Panel, Participant, TallyEntry, TrackerConfig,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that prevent a discussion from running at all.
///
/// Nothing that happens during a turn is an error: producer failures become
/// empty text and bad selections fall back to round robin.
#[derive(Error, Debug)]
pub enum RunDiscussionError {
    #[error("Invalid settings: {0}")]
    InvalidSettings(#[from] DomainError),

    #[error("Invalid run parameters: {0}")]
    InvalidParams(String),

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
}

/// Input for the RunDiscussion use case
#[derive(Debug, Clone)]
pub struct RunDiscussionInput {
    /// What the panel is naming
    pub topic: String,
    /// Participants in canonical order
    pub panel: Panel,
    /// Who selects speakers and summarises
    pub moderator: Participant,
    /// Tracker thresholds; an empty roster is filled from the panel
    pub tracker: TrackerConfig,
    pub params: RunParams,
}

impl RunDiscussionInput {
    pub fn new(panel: Panel) -> Self {
        Self {
            topic: DEFAULT_TOPIC.to_string(),
            panel,
            moderator: Participant::default_moderator(),
            tracker: TrackerConfig::default(),
            params: RunParams::default(),
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    pub fn with_moderator(mut self, moderator: Participant) -> Self {
        self.moderator = moderator;
        self
    }

    pub fn with_tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_params(mut self, params: RunParams) -> Self {
        self.params = params;
        self
    }
}

/// How the speaker of a round was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SelectionSource {
    /// Next registered voter who has not voted
    VotingQueue,
    /// Named by the user
    Manual,
    /// Named by the moderator
    Moderator,
    /// Round robin after an end signal was overridden
    RoundRobin,
    /// The choice did not resolve to a participant; round robin took over
    Invalid { raw: String, manual: bool },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    VotingCompleted,
    StoppedByUser,
    MaxRoundsReached,
    Cancelled,
}

impl EndReason {
    pub fn as_str(&self) -> &str {
        match self {
            EndReason::VotingCompleted => "voting_completed",
            EndReason::StoppedByUser => "stopped_by_user",
            EndReason::MaxRoundsReached => "max_rounds_reached",
            EndReason::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Opening,
    Speech,
    Summary,
    Announcement,
    Closing,
}

/// One visible line of the discussion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub speaker: String,
    /// 1-based round, for speeches and their summaries
    pub round: Option<usize>,
    pub content: String,
}

/// Result of a discussion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionOutcome {
    pub topic: String,
    /// Accepted turns
    pub rounds: usize,
    pub end_reason: EndReason,
    pub phase: DiscussionPhase,
    /// Candidates in first-mention order
    pub candidates: Vec<String>,
    /// Full tally, ranked
    pub results: Vec<TallyEntry>,
    /// Accepted ballots in casting order
    pub ballots: Vec<Ballot>,
    /// Moderator's closing words when the vote completed
    pub closing: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub final_stats: String,
}

impl DiscussionOutcome {
    /// Top `n` names of the vote.
    pub fn winners(&self, n: usize) -> Vec<&str> {
        self.results
            .iter()
            .take(n)
            .map(|e| e.candidate.as_str())
            .collect()
    }
}
