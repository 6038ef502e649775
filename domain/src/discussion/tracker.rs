//! Discussion tracker: the single stateful object of a discussion run.

use super::config::TrackerConfig;
use crate::naming::{CandidateBook, VOTE_MARKER, ballot_line, parse_marked_segments};
use crate::orchestration::phase::DiscussionPhase;
use crate::quorum::{BallotRejection, TallyEntry, VoteLedger};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the speech log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechRecord {
    pub speaker: String,
    /// 0-based index of the turn in the whole discussion
    pub turn: usize,
}

/// What a single [`DiscussionTracker::record_turn`] call changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: usize,
    /// Candidates seen for the first time in this turn
    pub new_candidates: Vec<String>,
    /// `Some` when a ballot was attempted (voting phase only)
    pub ballot: Option<Result<Vec<String>, BallotRejection>>,
    /// Whether this turn flipped the convergence flag
    pub converged_now: bool,
    pub phase: DiscussionPhase,
}

impl TurnReport {
    pub fn ballot_accepted(&self) -> bool {
        matches!(self.ballot, Some(Ok(_)))
    }
}

/// Tracks everything the discussion has produced so far.
///
/// Mutated once per turn through [`record_turn`](Self::record_turn) and read
/// many times to build guidance for the next turn. The tracker never does
/// I/O and never fails: malformed input is filtered, not reported.
///
/// # Example
///
/// ```
/// use roundtable_domain::{DiscussionTracker, TrackerConfig};
///
/// let mut tracker = DiscussionTracker::new(TrackerConfig::default());
/// tracker.record_turn("父亲", "我喜欢唐若岚这个名字");
///
/// assert_eq!(tracker.timeline(), &["唐若岚".to_string()]);
/// assert_eq!(tracker.frequency("唐若岚"), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DiscussionTracker {
    pub(super) config: TrackerConfig,
    pub(super) book: CandidateBook,
    pub(super) ledger: VoteLedger,
    pub(super) speeches: Vec<SpeechRecord>,
    pub(super) speak_counts: HashMap<String, usize>,
    /// Speakers in order of their first speech
    pub(super) speakers: Vec<String>,
    /// Latest raw text per speaker, in order of first speech
    pub(super) latest_statements: Vec<(String, String)>,
    pub(super) key_points: Vec<String>,
    converged: bool,
    pub(super) manual_control_enabled: bool,
}

impl DiscussionTracker {
    pub fn new(config: TrackerConfig) -> Self {
        let book = CandidateBook::new(config.pattern);
        let ledger = VoteLedger::new(config.ballot_size);
        Self {
            config,
            book,
            ledger,
            speeches: Vec::new(),
            speak_counts: HashMap::new(),
            speakers: Vec::new(),
            latest_statements: Vec::new(),
            key_points: Vec::new(),
            converged: false,
            manual_control_enabled: false,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    // ==================== Mutation ====================

    /// Record one accepted turn.
    ///
    /// In order: log the speech, scan the text for candidates, attempt a
    /// ballot when in the voting phase, update the convergence flag. The
    /// phase is derived afresh from the resulting state.
    pub fn record_turn(&mut self, speaker: &str, text: &str) -> TurnReport {
        let turn = self.log_speech(speaker, text);

        let known_before = self.book.len();
        if !text.trim().is_empty() {
            self.book.extract(text);
        }
        let new_candidates = self.book.timeline()[known_before..].to_vec();

        let ballot = if self.phase() == DiscussionPhase::Voting {
            Some(self.cast_ballot(speaker, text))
        } else {
            None
        };

        let converged_now = self.update_convergence();

        TurnReport {
            turn,
            new_candidates,
            ballot,
            converged_now,
            phase: self.phase(),
        }
    }

    /// Submit a ballot outside of a turn. Returns `true` iff it was accepted.
    pub fn submit_ballot(&mut self, voter: &str, text: &str) -> bool {
        self.cast_ballot(voter, text).is_ok()
    }

    /// Keep a moderator summary for later context digests.
    pub fn record_summary(&mut self, summary: &str) {
        if !summary.trim().is_empty() {
            self.key_points.push(summary.to_string());
        }
    }

    /// Register eligible voters if none are registered yet (idempotent).
    pub fn ensure_eligible_voters<I, S>(&mut self, voters: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ledger.ensure_registered(voters)
    }

    /// Force the vote to start regardless of the candidate count.
    ///
    /// Meant for hosts that drive the tracker directly and want to cut the
    /// debate short. The turn loop never calls it; it relies on the
    /// candidate threshold alone.
    ///
    /// Sets the (sticky) convergence flag and replaces the voter registry,
    /// unless ballots were already accepted, in which case the existing
    /// registry stays.
    pub fn start_voting<I, S>(&mut self, voters: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.converged = true;
        self.ledger.reset_registry(voters);
    }

    pub fn set_manual_control(&mut self, enabled: bool) {
        self.manual_control_enabled = enabled;
    }

    fn log_speech(&mut self, speaker: &str, text: &str) -> usize {
        let turn = self.speeches.len();
        self.speeches.push(SpeechRecord {
            speaker: speaker.to_string(),
            turn,
        });

        let count = self.speak_counts.entry(speaker.to_string()).or_insert(0);
        if *count == 0 {
            self.speakers.push(speaker.to_string());
        }
        *count += 1;

        match self.latest_statements.iter_mut().find(|(s, _)| s == speaker) {
            Some((_, latest)) => *latest = text.to_string(),
            None => self
                .latest_statements
                .push((speaker.to_string(), text.to_string())),
        }

        turn
    }

    fn cast_ballot(&mut self, voter: &str, text: &str) -> Result<Vec<String>, BallotRejection> {
        if self.phase() != DiscussionPhase::Voting {
            return Err(BallotRejection::NotVotingPhase);
        }
        let parsed = parse_marked_segments(text, VOTE_MARKER, self.book.pattern());
        self.ledger
            .cast(voter, &parsed, &self.book)
            .map(|ballot| ballot.choices.clone())
    }

    /// Set the convergence flag once the threshold is reached. Never clears it.
    fn update_convergence(&mut self) -> bool {
        if self.converged || self.book.len() < self.config.convergence_threshold {
            return false;
        }
        self.converged = true;

        let voters = if self.config.roster.is_empty() {
            self.speakers.clone()
        } else {
            self.config.roster.clone()
        };
        self.ledger.ensure_registered(voters);
        true
    }

    // ==================== State queries ====================

    /// Current phase, derived from speech count and the two vote flags.
    pub fn phase(&self) -> DiscussionPhase {
        DiscussionPhase::derive(self.speeches.len(), self.converged, self.voting_completed())
    }

    /// Convergence flag: set once, never cleared.
    pub fn is_converged(&self) -> bool {
        self.converged
    }

    /// In the voting phase and still waiting for ballots.
    pub fn is_voting_phase(&self) -> bool {
        self.phase() == DiscussionPhase::Voting
    }

    /// Every registered voter has voted (registry non-empty).
    pub fn voting_completed(&self) -> bool {
        self.converged && self.ledger.is_complete()
    }

    pub fn total_speeches(&self) -> usize {
        self.speeches.len()
    }

    pub fn speeches(&self) -> &[SpeechRecord] {
        &self.speeches
    }

    pub fn speech_count(&self, speaker: &str) -> usize {
        self.speak_counts.get(speaker).copied().unwrap_or(0)
    }

    pub fn latest_statement(&self, speaker: &str) -> Option<&str> {
        self.latest_statements
            .iter()
            .find(|(s, _)| s == speaker)
            .map(|(_, text)| text.as_str())
    }

    pub fn last_speaker(&self) -> Option<&str> {
        self.speeches.last().map(|s| s.speaker.as_str())
    }

    pub fn key_points(&self) -> &[String] {
        &self.key_points
    }

    pub fn candidates(&self) -> &CandidateBook {
        &self.book
    }

    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Number of distinct candidates mentioned.
    pub fn mentioned_count(&self) -> usize {
        self.book.len()
    }

    pub fn is_mentioned(&self, name: &str) -> bool {
        self.book.contains(name)
    }

    pub fn timeline(&self) -> &[String] {
        self.book.timeline()
    }

    pub fn frequency(&self, name: &str) -> usize {
        self.book.frequency(name)
    }

    pub fn top_candidates(&self, n: usize) -> Vec<&str> {
        self.book.top_candidates(n)
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.ledger.has_voted(voter)
    }

    pub fn vote_leaders(&self, n: usize) -> Vec<String> {
        self.ledger.leaders(n, &self.book)
    }

    pub fn vote_results(&self) -> Vec<TallyEntry> {
        self.ledger.results(&self.book)
    }

    /// First registered voter in `order` that has not voted yet.
    pub fn next_unvoted<S: AsRef<str>>(&self, order: &[S]) -> Option<String> {
        order
            .iter()
            .map(AsRef::as_ref)
            .find(|v| self.ledger.is_registered(v) && !self.ledger.has_voted(v))
            .map(str::to_string)
    }

    /// The choices `text` would count for if it were recorded as the next turn.
    ///
    /// Names the text introduces are known by the time the ballot is cast,
    /// so they are scanned into a scratch copy of the book first.
    pub fn preview_ballot(&self, text: &str) -> Vec<String> {
        let mut book = self.book.clone();
        if !text.trim().is_empty() {
            book.extract(text);
        }
        let parsed = parse_marked_segments(text, VOTE_MARKER, book.pattern());
        self.ledger.validate_choices(&parsed, &book)
    }

    /// Vote line built from the earliest mentioned candidates.
    pub fn synthetic_ballot_line(&self) -> String {
        ballot_line(self.book.earliest(self.config.ballot_size))
    }
}
