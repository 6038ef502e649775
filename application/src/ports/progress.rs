//! Progress notification port
//!
//! Defines the interface for reporting progress while a discussion runs.

use crate::use_cases::run_discussion::{DiscussionOutcome, SelectionSource};
use roundtable_domain::{TallyEntry, TurnReport};

/// Callback for progress updates during a discussion
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console, log file, etc.). Every method has a
/// no-op default so adapters only implement what they show.
pub trait DiscussionProgressNotifier: Send + Sync {
    /// Called once before the first round
    fn on_discussion_start(&self, _topic: &str, _participants: &[String]) {}

    /// Called with the moderator's opening line
    fn on_opening(&self, _message: &str) {}

    /// Called when a producer starts working on a request
    fn on_producer_start(&self, _name: &str) {}

    /// Called when a producer has answered (or failed)
    fn on_producer_end(&self, _name: &str) {}

    /// Called when the moderator announced the vote
    fn on_voting_announced(&self, _announcement: &str) {}

    /// Called when the next speaker is known
    fn on_speaker_selected(&self, _speaker: &str, _round: usize, _source: &SelectionSource) {}

    /// Called when a voter is reminded to add a ballot line
    fn on_ballot_retry(&self, _speaker: &str, _attempt: usize) {}

    /// Called when a ballot had to be synthesized for a voter
    fn on_synthetic_ballot(&self, _speaker: &str, _ballot_line: &str) {}

    /// Called after the tracker recorded a turn
    fn on_turn_complete(&self, _speaker: &str, _round: usize, _text: &str, _report: &TurnReport) {}

    /// Called with each moderator summary
    fn on_summary(&self, _summary: &str) {}

    /// Called when the moderator published the results
    fn on_results(&self, _closing: &str, _results: &[TallyEntry]) {}

    /// Called once when the run ends
    fn on_discussion_finished(&self, _outcome: &DiscussionOutcome) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl DiscussionProgressNotifier for NoProgress {}
