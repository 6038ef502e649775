//! Speaker selection for a round.
//!
//! Resolution order: the voting queue while ballots are outstanding, then a
//! pending manual choice, then the moderator. Whatever comes out is matched
//! against the panel (first participant whose name occurs in the raw text);
//! anything that does not resolve falls back to round robin.

use super::types::SelectionSource;
use super::{RunDiscussionUseCase, RunState, Sessions};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::manual_control::ManualDecision;
use crate::ports::progress::DiscussionProgressNotifier;
use roundtable_domain::PromptTemplate;
use roundtable_domain::prompt::is_end_signal;
use tracing::{info, warn};

/// Prompt shown to the user when the moderator suggests ending.
const END_SUGGESTED_PROMPT: &str = "主持人建议结束，是否需要继续？";

/// Where the raw choice of a round came from.
enum RawChoice {
    VotingQueue(String),
    Pending(String, SelectionSource),
    Moderator(String),
}

impl<G: LlmGateway + 'static> RunDiscussionUseCase<G> {
    /// Pick the speaker of `round` (0-based).
    ///
    /// Returns `None` when the moderator signalled the end: the override (a
    /// pending speaker or a stop request) is stored in `state` and the caller
    /// starts the round over.
    pub(super) async fn select_speaker(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        round: usize,
        progress: &dyn DiscussionProgressNotifier,
    ) -> Option<(String, SelectionSource)> {
        let choice = self.raw_choice(state, sessions, progress).await;

        if let RawChoice::Moderator(raw) = &choice {
            if is_end_signal(raw) {
                self.handle_end_signal(state, round).await;
                return None;
            }
        }

        Some(resolve_choice(state, choice, round))
    }

    async fn raw_choice(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        progress: &dyn DiscussionProgressNotifier,
    ) -> RawChoice {
        if state.tracker.is_voting_phase() {
            if let Some(voter) = state.tracker.next_unvoted(&state.panel.names()) {
                return RawChoice::VotingQueue(voter);
            }
        }

        if let Some((name, source)) = state.pending_speaker.take() {
            return RawChoice::Pending(name, source);
        }

        let prompt = PromptTemplate::selection_prompt(
            &state.tracker.progress_hint(),
            &state.tracker.convergence_status(),
        );
        let raw = self
            .ask_moderator(state, sessions, &prompt, progress)
            .await
            .unwrap_or_default();
        RawChoice::Moderator(raw)
    }

    /// The moderator wants to stop. Only the user may end the discussion;
    /// otherwise round robin carries on.
    async fn handle_end_signal(&self, state: &mut RunState, round: usize) {
        let fallback = state.panel.round_robin(round).name.clone();

        if !state.params.interactive {
            info!("Moderator suggested ending; continuing with {}", fallback);
            state.pending_speaker = Some((fallback, SelectionSource::RoundRobin));
            return;
        }

        match self.ask_manual(END_SUGGESTED_PROMPT).await {
            ManualDecision::Stop => state.stop_requested = true,
            ManualDecision::Speaker(name) => {
                state.pending_speaker = Some((name, SelectionSource::Manual));
            }
            ManualDecision::Continue => {
                state.pending_speaker = Some((fallback, SelectionSource::RoundRobin));
            }
        }
    }
}

fn resolve_choice(state: &RunState, choice: RawChoice, round: usize) -> (String, SelectionSource) {
    let (raw, source, manual) = match choice {
        RawChoice::VotingQueue(raw) => (raw, SelectionSource::VotingQueue, false),
        RawChoice::Pending(raw, source) => {
            let manual = source == SelectionSource::Manual;
            (raw, source, manual)
        }
        RawChoice::Moderator(raw) => (raw, SelectionSource::Moderator, false),
    };

    match state.panel.resolve(&raw) {
        Some(participant) => (participant.name.clone(), source),
        None => {
            let fallback = state.panel.round_robin(round).name.clone();
            warn!("Unknown speaker choice {:?}, falling back to {}", raw, fallback);
            (fallback, SelectionSource::Invalid { raw, manual })
        }
    }
}
