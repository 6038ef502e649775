//! Run Discussion use case
//!
//! Drives one naming discussion from the opening line to the published vote.
//!
//! Each round: the moderator (or the voting queue, or the user) picks a
//! speaker, the speaker's producer answers, the tracker records the turn,
//! and the moderator summarises. Once enough candidates have been mentioned
//! the moderator announces the vote and every registered voter is asked for
//! one ballot; a voter that keeps failing to produce one gets a synthesized
//! ballot so the vote always completes.
//!
//! # Flow
//!
//! ```text
//! opening ─▶ ┌───────────────── round ─────────────────┐
//!            │ announce vote (once, first voting round) │
//!            │ select speaker ─▶ speak (ballot retry)   │
//!            │ record_turn ─▶ summary ─▶ manual control │
//!            └──────────────────────────────────────────┘
//!                      │ all ballots in
//!                      ▼
//!                closing (results)
//! ```

mod selection;
mod types;
mod voting;

pub use types::{
    DiscussionOutcome, EndReason, EntryKind, RunDiscussionError, RunDiscussionInput,
    SelectionSource, TranscriptEntry,
};

use crate::config::RunParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::manual_control::{AutoContinue, ManualControlPort, ManualDecision};
use crate::ports::progress::{DiscussionProgressNotifier, NoProgress};
use roundtable_domain::{
    DiscussionTracker, Message, Panel, Participant, PromptContext, PromptTemplate,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Prompt shown to the user after each summary in interactive mode.
const AFTER_SUMMARY_PROMPT: &str =
    "如需手动控制下一轮，请输入参与者名字；输入 stop 结束；直接回车交给主持人。";

/// Use case for running a naming discussion
pub struct RunDiscussionUseCase<G: LlmGateway + 'static> {
    pub(super) gateway: Arc<G>,
    pub(super) manual_control: Arc<dyn ManualControlPort>,
    pub(super) conversation_logger: Arc<dyn ConversationLogger>,
    pub(super) cancellation_token: Option<CancellationToken>,
}

/// Open producer sessions of one run.
pub(super) struct Sessions {
    pub moderator: Box<dyn LlmSession>,
    pub participants: HashMap<String, Box<dyn LlmSession>>,
}

/// Mutable state of one run, owned by the loop.
pub(super) struct RunState {
    pub topic: String,
    pub panel: Panel,
    pub moderator: Participant,
    pub params: RunParams,
    pub ctx: PromptContext,
    pub tracker: DiscussionTracker,
    /// Everything said so far
    pub discussion_history: Vec<Message>,
    /// Debate-phase history, frozen when the vote is announced
    pub debate_history: Vec<Message>,
    pub debate_frozen: bool,
    pub announced: bool,
    /// Speaker chosen ahead of time (by the user or after an end signal)
    pub pending_speaker: Option<(String, SelectionSource)>,
    pub stop_requested: bool,
    pub transcript: Vec<TranscriptEntry>,
}

impl RunState {
    pub fn push_history(&mut self, message: Message) {
        if !self.debate_frozen {
            self.debate_history.push(message.clone());
        }
        self.discussion_history.push(message);
    }

    pub fn push_entry(
        &mut self,
        kind: EntryKind,
        speaker: &str,
        round: Option<usize>,
        content: &str,
    ) {
        self.transcript.push(TranscriptEntry {
            kind,
            speaker: speaker.to_string(),
            round,
            content: content.to_string(),
        });
    }
}

impl<G: LlmGateway + 'static> RunDiscussionUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            manual_control: Arc::new(AutoContinue),
            conversation_logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    /// Set the handler asked in interactive mode
    pub fn with_manual_control(mut self, manual_control: Arc<dyn ManualControlPort>) -> Self {
        self.manual_control = manual_control;
        self
    }

    /// Set a structured transcript logger
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Set a cancellation token, checked between rounds
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        input: RunDiscussionInput,
    ) -> Result<DiscussionOutcome, RunDiscussionError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunDiscussionInput,
        progress: &dyn DiscussionProgressNotifier,
    ) -> Result<DiscussionOutcome, RunDiscussionError> {
        let mut state = Self::prepare(input)?;
        let sessions = self.open_sessions(&state).await?;

        info!(
            "Starting discussion with {} participants (threshold {})",
            state.panel.len(),
            state.ctx.convergence_threshold
        );
        let names = state.panel.names();
        progress.on_discussion_start(&state.topic, &names);
        self.conversation_logger.log(ConversationEvent::new(
            "discussion_started",
            serde_json::json!({
                "topic": state.topic,
                "participants": names,
                "moderator": state.moderator.name,
                "convergence_threshold": state.ctx.convergence_threshold,
                "ballot_size": state.ctx.ballot_size,
                "max_rounds": state.params.max_rounds,
            }),
        ));

        let opening = PromptTemplate::opening_message(&state.ctx);
        state.push_history(Message::user(PromptTemplate::opening_entry(&opening)));
        let moderator_name = state.moderator.name.clone();
        state.push_entry(EntryKind::Opening, &moderator_name, None, &opening);
        progress.on_opening(&opening);

        let (rounds, end_reason, closing) = self.run_rounds(&mut state, &sessions, progress).await;

        let outcome = DiscussionOutcome {
            topic: state.topic.clone(),
            rounds,
            end_reason,
            phase: state.tracker.phase(),
            candidates: state.tracker.timeline().to_vec(),
            results: state.tracker.vote_results(),
            ballots: state.tracker.ledger().ballots().to_vec(),
            closing,
            transcript: std::mem::take(&mut state.transcript),
            final_stats: state.tracker.final_stats(),
        };

        info!(
            "Discussion finished after {} rounds: {}",
            outcome.rounds, outcome.end_reason
        );
        self.conversation_logger.log(ConversationEvent::new(
            "discussion_finished",
            serde_json::json!({
                "rounds": outcome.rounds,
                "end_reason": outcome.end_reason,
                "phase": outcome.phase,
                "candidate_count": outcome.candidates.len(),
                "results": outcome.results,
            }),
        ));
        progress.on_discussion_finished(&outcome);

        Ok(outcome)
    }

    /// Validate the input and build the initial run state.
    fn prepare(input: RunDiscussionInput) -> Result<RunState, RunDiscussionError> {
        let RunDiscussionInput {
            topic,
            panel,
            moderator,
            mut tracker,
            params,
        } = input;

        if params.max_rounds == 0 {
            return Err(RunDiscussionError::InvalidParams(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        tracker.validate()?;
        if tracker.roster.is_empty() {
            tracker.roster = panel.names();
        }

        let ctx = PromptContext {
            topic: topic.clone(),
            convergence_threshold: tracker.convergence_threshold,
            ballot_size: tracker.ballot_size,
            name_prefix: tracker.pattern.prefix(),
        };

        let mut tracker = DiscussionTracker::new(tracker);
        tracker.set_manual_control(params.interactive);

        let rules = Message::system(PromptTemplate::group_rules(&ctx, &panel.names()));
        Ok(RunState {
            topic,
            panel,
            moderator,
            params,
            ctx,
            tracker,
            discussion_history: vec![rules.clone()],
            debate_history: vec![rules],
            debate_frozen: false,
            announced: false,
            pending_speaker: None,
            stop_requested: false,
            transcript: Vec::new(),
        })
    }

    async fn open_sessions(&self, state: &RunState) -> Result<Sessions, RunDiscussionError> {
        let moderator_system = PromptTemplate::moderator_system(
            &state.ctx,
            &state.panel.names(),
            &state.moderator.instructions,
        );
        let moderator = self
            .gateway
            .create_session_with_system_prompt(&state.moderator.model, &moderator_system)
            .await?;

        let mut participants = HashMap::new();
        for participant in state.panel.participants() {
            let session = self
                .gateway
                .create_session_with_system_prompt(&participant.model, &participant.instructions)
                .await?;
            participants.insert(participant.name.clone(), session);
        }

        Ok(Sessions {
            moderator,
            participants,
        })
    }

    /// The round loop. Returns (rounds, end reason, closing text).
    async fn run_rounds(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        progress: &dyn DiscussionProgressNotifier,
    ) -> (usize, EndReason, Option<String>) {
        let names = state.panel.names();
        let mut round = 0;

        while round < state.params.max_rounds {
            if self.is_cancelled() {
                info!("Discussion cancelled before round {}", round + 1);
                return (round, EndReason::Cancelled, None);
            }

            if state.tracker.is_voting_phase() {
                state.tracker.ensure_eligible_voters(names.iter().cloned());
                if !state.announced {
                    self.announce_voting(state, sessions, progress).await;
                }
            }

            if state.stop_requested {
                info!("Discussion stopped by user");
                return (round, EndReason::StoppedByUser, None);
            }

            let Some((speaker, source)) =
                self.select_speaker(state, sessions, round, progress).await
            else {
                // End signal handled; the next iteration picks up the pending choice.
                continue;
            };
            let display_round = round + 1;
            progress.on_speaker_selected(&speaker, display_round, &source);
            debug!("Round {}: {} ({:?})", display_round, speaker, source);

            let text = self
                .take_turn(state, sessions, &speaker, display_round, progress)
                .await;

            let report = state.tracker.record_turn(&speaker, &text);
            state.push_history(Message::assistant(PromptTemplate::speech_entry(
                &speaker,
                display_round,
                &text,
            )));
            state.push_entry(EntryKind::Speech, &speaker, Some(display_round), &text);
            if !report.new_candidates.is_empty() {
                debug!("New candidates: {}", report.new_candidates.join(", "));
            }
            if report.converged_now {
                info!(
                    "Convergence reached with {} candidates",
                    state.tracker.mentioned_count()
                );
            }
            self.conversation_logger.log(ConversationEvent::new(
                "turn_recorded",
                serde_json::json!({
                    "round": display_round,
                    "speaker": speaker,
                    "source": source,
                    "text": text,
                    "new_candidates": report.new_candidates,
                    "ballot_accepted": report.ballot_accepted(),
                    "phase": report.phase,
                }),
            ));
            progress.on_turn_complete(&speaker, display_round, &text, &report);

            self.summarize_turn(state, sessions, &speaker, display_round, progress)
                .await;

            if state.tracker.voting_completed() {
                let closing = self.publish_results(state, sessions, progress).await;
                return (display_round, EndReason::VotingCompleted, Some(closing));
            }

            if state.params.interactive {
                match self.ask_manual(AFTER_SUMMARY_PROMPT).await {
                    ManualDecision::Stop => state.stop_requested = true,
                    ManualDecision::Speaker(name) => {
                        state.pending_speaker = Some((name, SelectionSource::Manual));
                    }
                    ManualDecision::Continue => {}
                }
            }

            round += 1;
        }

        if state.stop_requested {
            return (round, EndReason::StoppedByUser, None);
        }
        info!("Reached the round limit ({})", state.params.max_rounds);
        (round, EndReason::MaxRoundsReached, None)
    }

    /// Ask the moderator to summarise the last turn and record the summary.
    async fn summarize_turn(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        speaker: &str,
        round: usize,
        progress: &dyn DiscussionProgressNotifier,
    ) {
        let hint = if state.tracker.voting_completed() {
            PromptTemplate::votes_complete_hint().to_string()
        } else {
            state.tracker.convergence_status()
        };
        let prompt = PromptTemplate::summary_prompt(speaker, &hint);
        let Some(summary) = self.ask_moderator(state, sessions, &prompt, progress).await else {
            return;
        };

        state.push_history(Message::assistant(PromptTemplate::summary_entry(&summary)));
        let moderator = state.moderator.name.clone();
        state.push_entry(EntryKind::Summary, &moderator, Some(round), &summary);
        state.tracker.record_summary(&summary);
        self.conversation_logger.log(ConversationEvent::new(
            "summary_recorded",
            serde_json::json!({ "round": round, "summary": summary }),
        ));
        progress.on_summary(&summary);
    }

    /// Send a prompt to the moderator's own thread.
    ///
    /// Failures are logged and yield `None`; blank answers count as failures.
    pub(super) async fn ask_moderator(
        &self,
        state: &RunState,
        sessions: &Sessions,
        prompt: &str,
        progress: &dyn DiscussionProgressNotifier,
    ) -> Option<String> {
        progress.on_producer_start(&state.moderator.name);
        let result = with_timeout(state.params.call_timeout, sessions.moderator.send(prompt)).await;
        progress.on_producer_end(&state.moderator.name);

        match result {
            Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            Ok(_) => {
                warn!("Moderator returned an empty answer");
                None
            }
            Err(e) => {
                warn!("Moderator request failed: {}", e);
                None
            }
        }
    }

    /// Ask the manual control port; errors keep the automatic flow.
    pub(super) async fn ask_manual(&self, prompt: &str) -> ManualDecision {
        match self.manual_control.request_decision(prompt).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!("Manual control failed: {}", e);
                ManualDecision::Continue
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

/// Run a producer call under the optional per-call timeout.
pub(super) async fn with_timeout<F>(timeout: Option<Duration>, call: F) -> Result<String, GatewayError>
where
    F: Future<Output = Result<String, GatewayError>>,
{
    match timeout {
        Some(limit) => tokio::time::timeout(limit, call)
            .await
            .map_err(|_| GatewayError::Timeout)?,
        None => call.await,
    }
}

#[cfg(test)]
mod tests;
