//! Speaking turns and the vote.
//!
//! - [`announce_voting`](RunDiscussionUseCase::announce_voting): once per
//!   run, freezes the debate history and lets the moderator open the vote
//! - [`take_turn`](RunDiscussionUseCase::take_turn): asks the speaker for
//!   text; while a ballot is owed, re-asks up to the retry budget and then
//!   synthesizes one
//! - [`publish_results`](RunDiscussionUseCase::publish_results): the
//!   moderator's closing words over the final tally

use super::types::EntryKind;
use super::{RunDiscussionUseCase, RunState, Sessions, with_timeout};
use crate::ports::conversation_logger::ConversationEvent;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::DiscussionProgressNotifier;
use roundtable_domain::naming::strip_marked_segments;
use roundtable_domain::{Message, PromptTemplate, VOTE_MARKER};
use tracing::{info, warn};

/// Candidates listed in the vote announcement.
const ANNOUNCEMENT_HOT_LIST: usize = 30;

impl<G: LlmGateway + 'static> RunDiscussionUseCase<G> {
    pub(super) async fn announce_voting(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        progress: &dyn DiscussionProgressNotifier,
    ) {
        state.debate_frozen = true;
        state.announced = true;

        let total = state.tracker.mentioned_count();
        let prompt = {
            let hot = state.tracker.top_candidates(ANNOUNCEMENT_HOT_LIST);
            PromptTemplate::announcement_prompt(total, &hot, &state.ctx)
        };
        info!("Voting phase reached with {} candidates", total);

        let announcement = self
            .ask_moderator(state, sessions, &prompt, progress)
            .await
            .unwrap_or_default();

        self.conversation_logger.log(ConversationEvent::new(
            "voting_announced",
            serde_json::json!({
                "candidate_count": total,
                "voters": state.tracker.ledger().registry(),
                "announcement": announcement,
            }),
        ));
        if announcement.is_empty() {
            return;
        }

        state.push_history(Message::assistant(PromptTemplate::announcement_entry(
            &announcement,
        )));
        let moderator = state.moderator.name.clone();
        state.push_entry(EntryKind::Announcement, &moderator, None, &announcement);
        state.tracker.record_summary(&announcement);
        progress.on_voting_announced(&announcement);
    }

    /// Build the speaker's prompt, get the reply and enforce the ballot.
    pub(super) async fn take_turn(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        speaker: &str,
        round: usize,
        progress: &dyn DiscussionProgressNotifier,
    ) -> String {
        let voting = state.tracker.is_voting_phase();
        let prompt = if voting {
            Message::user(PromptTemplate::voting_prompt(
                state.tracker.timeline(),
                &state.ctx,
            ))
        } else {
            Message::user(PromptTemplate::participant_prompt(
                speaker,
                &state.tracker.context_summary(),
                &state.tracker.debate_directive(speaker),
                &state.tracker.name_guidance(),
                &state.tracker.convergence_directive(),
                &state.ctx,
            ))
        };
        state.push_history(prompt.clone());

        let mut messages = if voting {
            let mut messages = state.debate_history.clone();
            messages.push(Message::system(PromptTemplate::voting_isolation(&state.ctx)));
            messages.push(prompt);
            messages
        } else {
            state.discussion_history.clone()
        };

        let owes_ballot = voting && !state.tracker.has_voted(speaker);
        let budget = if owes_ballot {
            state.params.vote_retry_budget
        } else {
            0
        };

        let mut attempt = 0;
        loop {
            let reply = self.ask_participant(state, sessions, speaker, &messages, progress).await;
            if !owes_ballot || !state.tracker.preview_ballot(&reply).is_empty() {
                return reply;
            }

            if attempt < budget {
                attempt += 1;
                info!("{} gave no usable ballot, reminder {}/{}", speaker, attempt, budget);
                self.conversation_logger.log(ConversationEvent::new(
                    "ballot_retry",
                    serde_json::json!({
                        "round": round,
                        "speaker": speaker,
                        "attempt": attempt,
                        "reply": reply,
                    }),
                ));
                progress.on_ballot_retry(speaker, attempt);
                if !reply.trim().is_empty() {
                    messages.push(Message::assistant(reply));
                }
                messages.push(Message::user(PromptTemplate::ballot_reminder(&state.ctx)));
                continue;
            }

            let line = state.tracker.synthetic_ballot_line();
            warn!("{} never produced a ballot; using {}", speaker, line);
            self.conversation_logger.log(ConversationEvent::new(
                "synthetic_ballot",
                serde_json::json!({
                    "round": round,
                    "speaker": speaker,
                    "ballot": line,
                }),
            ));
            progress.on_synthetic_ballot(speaker, &line);
            let remark = strip_marked_segments(&reply, VOTE_MARKER);
            return PromptTemplate::with_synthetic_ballot(remark.trim(), &line);
        }
    }

    /// One participant call. Failures and timeouts become empty text.
    async fn ask_participant(
        &self,
        state: &RunState,
        sessions: &Sessions,
        speaker: &str,
        messages: &[Message],
        progress: &dyn DiscussionProgressNotifier,
    ) -> String {
        let Some(session) = sessions.participants.get(speaker) else {
            warn!("No session for {}", speaker);
            return String::new();
        };

        progress.on_producer_start(speaker);
        let result = with_timeout(state.params.call_timeout, session.send_conversation(messages)).await;
        progress.on_producer_end(speaker);

        match result {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("{} failed to answer: {}", speaker, e);
                String::new()
            }
        }
    }

    /// Moderator's closing words over the final tally.
    pub(super) async fn publish_results(
        &self,
        state: &mut RunState,
        sessions: &Sessions,
        progress: &dyn DiscussionProgressNotifier,
    ) -> String {
        let results = state.tracker.vote_results();
        let prompt = PromptTemplate::closing_prompt(&results);
        let closing = self
            .ask_moderator(state, sessions, &prompt, progress)
            .await
            .unwrap_or_else(|| {
                results
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; ")
            });

        state.push_history(Message::assistant(PromptTemplate::closing_entry(&closing)));
        let moderator = state.moderator.name.clone();
        state.push_entry(EntryKind::Closing, &moderator, None, &closing);
        progress.on_results(&closing, &results);
        closing
    }
}
