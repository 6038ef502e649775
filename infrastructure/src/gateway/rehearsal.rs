//! Deterministic offline producer.
//!
//! Lets a full discussion run without any model behind it: participants
//! propose two fresh candidates per turn and vote for the first ballot-size
//! names of the candidate list; the moderator walks the panel in order and
//! answers every other request with a short fixed remark.
//!
//! The turn loop drives the moderator through `send` and participants
//! through `send_conversation`, and the answers follow that split.

use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use roundtable_domain::naming::ballot_line;
use roundtable_domain::prompt::END_SIGNAL;
use roundtable_domain::{CandidateBook, Message, NamePattern, Role};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Marker of the line listing every candidate in a voting request.
const CANDIDATE_LIST_LABEL: &str = "候选清单";

const FIRST_LETTERS: [char; 16] = [
    '若', '子', '嘉', '思', '明', '景', '浩', '文', '俊', '星', '安', '书', '宇', '清', '天', '远',
];
const SECOND_LETTERS: [char; 16] = [
    '岚', '航', '然', '辰', '哲', '行', '川', '禾', '逸', '朗', '和', '言', '泽', '昊', '峰', '舟',
];

#[derive(Debug)]
struct Shared {
    pattern: NamePattern,
    panel: Vec<String>,
    ballot_size: usize,
    next_name: AtomicUsize,
    next_speaker: AtomicUsize,
}

impl Shared {
    /// Candidate number `n`; unique for the first 256 values.
    fn name_at(&self, n: usize) -> String {
        let first = FIRST_LETTERS[n % FIRST_LETTERS.len()];
        let second = SECOND_LETTERS[(n / FIRST_LETTERS.len()) % SECOND_LETTERS.len()];
        [self.pattern.prefix(), first, second].iter().collect()
    }

    fn fresh_name(&self) -> String {
        self.name_at(self.next_name.fetch_add(1, Ordering::Relaxed))
    }

    fn proposal(&self) -> String {
        let a = self.fresh_name();
        let b = self.fresh_name();
        format!("我补充两个方向：「{a}」音韵明快，「{b}」寓意开阔，欢迎大家继续推敲。")
    }

    fn ballot(&self, request: &str) -> String {
        let mut book = CandidateBook::new(self.pattern);
        if let Some(line) = request
            .lines()
            .find(|line| line.trim_start().starts_with(CANDIDATE_LIST_LABEL))
        {
            let list = line.split_once('：').map_or(line, |(_, rest)| rest);
            book.extract(list);
        }
        let choices: Vec<&str> = book
            .timeline()
            .iter()
            .take(self.ballot_size)
            .map(String::as_str)
            .collect();
        format!("我的选择如下。\n{}", ballot_line(&choices))
    }

    fn moderate(&self, request: &str) -> String {
        if request.contains(END_SIGNAL) && !self.panel.is_empty() {
            let n = self.next_speaker.fetch_add(1, Ordering::Relaxed);
            return self.panel[n % self.panel.len()].clone();
        }
        "要点已记录，请大家继续围绕候选展开。".to_string()
    }
}

/// [`LlmGateway`] that never leaves the process.
///
/// All sessions share one name counter, so the same candidate is never
/// proposed twice within a run.
#[derive(Clone)]
pub struct RehearsalGateway {
    shared: Arc<Shared>,
}

impl RehearsalGateway {
    pub fn new(pattern: NamePattern, panel: Vec<String>, ballot_size: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                pattern,
                panel,
                ballot_size,
                next_name: AtomicUsize::new(0),
                next_speaker: AtomicUsize::new(0),
            }),
        }
    }
}

#[async_trait]
impl LlmGateway for RehearsalGateway {
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(RehearsalSession {
            shared: Arc::clone(&self.shared),
            model: model.to_string(),
        }))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &str,
        _system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        self.create_session(model).await
    }
}

pub struct RehearsalSession {
    shared: Arc<Shared>,
    model: String,
}

#[async_trait]
impl LlmSession for RehearsalSession {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        Ok(self.shared.moderate(content))
    }

    async fn send_conversation(&self, messages: &[Message]) -> Result<String, GatewayError> {
        let request = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();

        if request.contains(CANDIDATE_LIST_LABEL) {
            Ok(self.shared.ballot(request))
        } else {
            Ok(self.shared.proposal())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_application::{EndReason, RunDiscussionInput, RunDiscussionUseCase, RunParams};
    use roundtable_domain::{Panel, Participant, PromptContext, PromptTemplate, TrackerConfig};

    fn gateway(panel: &[&str]) -> RehearsalGateway {
        RehearsalGateway::new(
            NamePattern::default(),
            panel.iter().map(|s| s.to_string()).collect(),
            5,
        )
    }

    #[test]
    fn test_names_are_unique_and_scannable() {
        let gw = gateway(&["A"]);
        let names: Vec<String> = (0..256).map(|n| gw.shared.name_at(n)).collect();
        let unique: std::collections::HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), 256);
        assert!(names.iter().all(|n| NamePattern::default().is_candidate(n)));
    }

    #[tokio::test]
    async fn test_proposal_yields_two_new_candidates() {
        let gw = gateway(&["A"]);
        let session = gw.create_session("m").await.unwrap();
        let mut book = CandidateBook::new(NamePattern::default());

        let first = session
            .send_conversation(&[Message::user("请发言")])
            .await
            .unwrap();
        let second = session
            .send_conversation(&[Message::user("请发言")])
            .await
            .unwrap();
        book.extract(&first);
        book.extract(&second);

        assert_eq!(book.len(), 4);
    }

    #[tokio::test]
    async fn test_votes_for_first_candidates_listed() {
        let gw = gateway(&["A"]);
        let session = gw.create_session("m").await.unwrap();
        let ctx = PromptContext {
            topic: "t".to_string(),
            convergence_threshold: 6,
            ballot_size: 5,
            name_prefix: '唐',
        };
        let candidates: Vec<String> = ["唐若岚", "唐峻", "唐一", "唐二", "唐三", "唐四"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let messages = vec![
            Message::user(PromptTemplate::voting_prompt(&candidates, &ctx)),
            Message::system(PromptTemplate::voting_isolation(&ctx)),
        ];

        let reply = session.send_conversation(&messages).await.unwrap();
        assert!(reply.ends_with("【投票】唐若岚, 唐峻, 唐一, 唐二, 唐三"));
    }

    #[tokio::test]
    async fn test_moderator_walks_the_panel() {
        let gw = gateway(&["A", "B"]);
        let moderator = gw.create_session("m").await.unwrap();
        let select = PromptTemplate::selection_prompt("进度", "");

        assert_eq!(moderator.send(&select).await.unwrap(), "A");
        assert_eq!(moderator.send(&select).await.unwrap(), "B");
        assert_eq!(moderator.send(&select).await.unwrap(), "A");
        assert!(!moderator.send("请总结").await.unwrap().contains("A"));
    }

    #[tokio::test]
    async fn test_full_rehearsal_reaches_a_vote() {
        let names = ["爸爸", "语言学家", "诗人"];
        let panel = Panel::new(
            names
                .iter()
                .map(|n| Participant::new(*n, "default", ""))
                .collect(),
        )
        .unwrap();
        let gw = gateway(&names);
        let input = RunDiscussionInput::new(panel)
            .with_tracker(TrackerConfig::default().with_threshold(6))
            .with_params(RunParams::default().with_max_rounds(20));

        let outcome = RunDiscussionUseCase::new(Arc::new(gw))
            .execute(input)
            .await
            .unwrap();

        assert_eq!(outcome.end_reason, EndReason::VotingCompleted);
        assert_eq!(outcome.rounds, 6);
        assert_eq!(outcome.candidates.len(), 6);
        assert_eq!(outcome.results.len(), 5);
        assert!(outcome.results.iter().all(|entry| entry.votes == 3));
        assert_eq!(outcome.results[0].candidate, outcome.candidates[0]);
    }
}
