use super::*;
use crate::ports::manual_control::ManualControlError;
use async_trait::async_trait;
use roundtable_domain::session::render_conversation;
use roundtable_domain::{Ballot, Participant, TallyEntry, TrackerConfig};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A scripted response for the mock session
#[derive(Debug, Clone)]
enum Scripted {
    Text(&'static str),
    Error(&'static str),
    /// Answer only after the given delay
    Slow(u64),
}

/// Mock session that returns scripted responses in order and records prompts
struct ScriptedSession {
    model: String,
    responses: Mutex<VecDeque<Scripted>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedSession {
    async fn answer(&self, prompt: String) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Text(t)) => Ok(t.to_string()),
            Some(Scripted::Error(e)) => Err(GatewayError::RequestFailed(e.to_string())),
            Some(Scripted::Slow(ms)) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok("太慢了".to_string())
            }
            None => Ok("(no more responses)".to_string()),
        }
    }
}

#[async_trait]
impl LlmSession for ScriptedSession {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.answer(content.to_string()).await
    }

    async fn send_conversation(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.answer(render_conversation(messages)).await
    }
}

/// Mock gateway: one script per model, prompts recorded per model
struct ScriptedGateway {
    scripts: Mutex<HashMap<String, Vec<Scripted>>>,
    prompts: Mutex<HashMap<String, Arc<Mutex<Vec<String>>>>>,
}

impl ScriptedGateway {
    fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            prompts: Mutex::new(HashMap::new()),
        }
    }

    fn script(self, model: &str, responses: Vec<Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(model.to_string(), responses);
        self
    }

    fn prompts_for(&self, model: &str) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap()
            .get(model)
            .map(|p| p.lock().unwrap().clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError> {
        let responses = self
            .scripts
            .lock()
            .unwrap()
            .remove(model)
            .unwrap_or_default();
        let prompts = Arc::new(Mutex::new(Vec::new()));
        self.prompts
            .lock()
            .unwrap()
            .insert(model.to_string(), Arc::clone(&prompts));
        Ok(Box::new(ScriptedSession {
            model: model.to_string(),
            responses: Mutex::new(responses.into()),
            prompts,
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

/// Manual control that replays scripted decisions
struct ScriptedManual {
    decisions: Mutex<VecDeque<ManualDecision>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedManual {
    fn new(decisions: Vec<ManualDecision>) -> Self {
        Self {
            decisions: Mutex::new(decisions.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ManualControlPort for ScriptedManual {
    async fn request_decision(&self, prompt: &str) -> Result<ManualDecision, ManualControlError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self
            .decisions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ManualDecision::Continue))
    }
}

/// Progress notifier that records selections and ballot events
#[derive(Default)]
struct RecordingProgress {
    selections: Mutex<Vec<(String, SelectionSource)>>,
    retries: Mutex<Vec<(String, usize)>>,
    synthetic: Mutex<Vec<String>>,
    results: Mutex<Vec<TallyEntry>>,
}

impl DiscussionProgressNotifier for RecordingProgress {
    fn on_speaker_selected(&self, speaker: &str, _round: usize, source: &SelectionSource) {
        self.selections
            .lock()
            .unwrap()
            .push((speaker.to_string(), source.clone()));
    }

    fn on_ballot_retry(&self, speaker: &str, attempt: usize) {
        self.retries
            .lock()
            .unwrap()
            .push((speaker.to_string(), attempt));
    }

    fn on_synthetic_ballot(&self, speaker: &str, _ballot_line: &str) {
        self.synthetic.lock().unwrap().push(speaker.to_string());
    }

    fn on_results(&self, _closing: &str, results: &[TallyEntry]) {
        *self.results.lock().unwrap() = results.to_vec();
    }
}

/// Logger that records event types
#[derive(Default)]
struct RecordingLogger {
    events: Mutex<Vec<&'static str>>,
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}

const MODERATOR: &str = "model-moderator";

fn panel(names: &[&str]) -> Panel {
    Panel::new(
        names
            .iter()
            .map(|n| Participant::new(*n, format!("model-{n}"), ""))
            .collect(),
    )
    .unwrap()
}

fn input(names: &[&str], threshold: usize, params: RunParams) -> RunDiscussionInput {
    RunDiscussionInput::new(panel(names))
        .with_moderator(Participant::new("主持人", MODERATOR, ""))
        .with_tracker(TrackerConfig::default().with_threshold(threshold))
        .with_params(params)
}

#[tokio::test]
async fn test_full_discussion_with_synthetic_ballot() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .script(
                MODERATOR,
                vec![
                    Scripted::Text("A"),
                    Scripted::Text("A 提出了两个名字"),
                    Scripted::Text("请B发言"),
                    Scripted::Text("候选已够"),
                    Scripted::Text("进入投票阶段"),
                    Scripted::Text("A 已投票"),
                    Scripted::Text("B 已投票"),
                    Scripted::Text("散会"),
                ],
            )
            .script(
                "model-A",
                vec![
                    Scripted::Text("我建议唐一、唐二"),
                    Scripted::Text("好的"),
                    Scripted::Text("嗯"),
                    Scripted::Text("我还在想"),
                ],
            )
            .script(
                "model-B",
                vec![
                    Scripted::Text("补充一个唐三"),
                    Scripted::Text("【投票】唐三, 唐一"),
                ],
            ),
    );
    let logger = Arc::new(RecordingLogger::default());
    let progress = RecordingProgress::default();
    let use_case =
        RunDiscussionUseCase::new(Arc::clone(&gateway)).with_conversation_logger(logger.clone());

    let outcome = use_case
        .execute_with_progress(input(&["A", "B"], 3, RunParams::default()), &progress)
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::VotingCompleted);
    assert_eq!(outcome.rounds, 4);
    assert_eq!(outcome.candidates, vec!["唐一", "唐二", "唐三"]);
    assert_eq!(
        outcome.results,
        vec![
            TallyEntry::new("唐一", 2),
            TallyEntry::new("唐三", 2),
            TallyEntry::new("唐二", 1),
        ]
    );
    assert_eq!(outcome.closing.as_deref(), Some("散会"));
    assert_eq!(outcome.winners(1), vec!["唐一"]);

    // A was reminded twice, then the ballot was synthesized
    assert_eq!(
        *progress.retries.lock().unwrap(),
        vec![("A".to_string(), 1), ("A".to_string(), 2)]
    );
    assert_eq!(*progress.synthetic.lock().unwrap(), vec!["A".to_string()]);
    let a_speech = outcome
        .transcript
        .iter()
        .filter(|e| e.kind == EntryKind::Speech && e.speaker == "A")
        .last()
        .unwrap();
    assert!(a_speech.content.ends_with("【投票】唐一, 唐二, 唐三\n(系统自动补全投票)"));

    let a_prompts = gateway.prompts_for("model-A");
    assert_eq!(a_prompts.len(), 4);
    assert!(a_prompts[2].contains("请在回复末尾添加：【投票】唐XX"));
    assert!(a_prompts[1].contains("投票阶段说明：请独立完成投票"));

    let selections = progress.selections.lock().unwrap();
    assert_eq!(selections[0], ("A".to_string(), SelectionSource::Moderator));
    assert_eq!(selections[1], ("B".to_string(), SelectionSource::Moderator));
    assert_eq!(selections[2], ("A".to_string(), SelectionSource::VotingQueue));
    assert_eq!(selections[3], ("B".to_string(), SelectionSource::VotingQueue));
    assert_eq!(progress.results.lock().unwrap().len(), 3);

    let events = logger.events.lock().unwrap();
    assert_eq!(events.first(), Some(&"discussion_started"));
    assert_eq!(events.iter().filter(|e| **e == "ballot_retry").count(), 2);
    assert_eq!(events.iter().filter(|e| **e == "synthetic_ballot").count(), 1);
    assert_eq!(events.iter().filter(|e| **e == "voting_announced").count(), 1);
    assert_eq!(events.last(), Some(&"discussion_finished"));
}

#[tokio::test]
async fn test_placeholder_ballot_is_replaced_by_timeline_names() {
    const PLACEHOLDERS: &str = "照模板填：【投票】唐XX, 唐XX, 唐XX, 唐XX, 唐XX";
    let gateway = Arc::new(
        ScriptedGateway::new()
            .script(
                MODERATOR,
                vec![
                    Scripted::Text("A"),
                    Scripted::Text("A 一口气提了六个"),
                    Scripted::Text("进入投票阶段"),
                    Scripted::Text("A 已投票"),
                    Scripted::Text("B 已投票"),
                    Scripted::Text("散会"),
                ],
            )
            .script(
                "model-A",
                vec![
                    Scripted::Text("我建议唐一、唐二、唐三、唐四、唐五、唐六"),
                    Scripted::Text(PLACEHOLDERS),
                    Scripted::Text(PLACEHOLDERS),
                    Scripted::Text(PLACEHOLDERS),
                ],
            )
            .script("model-B", vec![Scripted::Text("【投票】唐六")]),
    );
    let progress = RecordingProgress::default();
    let use_case = RunDiscussionUseCase::new(Arc::clone(&gateway));

    let outcome = use_case
        .execute_with_progress(input(&["A", "B"], 6, RunParams::default()), &progress)
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::VotingCompleted);
    assert_eq!(
        outcome.candidates,
        vec!["唐一", "唐二", "唐三", "唐四", "唐五", "唐六"]
    );
    assert_eq!(
        outcome.results,
        ["唐一", "唐二", "唐三", "唐四", "唐五", "唐六"]
            .into_iter()
            .map(|name| TallyEntry::new(name, 1))
            .collect::<Vec<_>>()
    );
    assert_eq!(*progress.synthetic.lock().unwrap(), vec!["A".to_string()]);
    assert_eq!(
        outcome.ballots,
        vec![
            Ballot::new(
                "A",
                ["唐一", "唐二", "唐三", "唐四", "唐五"]
                    .map(String::from)
                    .to_vec()
            ),
            Ballot::new("B", vec!["唐六".to_string()]),
        ]
    );

    let a_speech = outcome
        .transcript
        .iter()
        .filter(|e| e.kind == EntryKind::Speech && e.speaker == "A")
        .last()
        .unwrap();
    assert_eq!(
        a_speech.content,
        "照模板填：\n【投票】唐一, 唐二, 唐三, 唐四, 唐五\n(系统自动补全投票)"
    );
}

#[tokio::test]
async fn test_invalid_choice_and_end_signal_fall_back_to_round_robin() {
    let gateway = Arc::new(ScriptedGateway::new().script(
        MODERATOR,
        vec![
            Scripted::Text("没有这个人"),
            Scripted::Text("总结一"),
            Scripted::Text("[结束]"),
            Scripted::Text("总结二"),
            Scripted::Text("C"),
            Scripted::Text("总结三"),
        ],
    ));
    let progress = RecordingProgress::default();
    let use_case = RunDiscussionUseCase::new(gateway);

    let outcome = use_case
        .execute_with_progress(
            input(&["A", "B", "C"], 30, RunParams::default().with_max_rounds(3)),
            &progress,
        )
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::MaxRoundsReached);
    assert_eq!(outcome.rounds, 3);

    let selections = progress.selections.lock().unwrap();
    assert_eq!(
        selections[0],
        (
            "A".to_string(),
            SelectionSource::Invalid {
                raw: "没有这个人".to_string(),
                manual: false
            }
        )
    );
    assert_eq!(selections[1], ("B".to_string(), SelectionSource::RoundRobin));
    assert_eq!(selections[2], ("C".to_string(), SelectionSource::Moderator));
}

#[tokio::test]
async fn test_interactive_manual_speaker_then_stop() {
    let gateway = Arc::new(ScriptedGateway::new().script(
        MODERATOR,
        vec![
            Scripted::Text("A"),
            Scripted::Text("总结一"),
            Scripted::Text("总结二"),
        ],
    ));
    let manual = Arc::new(ScriptedManual::new(vec![
        ManualDecision::Speaker("B".to_string()),
        ManualDecision::Stop,
    ]));
    let progress = RecordingProgress::default();
    let use_case = RunDiscussionUseCase::new(gateway).with_manual_control(manual.clone());

    let outcome = use_case
        .execute_with_progress(
            input(&["A", "B"], 30, RunParams::default().with_interactive(true)),
            &progress,
        )
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::StoppedByUser);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(
        progress.selections.lock().unwrap()[1],
        ("B".to_string(), SelectionSource::Manual)
    );
    assert_eq!(manual.prompts.lock().unwrap().len(), 2);
    assert!(outcome.final_stats.contains("总发言轮数：2"));
}

#[tokio::test]
async fn test_interactive_end_signal_asks_user() {
    let gateway = Arc::new(ScriptedGateway::new().script(MODERATOR, vec![Scripted::Text("[结束]")]));
    let manual = Arc::new(ScriptedManual::new(vec![ManualDecision::Stop]));
    let use_case = RunDiscussionUseCase::new(gateway).with_manual_control(manual.clone());

    let outcome = use_case
        .execute(input(&["A"], 30, RunParams::default().with_interactive(true)))
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::StoppedByUser);
    assert_eq!(outcome.rounds, 0);
    assert_eq!(
        manual.prompts.lock().unwrap().as_slice(),
        &["主持人建议结束，是否需要继续？".to_string()]
    );
}

#[tokio::test]
async fn test_producer_failures_become_empty_turns() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .script(
                MODERATOR,
                vec![Scripted::Text("A"), Scripted::Error("summary down")],
            )
            .script("model-A", vec![Scripted::Slow(500)]),
    );
    let use_case = RunDiscussionUseCase::new(gateway);
    let params = RunParams::default()
        .with_max_rounds(1)
        .with_call_timeout(Some(Duration::from_millis(20)));

    let outcome = use_case.execute(input(&["A"], 30, params)).await.unwrap();

    assert_eq!(outcome.rounds, 1);
    let speech = outcome
        .transcript
        .iter()
        .find(|e| e.kind == EntryKind::Speech)
        .unwrap();
    assert_eq!(speech.content, "");
    assert!(!outcome.transcript.iter().any(|e| e.kind == EntryKind::Summary));
}

#[tokio::test]
async fn test_cancelled_before_first_round() {
    let token = CancellationToken::new();
    token.cancel();
    let use_case = RunDiscussionUseCase::new(Arc::new(ScriptedGateway::new())).with_cancellation(token);

    let outcome = use_case
        .execute(input(&["A", "B"], 30, RunParams::default()))
        .await
        .unwrap();

    assert_eq!(outcome.end_reason, EndReason::Cancelled);
    assert_eq!(outcome.rounds, 0);
    assert_eq!(outcome.transcript.len(), 1);
    assert_eq!(outcome.transcript[0].kind, EntryKind::Opening);
}

#[tokio::test]
async fn test_rejects_zero_rounds() {
    let use_case = RunDiscussionUseCase::new(Arc::new(ScriptedGateway::new()));
    let err = use_case
        .execute(input(&["A"], 30, RunParams::default().with_max_rounds(0)))
        .await
        .unwrap_err();
    assert!(matches!(err, RunDiscussionError::InvalidParams(_)));
}
