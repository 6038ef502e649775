//! Producer backed by an external program.
//!
//! Every request spawns the configured command, writes the rendered
//! conversation to its stdin and reads the answer from stdout. The model
//! profile and system prompt travel in `ROUNDTABLE_MODEL` and
//! `ROUNDTABLE_SYSTEM_PROMPT`; `{model}` inside the argument list is
//! substituted as well.

use async_trait::async_trait;
use roundtable_application::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use roundtable_domain::Message;
use roundtable_domain::session::render_conversation;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info};

pub const MODEL_ENV: &str = "ROUNDTABLE_MODEL";
pub const SYSTEM_PROMPT_ENV: &str = "ROUNDTABLE_SYSTEM_PROMPT";
const MODEL_PLACEHOLDER: &str = "{model}";

/// Resolved program and argument template shared by all sessions.
#[derive(Debug)]
struct Invoker {
    program: PathBuf,
    args: Vec<String>,
}

impl Invoker {
    async fn run(
        &self,
        model: &str,
        system_prompt: Option<&str>,
        input: &str,
    ) -> Result<String, GatewayError> {
        let args = self
            .args
            .iter()
            .map(|arg| arg.replace(MODEL_PLACEHOLDER, model));

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .env(MODEL_ENV, model)
            .env(SYSTEM_PROMPT_ENV, system_prompt.unwrap_or_default())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            GatewayError::ConnectionError(format!("{}: {}", self.program.display(), e))
        })?;

        // Feed stdin while stdout is drained, so neither pipe can fill up.
        let stdin = child.stdin.take();
        let feed = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(input.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());

        let output = output.map_err(|e| GatewayError::RequestFailed(e.to_string()))?;
        // A producer may exit without reading its input; its exit status decides.
        if let Err(e) = fed
            && e.kind() != std::io::ErrorKind::BrokenPipe
        {
            return Err(GatewayError::RequestFailed(format!("write stdin: {}", e)));
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GatewayError::RequestFailed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!(model, bytes = text.len(), "Producer answered");
        Ok(text)
    }
}

/// [`LlmGateway`] that shells out to a command per request
pub struct CommandLlmGateway {
    invoker: Arc<Invoker>,
}

impl CommandLlmGateway {
    /// Locate `command` on `PATH` (or accept an explicit path).
    pub fn new(command: &str, args: Vec<String>) -> Result<Self, GatewayError> {
        let program = which::which(command)
            .map_err(|e| GatewayError::ConnectionError(format!("{}: {}", command, e)))?;

        info!("CommandLlmGateway using {}", program.display());

        Ok(Self {
            invoker: Arc::new(Invoker { program, args }),
        })
    }
}

#[async_trait]
impl LlmGateway for CommandLlmGateway {
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(CommandSession::new(
            Arc::clone(&self.invoker),
            model,
            None,
        )))
    }

    async fn create_session_with_system_prompt(
        &self,
        model: &str,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        Ok(Box::new(CommandSession::new(
            Arc::clone(&self.invoker),
            model,
            Some(system_prompt.to_string()),
        )))
    }
}

/// A session over [`CommandLlmGateway`].
///
/// `send` keeps a private thread so repeated calls see earlier exchanges;
/// `send_conversation` is stateless.
pub struct CommandSession {
    invoker: Arc<Invoker>,
    model: String,
    system_prompt: Option<String>,
    history: Mutex<Vec<Message>>,
}

impl CommandSession {
    fn new(invoker: Arc<Invoker>, model: &str, system_prompt: Option<String>) -> Self {
        Self {
            invoker,
            model: model.to_string(),
            system_prompt: system_prompt.filter(|s| !s.trim().is_empty()),
            history: Mutex::new(Vec::new()),
        }
    }

    fn history_snapshot(&self) -> Result<Vec<Message>, GatewayError> {
        self.history
            .lock()
            .map(|h| h.clone())
            .map_err(|_| GatewayError::SessionError("session history poisoned".to_string()))
    }
}

#[async_trait]
impl LlmSession for CommandSession {
    fn model(&self) -> &str {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        let mut thread = self.history_snapshot()?;
        thread.push(Message::user(content));

        let answer = self
            .invoker
            .run(
                &self.model,
                self.system_prompt.as_deref(),
                &render_conversation(&thread),
            )
            .await?;

        if let Ok(mut history) = self.history.lock() {
            history.push(Message::user(content));
            history.push(Message::assistant(answer.clone()));
        }
        Ok(answer)
    }

    async fn send_conversation(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.invoker
            .run(
                &self.model,
                self.system_prompt.as_deref(),
                &render_conversation(messages),
            )
            .await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    async fn session(command: &str, args: &[&str], system: &str) -> Box<dyn LlmSession> {
        let gateway =
            CommandLlmGateway::new(command, args.iter().map(|s| s.to_string()).collect())
                .unwrap();
        gateway
            .create_session_with_system_prompt("qwen-max", system)
            .await
            .unwrap()
    }

    #[test]
    fn test_missing_command_is_connection_error() {
        let result = CommandLlmGateway::new("roundtable-no-such-producer", Vec::new());
        assert!(matches!(result, Err(GatewayError::ConnectionError(_))));
    }

    #[tokio::test]
    async fn test_send_keeps_thread() {
        let session = session("cat", &[], "").await;

        let first = session.send("你好").await.unwrap();
        assert_eq!(first, "[user]\n你好");

        let second = session.send("继续").await.unwrap();
        assert_eq!(
            second,
            "[user]\n你好\n\n[assistant]\n[user]\n你好\n\n[user]\n继续"
        );
    }

    #[tokio::test]
    async fn test_send_conversation_is_stateless() {
        let session = session("cat", &[], "").await;
        let messages = vec![Message::system("规则"), Message::user("请发言")];

        let answer = session.send_conversation(&messages).await.unwrap();
        assert_eq!(answer, "[system]\n规则\n\n[user]\n请发言");

        let again = session.send("下一句").await.unwrap();
        assert_eq!(again, "[user]\n下一句");
    }

    #[tokio::test]
    async fn test_large_input_does_not_stall() {
        let session = session("cat", &[], "").await;
        let long = "长".repeat(200_000);

        let answer = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            session.send_conversation(&[Message::user(long.as_str())]),
        )
        .await
        .expect("producer stalled on a large conversation")
        .unwrap();

        assert_eq!(answer, format!("[user]\n{long}"));
    }

    #[tokio::test]
    async fn test_model_and_system_prompt_reach_the_command() {
        let session = session(
            "sh",
            &["-c", "cat >/dev/null; echo \"$0|$ROUNDTABLE_MODEL|$ROUNDTABLE_SYSTEM_PROMPT\"", "{model}"],
            "你是主持人",
        )
        .await;

        let answer = session.send("x").await.unwrap();
        assert_eq!(answer, "qwen-max|qwen-max|你是主持人");
        assert_eq!(session.model(), "qwen-max");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_request_failed() {
        let session = session("sh", &["-c", "cat >/dev/null; echo boom >&2; exit 3"], "").await;

        let err = session.send("x").await.unwrap_err();
        match err {
            GatewayError::RequestFailed(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
