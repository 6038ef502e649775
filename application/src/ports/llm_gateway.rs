//! LLM Gateway port
//!
//! Defines the interface for communicating with the text producers behind
//! participants and the moderator.

use async_trait::async_trait;
use roundtable_domain::Message;
use roundtable_domain::session::render_conversation;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Producer did not answer in time")]
    Timeout,
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to producers.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with the specified model profile
    async fn create_session(&self, model: &str) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &str,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// Get the model profile used by this session
    fn model(&self) -> &str;

    /// Send a message within the session's own thread and get a response.
    ///
    /// The session remembers the exchange; the moderator uses this.
    async fn send(&self, content: &str) -> Result<String, GatewayError>;

    /// Answer a complete, caller-owned conversation.
    ///
    /// Nothing is remembered by the session. Participants are driven this
    /// way because the turn loop owns their history.
    ///
    /// Default implementation flattens the conversation and calls `send()`.
    async fn send_conversation(&self, messages: &[Message]) -> Result<String, GatewayError> {
        self.send(&render_conversation(messages)).await
    }
}
