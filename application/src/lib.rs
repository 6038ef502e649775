//! Application layer for roundtable
//!
//! This crate contains the turn loop use case, port definitions, and
//! run parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    manual_control::{AutoContinue, ManualControlError, ManualControlPort, ManualDecision},
    progress::{DiscussionProgressNotifier, NoProgress},
};
pub use use_cases::run_discussion::{
    DiscussionOutcome, EndReason, EntryKind, RunDiscussionError, RunDiscussionInput,
    RunDiscussionUseCase, SelectionSource, TranscriptEntry,
};
