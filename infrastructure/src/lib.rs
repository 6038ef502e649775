//! Infrastructure layer for roundtable
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: producer gateways, the JSONL transcript
//! logger and configuration file loading.

pub mod config;
pub mod gateway;
pub mod logging;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGatewayConfig, FileGatewayKind,
    FileOutputConfig,
};
pub use gateway::{CommandLlmGateway, RehearsalGateway};
pub use logging::JsonlConversationLogger;
