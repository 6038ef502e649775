//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// The discussion tracker itself never fails; these cover validation of the
/// inputs a discussion is built from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No participants configured for the discussion")]
    NoParticipants,

    #[error("Participant name cannot be empty")]
    EmptyParticipantName,

    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(String),

    #[error("Invalid name prefix: {0:?} (expected exactly one letter)")]
    InvalidNamePrefix(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
