//! Core domain concepts shared across all subdomains.
//!
//! - [`participant::Participant`] / [`participant::Panel`] — who takes part, in which order
//! - [`error::DomainError`] — domain-level errors
//! - [`string`] — text helpers for quoting statements in prompts

pub mod error;
pub mod participant;
pub mod string;
