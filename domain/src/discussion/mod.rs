//! Discussion tracking
//!
//! [`DiscussionTracker`] is the facade over the candidate book, the vote
//! ledger and the derived phase. The turn loop feeds it one
//! `(speaker, text)` pair per turn and reads guidance strings back.

pub mod config;
pub mod guidance;
pub mod tracker;

pub use config::{DEFAULT_CONVERGENCE_THRESHOLD, TrackerConfig};
pub use guidance::SNIPPET_CHARS;
pub use tracker::{DiscussionTracker, SpeechRecord, TurnReport};
