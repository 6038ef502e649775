//! Domain layer for roundtable
//!
//! This crate contains the discussion state and its rules. It has no
//! dependencies on I/O, async runtimes or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Candidates
//!
//! A candidate is a family-name prefix followed by one or two letters
//! (`唐若岚`, `唐峻`). Every turn is scanned for candidates; the
//! [`CandidateBook`] keeps the mentioned set, first-mention timeline and
//! frequencies.
//!
//! ## Convergence vote
//!
//! Once enough distinct candidates have been mentioned the discussion
//! converges: each registered voter casts one ballot
//! (`【投票】唐若岚, 唐峻`) into the [`VoteLedger`].
//!
//! ## Phases
//!
//! [`DiscussionPhase`] is derived from the speech count and the two vote
//! flags; it is never stored.
//!
//! ```
//! use roundtable_domain::{DiscussionPhase, DiscussionTracker, TrackerConfig};
//!
//! let mut tracker = DiscussionTracker::new(TrackerConfig::default());
//! tracker.record_turn("爸爸", "想要一个阳光的名字，比如唐若岚");
//! assert_eq!(tracker.phase(), DiscussionPhase::Opening);
//! ```

pub mod config;
pub mod core;
pub mod discussion;
pub mod naming;
pub mod orchestration;
pub mod prompt;
pub mod quorum;
pub mod session;

// Re-export commonly used types
pub use config::OutputFormat;
pub use core::{
    error::DomainError,
    participant::{DEFAULT_MODEL, DEFAULT_MODERATOR, Panel, Participant},
    string::snippet,
};
pub use discussion::{
    DEFAULT_CONVERGENCE_THRESHOLD, DiscussionTracker, SpeechRecord, TrackerConfig, TurnReport,
};
pub use naming::{CandidateBook, DEFAULT_PREFIX, NamePattern, VOTE_MARKER};
pub use orchestration::DiscussionPhase;
pub use prompt::{PromptContext, PromptTemplate};
pub use quorum::{Ballot, BallotRejection, DEFAULT_BALLOT_SIZE, TallyEntry, VoteLedger};
pub use session::{Message, Role};
