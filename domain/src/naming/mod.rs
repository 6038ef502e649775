//! Naming domain
//!
//! Lexical handling of candidate names: the naming pattern, the candidate
//! book that scans free text, and the ballot parser.
//!
//! ```text
//! free text ──extract──▶ CandidateBook (mentioned set, timeline, frequency)
//! ballot    ──parse────▶ Vec<String>  ──filter by CandidateBook──▶ VoteLedger
//! ```

pub mod ballot;
pub mod candidates;
pub mod pattern;

pub use ballot::{
    VOTE_MARKER, ballot_line, bracketed, contains_marker, parse_marked_segments,
    strip_marked_segments,
};
pub use candidates::CandidateBook;
pub use pattern::{DEFAULT_PREFIX, NamePattern, PLACEHOLDER_SUFFIX};
