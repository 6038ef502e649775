//! Quorum voting domain
//!
//! The convergence vote that closes a discussion: each registered voter
//! casts one ballot of at most five known candidates; the tally is ranked by
//! votes and then by first mention.
//!
//! ```text
//! ┌─────────────┐  parsed tokens  ┌────────────┐  results/leaders
//! │ ballot text │ ──────────────▶ │ VoteLedger │ ─────────────────▶ report
//! └─────────────┘                 └────────────┘
//!                                   ▲ known candidates
//!                                   │
//!                             CandidateBook
//! ```

pub mod ledger;
pub mod vote;

pub use ledger::VoteLedger;
pub use vote::{Ballot, BallotRejection, DEFAULT_BALLOT_SIZE, TallyEntry};
