//! Discussion orchestration domain
//!
//! The phase state machine. The turn loop itself lives in the application
//! layer; this module only decides which stage a discussion is in.

pub mod phase;

pub use phase::DiscussionPhase;
