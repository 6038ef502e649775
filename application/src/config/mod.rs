//! Application-level configuration.
//!
//! - [`RunParams`] — turn loop control (rounds, ballot retries, timeouts)

pub mod run_params;

pub use run_params::{DEFAULT_MAX_ROUNDS, DEFAULT_VOTE_RETRY_BUDGET, RunParams};
