//! Run parameters — turn loop control.
//!
//! [`RunParams`] groups the static parameters that control the turn loop in
//! [`RunDiscussionUseCase`](crate::use_cases::run_discussion::RunDiscussionUseCase).
//! Tracker thresholds live in the domain's `TrackerConfig`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default upper bound on rounds per run.
pub const DEFAULT_MAX_ROUNDS: usize = 60;

/// Default number of corrective re-solicitations for a missing ballot.
pub const DEFAULT_VOTE_RETRY_BUDGET: usize = 2;

/// Turn loop control parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParams {
    /// Maximum number of rounds (accepted turns) before the run stops.
    pub max_rounds: usize,
    /// Reminders sent to a voter whose reply carries no usable ballot
    /// before one is synthesized.
    pub vote_retry_budget: usize,
    /// Ask the manual control port after each summary and on end signals.
    pub interactive: bool,
    /// Timeout for every single producer call.
    pub call_timeout: Option<Duration>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            vote_retry_budget: DEFAULT_VOTE_RETRY_BUDGET,
            interactive: false,
            call_timeout: Some(Duration::from_secs(180)),
        }
    }
}

impl RunParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_vote_retry_budget(mut self, budget: usize) -> Self {
        self.vote_retry_budget = budget;
        self
    }

    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }
}
