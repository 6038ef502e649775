//! [`LlmGateway`](roundtable_application::LlmGateway) adapters.
//!
//! - [`CommandLlmGateway`]: one external program call per request
//! - [`RehearsalGateway`]: deterministic in-process producer

mod command;
mod rehearsal;

pub use command::{CommandLlmGateway, CommandSession, MODEL_ENV, SYSTEM_PROMPT_ENV};
pub use rehearsal::{RehearsalGateway, RehearsalSession};
