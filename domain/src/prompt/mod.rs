//! Prompt domain
//!
//! Text templates for every producer request in a discussion run.

mod template;

pub use template::{
    DEFAULT_TOPIC, END_SIGNAL, PromptContext, PromptTemplate, SYNTHETIC_BALLOT_NOTE,
    is_end_signal,
};
