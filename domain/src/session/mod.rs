//! Conversation messages exchanged with producers.

pub mod entities;

pub use entities::{Message, Role, render_conversation};
