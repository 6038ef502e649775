//! Terminal implementation of the manual control port

pub mod interactive;
