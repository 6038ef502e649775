//! Live progress display while a discussion runs

pub mod reporter;
