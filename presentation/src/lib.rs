//! Presentation layer for roundtable
//!
//! This crate contains the CLI definition, output formatters, the
//! progress reporter and the interactive manual control.

pub mod cli;
pub mod manual;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use manual::interactive::InteractiveManualControl;
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use progress::reporter::ConsoleProgress;
