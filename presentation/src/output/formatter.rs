//! Output formatter trait

use roundtable_application::DiscussionOutcome;
use roundtable_domain::OutputFormat;

/// Trait for formatting a finished discussion
pub trait OutputFormatter {
    /// Transcript, vote and statistics
    fn format_full(&self, outcome: &DiscussionOutcome) -> String;

    /// Vote and statistics only
    fn format_stats(&self, outcome: &DiscussionOutcome) -> String;

    /// Format as JSON
    fn format_json(&self, outcome: &DiscussionOutcome) -> String;

    /// Dispatch on the configured format
    fn render(&self, outcome: &DiscussionOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format_full(outcome),
            OutputFormat::Stats => self.format_stats(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
