//! Console output formatter for discussion outcomes

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use roundtable_application::{DiscussionOutcome, EndReason, EntryKind, TranscriptEntry};

/// How many names the report highlights
const WINNER_COUNT: usize = 3;

/// Formats discussion outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Full transcript followed by the vote and statistics
    pub fn format(outcome: &DiscussionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Roundtable Transcript"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Topic:".cyan().bold(),
            outcome.topic
        ));

        output.push_str(&Self::section_header("Discussion"));
        for entry in &outcome.transcript {
            output.push_str(&Self::entry(entry));
        }

        output.push_str(&Self::results_section(outcome));
        output.push_str(&Self::stats_section(outcome));
        output.push_str(&Self::footer());

        output
    }

    /// Vote and statistics only
    pub fn format_stats(outcome: &DiscussionOutcome) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Roundtable Result ===".cyan().bold()
        ));
        output.push_str(&format!("{} {}\n", "Topic:".bold(), outcome.topic));
        output.push_str(&format!(
            "{} {} ({} rounds)\n",
            "Ended:".bold(),
            Self::end_reason(outcome.end_reason),
            outcome.rounds
        ));

        let winners = outcome.winners(WINNER_COUNT);
        if !winners.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Top names:".bold(),
                winners.join(", ").green().bold()
            ));
        }

        output.push_str(&Self::results_section(outcome));
        output.push_str(&Self::stats_section(outcome));
        output
    }

    /// Format as JSON
    pub fn format_json(outcome: &DiscussionOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    fn entry(entry: &TranscriptEntry) -> String {
        let label = match (entry.kind, entry.round) {
            (EntryKind::Speech, Some(round)) => {
                format!("── [{}] {} ──", round, entry.speaker).yellow().bold()
            }
            (EntryKind::Speech, None) => format!("── {} ──", entry.speaker).yellow().bold(),
            (EntryKind::Opening, _) => format!("── {} (opening) ──", entry.speaker).cyan(),
            (EntryKind::Summary, _) => format!("   {} summary", entry.speaker).dimmed(),
            (EntryKind::Announcement, _) => {
                format!("── {} announces the vote ──", entry.speaker).magenta().bold()
            }
            (EntryKind::Closing, _) => format!("── {} closes ──", entry.speaker).green().bold(),
        };

        let body = if entry.kind == EntryKind::Summary {
            Self::indent(&entry.content, "   ").dimmed().to_string()
        } else {
            entry.content.clone()
        };
        format!("\n{}\n{}\n", label, body)
    }

    fn results_section(outcome: &DiscussionOutcome) -> String {
        let mut output = Self::section_header("Vote");
        if outcome.results.is_empty() {
            output.push_str(&format!("{}\n", "No ballots were cast.".dimmed()));
            return output;
        }

        let max = outcome.results.first().map_or(0, |e| e.votes);
        for (rank, entry) in outcome.results.iter().enumerate() {
            let line = format!("{:>3}. {}", rank + 1, entry);
            if entry.votes == max {
                output.push_str(&format!("{}\n", line.green().bold()));
            } else {
                output.push_str(&format!("{}\n", line));
            }
        }
        if !outcome.ballots.is_empty() {
            output.push('\n');
            for ballot in &outcome.ballots {
                output.push_str(&format!(
                    "     {} {}\n",
                    format!("{}:", ballot.voter).dimmed(),
                    ballot.choices.join(", ")
                ));
            }
        }
        if let Some(closing) = &outcome.closing {
            output.push('\n');
            output.push_str(closing);
            output.push('\n');
        }
        output
    }

    fn stats_section(outcome: &DiscussionOutcome) -> String {
        let mut output = Self::section_header("Statistics");
        output.push_str(&format!(
            "{} {}\n",
            "Candidates mentioned:".cyan(),
            outcome.candidates.len()
        ));
        output.push_str(&format!("{} {}\n", "Final phase:".cyan(), outcome.phase));
        output.push_str(&outcome.final_stats);
        output.push('\n');
        output
    }

    fn end_reason(reason: EndReason) -> colored::ColoredString {
        match reason {
            EndReason::VotingCompleted => "vote completed".green(),
            EndReason::StoppedByUser => "stopped by user".yellow(),
            EndReason::MaxRoundsReached => "round limit reached".yellow(),
            EndReason::Cancelled => "cancelled".red(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_full(&self, outcome: &DiscussionOutcome) -> String {
        Self::format(outcome)
    }

    fn format_stats(&self, outcome: &DiscussionOutcome) -> String {
        Self::format_stats(outcome)
    }

    fn format_json(&self, outcome: &DiscussionOutcome) -> String {
        Self::format_json(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::{Ballot, DiscussionPhase, OutputFormat, TallyEntry};

    fn outcome() -> DiscussionOutcome {
        DiscussionOutcome {
            topic: "给一个即将出生的男孩起名字".to_string(),
            rounds: 4,
            end_reason: EndReason::VotingCompleted,
            phase: DiscussionPhase::ResultsPublished,
            candidates: vec!["唐若岚".to_string(), "唐峻".to_string()],
            results: vec![TallyEntry::new("唐若岚", 2), TallyEntry::new("唐峻", 1)],
            ballots: vec![
                Ballot::new("爸爸", vec!["唐若岚".to_string(), "唐峻".to_string()]),
                Ballot::new("诗人", vec!["唐若岚".to_string()]),
            ],
            closing: Some("会议结束，祝福宝宝。".to_string()),
            transcript: vec![
                TranscriptEntry {
                    kind: EntryKind::Opening,
                    speaker: "主持人".to_string(),
                    round: None,
                    content: "大家好".to_string(),
                },
                TranscriptEntry {
                    kind: EntryKind::Speech,
                    speaker: "爸爸".to_string(),
                    round: Some(1),
                    content: "我喜欢唐若岚".to_string(),
                },
            ],
            final_stats: "总发言数: 4".to_string(),
        }
    }

    #[test]
    fn test_full_contains_transcript_and_vote() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&outcome());
        assert!(text.contains("── [1] 爸爸 ──"));
        assert!(text.contains("我喜欢唐若岚"));
        assert!(text.contains("1. 唐若岚: 2票"));
        assert!(text.contains("爸爸: 唐若岚, 唐峻"));
        assert!(text.contains("会议结束"));
        assert!(text.contains("总发言数: 4"));
    }

    #[test]
    fn test_stats_lists_winners() {
        colored::control::set_override(false);
        let text = ConsoleFormatter.render(&outcome(), OutputFormat::Stats);
        assert!(text.contains("Top names: 唐若岚, 唐峻"));
        assert!(text.contains("vote completed (4 rounds)"));
        assert!(!text.contains("我喜欢唐若岚"));
    }

    #[test]
    fn test_stats_without_ballots() {
        colored::control::set_override(false);
        let mut outcome = outcome();
        outcome.results.clear();
        outcome.end_reason = EndReason::MaxRoundsReached;
        let text = ConsoleFormatter::format_stats(&outcome);
        assert!(text.contains("No ballots were cast."));
        assert!(text.contains("round limit reached"));
    }

    #[test]
    fn test_json_round_trips_outcome() {
        let json = ConsoleFormatter::format_json(&outcome());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["end_reason"], "voting_completed");
        assert_eq!(value["results"][0]["candidate"], "唐若岚");
        assert_eq!(value["results"][0]["votes"], 2);
        assert_eq!(value["ballots"][1]["voter"], "诗人");
    }
}
