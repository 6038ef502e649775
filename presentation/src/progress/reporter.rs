//! Progress reporting while a discussion runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use roundtable_application::ports::progress::DiscussionProgressNotifier;
use roundtable_application::{DiscussionOutcome, SelectionSource};
use roundtable_domain::{TallyEntry, TurnReport, snippet};
use std::sync::Mutex;
use std::time::Duration;

/// Characters of a speech echoed to the console
const ECHO_CHARS: usize = 120;

/// Reports discussion progress on the terminal.
///
/// A spinner runs while a producer is working; every event prints one
/// short colored line above it.
pub struct ConsoleProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Print a line without tearing the spinner.
    fn line(&self, text: String) {
        match self.spinner.lock().ok().and_then(|s| s.clone()) {
            Some(pb) => pb.println(text),
            None => println!("{}", text),
        }
    }

    fn source_label(source: &SelectionSource) -> String {
        match source {
            SelectionSource::VotingQueue => "voting queue".to_string(),
            SelectionSource::Manual => "manual".to_string(),
            SelectionSource::Moderator => "moderator".to_string(),
            SelectionSource::RoundRobin => "round robin".to_string(),
            SelectionSource::Invalid { raw, .. } => format!("fallback, got {:?}", raw),
        }
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscussionProgressNotifier for ConsoleProgress {
    fn on_discussion_start(&self, topic: &str, participants: &[String]) {
        self.line(format!("{} {}", "Topic:".cyan().bold(), topic));
        self.line(format!(
            "{} {}",
            "Panel:".cyan().bold(),
            participants.join("、")
        ));
    }

    fn on_opening(&self, message: &str) {
        self.line(format!("{} {}", "->".cyan(), message.dimmed()));
    }

    fn on_producer_start(&self, name: &str) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(name.to_string());
        pb.set_message("thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(previous) = spinner.replace(pb)
        {
            previous.finish_and_clear();
        }
    }

    fn on_producer_end(&self, _name: &str) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }

    fn on_voting_announced(&self, announcement: &str) {
        self.line(format!(
            "\n{} {}",
            "Voting:".magenta().bold(),
            announcement
        ));
    }

    fn on_speaker_selected(&self, speaker: &str, round: usize, source: &SelectionSource) {
        let label = format!("[{}] {}", round, speaker).yellow().bold();
        let source = format!("({})", Self::source_label(source)).dimmed();
        self.line(format!("\n{} {}", label, source));
    }

    fn on_ballot_retry(&self, speaker: &str, attempt: usize) {
        self.line(format!(
            "  {} {} forgot the ballot line, reminder #{}",
            "!".yellow(),
            speaker,
            attempt
        ));
    }

    fn on_synthetic_ballot(&self, speaker: &str, ballot_line: &str) {
        self.line(format!(
            "  {} ballot filled in for {}: {}",
            "!".red(),
            speaker,
            ballot_line
        ));
    }

    fn on_turn_complete(&self, _speaker: &str, _round: usize, text: &str, report: &TurnReport) {
        self.line(format!("  {}", snippet(text, ECHO_CHARS)));
        if !report.new_candidates.is_empty() {
            self.line(format!(
                "  {} {}",
                "+".green(),
                report.new_candidates.join(", ").green()
            ));
        }
        match &report.ballot {
            Some(Ok(choices)) => {
                self.line(format!("  {} {}", "v".green(), choices.join(", ")));
            }
            Some(Err(rejection)) => {
                self.line(format!("  {} ballot rejected: {}", "x".red(), rejection));
            }
            None => {}
        }
        if report.converged_now {
            self.line(format!(
                "  {}",
                "Enough candidates, the vote starts next round.".magenta()
            ));
        }
    }

    fn on_summary(&self, summary: &str) {
        self.line(format!("  {}", summary.dimmed()));
    }

    fn on_results(&self, _closing: &str, results: &[TallyEntry]) {
        self.line(format!("\n{}", "Results:".green().bold()));
        for entry in results {
            self.line(format!("  {}", entry));
        }
    }

    fn on_discussion_finished(&self, outcome: &DiscussionOutcome) {
        self.on_producer_end("");
        self.line(format!(
            "\n{} {} after {} rounds",
            "Finished:".cyan().bold(),
            outcome.end_reason,
            outcome.rounds
        ));
    }
}
