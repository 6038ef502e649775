//! CLI command definitions

use clap::{Parser, ValueEnum};
use roundtable_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Output format for the final report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Complete transcript followed by the vote
    Full,
    /// Vote result and discussion statistics
    Stats,
    /// JSON output
    Json,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => DomainOutputFormat::Full,
            OutputFormat::Stats => DomainOutputFormat::Stats,
            OutputFormat::Json => DomainOutputFormat::Json,
        }
    }
}

/// CLI arguments for roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "Moderated panel discussion that converges on a name by vote")]
#[command(long_about = r#"
Roundtable runs a moderated naming discussion between several participants.

The discussion moves through these stages:
1. Debate: participants propose and challenge candidate names
2. Voting: once enough distinct candidates were mentioned, every
   participant casts one ballot (【投票】唐XX, 唐XX, ...)
3. Results: the moderator publishes the tally and closes the meeting

Configuration files are loaded from (in priority order):
1. --config <path>          Explicit config file
2. ./roundtable.toml        Project-level config
3. ~/.config/roundtable/config.toml   Global config

Example:
  roundtable --rehearsal
  roundtable --topic "给女儿起名字" --prefix 李 --threshold 20
  roundtable --interactive --format full
"#)]
pub struct Cli {
    /// Discussion topic (overrides config)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Family-name prefix every candidate starts with
    #[arg(long, value_name = "CHAR")]
    pub prefix: Option<String>,

    /// Distinct candidates needed before the vote starts
    #[arg(long, value_name = "N")]
    pub threshold: Option<usize>,

    /// Choices counted per ballot
    #[arg(long, value_name = "N")]
    pub ballot_size: Option<usize>,

    /// Maximum number of turns
    #[arg(long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Ask after each summary whether to stop or who speaks next
    #[arg(short, long)]
    pub interactive: bool,

    /// Use the offline rehearsal producer instead of the configured gateway
    #[arg(long)]
    pub rehearsal: bool,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write a JSONL transcript to this file
    #[arg(long, value_name = "PATH")]
    pub transcript: Option<PathBuf>,

    /// Append to the transcript file instead of overwriting it
    #[arg(long)]
    pub append_transcript: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Also write diagnostic logs to this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
