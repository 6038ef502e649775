//! Report format selector

use serde::{Deserialize, Serialize};

/// How the final discussion report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Transcript, results and statistics
    Full,
    /// Results and statistics only
    #[default]
    Stats,
    /// Machine-readable outcome
    Json,
}
