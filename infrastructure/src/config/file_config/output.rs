//! Report settings from TOML (`[output]` section)
//!
//! ```toml
//! [output]
//! format = "stats"   # full | stats | json
//! color = true
//! ```

use roundtable_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Unset lets the CLI default apply
    pub format: Option<OutputFormat>,
    /// `false` strips ANSI colors from progress and report
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_section_keeps_color() {
        let config: FileOutputConfig = toml::from_str("format = \"json\"").unwrap();
        assert_eq!(config.format, Some(OutputFormat::Json));
        assert!(config.color);
    }

    #[test]
    fn test_unknown_format_rejected() {
        assert!(toml::from_str::<FileOutputConfig>("format = \"synthesis\"").is_err());
    }
}
