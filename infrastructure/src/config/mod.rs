//! Configuration file loading for roundtable
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `--config <path>` specified file
//! 2. Project root: `./roundtable.toml` or `./.roundtable.toml`
//! 3. Global: `<config dir>/roundtable/config.toml`
//! 4. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDiscussionConfig, FileGatewayConfig, FileGatewayKind,
    FileLoggingConfig, FileModeratorConfig, FileOutputConfig,
    FileParticipantConfig, FilePanelConfig,
};
pub use loader::ConfigLoader;
