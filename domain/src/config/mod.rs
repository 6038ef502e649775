//! Report settings shared by the configuration file, the CLI and the
//! formatter.

mod output_format;

pub use output_format::OutputFormat;
