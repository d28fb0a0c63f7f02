use clap::ValueEnum;
use strum::{Display, EnumString};

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Human-readable single line output.
    #[default]
    Compact,
}

/// Errors encountered while parsing a [`LogFormat`] from text.
pub type LogFormatParseError = strum::ParseError;
