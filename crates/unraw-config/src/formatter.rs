use clap::ValueEnum;
use strum::{Display, EnumString};

/// Canonicaliser applied to rewritten files before they are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, ValueEnum)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FormatterKind {
    /// Run `gofmt` when it can be started, otherwise fall back to
    /// [`FormatterKind::Check`] with a warning.
    #[default]
    Auto,
    /// Pipe the printed text through `gofmt`; failing to run it is an error.
    Gofmt,
    /// Keep the printed text and only verify that it still parses.
    Check,
}
