//! Structured logging for the rewriter.
//!
//! Log lines always go to stderr; stdout is reserved for the run summary.
//! The subscriber is installed once per process, and later calls are no-ops.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::subscriber::SetGlobalDefaultError;
use tracing_subscriber::fmt::{self, time::UtcTime};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

use unraw_config::LogFormat;

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Proof that the global subscriber is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// Errors encountered while configuring telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The log filter expression does not parse.
    #[error("invalid log filter '{expression}': {message}")]
    Filter {
        /// Expression as given on the command line.
        expression: String,
        /// Parser diagnostic.
        message: String,
    },
    /// Another global subscriber was installed first.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(#[source] SetGlobalDefaultError),
}

/// Installs the global subscriber logging events that pass `filter` in
/// `format`.
///
/// Only the first successful call has any effect.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] for an unparsable filter expression and
/// [`TelemetryError::Subscriber`] if a subscriber was installed elsewhere.
pub fn initialise(filter: &str, format: LogFormat) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install(filter, format))
        .map(|_| TelemetryHandle)
}

pub(crate) fn parse_filter(expression: &str) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(expression).map_err(|error| TelemetryError::Filter {
        expression: expression.to_owned(),
        message: error.to_string(),
    })
}

fn install(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let filter = parse_filter(filter)?;
    let registry = tracing_subscriber::registry();

    let installed = match format {
        LogFormat::Json => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(io::stderr)
                    .with_filter(filter),
            ),
        ),
        LogFormat::Compact => tracing::subscriber::set_global_default(
            registry.with(
                fmt::layer()
                    .compact()
                    .with_ansi(io::stderr().is_terminal())
                    .with_timer(UtcTime::rfc_3339())
                    .with_writer(io::stderr)
                    .with_filter(filter),
            ),
        ),
    };
    installed.map_err(TelemetryError::Subscriber)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn initialise_is_idempotent() {
        initialise("info", LogFormat::Compact).expect("first initialisation");
        initialise("debug", LogFormat::Json).expect("second initialisation");
    }

    #[rstest]
    #[case("info")]
    #[case("unraw=debug,warn")]
    #[case("off")]
    fn valid_filters_parse(#[case] expression: &str) {
        assert!(parse_filter(expression).is_ok());
    }

    #[test]
    fn invalid_filter_names_the_expression() {
        let error = parse_filter("unraw=loud").expect_err("unknown level");

        assert!(matches!(
            &error,
            TelemetryError::Filter { expression, .. } if expression == "unraw=loud"
        ));
        assert!(error.to_string().starts_with("invalid log filter 'unraw=loud': "));
    }
}
