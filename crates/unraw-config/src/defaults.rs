use std::num::NonZeroUsize;
use std::thread;

/// Default log filter expression used by the binary.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Executable run by the `gofmt` formatter unless overridden.
pub const DEFAULT_GOFMT_PATH: &str = "gofmt";

/// Worker count meaning "one per available CPU".
pub const AUTO_WORKERS: usize = 0;

/// Largest worker count accepted; larger requests are clamped to it.
pub const MAX_WORKERS: u16 = 1024;

/// Number of queued jobs allowed per worker before the producer blocks.
pub const QUEUE_SLOTS_PER_WORKER: usize = 2;

/// Default log filter expression used by the binary.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format for the binary.
#[must_use]
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Compact
}

/// Resolves a requested worker count, mapping [`AUTO_WORKERS`] to the
/// host's available parallelism (or one if that cannot be determined).
///
/// The result never exceeds [`MAX_WORKERS`].
#[must_use]
pub fn resolve_workers(requested: usize) -> usize {
    let resolved = if requested == AUTO_WORKERS {
        thread::available_parallelism().map_or(1, NonZeroUsize::get)
    } else {
        requested
    };
    resolved.min(usize::from(MAX_WORKERS))
}
