//! Interrupt handling.
//!
//! The first SIGINT or SIGTERM cancels the run's [`CancellationToken`] so
//! in-flight files finish and nothing new starts. A second signal, arriving
//! once the token is already cancelled, terminates the process with status
//! 130.

use std::io;
use std::thread::{self, JoinHandle};

use signal_hook::SigId;
use signal_hook::consts::signal::{SIGINT, SIGTERM};
use signal_hook::flag;
use signal_hook::iterator::{Handle, Signals};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cancel::CancellationToken;

const SIGNALS_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::signals");
const INTERRUPTED_STATUS: i32 = 130;
const HANDLED: [i32; 2] = [SIGINT, SIGTERM];

/// Errors reported while installing signal handlers.
#[derive(Debug, Error)]
pub enum SignalError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl From<io::Error> for SignalError {
    fn from(source: io::Error) -> Self {
        Self::Install { source }
    }
}

/// Keeps the handlers installed until dropped.
#[derive(Debug)]
pub struct SignalGuard {
    handle: Handle,
    listener: Option<JoinHandle<()>>,
    forced_exit: Vec<SigId>,
}

/// Routes SIGINT and SIGTERM to `cancel` until the guard is dropped.
///
/// # Errors
///
/// Returns [`SignalError::Install`] if the handlers cannot be registered or
/// the listener thread cannot be started.
pub fn install(cancel: &CancellationToken) -> Result<SignalGuard, SignalError> {
    let mut forced_exit = Vec::with_capacity(HANDLED.len());
    for signal in HANDLED {
        forced_exit.push(flag::register_conditional_shutdown(
            signal,
            INTERRUPTED_STATUS,
            cancel.flag(),
        )?);
    }

    let mut signals = Signals::new(HANDLED)?;
    let handle = signals.handle();
    let token = cancel.clone();
    let listener = thread::Builder::new()
        .name(String::from("unraw-signals"))
        .spawn(move || {
            for signal in signals.forever() {
                warn!(
                    target: SIGNALS_TARGET,
                    signal,
                    "interrupt received; finishing in-flight files"
                );
                token.cancel();
            }
        })?;

    debug!(target: SIGNALS_TARGET, "signal handlers installed");
    Ok(SignalGuard {
        handle,
        listener: Some(listener),
        forced_exit,
    })
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(listener) = self.listener.take() {
            if listener.join().is_err() {
                warn!(target: SIGNALS_TARGET, "signal listener terminated abnormally");
            }
        }
        for id in self.forced_exit.drain(..) {
            signal_hook::low_level::unregister(id);
        }
    }
}
