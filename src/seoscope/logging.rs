//! Logging setup.
//!
//! Installs a global `tracing` subscriber writing to stderr, so stdout stays clean for
//! rendered reports. The filter comes from `SEOSCOPE_LOG` when set, otherwise from the
//! verbosity flag.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

pub const LOG_ENV: &str = "SEOSCOPE_LOG";

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Install the subscriber once per process. Later calls are no-ops.
pub fn init(verbose: bool) -> Result<(), LoggingError> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let stderr_layer = fmt::layer()
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr);
    let subscriber = Registry::default()
        .with(build_env_filter(verbose))
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = INITIALIZED.set(());

    tracing::debug!("logging initialized");
    Ok(())
}

fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "seoscope=debug"
    } else {
        "warn"
    }
}

fn build_env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}
