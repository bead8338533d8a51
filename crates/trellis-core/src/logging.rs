#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature enabled the `tracing` macros are re-exported
//! here (and at the crate root) so dependent crates log through
//! `trellis_core` without naming `tracing` themselves.
//!
//! The `tracing-json` feature adds [`init_json_subscriber`], which installs a
//! JSON formatter filtered by `RUST_LOG` (falling back to a caller-supplied
//! directive).

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Failure to install the global JSON subscriber.
#[cfg(feature = "tracing-json")]
#[derive(Debug)]
pub enum LoggingInitError {
    /// The fallback filter directive did not parse.
    InvalidFilter(tracing_subscriber::filter::ParseError),
    /// A global subscriber is already installed.
    AlreadyInstalled(tracing_subscriber::util::TryInitError),
}

#[cfg(feature = "tracing-json")]
impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(err) => write!(f, "invalid log filter: {err}"),
            Self::AlreadyInstalled(err) => write!(f, "subscriber already installed: {err}"),
        }
    }
}

#[cfg(feature = "tracing-json")]
impl std::error::Error for LoggingInitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidFilter(err) => Some(err),
            Self::AlreadyInstalled(err) => Some(err),
        }
    }
}

/// Install a process-wide JSON subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (for example
/// `"trellis_grid=debug"`) is used.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber(default_filter: &str) -> Result<(), LoggingInitError> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter).map_err(LoggingInitError::InvalidFilter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .try_init()
        .map_err(LoggingInitError::AlreadyInstalled)
}
