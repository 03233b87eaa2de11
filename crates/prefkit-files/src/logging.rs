//! `tracing` subscriber setup with a switchable debug level.
//!
//! The stores only emit `tracing` events; nothing is printed unless the
//! application installs a subscriber.  [`init_logging`] installs one that
//! writes formatted lines to stderr and returns a [`LogHandle`] for turning
//! debug output on and off at runtime.
//!
//! The level is `RUST_LOG` when set, otherwise the `default_level` passed in
//! (usually `StoreConfig::logging.level`).

use tracing::Subscriber;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, reload, EnvFilter, Registry};
use thiserror::Error;

/// Error type for logging setup.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// A global subscriber is already installed.
    #[error("failed to install tracing subscriber: {0}")]
    Install(#[from] TryInitError),

    /// The filter could not be swapped (the subscriber was dropped).
    #[error("failed to change log level: {0}")]
    Reload(#[from] reload::Error),
}

/// Runtime control over the installed filter.
#[derive(Debug, Clone)]
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
    base: String,
}

impl LogHandle {
    /// Switches every target to `debug`.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Reload`] if the subscriber no longer exists.
    pub fn enable_debug(&self) -> Result<(), LoggingError> {
        self.filter.reload(EnvFilter::new("debug"))?;
        Ok(())
    }

    /// Restores the level chosen at initialisation.
    ///
    /// # Errors
    ///
    /// Returns [`LoggingError::Reload`] if the subscriber no longer exists.
    pub fn disable_debug(&self) -> Result<(), LoggingError> {
        self.filter.reload(EnvFilter::new(&self.base))?;
        Ok(())
    }

    /// The filter directive restored by [`disable_debug`](Self::disable_debug).
    pub fn base_level(&self) -> &str {
        &self.base
    }
}

/// Builds the subscriber without installing it.
pub fn subscriber(default_level: &str) -> (impl Subscriber + Send + Sync + 'static, LogHandle) {
    let base = std::env::var("RUST_LOG")
        .ok()
        .filter(|directives| EnvFilter::try_new(directives).is_ok())
        .unwrap_or_else(|| default_level.to_string());

    let (filter, handle) = reload::Layer::new(EnvFilter::new(&base));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    (subscriber, LogHandle { filter: handle, base })
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::Install`] if a global subscriber already exists.
pub fn init_logging(default_level: &str) -> Result<LogHandle, LoggingError> {
    let (subscriber, handle) = subscriber(default_level);
    subscriber.try_init()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_enable_and_disable_debug_swap_the_filter() {
        // Arrange
        let (subscriber, handle) = subscriber("warn");

        tracing::subscriber::with_default(subscriber, || {
            // Act
            handle.enable_debug().expect("enable");

            // Assert
            assert!(tracing::enabled!(Level::DEBUG));

            handle.disable_debug().expect("disable");
            if std::env::var_os("RUST_LOG").is_none() {
                assert!(!tracing::enabled!(Level::DEBUG));
                assert!(tracing::enabled!(Level::WARN));
            }
        });
    }

    #[test]
    fn test_base_level_defaults_to_argument() {
        if std::env::var_os("RUST_LOG").is_none() {
            let (_, handle) = subscriber("error");
            assert_eq!(handle.base_level(), "error");
        }
    }
}
