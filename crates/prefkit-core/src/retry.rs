//! Bounded retry for backing-file writes.
//!
//! Settings files are sometimes briefly locked by another process (a virus
//! scanner, a sync client, a second tool session).  A write is therefore
//! attempted a fixed number of times with a short pause in between, and the
//! last error is surfaced to the caller as [`SettingsError::WriteFailure`].

use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::SettingsError;

/// Default number of write attempts (the first try plus one retry).
pub const DEFAULT_ATTEMPTS: u32 = 2;

/// Default pause between attempts.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// How many times to attempt a write, and how long to wait between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy.  `attempts` is clamped to at least 1.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// A policy that tries exactly once.
    pub fn once() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// `path` is only used for logging and for the returned error.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::WriteFailure`] carrying the last I/O error.
    pub fn run<F>(&self, path: &Path, mut op: F) -> Result<(), SettingsError>
    where
        F: FnMut() -> io::Result<()>,
    {
        let mut attempt = 1;
        loop {
            match op() {
                Ok(()) => {
                    if attempt > 1 {
                        debug!(path = %path.display(), attempt, "write succeeded after retry");
                    }
                    return Ok(());
                }
                Err(source) if attempt >= self.attempts => {
                    warn!(path = %path.display(), attempts = attempt, error = %source, "giving up on settings write");
                    return Err(SettingsError::WriteFailure {
                        path: path.to_path_buf(),
                        attempts: attempt,
                        source,
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), attempt, error = %e, "settings write failed, retrying");
                    if !self.delay.is_zero() {
                        thread::sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::{automock, Sequence};

    #[automock]
    trait Writer {
        fn write(&self) -> io::Result<()>;
    }

    fn locked() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "file is locked")
    }

    #[test]
    fn test_default_policy_is_two_attempts_100ms() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.attempts(), 2);
        assert_eq!(policy.delay(), Duration::from_millis(100));
    }

    #[test]
    fn test_zero_attempts_is_clamped_to_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
    }

    #[test]
    fn test_run_succeeds_first_time_without_retry() {
        // Arrange
        let mut writer = MockWriter::new();
        writer.expect_write().times(1).returning(|| Ok(()));

        // Act
        let result = RetryPolicy::new(3, Duration::ZERO).run(Path::new("settings.cfg"), || writer.write());

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_retries_after_transient_failure() {
        // Arrange
        let mut writer = MockWriter::new();
        let mut seq = Sequence::new();
        writer
            .expect_write()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Err(locked()));
        writer
            .expect_write()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        // Act
        let result = RetryPolicy::new(2, Duration::ZERO).run(Path::new("settings.cfg"), || writer.write());

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_run_surfaces_write_failure_after_budget() {
        // Arrange
        let mut writer = MockWriter::new();
        writer.expect_write().times(3).returning(|| Err(locked()));

        // Act
        let result = RetryPolicy::new(3, Duration::ZERO).run(Path::new("prefs/settings.cfg"), || writer.write());

        // Assert
        match result {
            Err(SettingsError::WriteFailure { path, attempts, source }) => {
                assert_eq!(path, Path::new("prefs/settings.cfg"));
                assert_eq!(attempts, 3);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected WriteFailure, got {other:?}"),
        }
    }
}
