// src/clock.rs

// clock abstraction used to timestamp admitted requests

// dependencies
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns the current time in milliseconds as a u64.
/// Any monotone millisecond origin works; the limiter only compares
/// timestamps produced by the same clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<u64, ClockError>;
}

/// Clock error type
#[derive(Debug, Error)]
pub enum ClockError {
    #[error("system time is before the Unix epoch")]
    SystemTimeError,
}

/// SystemClock implementation using the system time.
/// Returns the current time in milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<u64, ClockError> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|_| ClockError::SystemTimeError)
    }
}
