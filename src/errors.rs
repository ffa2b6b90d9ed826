// src/errors.rs

// error handling for the slide limiter types

// dependencies
use thiserror::Error;

use crate::clock::ClockError;

/// Error type for sliding limiter configuration and runtime issues.
///
/// A refused request is never an error; it is reported as `false` (or an
/// unallowed [`SlidingDecision`](crate::SlidingDecision)).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SlidingLimiterError {
    /// `max_requests == 0`, only reported by `validate`
    #[error("Quota must be at least one request per window")]
    InvalidQuota,
    /// `window_ms == 0`, only reported by `validate`
    #[error("Window must be longer than zero milliseconds")]
    InvalidWindow,
    #[error("Clock error occurred: {0}")]
    ClockError(#[from] ClockError),
    #[error("No limiter is configured for operation class `{0}`")]
    UnknownLimiter(String),
    #[error("Failed to spawn cleanup thread: {0}")]
    Spawn(#[from] std::io::Error),
}
