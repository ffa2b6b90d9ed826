// src/lib.rs

//! # Slide Limiter
//!
//! A per-identifier sliding-window request rate limiter.
//!
//! Every identifier (user id, IP, route name) gets its own window of recent
//! admitted request timestamps. A request is admitted while fewer than
//! `max_requests` timestamps fall inside `(now - window_ms, now]`.
//!
//! ## Quick Example
//!
//! ```rust
//! use slide_limiter::{SlidingLimiter, SlidingLimiterConfig, SystemClock};
//!
//! let config = SlidingLimiterConfig::new(10, 60_000);
//! let limiter = SlidingLimiter::with_config(config, SystemClock);
//!
//! let decision = limiter.check_request("user_123").unwrap();
//! if decision.allowed {
//!     println!("Request allowed, {} left", decision.remaining);
//! } else {
//!     println!("Rate limited - retry after {}ms",
//!              decision.retry_after_ms.unwrap_or(0));
//! }
//! ```
//!
//! ## Deterministic time
//!
//! Every clock-reading method has an `_at` twin taking the current time in
//! milliseconds, so callers (and tests) can drive the limiter explicitly:
//!
//! ```rust
//! use slide_limiter::SlidingLimiter;
//!
//! let limiter = SlidingLimiter::<&str>::new(2, 1_000);
//! assert!(limiter.try_request_at("u", 0));
//! assert!(limiter.try_request_at("u", 100));
//! assert!(!limiter.try_request_at("u", 200));
//! assert_eq!(limiter.retry_after_at("u", 200), 800);
//! assert!(limiter.try_request_at("u", 1_001));
//! ```

// private modules
mod clock;
mod config;
mod errors;
mod limiter_set;
mod sliding_limiter;
mod sweeper;

// public API exports
pub use clock::{Clock, ClockError, SystemClock};
pub use config::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS, LimiterSetConfig, SlidingLimiterConfig};
pub use errors::SlidingLimiterError;
pub use limiter_set::LimiterSet;
pub use sliding_limiter::{LimiterStats, SlidingDecision, SlidingLimiter};
pub use sweeper::{CleanupHandle, Sweep, spawn_cleanup_thread};
