// src/config.rs

//! Configuration types for the slide limiter

// dependencies
use crate::errors::SlidingLimiterError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Requests admitted per window when nothing else is configured
pub const DEFAULT_MAX_REQUESTS: u32 = 10;

/// Window length in milliseconds when nothing else is configured
pub const DEFAULT_WINDOW_MS: u64 = 60_000;

/// Configuration for sliding window limiter behavior.
///
/// Zero values are accepted and produce degenerate but well-defined
/// behavior: a zero quota refuses everything, a zero window admits
/// everything. Call [`validate`](Self::validate) to reject them instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlidingLimiterConfig {
    pub(crate) max_requests: u32,
    pub(crate) window_ms: u64,
}

impl SlidingLimiterConfig {
    /// Create a new configuration with quota and window settings
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self {
            max_requests,
            window_ms,
        }
    }

    /// Builder-style: set the quota per window
    pub fn max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests;
        self
    }

    /// Builder-style: set the window length in milliseconds
    pub fn window_ms(mut self, window_ms: u64) -> Self {
        self.window_ms = window_ms;
        self
    }

    /// Builder-style: set the window length from a `Duration`
    pub fn window(mut self, window: Duration) -> Self {
        self.window_ms = window.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), SlidingLimiterError> {
        if self.max_requests == 0 {
            return Err(SlidingLimiterError::InvalidQuota);
        }
        if self.window_ms == 0 {
            return Err(SlidingLimiterError::InvalidWindow);
        }
        Ok(())
    }
}

impl Default for SlidingLimiterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW_MS)
    }
}

/// Per-operation-class limits, keyed by class name ("ai", "search", ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LimiterSetConfig {
    classes: BTreeMap<String, SlidingLimiterConfig>,
}

impl LimiterSetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add or replace the limits for one operation class
    pub fn class(mut self, name: impl Into<String>, config: SlidingLimiterConfig) -> Self {
        self.classes.insert(name.into(), config);
        self
    }

    /// Validate every class, reporting the first failure
    pub fn validate(&self) -> Result<(), SlidingLimiterError> {
        self.classes.values().try_for_each(SlidingLimiterConfig::validate)
    }

    pub fn get(&self, name: &str) -> Option<&SlidingLimiterConfig> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl IntoIterator for LimiterSetConfig {
    type Item = (String, SlidingLimiterConfig);
    type IntoIter = std::collections::btree_map::IntoIter<String, SlidingLimiterConfig>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.into_iter()
    }
}

impl FromIterator<(String, SlidingLimiterConfig)> for LimiterSetConfig {
    fn from_iter<I: IntoIterator<Item = (String, SlidingLimiterConfig)>>(iter: I) -> Self {
        Self {
            classes: iter.into_iter().collect(),
        }
    }
}
