// src/limiter_set.rs

//! Named groups of independently configured limiters, one per operation class.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::LimiterSetConfig;
use crate::errors::SlidingLimiterError;
use crate::sliding_limiter::SlidingLimiter;
use std::collections::HashMap;

/// A mapping from operation class ("ai", "search", "uploads", ...) to the
/// limiter guarding it. Members share no state with each other.
///
/// ```rust
/// use slide_limiter::{LimiterSet, LimiterSetConfig, SlidingLimiterConfig, SystemClock};
///
/// let config = LimiterSetConfig::new()
///     .class("ai", SlidingLimiterConfig::new(5, 60_000))
///     .class("search", SlidingLimiterConfig::new(30, 60_000));
/// let limiters = LimiterSet::from_config(config, SystemClock);
///
/// assert!(limiters.try_request("ai", "user_123").unwrap());
/// ```
#[derive(Debug)]
pub struct LimiterSet<C = SystemClock>
where
    C: Clock,
{
    limiters: HashMap<String, SlidingLimiter<String, C>>,
}

impl<C> LimiterSet<C>
where
    C: Clock + Clone,
{
    /// Build one limiter per configured class, all reading the same clock.
    pub fn from_config(config: LimiterSetConfig, clock: C) -> Self {
        let limiters = config
            .into_iter()
            .map(|(name, limits)| (name, SlidingLimiter::with_config(limits, clock.clone())))
            .collect();
        Self { limiters }
    }
}

impl<C> Default for LimiterSet<C>
where
    C: Clock,
{
    fn default() -> Self {
        Self {
            limiters: HashMap::new(),
        }
    }
}

impl<C> LimiterSet<C>
where
    C: Clock,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a limiter under `name`, returning the one it replaced.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        limiter: SlidingLimiter<String, C>,
    ) -> Option<SlidingLimiter<String, C>> {
        self.limiters.insert(name.into(), limiter)
    }

    pub fn get(&self, name: &str) -> Option<&SlidingLimiter<String, C>> {
        self.limiters.get(name)
    }

    /// Like [`get`](Self::get), failing with `UnknownLimiter` for an unconfigured class.
    pub fn limiter(&self, name: &str) -> Result<&SlidingLimiter<String, C>, SlidingLimiterError> {
        self.get(name)
            .ok_or_else(|| SlidingLimiterError::UnknownLimiter(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.limiters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.limiters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limiters.is_empty()
    }

    pub fn try_request_at(
        &self,
        class: &str,
        client_id: impl Into<String>,
        now: u64,
    ) -> Result<bool, SlidingLimiterError> {
        Ok(self.limiter(class)?.try_request_at(client_id.into(), now))
    }

    pub fn try_request(
        &self,
        class: &str,
        client_id: impl Into<String>,
    ) -> Result<bool, SlidingLimiterError> {
        self.limiter(class)?.try_request(client_id.into())
    }

    /// Sweep every member at `now`, returning the total of clients removed.
    pub fn cleanup_at(&self, now: u64) -> usize {
        self.limiters
            .values()
            .map(|limiter| limiter.cleanup_at(now))
            .sum()
    }

    /// Sweep every member against its own clock.
    pub fn cleanup(&self) -> Result<usize, SlidingLimiterError> {
        self.limiters
            .values()
            .try_fold(0, |total, limiter| {
                limiter.cleanup().map(|removed| total + removed)
            })
    }
}
