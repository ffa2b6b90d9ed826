// src/sliding_limiter.rs

// slide-limiter: a per-identifier sliding-window request limiter.

// dependencies
use crate::clock::{Clock, SystemClock};
use crate::config::SlidingLimiterConfig;
use crate::errors::SlidingLimiterError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::{debug, trace};

/// The main SlidingLimiter model.
/// T is the type used to identify clients (e.g., String, u64, etc.).
/// C is the clock type, defaulting to SystemClock.
///
/// Each client owns the timestamps (milliseconds) of its admitted requests
/// that may still fall inside the window. A `DashMap` shard lock is held for
/// the whole check-then-append, so two concurrent requests for one client can
/// never both take the last slot.
#[derive(Debug)]
pub struct SlidingLimiter<T, C = SystemClock>
where
    T: Hash + Eq + Clone,
    C: Clock,
{
    max_requests: u32,
    window_ms: u64,
    client_windows: DashMap<T, VecDeque<u64>>,
    clock: C,
}

impl<T> SlidingLimiter<T, SystemClock>
where
    T: Hash + Eq + Clone + Debug,
{
    /// Create a limiter backed by the system clock.
    ///
    /// A `window_ms` of zero admits every request; a `max_requests` of zero
    /// refuses every request.
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self::with_config(
            SlidingLimiterConfig::new(max_requests, window_ms),
            SystemClock,
        )
    }
}

impl<T> Default for SlidingLimiter<T, SystemClock>
where
    T: Hash + Eq + Clone + Debug,
{
    fn default() -> Self {
        Self::with_config(SlidingLimiterConfig::default(), SystemClock)
    }
}

// methods for the SlidingLimiter type
impl<T, C> SlidingLimiter<T, C>
where
    T: Hash + Eq + Clone + Debug,
    C: Clock,
{
    // method to create a new limiter from a config object, degenerate values included
    pub fn with_config(config: SlidingLimiterConfig, clock: C) -> Self {
        Self {
            max_requests: config.max_requests,
            window_ms: config.window_ms,
            client_windows: DashMap::new(),
            clock,
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn config(&self) -> SlidingLimiterConfig {
        SlidingLimiterConfig::new(self.max_requests, self.window_ms)
    }

    // a timestamp counts while it lies in (now - window, now]
    #[inline]
    fn in_window(&self, timestamp: u64, now: u64) -> bool {
        timestamp.saturating_add(self.window_ms) > now
    }

    // delay until one more request fits, given the in-window count and oldest entry
    fn retry_delay(&self, in_window: usize, earliest: Option<u64>, now: u64) -> u64 {
        if in_window < self.max_requests as usize {
            return 0;
        }
        match earliest {
            Some(timestamp) => timestamp.saturating_add(self.window_ms).saturating_sub(now),
            // zero quota: nothing will ever expire into a free slot
            None => u64::MAX,
        }
    }

    // count and oldest timestamp of a client's in-window requests, without mutation
    fn window_summary<Q>(&self, client_id: &Q, now: u64) -> (usize, Option<u64>)
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let Some(window) = self.client_windows.get(client_id) else {
            return (0, None);
        };
        let summary = window
            .iter()
            .copied()
            .filter(|&timestamp| self.in_window(timestamp, now))
            .fold((0, None), |(count, earliest), timestamp| {
                let earliest = Some(earliest.map_or(timestamp, |e: u64| e.min(timestamp)));
                (count + 1, earliest)
            });
        summary
    }

    /// Decide admission for `client_id` at `now` and report the quota state.
    ///
    /// Expired timestamps are dropped before counting. An admitted request
    /// appends `now`; a refused one leaves the in-window history untouched.
    pub fn check_request_at(&self, client_id: T, now: u64) -> SlidingDecision {
        let quota = self.max_requests as usize;

        match self.client_windows.entry(client_id) {
            Entry::Occupied(mut entry) => {
                let window = entry.get_mut();
                window.retain(|&timestamp| self.in_window(timestamp, now));

                if window.len() < quota {
                    window.push_back(now);
                    return SlidingDecision::admitted((quota - window.len()) as u32);
                }

                let in_window = window.len();
                let earliest = window.iter().copied().min();
                let drained = window.is_empty();
                let retry_after_ms = self.retry_delay(in_window, earliest, now);
                debug!(
                    client = ?entry.key(),
                    in_window,
                    retry_after_ms,
                    "request refused"
                );
                if drained {
                    entry.remove();
                }
                SlidingDecision::refused(retry_after_ms)
            }
            Entry::Vacant(entry) => {
                if quota == 0 {
                    debug!(client = ?entry.key(), "request refused, quota is zero");
                    return SlidingDecision::refused(self.retry_delay(0, None, now));
                }
                trace!(client = ?entry.key(), "tracking new client window");
                entry.insert(VecDeque::from([now]));
                SlidingDecision::admitted((quota - 1) as u32)
            }
        }
    }

    /// Like [`check_request_at`](Self::check_request_at), reading the clock.
    pub fn check_request(&self, client_id: T) -> Result<SlidingDecision, SlidingLimiterError> {
        let now = self.clock.now()?;
        Ok(self.check_request_at(client_id, now))
    }

    /// Admit or refuse one request for `client_id` at `now`.
    pub fn try_request_at(&self, client_id: T, now: u64) -> bool {
        self.check_request_at(client_id, now).allowed
    }

    pub fn try_request(&self, client_id: T) -> Result<bool, SlidingLimiterError> {
        Ok(self.check_request(client_id)?.allowed)
    }

    /// Requests `client_id` may still make at `now` before being refused.
    pub fn remaining_requests_at<Q>(&self, client_id: &Q, now: u64) -> u32
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (in_window, _) = self.window_summary(client_id, now);
        (self.max_requests as usize).saturating_sub(in_window) as u32
    }

    pub fn remaining_requests<Q>(&self, client_id: &Q) -> Result<u32, SlidingLimiterError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now()?;
        Ok(self.remaining_requests_at(client_id, now))
    }

    /// Milliseconds until `client_id` would be admitted, zero if it would be now.
    ///
    /// Returns `u64::MAX` for a zero quota, which never admits anything.
    pub fn retry_after_at<Q>(&self, client_id: &Q, now: u64) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (in_window, earliest) = self.window_summary(client_id, now);
        self.retry_delay(in_window, earliest, now)
    }

    pub fn retry_after<Q>(&self, client_id: &Q) -> Result<u64, SlidingLimiterError>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let now = self.clock.now()?;
        Ok(self.retry_after_at(client_id, now))
    }

    /// Forget every recorded request for `client_id`.
    pub fn reset<Q>(&self, client_id: &Q)
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.client_windows.remove(client_id);
    }

    /// Forget every client.
    pub fn clear(&self) {
        self.client_windows.clear();
    }

    /// Whether `client_id` currently has a stored window, stale or not.
    pub fn is_tracked<Q>(&self, client_id: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.client_windows.contains_key(client_id)
    }

    /// Drop expired timestamps everywhere and remove clients left with none.
    ///
    /// Returns the number of clients removed. Never changes the outcome of a
    /// later decision or query.
    pub fn cleanup_at(&self, now: u64) -> usize {
        let mut removed = 0;
        self.client_windows.retain(|_, window| {
            window.retain(|&timestamp| self.in_window(timestamp, now));
            if window.is_empty() {
                removed += 1;
                false
            } else {
                true
            }
        });

        if removed > 0 {
            debug!(
                removed,
                tracked = self.client_windows.len(),
                "cleanup removed idle client windows"
            );
        }
        removed
    }

    pub fn cleanup(&self) -> Result<usize, SlidingLimiterError> {
        let now = self.clock.now()?;
        Ok(self.cleanup_at(now))
    }

    pub fn stats(&self) -> LimiterStats {
        LimiterStats {
            tracked_identifiers: self.client_windows.len(),
            max_requests: self.max_requests,
            window_ms: self.window_ms,
        }
    }
}

/// Result of an admission decision with metadata for HTTP responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlidingDecision {
    /// Whether the request should be allowed
    pub allowed: bool,
    /// Requests left in the current window after this decision
    pub remaining: u32,
    /// Milliseconds until the client can make another request (when denied)
    pub retry_after_ms: Option<u64>,
}

impl SlidingDecision {
    fn admitted(remaining: u32) -> Self {
        Self {
            allowed: true,
            remaining,
            retry_after_ms: None,
        }
    }

    fn refused(retry_after_ms: u64) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            retry_after_ms: Some(retry_after_ms),
        }
    }
}

/// Point-in-time view of a limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LimiterStats {
    /// Clients with a stored window, including ones not yet swept
    pub tracked_identifiers: usize,
    pub max_requests: u32,
    pub window_ms: u64,
}
