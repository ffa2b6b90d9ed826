// src/sweeper.rs

//! Background cleanup ticker, decoupled from the admission path.

// dependencies
use crate::clock::Clock;
use crate::errors::SlidingLimiterError;
use crate::limiter_set::LimiterSet;
use crate::sliding_limiter::SlidingLimiter;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Something that can drop idle client state against its own clock.
pub trait Sweep: Send + Sync {
    /// Returns the number of clients removed.
    fn sweep(&self) -> Result<usize, SlidingLimiterError>;
}

impl<T, C> Sweep for SlidingLimiter<T, C>
where
    T: Hash + Eq + Clone + Debug + Send + Sync,
    C: Clock,
{
    fn sweep(&self) -> Result<usize, SlidingLimiterError> {
        self.cleanup()
    }
}

impl<C> Sweep for LimiterSet<C>
where
    C: Clock,
{
    fn sweep(&self) -> Result<usize, SlidingLimiterError> {
        self.cleanup()
    }
}

/// Handle to a running cleanup thread. Dropping it stops the thread.
#[derive(Debug)]
pub struct CleanupHandle {
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
    sweeps: Arc<AtomicU64>,
}

impl CleanupHandle {
    /// Number of sweeps that have completed successfully so far.
    pub fn completed_sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Acquire)
    }

    /// Signal the thread to stop and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // a closed channel also stops the loop, so a failed send is fine
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("cleanup thread panicked");
            }
        }
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a named thread that sweeps `target` every `interval`.
///
/// ```rust
/// use std::sync::Arc;
/// use std::time::Duration;
/// use slide_limiter::{spawn_cleanup_thread, SlidingLimiter};
///
/// let limiter = Arc::new(SlidingLimiter::<String>::new(100, 60_000));
/// let cleanup = spawn_cleanup_thread(limiter.clone(), Duration::from_secs(30)).unwrap();
///
/// // later, on shutdown:
/// cleanup.stop();
/// ```
pub fn spawn_cleanup_thread<S>(
    target: Arc<S>,
    interval: Duration,
) -> Result<CleanupHandle, SlidingLimiterError>
where
    S: Sweep + ?Sized + 'static,
{
    let (stop_tx, stop_rx) = mpsc::channel();
    let sweeps = Arc::new(AtomicU64::new(0));
    let completed = Arc::clone(&sweeps);

    let handle = thread::Builder::new()
        .name("slide-limiter-cleanup".to_string())
        .spawn(move || {
            info!(interval_ms = interval.as_millis() as u64, "started cleanup thread");

            loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                        info!("cleanup thread stopping");
                        break;
                    }
                    Err(mpsc::RecvTimeoutError::Timeout) => match target.sweep() {
                        Ok(removed) => {
                            completed.fetch_add(1, Ordering::AcqRel);
                            if removed > 0 {
                                debug!(removed, "scheduled cleanup finished");
                            }
                        }
                        Err(e) => warn!(error = %e, "scheduled cleanup failed"),
                    },
                }
            }
        })?;

    Ok(CleanupHandle {
        stop_tx: Some(stop_tx),
        handle: Some(handle),
        sweeps,
    })
}
