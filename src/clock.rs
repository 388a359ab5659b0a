//! Time sources for TTL expiration.
//!
//! The cache never reads the system time directly. It asks the [`Clock`] it
//! was built with, and only when a TTL is configured. Production code uses
//! [`MonotonicClock`]; tests drive a [`ManualClock`] forward explicitly.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use std::time::Instant;

/// A source of the current instant.
///
/// Implementations are shared read-only between threads and must not require
/// synchronization from the caller.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// The real monotonic clock, backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Time is kept as an offset from an anchor instant captured at creation, so
/// the clock can be shared through an `Arc` and advanced from any thread.
///
/// # Examples
///
/// ```
/// use sieve_rs::clock::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(clock.now() - start, Duration::from_secs(2));
/// ```
pub struct ManualClock {
    anchor: Instant,
    offset_nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock frozen at the current instant.
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            offset_nanos: AtomicU64::new(0),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.offset_nanos
            .fetch_add(duration_to_nanos(by), Ordering::SeqCst);
    }

    /// Sets the clock to `elapsed` past its anchor.
    ///
    /// Moving backwards is allowed; the cache treats a clock that runs
    /// backwards as zero elapsed time.
    pub fn set(&self, elapsed: Duration) {
        self.offset_nanos
            .store(duration_to_nanos(elapsed), Ordering::SeqCst);
    }

    /// Returns how far the clock has moved past its anchor.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.anchor + self.elapsed()
    }
}

impl fmt::Debug for ManualClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualClock")
            .field("elapsed", &self.elapsed())
            .finish()
    }
}

fn duration_to_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}
