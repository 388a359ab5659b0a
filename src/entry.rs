//! Cache entry stored in each ring slot.
//!
//! Besides the key and value an entry carries the SIEVE visited bit and, when
//! TTL is enabled, the instant it was last touched. The ring links live in the
//! list node that wraps the entry, not in the entry itself.

use core::fmt;
use core::time::Duration;
use std::time::Instant;

pub(crate) struct SieveEntry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    /// Set by any hit or overwrite; cleared when the hand passes over.
    pub(crate) visited: bool,
    /// `None` unless the owning cache has a TTL.
    pub(crate) last_access: Option<Instant>,
}

impl<K, V> SieveEntry<K, V> {
    /// Creates an unvisited entry. `now` is the insertion instant when TTL is enabled.
    pub(crate) fn new(key: K, value: V, now: Option<Instant>) -> Self {
        Self {
            key,
            value,
            visited: false,
            last_access: now,
        }
    }

    /// Marks the entry as used and refreshes its access instant.
    #[inline]
    pub(crate) fn touch(&mut self, now: Option<Instant>) {
        self.visited = true;
        if now.is_some() {
            self.last_access = now;
        }
    }

    /// Returns true if more than `ttl` has passed since the last access.
    ///
    /// An entry without an access instant never expires. A clock that reports
    /// an instant before the last access counts as no time passing.
    #[inline]
    pub(crate) fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        self.last_access
            .is_some_and(|at| now.saturating_duration_since(at) > ttl)
    }
}

impl<K, V> fmt::Debug for SieveEntry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveEntry")
            .field("visited", &self.visited)
            .field("last_access", &self.last_access)
            .finish()
    }
}
