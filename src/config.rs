//! Cache Configuration
//!
//! Configuration is a plain value handed to the cache at construction. Every
//! field is public so a config can be written out as a struct literal; there
//! are no builder methods and nothing about it can change after the cache is
//! built.
//!
//! # Sizing
//!
//! `capacity` bounds the number of entries, never their size. A SIEVE cache
//! holds exactly `capacity` entries once warm, each costing one index slot
//! and one ring slot (two slot indices, a visited bit and an optional access
//! instant) beyond the key and value themselves.
//!
//! # TTL
//!
//! With `ttl: Some(d)` every entry records when it was last touched and a
//! `get` more than `d` after that touch misses and removes the entry. Expired
//! entries that are never looked up again stay resident until the eviction
//! hand reaches them. `None` and `Some(Duration::ZERO)` both disable TTL.
//!
//! # Examples
//!
//! ```
//! use sieve_rs::config::SieveCacheConfig;
//! use sieve_rs::SieveCache;
//! use core::num::NonZeroUsize;
//! use std::time::Duration;
//!
//! let config = SieveCacheConfig {
//!     capacity: NonZeroUsize::new(10_000).unwrap(),
//!     ttl: Some(Duration::from_secs(30)),
//! };
//! let cache: SieveCache<String, Vec<u8>> = SieveCache::init(config, None);
//! assert_eq!(cache.cap().get(), 10_000);
//! ```

use core::fmt;
use core::num::NonZeroUsize;
use core::time::Duration;

/// Configuration for a SIEVE cache.
///
/// # Fields
///
/// - `capacity`: Maximum number of entries the cache can hold.
/// - `ttl`: Optional time-to-live measured from an entry's last access.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SieveCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
    /// Time-to-live since last access. `None` disables expiration.
    pub ttl: Option<Duration>,
}

impl SieveCacheConfig {
    /// Creates a configuration with the given capacity and no TTL.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            ttl: None,
        }
    }

    /// Returns the TTL if one is in effect.
    ///
    /// A zero duration counts as disabled.
    #[inline]
    pub fn effective_ttl(&self) -> Option<Duration> {
        self.ttl.filter(|ttl| !ttl.is_zero())
    }
}

impl fmt::Debug for SieveCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveCacheConfig")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sieve_config_creation() {
        let config = SieveCacheConfig::new(NonZeroUsize::new(1000).unwrap());
        assert_eq!(config.capacity.get(), 1000);
        assert_eq!(config.ttl, None);
        assert_eq!(config.effective_ttl(), None);
    }

    #[test]
    fn test_sieve_config_with_ttl() {
        let config = SieveCacheConfig {
            capacity: NonZeroUsize::new(4).unwrap(),
            ttl: Some(Duration::from_secs(1)),
        };
        assert_eq!(config.effective_ttl(), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_sieve_config_zero_ttl_is_disabled() {
        let config = SieveCacheConfig {
            capacity: NonZeroUsize::new(4).unwrap(),
            ttl: Some(Duration::ZERO),
        };
        assert_eq!(config.effective_ttl(), None);
    }
}
