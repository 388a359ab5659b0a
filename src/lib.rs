#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Choosing a variant
//!
//! | Type | Lock | Share across threads |
//! |------|------|----------------------|
//! | [`SyncSieveCache`] (= [`SieveCache`]) | `parking_lot` mutex | yes, via `Arc` |
//! | [`SingleThreadSieveCache`] | [`NoopRawMutex`](lock::NoopRawMutex) | no (`!Sync`) |
//!
//! Both expose the same `&self` API: [`set`](SieveCache::set),
//! [`get`](SieveCache::get), [`len`](SieveCache::len) and
//! [`flush`](SieveCache::flush).
//!
//! ## Concurrent use
//!
//! ```
//! use sieve_rs::SieveCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(SieveCache::new(100));
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..50 {
//!                 cache.set(t * 1000 + i, i);
//!             }
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert!(cache.len() <= 100);
//! ```
//!
//! ## Deterministic TTL tests
//!
//! ```
//! use sieve_rs::clock::ManualClock;
//! use sieve_rs::config::SieveCacheConfig;
//! use sieve_rs::SingleThreadSieveCache;
//! use std::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let config = SieveCacheConfig {
//!     capacity: NonZeroUsize::new(4).unwrap(),
//!     ttl: Some(Duration::from_secs(1)),
//! };
//! let cache: SingleThreadSieveCache<u32, ()> =
//!     SingleThreadSieveCache::init_with_clock(config, clock.clone(), None);
//!
//! cache.set(7, ());
//! clock.advance(Duration::from_millis(500));
//! assert!(cache.get(&7).is_some()); // refreshes the access time
//! clock.advance(Duration::from_millis(900));
//! assert!(cache.get(&7).is_some());
//! clock.advance(Duration::from_secs(2));
//! assert!(cache.get(&7).is_none());
//! ```

/// Fixed-capacity doubly linked list over a slot arena.
///
/// Internal infrastructure backing the eviction ring.
pub(crate) mod list;

/// Per-slot cache entry: key, value, visited bit and access instant.
pub(crate) mod entry;

/// Time sources consulted for TTL expiration.
pub mod clock;

/// Cache configuration.
pub mod config;

/// Construction errors.
pub mod error;

/// Lock strategies for the thread-safe and single-threaded caches.
pub mod lock;

/// Cache metrics system.
///
/// Hit, miss, insertion, eviction and expiration counters reported through
/// the [`CacheMetrics`](metrics::CacheMetrics) trait.
pub mod metrics;

/// SIEVE cache implementation.
pub mod sieve;

pub use config::SieveCacheConfig;
pub use error::CacheError;
pub use sieve::{SieveCache, SingleThreadSieveCache, SyncSieveCache};
