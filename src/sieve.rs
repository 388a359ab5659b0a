//! SIEVE Cache Implementation
//!
//! This module provides a fixed-capacity cache evicting with the SIEVE
//! algorithm: one visited bit per entry and a single moving hand replace the
//! reordering that LRU performs on every hit.
//!
//! # Algorithm
//!
//! Entries sit in a ring ordered by insertion, newest at the head and oldest
//! at the tail. Nothing ever moves inside the ring; recency of *use* is kept
//! only in each entry's visited bit.
//!
//! - **Hit or overwrite**: set the visited bit. The entry keeps its position.
//! - **Insert while full**: starting at the hand, clear visited bits and step
//!   toward the head (wrapping from head to tail) until an unvisited entry is
//!   found. That entry is evicted and the hand stops at its predecessor.
//!
//! ```text
//!   head                                    tail
//!   [ e ] <-> [ d ] <-> [ c ] <-> [ b ] <-> [ a ]
//!                                   ^
//!                                  hand moves this way  <----
//! ```
//!
//! Every visited entry the hand passes is cleared, so a scan finishes within
//! one revolution even when every entry was visited.
//!
//! # TTL
//!
//! With a TTL configured each entry remembers when it was last touched. A
//! lookup that finds an entry older than the TTL removes it and reports a
//! miss. Expiration is lazy: nothing sweeps the ring in the background and the
//! eviction scan never consults the clock.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**:
//!   - Get: O(1)
//!   - Set: O(1) amortized (an eviction scan clears at most one bit per prior hit)
//!   - Len / Flush: O(1) / O(n)
//!
//! - **Space Complexity**:
//!   - O(capacity); ring slots are allocated from a fixed arena and reused
//!
//! # Thread Safety
//!
//! [`SyncSieveCache`] serialises every operation behind one
//! `parking_lot` mutex and can be shared through an `Arc`.
//! [`SingleThreadSieveCache`] skips synchronisation entirely and is `!Sync`,
//! so the compiler rejects sharing it between threads.

use crate::clock::{Clock, MonotonicClock};
use crate::config::SieveCacheConfig;
use crate::entry::SieveEntry;
use crate::error::{CacheError, Result};
use crate::list::List;
use crate::lock::{DefaultRawMutex, NoopRawMutex};
use crate::metrics::{CacheMetrics, SieveCacheMetrics};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use core::time::Duration;
use parking_lot::lock_api::{Mutex, RawMutex};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Internal SIEVE segment containing the actual cache algorithm.
///
/// The segment is not synchronised; [`SieveCache`] wraps it in a lock. The
/// index maps each key to the ring slot holding its entry, and the two are
/// always updated together: a key is in `map` exactly when its entry is in
/// `list`.
pub(crate) struct SieveSegment<K, V, S = DefaultHashBuilder> {
    config: SieveCacheConfig,
    /// `config.ttl` with a zero duration normalised to `None`.
    ttl: Option<Duration>,
    list: List<SieveEntry<K, V>>,
    map: HashMap<K, usize, S>,
    /// Next eviction candidate. `None` only while the ring is empty.
    hand: Option<usize>,
    clock: Arc<dyn Clock>,
    metrics: SieveCacheMetrics,
}

impl<K: Hash + Eq, V, S: BuildHasher> SieveSegment<K, V, S> {
    pub(crate) fn with_clock(
        config: SieveCacheConfig,
        clock: Arc<dyn Clock>,
        hash_builder: S,
    ) -> Self {
        SieveSegment {
            ttl: config.effective_ttl(),
            list: List::new(config.capacity),
            map: HashMap::with_capacity_and_hasher(config.capacity.get(), hash_builder),
            hand: None,
            clock,
            metrics: SieveCacheMetrics::new(),
            config,
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.list.cap()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub(crate) fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &SieveCacheMetrics {
        &self.metrics
    }

    /// Reads the clock, but only when TTL is enabled.
    #[inline]
    fn now(&self) -> Option<Instant> {
        self.ttl.map(|_| self.clock.now())
    }

    /// Finds the live entry for `key`, marking it visited.
    ///
    /// An expired entry is unlinked here and reported as a miss.
    fn lookup<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(&idx) = self.map.get(key) else {
            self.metrics.core.record_miss();
            return None;
        };

        let now = self.now();
        if let (Some(now), Some(ttl)) = (now, self.ttl) {
            let expired = self
                .list
                .get(idx)
                .is_some_and(|entry| entry.is_expired(now, ttl));
            if expired {
                self.unlink(idx);
                self.metrics.record_expiration();
                self.metrics.core.record_miss();
                tracing::trace!(slot = idx, len = self.list.len(), "expired entry removed");
                return None;
            }
        }

        let entry = self.list.get_mut(idx)?;
        entry.touch(now);
        self.metrics.core.record_hit();
        Some(idx)
    }

    pub(crate) fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let idx = self.lookup(key)?;
        self.list.get(idx).map(|entry| &entry.value)
    }

    /// Reports whether `key` has a live entry without touching it.
    pub(crate) fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let Some(entry) = self.map.get(key).and_then(|&idx| self.list.get(idx)) else {
            return false;
        };
        match self.ttl {
            Some(ttl) => !entry.is_expired(self.clock.now(), ttl),
            None => true,
        }
    }

    /// Inserts or overwrites `key`, returning the entry evicted to make room.
    pub(crate) fn put(&mut self, key: K, value: V) -> Option<(K, V)>
    where
        K: Clone,
    {
        let now = self.now();

        // Overwrites stay where they are in the ring.
        if let Some(entry) = self
            .map
            .get(&key)
            .copied()
            .and_then(|idx| self.list.get_mut(idx))
        {
            entry.value = value;
            entry.touch(now);
            self.metrics.core.record_update();
            return None;
        }

        let evicted = if self.list.is_full() {
            self.evict()
        } else {
            None
        };

        let was_empty = self.list.is_empty();
        if let Some(idx) = self.list.add(SieveEntry::new(key.clone(), value, now)) {
            if was_empty {
                self.hand = Some(idx);
            }
            self.map.insert(key, idx);
            self.metrics.core.record_insertion();
        }

        evicted
    }

    /// Runs the hand until it finds an unvisited entry and evicts it.
    fn evict(&mut self) -> Option<(K, V)> {
        let mut idx = self.hand.or_else(|| self.list.tail())?;
        let mut spared = 0u64;

        loop {
            let entry = self.list.get_mut(idx)?;
            if !entry.visited {
                break;
            }
            entry.visited = false;
            spared += 1;
            idx = self.list.prev(idx).or_else(|| self.list.tail())?;
        }

        self.metrics.record_second_chances(spared);
        self.hand = Some(idx);
        let entry = self.unlink(idx)?;
        self.metrics.core.record_eviction();
        tracing::trace!(slot = idx, scanned = spared + 1, "evicted entry");

        Some((entry.key, entry.value))
    }

    /// Removes the entry in `idx` from both the ring and the index.
    ///
    /// If the hand rests on the removed slot it steps to the slot's
    /// predecessor, wrapping to the tail, and is cleared once the ring is
    /// empty.
    fn unlink(&mut self, idx: usize) -> Option<SieveEntry<K, V>> {
        if self.hand == Some(idx) {
            self.hand = self
                .list
                .prev(idx)
                .or_else(|| self.list.tail())
                .filter(|&next| next != idx);
        }

        let entry = self.list.remove(idx)?;
        self.map.remove(&entry.key);
        Some(entry)
    }

    pub(crate) fn clear(&mut self) {
        let flushed = self.list.len();
        self.map.clear();
        self.list.clear();
        self.hand = None;
        tracing::debug!(flushed, "flushed cache");
    }
}

impl<K, V, S> fmt::Debug for SieveSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveSegment")
            .field("capacity", &self.config.capacity)
            .field("ttl", &self.ttl)
            .field("len", &self.list.len())
            .field("hand", &self.hand)
            .finish()
    }
}

/// A fixed-capacity cache using the SIEVE eviction algorithm.
///
/// Every operation takes `&self` and runs to completion under the cache's
/// lock, chosen by the `L` type parameter:
///
/// - [`SyncSieveCache`] (the default, built with [`SieveCache::new`]) uses a
///   `parking_lot` mutex and may be shared between threads.
/// - [`SingleThreadSieveCache`] (built with [`SieveCache::new_single_thread`])
///   uses [`NoopRawMutex`] for callers that keep the cache on one thread.
///
/// # Examples
///
/// ```
/// use sieve_rs::SieveCache;
///
/// let cache = SieveCache::new(2);
///
/// cache.set(1, "one");
/// cache.set(2, "two");
///
/// // A hit marks the entry as visited.
/// assert_eq!(cache.get(&1), Some("one"));
///
/// // Inserting past capacity spares visited entries and evicts the first
/// // unvisited one the hand reaches.
/// cache.set(3, "three");
/// assert_eq!(cache.get(&2), None);
/// assert_eq!(cache.get(&1), Some("one"));
/// assert_eq!(cache.get(&3), Some("three"));
/// ```
pub struct SieveCache<K, V, L = DefaultRawMutex, S = DefaultHashBuilder> {
    segment: Mutex<L, SieveSegment<K, V, S>>,
}

/// A SIEVE cache that can be shared between threads.
pub type SyncSieveCache<K, V, S = DefaultHashBuilder> = SieveCache<K, V, DefaultRawMutex, S>;

/// A SIEVE cache without synchronisation, for use from a single thread.
pub type SingleThreadSieveCache<K, V, S = DefaultHashBuilder> = SieveCache<K, V, NoopRawMutex, S>;

fn checked_capacity(capacity: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(capacity).ok_or(CacheError::InvalidCapacity { capacity })
}

impl<K: Hash + Eq, V> SieveCache<K, V> {
    /// Creates a thread-safe cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`SieveCache::try_new`] to get an
    /// error instead.
    pub fn new(capacity: usize) -> Self {
        Self::try_new(capacity).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates a thread-safe cache, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self> {
        let capacity = checked_capacity(capacity)?;
        Ok(Self::init(SieveCacheConfig::new(capacity), None))
    }
}

impl<K: Hash + Eq, V> SieveCache<K, V, NoopRawMutex> {
    /// Creates an unsynchronised cache holding at most `capacity` entries.
    ///
    /// The returned cache is `!Sync`; it may be moved to another thread but
    /// never shared.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new_single_thread(capacity: usize) -> Self {
        Self::try_new_single_thread(capacity).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Creates an unsynchronised cache, rejecting a zero capacity.
    pub fn try_new_single_thread(capacity: usize) -> Result<Self> {
        let capacity = checked_capacity(capacity)?;
        Ok(Self::init(SieveCacheConfig::new(capacity), None))
    }
}

impl<K, V, L, S> SieveCache<K, V, L, S>
where
    K: Hash + Eq,
    L: RawMutex,
    S: BuildHasher + Default,
{
    /// Creates a cache from a configuration, reading time from the system's
    /// monotonic clock.
    ///
    /// # Arguments
    ///
    /// * `config` - Capacity and optional TTL
    /// * `hasher` - Optional hash builder; `None` uses `S::default()`
    ///
    /// # Example
    ///
    /// ```
    /// use sieve_rs::config::SieveCacheConfig;
    /// use sieve_rs::SingleThreadSieveCache;
    /// use core::num::NonZeroUsize;
    /// use std::time::Duration;
    ///
    /// let config = SieveCacheConfig {
    ///     capacity: NonZeroUsize::new(100).unwrap(),
    ///     ttl: Some(Duration::from_secs(60)),
    /// };
    /// let cache: SingleThreadSieveCache<&str, u32> = SingleThreadSieveCache::init(config, None);
    /// cache.set("answer", 42);
    /// assert_eq!(cache.get("answer"), Some(42));
    /// ```
    pub fn init(config: SieveCacheConfig, hasher: Option<S>) -> Self {
        Self::init_with_clock(config, Arc::new(MonotonicClock), hasher)
    }

    /// Creates a cache from a configuration and an explicit time source.
    ///
    /// The clock is only consulted when `config.ttl` is set.
    ///
    /// # Example
    ///
    /// ```
    /// use sieve_rs::clock::ManualClock;
    /// use sieve_rs::config::SieveCacheConfig;
    /// use sieve_rs::SieveCache;
    /// use core::num::NonZeroUsize;
    /// use std::sync::Arc;
    /// use std::time::Duration;
    ///
    /// let clock = Arc::new(ManualClock::new());
    /// let config = SieveCacheConfig {
    ///     capacity: NonZeroUsize::new(4).unwrap(),
    ///     ttl: Some(Duration::from_secs(1)),
    /// };
    /// let cache: SieveCache<u32, &str> = SieveCache::init_with_clock(config, clock.clone(), None);
    ///
    /// cache.set(7, "seven");
    /// clock.advance(Duration::from_secs(2));
    /// assert_eq!(cache.get(&7), None);
    /// ```
    pub fn init_with_clock(
        config: SieveCacheConfig,
        clock: Arc<dyn Clock>,
        hasher: Option<S>,
    ) -> Self {
        tracing::debug!(
            capacity = config.capacity.get(),
            ttl = ?config.effective_ttl(),
            "created sieve cache"
        );
        Self {
            segment: Mutex::new(SieveSegment::with_clock(
                config,
                clock,
                hasher.unwrap_or_default(),
            )),
        }
    }
}

impl<K, V, L, S> SieveCache<K, V, L, S>
where
    K: Hash + Eq,
    L: RawMutex,
    S: BuildHasher,
{
    /// Returns the maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the TTL in effect, if any.
    #[inline]
    pub fn ttl(&self) -> Option<Duration> {
        self.segment.lock().ttl()
    }

    /// Returns the number of resident entries.
    ///
    /// Entries whose TTL has elapsed but that have not been looked up since
    /// are still counted.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Inserts `value` under `key`, or overwrites the existing value.
    ///
    /// An overwrite marks the entry visited and refreshes its TTL but does
    /// not move it in the eviction order. Inserting a new key into a full
    /// cache evicts exactly one other entry.
    pub fn set(&self, key: K, value: V)
    where
        K: Clone,
    {
        self.segment.lock().put(key, value);
    }

    /// Returns a clone of the value for `key`, marking the entry visited.
    ///
    /// Returns `None` when the key is absent or its TTL has elapsed; an
    /// expired entry is removed as part of the miss.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.segment.lock().get(key).cloned()
    }

    /// Looks `key` up like [`get`](Self::get) and applies `f` to the value
    /// while the lock is held, avoiding a clone.
    ///
    /// `f` must not call back into this cache: the thread-safe variant would
    /// deadlock and the single-threaded variant panics.
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.segment.lock().get(key).map(f)
    }

    /// Returns true if `key` has a live entry.
    ///
    /// Unlike [`get`](Self::get) this does not mark the entry visited,
    /// refresh its TTL, or remove it when expired.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains_key(key)
    }

    /// Removes every entry. Capacity, TTL and metrics are kept.
    pub fn flush(&self) {
        self.segment.lock().clear();
    }
}

impl<K, V, L, S> CacheMetrics for SieveCache<K, V, L, S>
where
    K: Hash + Eq,
    L: RawMutex,
    S: BuildHasher,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "SIEVE"
    }
}

impl<K, V, L: RawMutex, S> fmt::Debug for SieveCache<K, V, L, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SieveCache")
            .field("segment", &self.segment)
            .finish()
    }
}
