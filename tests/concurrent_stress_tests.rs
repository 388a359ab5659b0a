//! Stress Tests for the Thread-Safe SIEVE Cache
//!
//! These tests verify thread safety and correctness under high contention.

use scoped_threadpool::Pool;
use sieve_rs::clock::ManualClock;
use sieve_rs::config::SieveCacheConfig;
use sieve_rs::{SieveCache, SyncSieveCache};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn ttl_config(capacity: usize, ttl: Duration) -> SieveCacheConfig {
    SieveCacheConfig {
        capacity: NonZeroUsize::new(capacity).unwrap(),
        ttl: Some(ttl),
    }
}

#[test]
fn stress_high_contention() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(100));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = i % 10; // Only 10 keys for high contention
                if t % 2 == 0 {
                    cache.set(key, t * OPS_PER_THREAD + i);
                } else {
                    let _ = cache.get(&key);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 10);
}

/// Borrowing the cache from a scoped pool needs no `Arc`.
#[test]
fn stress_scoped_pool() {
    let cache: SyncSieveCache<usize, usize> = SieveCache::new(500);
    let mut pool = Pool::new(8);

    pool.scoped(|scope| {
        for t in 0..8 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..OPS_PER_THREAD {
                    let key = (t * 131 + i) % 2_000;
                    cache.set(key, key);
                    if let Some(value) = cache.get(&key) {
                        assert_eq!(value, key);
                    }
                }
            });
        }
    });

    assert_eq!(cache.len(), 500);
}

/// Test edge case: empty cache operations
#[test]
fn stress_empty_cache() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(100));

    let mut handles = Vec::new();
    for _ in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                assert!(cache.get(&i).is_none());
                assert!(!cache.contains_key(&i));
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.is_empty());
}

/// Test edge case: single item cache
#[test]
fn stress_single_item_cache() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(1));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                cache.set(t, i);
                let _ = cache.get(&t);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 1);
}

#[test]
fn stress_capacity_limits() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(100));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                cache.set(t * 10_000 + i, i);
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(cache.len(), 100);
}

#[test]
fn stress_concurrent_flush() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(1000));
    let flushes = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        let flushes = Arc::clone(&flushes);
        handles.push(thread::spawn(move || {
            for i in 0..1000 {
                if i % 100 == 0 && t == 0 {
                    cache.flush();
                    flushes.fetch_add(1, Ordering::Relaxed);
                } else {
                    cache.set(t * 1000 + i, i);
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(flushes.load(Ordering::Relaxed), 10);
    assert!(cache.len() <= 1000);
}

/// Expiring lookups race with inserts while the clock keeps moving.
#[test]
fn stress_ttl_with_moving_clock() {
    let clock = Arc::new(ManualClock::new());
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::init_with_clock(
        ttl_config(256, Duration::from_millis(5)),
        clock.clone(),
        None,
    ));

    let mut handles = Vec::new();
    for t in 0..8 {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            for i in 0..OPS_PER_THREAD {
                let key = (t * 37 + i) % 1_024;
                if i % 2 == 0 {
                    cache.set(key, key);
                } else if let Some(value) = cache.get(&key) {
                    assert_eq!(value, key);
                }
            }
        }));
    }
    let ticker = {
        let clock = Arc::clone(&clock);
        thread::spawn(move || {
            for _ in 0..1_000 {
                clock.advance(Duration::from_millis(1));
                thread::yield_now();
            }
        })
    };

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    ticker.join().expect("Thread panicked");

    assert!(cache.len() <= 256);

    // Everything left behind is stale once the clock jumps past the TTL.
    clock.advance(Duration::from_secs(1));
    for key in 0..1_024 {
        assert!(cache.get(&key).is_none());
    }
    assert!(cache.is_empty());
}

#[test]
fn stress_mixed_operations() {
    let cache: Arc<SyncSieveCache<usize, usize>> = Arc::new(SieveCache::new(64));

    let mut handles = Vec::new();
    for t in 0..NUM_THREADS {
        let cache = Arc::clone(&cache);
        handles.push(thread::spawn(move || {
            let mut state = (t as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
            for _ in 0..OPS_PER_THREAD {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let key = (state % 512) as usize;
                match state % 10 {
                    0..=5 => {
                        let _ = cache.get(&key);
                    }
                    6..=8 => cache.set(key, key),
                    _ => {
                        let _ = cache.contains_key(&key);
                        let _ = cache.len();
                    }
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert!(cache.len() <= 64);
}
