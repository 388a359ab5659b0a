//! Lock strategies guarding a cache's index and eviction ring.
//!
//! A [`SieveCache`](crate::SieveCache) owns its state inside a
//! `lock_api::Mutex` and picks the raw lock by type parameter:
//!
//! | Raw lock | Cache alias | Use |
//! |----------|-------------|-----|
//! | [`parking_lot::RawMutex`] | [`SyncSieveCache`](crate::SyncSieveCache) | shared between threads |
//! | [`NoopRawMutex`] | [`SingleThreadSieveCache`](crate::SingleThreadSieveCache) | owned by one thread |
//!
//! Even `get` mutates shared state (visited bit, access time, lazy removal),
//! so there is no reader/writer split: every operation takes the lock
//! exclusively.
//!
//! [`NoopRawMutex`] performs no atomic operations. It is `!Sync`, so a cache
//! built on it cannot be shared between threads at all; it can still be moved
//! to another thread that then owns it.

use core::cell::Cell;
use core::fmt;
use parking_lot::lock_api::{GuardNoSend, RawMutex};

/// Raw lock used by the thread-safe cache.
pub type DefaultRawMutex = parking_lot::RawMutex;

/// A raw lock that does not synchronize.
///
/// Acquisition only flips a non-atomic flag. Acquiring it while it is already
/// held on the same thread panics instead of handing out a second mutable
/// view of the cache.
pub struct NoopRawMutex {
    locked: Cell<bool>,
}

// SAFETY: `NoopRawMutex` is `!Sync`, so it is only ever reachable from the
// thread that owns it. The `locked` flag rejects re-entrant acquisition on
// that thread, which keeps the lock exclusive.
unsafe impl RawMutex for NoopRawMutex {
    #[allow(clippy::declare_interior_mutable_const)]
    const INIT: Self = NoopRawMutex {
        locked: Cell::new(false),
    };

    type GuardMarker = GuardNoSend;

    #[inline]
    fn lock(&self) {
        assert!(
            !self.locked.replace(true),
            "sieve: re-entrant access to a single-threaded cache"
        );
    }

    #[inline]
    fn try_lock(&self) -> bool {
        !self.locked.replace(true)
    }

    #[inline]
    unsafe fn unlock(&self) {
        self.locked.set(false);
    }

    #[inline]
    fn is_locked(&self) -> bool {
        self.locked.get()
    }
}

impl fmt::Debug for NoopRawMutex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoopRawMutex")
            .field("locked", &self.locked.get())
            .finish()
    }
}
