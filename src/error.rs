//! Error types for cache construction.
//!
//! Misses are not errors: `get` reports them as `None`. The only failure the
//! cache knows about is a configuration mistake caught at construction time.

use thiserror::Error;

/// Errors raised while building a cache.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The requested capacity was zero.
    #[error("sieve: capacity must be greater than zero (got {capacity})")]
    InvalidCapacity {
        /// The rejected capacity.
        capacity: usize,
    },
}

/// Result alias for fallible cache construction.
pub type Result<T> = core::result::Result<T, CacheError>;
