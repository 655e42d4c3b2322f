// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key/value cache with per-key expiry.
//!
//! [`CacheStore`] is the boundary the aggregator talks to. [`TtlCache`] is the
//! in-process implementation: an LRU bounded by entry count where each entry
//! carries its own `expires_at`. Expired entries are not evicted eagerly; a
//! read that finds one drops it and reports a miss.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lru::LruCache;

use crate::clock::Clock;

/// Errors from a cache backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("invalid TTL: {0:?}")]
    InvalidTtl(Duration),
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Value for `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
}

struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// In-process LRU cache with per-entry TTL.
pub struct TtlCache {
    entries: Mutex<LruCache<String, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    /// Create a cache holding at most `capacity` keys.
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            clock,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for TtlCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = self.clock.now();
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;

        if let Some(entry) = entries.get(key) {
            if now <= entry.expires_at {
                return Ok(Some(entry.value.clone()));
            }
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let ttl_delta = chrono::Duration::from_std(ttl).map_err(|_| CacheError::InvalidTtl(ttl))?;
        let expires_at = self
            .clock
            .now()
            .checked_add_signed(ttl_delta)
            .ok_or(CacheError::InvalidTtl(ttl))?;

        let mut entries = self
            .entries
            .lock()
            .map_err(|e| CacheError::Unavailable(e.to_string()))?;
        entries.put(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }
}
