// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session store: maps image handles to decoded originals with an expiry
// instant. Originals are shared as `Arc<PixelBuffer>` and never written back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use retouch_core::types::ImageHandle;
use retouch_engine::PixelBuffer;
use tracing::{debug, instrument};

use crate::clock::{Clock, SystemClock};

/// Key/value store for uploaded originals.
///
/// Implementations must treat an entry whose time-to-live has passed exactly
/// like one that was never stored.
pub trait SessionStore: Send + Sync {
    /// Store `buffer` under `handle` for `ttl`. Replaces any existing entry.
    fn put(&self, handle: ImageHandle, buffer: PixelBuffer, ttl: Duration);

    /// Fetch the original for `handle`, or `None` if unknown or expired.
    fn get(&self, handle: &ImageHandle) -> Option<Arc<PixelBuffer>>;

    /// Drop the entry for `handle`. Returns whether one was live.
    fn remove(&self, handle: &ImageHandle) -> bool;
}

struct Entry {
    buffer: Arc<PixelBuffer>,
    expires_at: DateTime<Utc>,
}

/// In-process session store guarded by a single mutex.
///
/// Lock hold times are a hash lookup plus an `Arc` clone; pixel work happens
/// outside the lock.
pub struct MemorySessionStore {
    entries: Mutex<HashMap<ImageHandle, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Evict every expired entry. Returns how many were removed.
    #[instrument(skip(self))]
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        let purged = before - entries.len();
        debug!(purged, remaining = entries.len(), "purged expired sessions");
        purged
    }

    /// Number of stored entries, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<ImageHandle, Entry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, handle: ImageHandle, buffer: PixelBuffer, ttl: Duration) {
        let now = self.clock.now();
        let ttl = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX);
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        debug!(%handle, %expires_at, "storing original");
        self.lock().insert(
            handle,
            Entry {
                buffer: Arc::new(buffer),
                expires_at,
            },
        );
    }

    fn get(&self, handle: &ImageHandle) -> Option<Arc<PixelBuffer>> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let lookup = entries
            .get(handle)
            .map(|entry| (entry.expires_at > now, Arc::clone(&entry.buffer)));
        match lookup {
            Some((true, buffer)) => Some(buffer),
            Some((false, _)) => {
                debug!(%handle, "session expired");
                entries.remove(handle);
                None
            }
            None => None,
        }
    }

    fn remove(&self, handle: &ImageHandle) -> bool {
        let now = self.clock.now();
        self.lock()
            .remove(handle)
            .is_some_and(|entry| entry.expires_at > now)
    }
}
