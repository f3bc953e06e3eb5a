//! In-memory TTL cache for story lists.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;
use tracing::trace;

use hnews_core::constants::STORY_CACHE_TTL;
use hnews_core::types::{Story, StoryType};

use crate::clock::{Clock, SystemClock};

/// Cached list plus the instant it was stored.
///
/// Kept together under one lock so readers never see a list paired with
/// another list's timestamp.
#[derive(Clone)]
struct CacheEntry {
    stories: Vec<Story>,
    updated_at: Instant,
}

/// Story list cache keyed by story type.
///
/// Thread-safe: reads share the lock, a write excludes every other operation.
/// An entry is fresh while its age is at most the TTL; nothing is swept in
/// the background.
pub struct StoryCache {
    entries: RwLock<HashMap<StoryType, CacheEntry>>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl StoryCache {
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(StoryType::ALL.len())),
            clock,
            ttl: STORY_CACHE_TTL,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.updated_at) <= self.ttl
    }

    /// Gets the cached list for a story type.
    ///
    /// Returns None if nothing was stored or the entry is older than the TTL.
    pub fn get(&self, story_type: StoryType) -> Option<Vec<Story>> {
        let now = self.clock.now();
        let entries = self.entries.read();
        let entry = entries.get(&story_type)?;

        if self.is_fresh(entry, now) {
            Some(entry.stories.clone())
        } else {
            trace!(%story_type, "cache entry stale");
            None
        }
    }

    /// Replaces the list for a story type and stamps it with the current time.
    pub fn set(&self, story_type: StoryType, stories: Vec<Story>) {
        let entry = CacheEntry {
            stories,
            updated_at: self.clock.now(),
        };
        self.entries.write().insert(story_type, entry);
    }

    /// Clears all cached entries.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Returns the number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let fresh = entries.values().filter(|e| self.is_fresh(e, now)).count();

        CacheStats {
            entries: entries.len(),
            fresh,
            stale: entries.len() - fresh,
        }
    }
}

impl Default for StoryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Stored entries, fresh or stale
    pub entries: usize,
    /// Entries within the TTL
    pub fresh: usize,
    /// Entries past the TTL
    pub stale: usize,
}
