//! Fixed limits and upstream addresses.
//!
//! The TTL and the per-type cap are deliberately not runtime-configurable.

use std::time::Duration;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// How long a cached story list stays fresh.
pub const STORY_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

// ═══════════════════════════════════════════════════════════════════════════════
// FETCH LIMITS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum number of ids taken from an upstream listing.
/// The listing order is kept; anything past this index is dropped.
pub const MAX_STORIES: usize = 30;

/// Default number of item lookups in flight per fetch.
pub const DEFAULT_ITEM_CONCURRENCY: usize = 8;

/// Default per-request timeout toward the upstream API, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// URLS
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public Hacker News Firebase API.
pub const DEFAULT_HN_API_BASE_URL: &str = "https://hacker-news.firebaseio.com/v0";

/// Prefix of the discussion page for an item; the id is appended.
pub const COMMENTS_URL_PREFIX: &str = "https://news.ycombinator.com/item?id=";
