//! TTL cache for hnews story lists.
//!
//! One entry per story type, replaced wholesale on refresh, with freshness
//! evaluated lazily against an injectable clock.

mod cache;
mod clock;

pub use cache::{CacheStats, StoryCache};
pub use clock::{Clock, ManualClock, SystemClock};
