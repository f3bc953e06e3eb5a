//! Common traits for hnews.
//!
//! The fetcher only talks to the upstream API through [`StorySource`], so tests
//! can swap in an in-memory source.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{RawItem, StoryType};

/// Interface to the upstream Hacker News API.
///
/// Implementations:
/// - `hnews_client::HnClient` (HTTP, production)
/// - in-memory stubs in tests
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Returns the ranked id listing for a story type, in upstream order.
    async fn story_ids(&self, story_type: StoryType) -> Result<Vec<u64>>;

    /// Returns the detail record for a single item.
    async fn item(&self, id: u64) -> Result<RawItem>;
}
