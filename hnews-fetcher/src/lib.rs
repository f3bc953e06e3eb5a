//! Cache-backed story fetcher.
//!
//! Given a story type, returns the cached list if it is fresh. Otherwise it
//! pulls the upstream id listing, fans out item lookups, filters and
//! normalizes the items, and stores the result before returning it.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hnews_cache::StoryCache;
//! use hnews_client::HnClient;
//! use hnews_fetcher::StoryFetcher;
//!
//! let fetcher = StoryFetcher::new(HnClient::new()?, Arc::new(StoryCache::new()));
//! let stories = fetcher.fetch_stories("show").await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod fetcher;

pub use fetcher::StoryFetcher;
