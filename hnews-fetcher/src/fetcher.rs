//! Story fetch path: cache check, listing, item fan-out, filter, store.

use std::sync::Arc;

use futures::{future, stream, StreamExt};
use tracing::{debug, info, instrument, warn};

use hnews_cache::StoryCache;
use hnews_core::constants::{DEFAULT_ITEM_CONCURRENCY, MAX_STORIES};
use hnews_core::error::Result;
use hnews_core::traits::StorySource;
use hnews_core::types::{Story, StoryType};

/// Produces normalized story lists, going upstream only on a cache miss.
///
/// The cache is injected so the HTTP layer and tests can share or isolate it.
/// Concurrent misses for the same type each go upstream; the last writer wins.
pub struct StoryFetcher<S> {
    source: S,
    cache: Arc<StoryCache>,
    item_concurrency: usize,
}

impl<S: StorySource> StoryFetcher<S> {
    /// Creates a fetcher over `source`, storing results in `cache`.
    pub fn new(source: S, cache: Arc<StoryCache>) -> Self {
        Self {
            source,
            cache,
            item_concurrency: DEFAULT_ITEM_CONCURRENCY,
        }
    }

    /// Sets how many item lookups may be in flight at once (minimum 1).
    pub fn with_item_concurrency(mut self, limit: usize) -> Self {
        self.item_concurrency = limit.max(1);
        self
    }

    /// The cache this fetcher reads and refreshes.
    pub fn cache(&self) -> &Arc<StoryCache> {
        &self.cache
    }

    /// The upstream source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches stories for a story type given by name.
    ///
    /// Fails with `InvalidStoryType` for anything but top/show/ask, before
    /// any upstream call and without touching the cache.
    pub async fn fetch_stories(&self, story_type: &str) -> Result<Vec<Story>> {
        let story_type: StoryType = story_type.parse().map_err(|e| {
            debug!(error = %e, "rejected story type");
            e
        })?;
        self.fetch(story_type).await
    }

    /// Fetches stories for a story type.
    ///
    /// Only a failed listing call is fatal; items that fail to load are
    /// skipped. Output order follows the upstream listing.
    #[instrument(skip(self))]
    pub async fn fetch(&self, story_type: StoryType) -> Result<Vec<Story>> {
        if let Some(stories) = self.cache.get(story_type) {
            debug!(count = stories.len(), "cache hit");
            return Ok(stories);
        }
        debug!("cache miss");

        let mut ids = self.source.story_ids(story_type).await.map_err(|e| {
            warn!(error = %e, "story listing failed");
            e
        })?;
        ids.truncate(MAX_STORIES);
        let requested = ids.len();

        // `buffered` yields in input order regardless of completion order
        let source = &self.source;
        let stories: Vec<Story> = stream::iter(ids)
            .map(move |id| async move { (id, source.item(id).await) })
            .buffered(self.item_concurrency)
            .filter_map(|(id, result)| {
                future::ready(match result {
                    Ok(item) => Some(item),
                    Err(e) => {
                        debug!(id, error = %e, "skipping item");
                        None
                    }
                })
            })
            .filter(|item| future::ready(story_type.accepts(item)))
            .map(|item| Story::from_raw(item, story_type))
            .collect()
            .await;

        info!(requested, kept = stories.len(), "refreshed stories");
        self.cache.set(story_type, stories.clone());
        Ok(stories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use hnews_cache::ManualClock;
    use hnews_core::constants::STORY_CACHE_TTL;
    use hnews_core::error::HnError;
    use hnews_core::types::RawItem;
    use parking_lot::Mutex;
    use test_case::test_case;

    /// In-memory upstream with call counters.
    #[derive(Default)]
    struct StubSource {
        listings: Mutex<HashMap<StoryType, Vec<u64>>>,
        items: HashMap<u64, RawItem>,
        failing_items: HashSet<u64>,
        listing_fails: bool,
        /// Per-item latency; lets later ids finish first.
        delays: HashMap<u64, Duration>,
        listing_calls: AtomicUsize,
        item_calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl StubSource {
        fn listing(self, story_type: StoryType, ids: &[u64]) -> Self {
            self.listings.lock().insert(story_type, ids.to_vec());
            self
        }

        fn with_item(mut self, id: u64, title: &str) -> Self {
            self.items.insert(
                id,
                RawItem {
                    id,
                    kind: "story".into(),
                    by: format!("user{}", id),
                    time: 1_700_000_000 + id as i64,
                    title: title.into(),
                    url: format!("https://example.com/{}", id),
                    score: id as i64 * 10,
                    descendants: 0,
                },
            );
            self
        }

        fn failing(mut self, id: u64) -> Self {
            self.failing_items.insert(id);
            self
        }

        fn listing_calls(&self) -> usize {
            self.listing_calls.load(Ordering::SeqCst)
        }

        fn item_calls(&self) -> usize {
            self.item_calls.load(Ordering::SeqCst)
        }

        fn upstream_calls(&self) -> usize {
            self.listing_calls() + self.item_calls()
        }

        /// Highest number of item lookups seen running at once.
        fn max_in_flight(&self) -> usize {
            self.max_in_flight.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StorySource for StubSource {
        async fn story_ids(&self, story_type: StoryType) -> Result<Vec<u64>> {
            self.listing_calls.fetch_add(1, Ordering::SeqCst);
            if self.listing_fails {
                return Err(HnError::Http("connection reset by peer".into()));
            }
            Ok(self.listings.lock().get(&story_type).cloned().unwrap_or_default())
        }

        async fn item(&self, id: u64) -> Result<RawItem> {
            self.item_calls.fetch_add(1, Ordering::SeqCst);
            let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(running, Ordering::SeqCst);
            if let Some(delay) = self.delays.get(&id) {
                tokio::time::sleep(*delay).await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            if self.failing_items.contains(&id) {
                return Err(HnError::Http(format!("item {} unavailable", id)));
            }
            self.items
                .get(&id)
                .cloned()
                .ok_or_else(|| HnError::Http(format!("item {} not found", id)))
        }
    }

    fn fetcher(source: StubSource) -> StoryFetcher<StubSource> {
        StoryFetcher::new(source, Arc::new(StoryCache::new()))
    }

    fn ids(stories: &[Story]) -> Vec<u64> {
        stories.iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_top_returns_all_in_listing_order() {
        let source = StubSource::default()
            .listing(StoryType::Top, &[1, 2, 3])
            .with_item(1, "First")
            .with_item(2, "Second")
            .with_item(3, "Third");
        let fetcher = fetcher(source);

        let stories = fetcher.fetch_stories("top").await.unwrap();

        assert_eq!(ids(&stories), vec![1, 2, 3]);
        assert!(stories.iter().all(|s| s.story_type == StoryType::Top));
        assert_eq!(stories[1].submitted_by, "user2");
        assert_eq!(stories[1].points, 20);
        assert_eq!(stories[1].comments_url, "https://news.ycombinator.com/item?id=2");
    }

    #[tokio::test]
    async fn test_show_keeps_only_prefixed_titles() {
        let source = StubSource::default()
            .listing(StoryType::Show, &[10, 11])
            .with_item(10, "Show HN: Thing")
            .with_item(11, "Other");
        let fetcher = fetcher(source);

        let stories = fetcher.fetch_stories("show").await.unwrap();

        assert_eq!(ids(&stories), vec![10]);
        assert_eq!(stories[0].story_type, StoryType::Show);
    }

    #[tokio::test]
    async fn test_ask_keeps_only_prefixed_titles() {
        let source = StubSource::default()
            .listing(StoryType::Ask, &[20, 21, 22])
            .with_item(20, "Ask HN: How do you test?")
            .with_item(21, "Show HN: Not a question")
            .with_item(22, "Ask HN: Another");
        let fetcher = fetcher(source);

        let stories = fetcher.fetch(StoryType::Ask).await.unwrap();

        assert_eq!(ids(&stories), vec![20, 22]);
        assert!(stories
            .iter()
            .all(|s| s.title.starts_with("Ask HN:") && s.story_type == StoryType::Ask));
    }

    #[tokio::test]
    async fn test_invalid_type_makes_no_calls() {
        let fetcher = fetcher(StubSource::default());

        let err = fetcher.fetch_stories("invalid").await.unwrap_err();

        assert!(err.to_string().contains("invalid story type: invalid"));
        assert_eq!(fetcher.source().upstream_calls(), 0);
        assert!(fetcher.cache().is_empty());
    }

    #[test_case(StoryType::Top, "Plain title" ; "top")]
    #[test_case(StoryType::Show, "Show HN: A" ; "show")]
    #[test_case(StoryType::Ask, "Ask HN: B" ; "ask")]
    #[tokio::test]
    async fn test_second_call_served_from_cache(story_type: StoryType, title: &str) {
        let source = StubSource::default()
            .listing(story_type, &[1, 2])
            .with_item(1, title)
            .with_item(2, title);
        let fetcher = fetcher(source);

        let first = fetcher.fetch(story_type).await.unwrap();
        let calls = fetcher.source().upstream_calls();
        let second = fetcher.fetch(story_type).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls, 3);
        assert_eq!(fetcher.source().upstream_calls(), calls);
    }

    #[tokio::test]
    async fn test_listing_truncated_to_max() {
        let listing: Vec<u64> = (1..=45).collect();
        let mut source = StubSource::default().listing(StoryType::Top, &listing);
        for id in &listing {
            source = source.with_item(*id, "Story");
        }
        let fetcher = fetcher(source);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(stories.len(), MAX_STORIES);
        assert_eq!(ids(&stories), (1..=30).collect::<Vec<u64>>());
        assert_eq!(fetcher.source().item_calls(), MAX_STORIES);
    }

    #[tokio::test]
    async fn test_failed_items_are_skipped() {
        let source = StubSource::default()
            .listing(StoryType::Top, &[1, 2, 3, 4])
            .with_item(1, "One")
            .with_item(2, "Two")
            .with_item(3, "Three")
            .failing(2);
        // id 4 has no record at all
        let fetcher = fetcher(source);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(ids(&stories), vec![1, 3]);
        assert_eq!(fetcher.source().item_calls(), 4);
    }

    #[tokio::test]
    async fn test_listing_failure_leaves_cache_untouched() {
        let source = StubSource {
            listing_fails: true,
            ..Default::default()
        };
        let fetcher = fetcher(source);

        let err = fetcher.fetch(StoryType::Top).await.unwrap_err();

        assert_eq!(err.to_string(), "connection reset by peer");
        assert!(fetcher.cache().get(StoryType::Top).is_none());
        assert_eq!(fetcher.source().item_calls(), 0);

        // No negative caching: the next call goes upstream again
        let _ = fetcher.fetch(StoryType::Top).await;
        assert_eq!(fetcher.source().listing_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_result_is_cached() {
        let source = StubSource::default()
            .listing(StoryType::Show, &[1, 2])
            .with_item(1, "Nothing to show")
            .with_item(2, "Still nothing");
        let fetcher = fetcher(source);

        assert!(fetcher.fetch(StoryType::Show).await.unwrap().is_empty());
        assert!(fetcher.fetch(StoryType::Show).await.unwrap().is_empty());

        assert_eq!(fetcher.source().listing_calls(), 1);
        assert_eq!(fetcher.cache().get(StoryType::Show), Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_expired_entry_refetched() {
        let clock = Arc::new(ManualClock::new());
        let cache = Arc::new(StoryCache::with_clock(clock.clone()));
        let source = StubSource::default()
            .listing(StoryType::Top, &[1])
            .with_item(1, "Old")
            .with_item(2, "New");
        let fetcher = StoryFetcher::new(source, cache);

        assert_eq!(ids(&fetcher.fetch(StoryType::Top).await.unwrap()), vec![1]);

        fetcher.source().listings.lock().insert(StoryType::Top, vec![2]);
        clock.advance(STORY_CACHE_TTL);
        assert_eq!(ids(&fetcher.fetch(StoryType::Top).await.unwrap()), vec![1]);

        clock.advance(Duration::from_secs(1));
        assert_eq!(ids(&fetcher.fetch(StoryType::Top).await.unwrap()), vec![2]);
        assert_eq!(fetcher.source().listing_calls(), 2);
    }

    #[tokio::test]
    async fn test_fan_out_preserves_listing_order() {
        let mut source = StubSource::default().listing(StoryType::Top, &[1, 2, 3, 4]);
        for id in 1..=4u64 {
            source = source.with_item(id, "Story");
            // Earlier ids are slower, so completion order is reversed
            source.delays.insert(id, Duration::from_millis(50 - id * 10));
        }
        let fetcher = fetcher(source).with_item_concurrency(4);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(ids(&stories), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_sequential_fetch() {
        let mut source = StubSource::default().listing(StoryType::Top, &[5, 6, 7, 8]);
        for id in 5..=8 {
            source = source.with_item(id, &format!("Story {}", id));
            source.delays.insert(id, Duration::from_millis(10));
        }
        let fetcher = fetcher(source).with_item_concurrency(1);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(ids(&stories), vec![5, 6, 7, 8]);
        assert_eq!(fetcher.source().item_calls(), 4);
        assert_eq!(fetcher.source().max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_zero_concurrency_is_sequential() {
        let mut source = StubSource::default().listing(StoryType::Top, &[1, 2, 3]);
        for id in 1..=3 {
            source = source.with_item(id, &format!("Story {}", id));
            source.delays.insert(id, Duration::from_millis(10));
        }
        let fetcher = fetcher(source).with_item_concurrency(0);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(ids(&stories), vec![1, 2, 3]);
        assert_eq!(fetcher.source().max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_fan_out_respects_limit() {
        let ids_in: Vec<u64> = (1..=12).collect();
        let mut source = StubSource::default().listing(StoryType::Top, &ids_in);
        for id in 1..=12 {
            source = source.with_item(id, &format!("Story {}", id));
            source.delays.insert(id, Duration::from_millis(20));
        }
        let fetcher = fetcher(source).with_item_concurrency(4);

        let stories = fetcher.fetch(StoryType::Top).await.unwrap();

        assert_eq!(ids(&stories), ids_in);
        let peak = fetcher.source().max_in_flight();
        assert!(peak > 1, "lookups never overlapped");
        assert!(peak <= 4, "peak {} exceeds limit", peak);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_cached_reads() {
        let source = StubSource::default()
            .listing(StoryType::Top, &[1, 2, 3])
            .with_item(1, "A")
            .with_item(2, "B")
            .with_item(3, "C");
        let fetcher = Arc::new(fetcher(source));
        let expected = fetcher.fetch(StoryType::Top).await.unwrap();
        let calls = fetcher.source().upstream_calls();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let fetcher = fetcher.clone();
                tokio::spawn(async move { fetcher.fetch(StoryType::Top).await.unwrap() })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap(), expected);
        }
        assert_eq!(fetcher.source().upstream_calls(), calls);
    }
}
