//! App state: config, cache, story fetcher.

use std::sync::Arc;

use hnews_cache::StoryCache;
use hnews_client::{ClientConfig, HnClient};
use hnews_core::constants::{
    DEFAULT_HN_API_BASE_URL, DEFAULT_ITEM_CONCURRENCY, DEFAULT_REQUEST_TIMEOUT_SECS,
};
use hnews_core::error::Result;
use hnews_fetcher::StoryFetcher;

/// Deployment settings for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Upstream API root
    pub hn_api_base_url: String,
    /// Per-request upstream timeout in seconds
    pub request_timeout_secs: u64,
    /// Item lookups in flight per fetch
    pub item_concurrency: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            hn_api_base_url: DEFAULT_HN_API_BASE_URL.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            item_concurrency: DEFAULT_ITEM_CONCURRENCY,
        }
    }
}

impl ApiConfig {
    /// Reads settings from the environment (and `.env` if present).
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();

        Self {
            hn_api_base_url: std::env::var("HN_API_BASE_URL")
                .unwrap_or(defaults.hn_api_base_url),
            request_timeout_secs: env_parse("HN_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            item_concurrency: env_parse("HN_ITEM_CONCURRENCY")
                .unwrap_or(defaults.item_concurrency),
        }
    }

    /// Points the server at a different upstream (mirrors, test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.hn_api_base_url = url.into();
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Shared state handed to every handler.
pub struct AppState {
    /// Settings the server was built with
    pub config: ApiConfig,
    /// Cache-backed fetcher over the upstream client
    pub fetcher: StoryFetcher<HnClient>,
}

impl AppState {
    /// Builds the upstream client, an empty cache, and the fetcher.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = HnClient::with_config(
            ClientConfig::new(&config.hn_api_base_url).with_timeout(config.request_timeout_secs),
        )?;
        let fetcher = StoryFetcher::new(client, Arc::new(StoryCache::new()))
            .with_item_concurrency(config.item_concurrency);

        Ok(Self { config, fetcher })
    }
}
