//! Hacker News API client implementation.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use hnews_core::constants::{DEFAULT_HN_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use hnews_core::error::{HnError, Result};
use hnews_core::traits::StorySource;
use hnews_core::types::{RawItem, StoryType};

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// API root, e.g. "https://hacker-news.firebaseio.com/v0"
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_HN_API_BASE_URL.into(),
            timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates config pointing at a different API root (mirrors, test servers).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Client for the listing and item endpoints.
pub struct HnClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HnClient {
    /// Creates a client against the public API.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with the given config.
    ///
    /// Fails if the base URL is not an absolute http(s) URL or the timeout is zero.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let parsed = Url::parse(&config.base_url)
            .map_err(|e| HnError::Config(format!("invalid base URL '{}': {}", config.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(HnError::Config(format!(
                "unsupported base URL scheme: {}",
                parsed.scheme()
            )));
        }
        if config.timeout_seconds == 0 {
            return Err(HnError::Config("request timeout must be at least 1 second".into()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| HnError::Config(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
        })
    }

    /// Listing URL for a story type.
    pub fn listing_url(&self, story_type: StoryType) -> String {
        format!("{}/{}.json", self.base_url, story_type.endpoint())
    }

    /// Item URL for an id.
    pub fn item_url(&self, id: u64) -> String {
        format!("{}/item/{}.json", self.base_url, id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.http_client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| HnError::Http(e.to_string()))?
            .json::<T>()
            .await
            .map_err(|e| HnError::Http(e.to_string()))
    }
}

#[async_trait]
impl StorySource for HnClient {
    #[instrument(skip(self))]
    async fn story_ids(&self, story_type: StoryType) -> Result<Vec<u64>> {
        let ids: Vec<u64> = self.get_json(&self.listing_url(story_type)).await?;
        debug!(count = ids.len(), "fetched story listing");
        Ok(ids)
    }

    #[instrument(skip(self))]
    async fn item(&self, id: u64) -> Result<RawItem> {
        self.get_json(&self.item_url(id)).await
    }
}
