//! DTOs for API responses.
//!
//! Story lists are served as `hnews_core::Story` directly.

use serde::Serialize;

use hnews_cache::CacheStats;

/// Response for the health check.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server answers
    pub status: &'static str,
    /// Cache occupancy
    pub cache: CacheStatsDto,
}

/// Cache occupancy summary.
#[derive(Debug, Serialize)]
pub struct CacheStatsDto {
    /// Story types with a stored list
    pub entries: usize,
    /// Story types whose list is still fresh
    pub fresh: usize,
}

impl From<CacheStats> for CacheStatsDto {
    fn from(stats: CacheStats) -> Self {
        Self {
            entries: stats.entries,
            fresh: stats.fresh,
        }
    }
}
