//! Domain types: story types, raw upstream items, and normalized stories.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::COMMENTS_URL_PREFIX;
use crate::error::HnError;

// ═══════════════════════════════════════════════════════════════════════════════
// STORY TYPE
// ═══════════════════════════════════════════════════════════════════════════════

/// The listing a client asks for.
///
/// Selects both the upstream listing endpoint and the title filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoryType {
    /// Front page ranking, unfiltered.
    Top,
    /// "Show HN" posts.
    Show,
    /// "Ask HN" posts.
    Ask,
}

impl StoryType {
    /// Every supported story type.
    pub const ALL: [StoryType; 3] = [StoryType::Top, StoryType::Show, StoryType::Ask];

    /// Lowercase name used in routes and in the `type` field of a story.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoryType::Top => "top",
            StoryType::Show => "show",
            StoryType::Ask => "ask",
        }
    }

    /// Name of the upstream listing endpoint (without `.json`).
    pub fn endpoint(&self) -> &'static str {
        match self {
            StoryType::Top => "topstories",
            StoryType::Show => "showstories",
            StoryType::Ask => "askstories",
        }
    }

    /// Title prefix an item must carry to be kept, if any.
    pub fn title_prefix(&self) -> Option<&'static str> {
        match self {
            StoryType::Top => None,
            StoryType::Show => Some("Show HN:"),
            StoryType::Ask => Some("Ask HN:"),
        }
    }

    /// Returns true if the item passes this type's title filter.
    pub fn accepts(&self, item: &RawItem) -> bool {
        self.title_prefix()
            .map_or(true, |prefix| item.title.starts_with(prefix))
    }
}

impl fmt::Display for StoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryType {
    type Err = HnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(StoryType::Top),
            "show" => Ok(StoryType::Show),
            "ask" => Ok(StoryType::Ask),
            other => Err(HnError::InvalidStoryType(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RAW ITEM
// ═══════════════════════════════════════════════════════════════════════════════

/// An item as returned by the upstream `item/{id}.json` endpoint.
///
/// Missing fields default: ask posts have no `url`, new posts no `descendants`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItem {
    /// Item id
    pub id: u64,
    /// Upstream item kind ("story", "job", ...)
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Author handle
    #[serde(default)]
    pub by: String,
    /// Creation time in unix seconds
    #[serde(default)]
    pub time: i64,
    /// Title
    #[serde(default)]
    pub title: String,
    /// Linked URL
    #[serde(default)]
    pub url: String,
    /// Score
    #[serde(default)]
    pub score: i64,
    /// Comment count
    #[serde(default)]
    pub descendants: i64,
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORY
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalized story as served to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Item id
    pub id: u64,
    /// Title
    pub title: String,
    /// Linked URL (empty for text posts)
    pub url: String,
    /// Upstream score
    pub points: i64,
    /// Author handle
    pub submitted_by: String,
    /// Creation time, serialized as RFC 3339
    pub created_at: DateTime<Utc>,
    /// Hacker News discussion page
    pub comments_url: String,
    /// The story type that was requested, not the upstream item kind
    #[serde(rename = "type")]
    pub story_type: StoryType,
}

impl Story {
    /// Builds a story from an upstream item, tagged with the requested type.
    pub fn from_raw(item: RawItem, story_type: StoryType) -> Self {
        Self {
            id: item.id,
            comments_url: comments_url(item.id),
            created_at: DateTime::from_timestamp(item.time, 0).unwrap_or_default(),
            title: item.title,
            url: item.url,
            points: item.score,
            submitted_by: item.by,
            story_type,
        }
    }
}

/// Discussion page URL for an item id.
pub fn comments_url(id: u64) -> String {
    format!("{}{}", COMMENTS_URL_PREFIX, id)
}
