//! Core data types shared across the VGC workspace
//!
//! A `Candidate` is one raw result returned by the content provider before
//! scoring. Kind-specific fields live on the `CandidateKind` tag so scoring
//! and display logic can pattern-match instead of probing optional fields
//! that only make sense for one kind.

use serde::{Deserialize, Serialize};

/// Top-level content category, each with its own learned model and query
/// patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    /// Board and card games
    Board,
    /// Video games
    Video,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Board => "board",
            Domain::Video => "video",
        }
    }

    /// Literal phrase whose presence in a description indicates the right
    /// context for this domain (e.g. "board game").
    pub fn context_phrase(&self) -> String {
        format!("{} game", self.as_str())
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intent category within a domain, driving which query templates and
/// duration ranges apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Tutorials and rules explanations
    HowToPlay,
    /// Reviews and first impressions
    Review,
    /// Full playthroughs and long-form gameplay
    Playthrough,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::HowToPlay => "how_to_play",
            Category::Review => "review",
            Category::Playthrough => "playthrough",
        }
    }

    pub const ALL: [Category; 3] = [Category::HowToPlay, Category::Review, Category::Playthrough];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind tag for a search result, carrying kind-specific metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateKind {
    Video {
        /// Duration in whole minutes, when the provider reported one
        duration_minutes: Option<u32>,
        view_count: Option<u64>,
        like_count: Option<u64>,
    },
    Playlist {
        /// Number of items in the playlist, when known
        item_count: Option<u32>,
    },
    Channel,
}

/// One search result returned by the content provider.
///
/// Immutable once fetched within a query cycle; scoring never mutates the
/// candidate, it pairs it with a score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Provider-issued opaque identifier
    pub id: String,
    pub kind: CandidateKind,
    pub title: String,
    /// Name of the owning channel
    pub channel_title: String,
    /// Publish timestamp as returned by the provider (RFC 3339)
    pub published_at: Option<String>,
    /// Free-text description, empty when the provider omitted it
    pub description: String,
    /// Canonical watch/list URL
    pub url: String,
}

impl Candidate {
    /// Duration in minutes for video candidates, `None` otherwise.
    pub fn duration_minutes(&self) -> Option<u32> {
        match self.kind {
            CandidateKind::Video { duration_minutes, .. } => duration_minutes,
            _ => None,
        }
    }

    pub fn view_count(&self) -> Option<u64> {
        match self.kind {
            CandidateKind::Video { view_count, .. } => view_count,
            _ => None,
        }
    }

    pub fn like_count(&self) -> Option<u64> {
        match self.kind {
            CandidateKind::Video { like_count, .. } => like_count,
            _ => None,
        }
    }

    pub fn is_playlist(&self) -> bool {
        matches!(self.kind, CandidateKind::Playlist { .. })
    }
}
