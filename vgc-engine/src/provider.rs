//! Content provider and operator I/O abstractions
//!
//! The engine never talks HTTP or stdin directly; it goes through these
//! traits so the orchestrator, search, and training loops can be driven by
//! scripted stubs in tests. [`crate::youtube::YouTubeProvider`] is the
//! production implementation of [`ContentProvider`].

use async_trait::async_trait;
use vgc_common::{Candidate, Result};

/// Maximum items a provider returns per page.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Result ordering for search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchOrder {
    #[default]
    Relevance,
    Date,
    ViewCount,
}

impl SearchOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchOrder::Relevance => "relevance",
            SearchOrder::Date => "date",
            SearchOrder::ViewCount => "viewCount",
        }
    }
}

/// Kind filter for search queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KindFilter {
    #[default]
    Video,
    Playlist,
    Channel,
    VideoAndPlaylist,
}

impl KindFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindFilter::Video => "video",
            KindFilter::Playlist => "playlist",
            KindFilter::Channel => "channel",
            KindFilter::VideoAndPlaylist => "video,playlist",
        }
    }
}

/// One page of a text search query.
#[derive(Debug, Clone, Default)]
pub struct SearchPage {
    /// Full query text, including any exclusion clauses and channel groups
    pub query: String,
    pub kind: KindFilter,
    pub order: SearchOrder,
    /// Restrict results to one owning channel (provider-side)
    pub channel_id: Option<String>,
    /// Only items published after this RFC 3339 instant
    pub published_after: Option<String>,
    /// Only items published before this RFC 3339 instant
    pub published_before: Option<String>,
    /// Preferred result language hint (e.g. "en")
    pub relevance_language: Option<String>,
    /// Items per page, capped at [`MAX_PAGE_SIZE`]
    pub page_size: u32,
    /// Continuation cursor from the previous page, None for the first
    pub cursor: Option<String>,
    /// Fetch per-item statistics and durations after the search
    pub with_details: bool,
}

impl SearchPage {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page_size: MAX_PAGE_SIZE,
            ..Default::default()
        }
    }
}

/// One page of provider results plus the continuation cursor.
///
/// `next_cursor: None` means the provider has no further pages; the
/// orchestrator relies on that for loop termination.
#[derive(Debug, Clone, Default)]
pub struct ProviderPage {
    pub items: Vec<Candidate>,
    pub next_cursor: Option<String>,
}

/// Abstract paginated query service.
///
/// All operations are single-page request/response; pagination policy lives
/// in the orchestrator. Any failure maps to `Error::Provider` and is
/// non-retriable within a single call.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Execute one page of a text search.
    async fn search(&self, page: &SearchPage) -> Result<ProviderPage>;

    /// List one page of a container's (playlist's) items.
    async fn list_container_items(
        &self,
        container_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ProviderPage>;

    /// List one page of the authenticated user's own containers.
    async fn list_my_containers(&self, page_size: u32, cursor: Option<&str>)
        -> Result<ProviderPage>;

    /// Fetch full metadata for a single item, None if it does not exist.
    async fn get_item_details(&self, id: &str) -> Result<Option<Candidate>>;

    /// Create a container, returning its provider-issued id.
    async fn create_container(&self, title: &str, description: &str) -> Result<String>;

    /// Delete a container owned by the authenticated user.
    async fn delete_container(&self, id: &str) -> Result<()>;

    /// Insert an item into a container, returning the container-item id.
    async fn insert_item(&self, container_id: &str, item_id: &str) -> Result<String>;

    /// Remove a container item by its container-item id.
    async fn remove_item(&self, container_item_id: &str) -> Result<()>;
}

/// Line-based operator prompt/response, synchronous from the engine's point
/// of view (the only suspension points in the core).
#[async_trait]
pub trait OperatorIo: Send + Sync {
    /// Display a line of output to the operator.
    fn say(&self, line: &str);

    /// Prompt and read one line, trimmed.
    async fn ask(&self, prompt: &str) -> Result<String>;

    /// Yes/no confirmation; only an explicit "y"/"yes" counts as yes.
    async fn confirm(&self, prompt: &str) -> Result<bool> {
        let answer = self.ask(prompt).await?;
        let answer = answer.trim().to_ascii_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}
