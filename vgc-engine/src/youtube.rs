//! YouTube Data API v3 client
//!
//! Implements [`ContentProvider`] against the YouTube Data API. One HTTP
//! request per trait call; pagination cursors are the API's page tokens,
//! passed through untouched. Search results are optionally enriched with
//! per-item statistics and durations through follow-up `videos.list` /
//! `playlists.list` calls.
//!
//! Authentication: an API key for read operations, plus an optional OAuth
//! bearer token for user-scoped operations (own playlists, mutations).
//! Obtaining and refreshing that token is outside this crate.

use crate::provider::{ContentProvider, ProviderPage, SearchPage};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use vgc_common::duration::parse_iso8601_minutes;
use vgc_common::{Candidate, CandidateKind, Error, Result};

const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const USER_AGENT: &str = "vgc/0.1.0";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// YouTube Data API client.
pub struct YouTubeProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    auth_token: Option<String>,
}

impl YouTubeProvider {
    pub fn new(api_key: String, auth_token: Option<String>) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| Error::Provider(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: API_BASE_URL.to_string(),
            api_key,
            auth_token,
        })
    }

    /// Point the client at a different endpoint (test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}/{}", self.base_url, path);
        let mut builder = self
            .http_client
            .request(method, url)
            .query(&[("key", self.api_key.as_str())]);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: for<'de> Deserialize<'de>>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "API returned {}: {}",
                status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::Provider(format!("Response parse failed: {}", e)))
    }

    async fn execute_empty(&self, builder: reqwest::RequestBuilder) -> Result<()> {
        let response = builder
            .send()
            .await
            .map_err(|e| Error::Provider(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider(format!(
                "API returned {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    /// Fetch statistics and durations for video candidates, item counts for
    /// playlist candidates, and fold them back into the page.
    async fn enrich_details(&self, items: &mut [Candidate]) -> Result<()> {
        let video_ids: Vec<String> = items
            .iter()
            .filter(|c| matches!(c.kind, CandidateKind::Video { .. }))
            .map(|c| c.id.clone())
            .collect();
        let playlist_ids: Vec<String> = items
            .iter()
            .filter(|c| c.is_playlist())
            .map(|c| c.id.clone())
            .collect();

        if !video_ids.is_empty() {
            let ids = video_ids.join(",");
            let response: VideoListResponse = self
                .execute(self.request(reqwest::Method::GET, "videos").query(&[
                    ("part", "contentDetails,statistics"),
                    ("id", ids.as_str()),
                ]))
                .await?;

            let details: HashMap<String, &VideoResource> =
                response.items.iter().map(|v| (v.id.clone(), v)).collect();

            for item in items.iter_mut() {
                if let Some(video) = details.get(&item.id) {
                    item.kind = CandidateKind::Video {
                        duration_minutes: video
                            .content_details
                            .as_ref()
                            .and_then(|d| parse_iso8601_minutes(&d.duration)),
                        view_count: video
                            .statistics
                            .as_ref()
                            .and_then(|s| s.view_count.as_deref())
                            .and_then(|v| v.parse().ok()),
                        like_count: video
                            .statistics
                            .as_ref()
                            .and_then(|s| s.like_count.as_deref())
                            .and_then(|v| v.parse().ok()),
                    };
                }
            }
        }

        if !playlist_ids.is_empty() {
            let ids = playlist_ids.join(",");
            let response: PlaylistListResponse = self
                .execute(self.request(reqwest::Method::GET, "playlists").query(&[
                    ("part", "contentDetails"),
                    ("id", ids.as_str()),
                ]))
                .await?;

            let counts: HashMap<String, u32> = response
                .items
                .iter()
                .filter_map(|p| {
                    p.content_details
                        .as_ref()
                        .map(|d| (p.id.clone(), d.item_count.unwrap_or(0)))
                })
                .collect();

            for item in items.iter_mut() {
                if item.is_playlist() {
                    item.kind = CandidateKind::Playlist {
                        item_count: counts.get(&item.id).copied(),
                    };
                }
            }
        }

        Ok(())
    }
}

/// Extract a playlist id from a URL containing `list=`, or pass a clean id
/// through unchanged.
pub fn extract_playlist_id(url_or_id: &str) -> &str {
    match url_or_id.split_once("list=") {
        Some((_, rest)) => rest.split('&').next().unwrap_or(rest),
        None => url_or_id,
    }
}

#[async_trait]
impl ContentProvider for YouTubeProvider {
    async fn search(&self, page: &SearchPage) -> Result<ProviderPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("q", page.query.clone()),
            ("type", page.kind.as_str().to_string()),
            ("order", page.order.as_str().to_string()),
            ("maxResults", page.page_size.to_string()),
        ];
        if let Some(channel_id) = &page.channel_id {
            params.push(("channelId", channel_id.clone()));
        }
        if let Some(after) = &page.published_after {
            params.push(("publishedAfter", after.clone()));
        }
        if let Some(before) = &page.published_before {
            params.push(("publishedBefore", before.clone()));
        }
        if let Some(language) = &page.relevance_language {
            params.push(("relevanceLanguage", language.clone()));
        }
        if let Some(cursor) = &page.cursor {
            params.push(("pageToken", cursor.clone()));
        }

        tracing::debug!(query = %page.query, page_size = page.page_size, "YouTube search");

        let response: SearchListResponse = self
            .execute(self.request(reqwest::Method::GET, "search").query(&params))
            .await?;

        let mut items: Vec<Candidate> = response
            .items
            .into_iter()
            .filter_map(search_result_to_candidate)
            .collect();

        if page.with_details {
            self.enrich_details(&mut items).await?;
        }

        Ok(ProviderPage {
            items,
            next_cursor: response.next_page_token,
        })
    }

    async fn list_container_items(
        &self,
        container_id: &str,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ProviderPage> {
        let clean_id = extract_playlist_id(container_id);
        let mut params: Vec<(&str, String)> = vec![
            ("part", "snippet".to_string()),
            ("playlistId", clean_id.to_string()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("pageToken", cursor.to_string()));
        }

        let response: PlaylistItemListResponse = self
            .execute(
                self.request(reqwest::Method::GET, "playlistItems")
                    .query(&params),
            )
            .await?;

        let items = response
            .items
            .into_iter()
            .filter_map(playlist_item_to_candidate)
            .collect();

        Ok(ProviderPage {
            items,
            next_cursor: response.next_page_token,
        })
    }

    async fn list_my_containers(
        &self,
        page_size: u32,
        cursor: Option<&str>,
    ) -> Result<ProviderPage> {
        let mut params: Vec<(&str, String)> = vec![
            ("part", "snippet,contentDetails".to_string()),
            ("mine", "true".to_string()),
            ("maxResults", page_size.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("pageToken", cursor.to_string()));
        }

        let response: PlaylistListResponse = self
            .execute(self.request(reqwest::Method::GET, "playlists").query(&params))
            .await?;

        let items = response
            .items
            .into_iter()
            .map(playlist_to_candidate)
            .collect();

        Ok(ProviderPage {
            items,
            next_cursor: response.next_page_token,
        })
    }

    async fn get_item_details(&self, id: &str) -> Result<Option<Candidate>> {
        let response: VideoListResponse = self
            .execute(self.request(reqwest::Method::GET, "videos").query(&[
                ("part", "snippet,contentDetails,statistics"),
                ("id", id),
            ]))
            .await?;

        Ok(response.items.into_iter().next().map(|video| {
            let snippet = video.snippet.unwrap_or_default();
            Candidate {
                id: video.id.clone(),
                kind: CandidateKind::Video {
                    duration_minutes: video
                        .content_details
                        .as_ref()
                        .and_then(|d| parse_iso8601_minutes(&d.duration)),
                    view_count: video
                        .statistics
                        .as_ref()
                        .and_then(|s| s.view_count.as_deref())
                        .and_then(|v| v.parse().ok()),
                    like_count: video
                        .statistics
                        .as_ref()
                        .and_then(|s| s.like_count.as_deref())
                        .and_then(|v| v.parse().ok()),
                },
                title: snippet.title,
                channel_title: snippet.channel_title,
                published_at: snippet.published_at,
                description: snippet.description,
                url: format!("https://www.youtube.com/watch?v={}", video.id),
            }
        }))
    }

    async fn create_container(&self, title: &str, description: &str) -> Result<String> {
        let body = json!({
            "snippet": {
                "title": title,
                "description": description,
            }
        });

        let response: PlaylistResource = self
            .execute(
                self.request(reqwest::Method::POST, "playlists")
                    .query(&[("part", "snippet")])
                    .json(&body),
            )
            .await?;

        tracing::info!(playlist_id = %response.id, title, "Created playlist");
        Ok(response.id)
    }

    async fn delete_container(&self, id: &str) -> Result<()> {
        let clean_id = extract_playlist_id(id);
        self.execute_empty(
            self.request(reqwest::Method::DELETE, "playlists")
                .query(&[("id", clean_id)]),
        )
        .await
    }

    async fn insert_item(&self, container_id: &str, item_id: &str) -> Result<String> {
        let clean_id = extract_playlist_id(container_id);
        let body = json!({
            "snippet": {
                "playlistId": clean_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": item_id,
                }
            }
        });

        let response: PlaylistItemResource = self
            .execute(
                self.request(reqwest::Method::POST, "playlistItems")
                    .query(&[("part", "snippet")])
                    .json(&body),
            )
            .await?;
        Ok(response.id)
    }

    async fn remove_item(&self, container_item_id: &str) -> Result<()> {
        self.execute_empty(
            self.request(reqwest::Method::DELETE, "playlistItems")
                .query(&[("id", container_item_id)]),
        )
        .await
    }
}

fn search_result_to_candidate(result: SearchResult) -> Option<Candidate> {
    let snippet = result.snippet?;
    let (id, kind, url) = match result.id {
        SearchResultId {
            video_id: Some(id), ..
        } => {
            let url = format!("https://www.youtube.com/watch?v={}", id);
            (
                id,
                CandidateKind::Video {
                    duration_minutes: None,
                    view_count: None,
                    like_count: None,
                },
                url,
            )
        }
        SearchResultId {
            playlist_id: Some(id),
            ..
        } => {
            let url = format!("https://www.youtube.com/playlist?list={}", id);
            (id, CandidateKind::Playlist { item_count: None }, url)
        }
        SearchResultId {
            channel_id: Some(id),
            ..
        } => {
            let url = format!("https://www.youtube.com/channel/{}", id);
            (id, CandidateKind::Channel, url)
        }
        _ => return None,
    };

    Some(Candidate {
        id,
        kind,
        title: snippet.title,
        channel_title: snippet.channel_title,
        published_at: snippet.published_at,
        description: snippet.description,
        url,
    })
}

fn playlist_item_to_candidate(item: PlaylistItemResource) -> Option<Candidate> {
    let snippet = item.snippet?;
    let video_id = snippet.resource_id?.video_id?;
    let url = format!("https://www.youtube.com/watch?v={}", video_id);
    Some(Candidate {
        id: video_id,
        kind: CandidateKind::Video {
            duration_minutes: None,
            view_count: None,
            like_count: None,
        },
        title: snippet.title,
        // Playlist items report the owner of the underlying video
        channel_title: snippet.video_owner_channel_title.unwrap_or_default(),
        published_at: snippet.published_at,
        description: snippet.description,
        url,
    })
}

fn playlist_to_candidate(playlist: PlaylistResource) -> Candidate {
    let snippet = playlist.snippet.unwrap_or_default();
    let url = format!("https://www.youtube.com/playlist?list={}", playlist.id);
    Candidate {
        id: playlist.id,
        kind: CandidateKind::Playlist {
            item_count: playlist.content_details.and_then(|d| d.item_count),
        },
        title: snippet.title,
        channel_title: snippet.channel_title,
        published_at: snippet.published_at,
        description: snippet.description,
        url,
    }
}

// ============================================================================
// YouTube API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: SearchResultId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResultId {
    video_id: Option<String>,
    playlist_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel_title: String,
    published_at: Option<String>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoResource {
    id: String,
    snippet: Option<Snippet>,
    content_details: Option<VideoContentDetails>,
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoContentDetails {
    duration: String,
}

/// The API reports counts as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<PlaylistResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    id: String,
    snippet: Option<Snippet>,
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    item_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    /// Playlist-item id, the handle `remove_item` takes
    #[allow(dead_code)]
    id: String,
    snippet: Option<PlaylistItemSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    #[serde(default)]
    title: String,
    published_at: Option<String>,
    #[serde(default)]
    description: String,
    video_owner_channel_title: Option<String>,
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}
