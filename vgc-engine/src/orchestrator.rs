//! Query orchestrator
//!
//! Drives a provider query page by page, following continuation cursors
//! until the provider stops returning one. Pagination policy lives here;
//! the provider only ever answers single-page requests.
//!
//! Failure policy is all-or-nothing: if any page fails, the whole fetch
//! fails and items accumulated from earlier pages are discarded.

use crate::provider::{ContentProvider, ProviderPage, SearchPage, MAX_PAGE_SIZE};
use vgc_common::{Candidate, Result};

/// A provider query the orchestrator can paginate.
#[derive(Debug, Clone)]
pub enum PagedQuery {
    /// Text search with filters
    Search(SearchPage),
    /// Items of one container (playlist)
    ContainerItems { container_id: String },
    /// The authenticated user's own containers
    MyContainers,
}

/// Caller-side options applied on top of the provider query.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Drop items whose owning-channel name differs. Applied post-fetch;
    /// never passed to the provider.
    pub channel_filter: Option<String>,
    /// Stop after this many (post-filter) items; None fetches to cursor
    /// exhaustion.
    pub max_results: Option<usize>,
}

/// Fetch every page of `query`, returning a flat sequence in provider
/// order. The loop is unbounded but provider-terminated: the provider
/// guarantees it eventually returns no cursor.
pub async fn fetch_paginated(
    provider: &dyn ContentProvider,
    query: &PagedQuery,
    options: &FetchOptions,
) -> Result<Vec<Candidate>> {
    let mut items: Vec<Candidate> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0u32;

    loop {
        let page = fetch_page(provider, query, cursor.as_deref()).await?;
        pages += 1;

        for item in page.items {
            if let Some(channel) = &options.channel_filter {
                if &item.channel_title != channel {
                    continue;
                }
            }
            items.push(item);
            if let Some(max) = options.max_results {
                if items.len() >= max {
                    tracing::debug!(pages, count = items.len(), "Fetch reached result bound");
                    return Ok(items);
                }
            }
        }

        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    tracing::debug!(pages, count = items.len(), "Paginated fetch complete");
    Ok(items)
}

async fn fetch_page(
    provider: &dyn ContentProvider,
    query: &PagedQuery,
    cursor: Option<&str>,
) -> Result<ProviderPage> {
    match query {
        PagedQuery::Search(spec) => {
            let mut page = spec.clone();
            page.page_size = page.page_size.min(MAX_PAGE_SIZE);
            page.cursor = cursor.map(str::to_string);
            provider.search(&page).await
        }
        PagedQuery::ContainerItems { container_id } => {
            provider
                .list_container_items(container_id, MAX_PAGE_SIZE, cursor)
                .await
        }
        PagedQuery::MyContainers => provider.list_my_containers(MAX_PAGE_SIZE, cursor).await,
    }
}
