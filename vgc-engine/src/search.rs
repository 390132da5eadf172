//! Candidate search: query expansion, orchestrated fetch, rank, dedupe
//!
//! The core ranking pipeline. Each query template for the (domain,
//! category) pair is expanded with the target game name, the model's
//! exclusion clauses, and a trusted-channel OR-group, then executed through
//! the orchestrator. Survivors of the noise-channel filter are scored and
//! merged across templates: dedupe by id keeping the highest-scoring
//! occurrence, stable sort by score descending, truncate.

use crate::model::SearchModel;
use crate::orchestrator::{fetch_paginated, FetchOptions, PagedQuery};
use crate::provider::{ContentProvider, KindFilter, OperatorIo, SearchPage};
use crate::quota::{QuotaLedger, SEARCH_COST};
use crate::scorer::score;
use std::collections::HashMap;
use vgc_common::{Candidate, Category, Domain, Result};

/// Raw candidates requested per query pattern.
pub const RESULTS_PER_PATTERN: usize = 15;

/// Final result count when the caller does not specify one.
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// A candidate paired with its relevance score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: i64,
}

/// Build one provider query string: expanded template, `-"<phrase>"` per
/// exclusion, and a parenthesized OR-group of trusted channels.
pub fn build_query(expanded_template: &str, model: &SearchModel) -> String {
    let mut parts = vec![expanded_template.to_string()];

    for phrase in model.get_all_exclusions() {
        parts.push(format!("-\"{}\"", phrase));
    }

    if !model.trusted_channels.is_empty() {
        let channels: Vec<String> = model
            .trusted_channels
            .iter()
            .map(|channel| format!("channel:\"{}\"", channel))
            .collect();
        parts.push(format!("({})", channels.join(" | ")));
    }

    parts.join(" ")
}

/// Search, score, and rank candidates for a game within one (domain,
/// category) pair. Returns at most `limit` results, score descending,
/// ties in discovery order.
///
/// Provider failures and declined quota charges abort the whole search;
/// there is no partial-success contract.
#[allow(clippy::too_many_arguments)]
pub async fn search_candidates(
    provider: &dyn ContentProvider,
    ledger: &mut QuotaLedger,
    io: &dyn OperatorIo,
    model: &SearchModel,
    game_name: &str,
    domain: Domain,
    category: Category,
    limit: Option<usize>,
) -> Result<Vec<ScoredCandidate>> {
    let limit = limit.unwrap_or(DEFAULT_RESULT_LIMIT);

    // Discovery-ordered merge buffer; index per id for dedup
    let mut merged: Vec<ScoredCandidate> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();

    for template in crate::patterns::templates(domain, category) {
        let expanded = crate::patterns::expand(template, game_name);
        let query = build_query(&expanded, model);
        tracing::debug!(%query, "Executing search pattern");

        ledger
            .estimate_and_charge(SEARCH_COST, "Pattern search", io)
            .await?;

        let mut page = SearchPage::new(query);
        page.kind = KindFilter::VideoAndPlaylist;
        page.relevance_language = Some("en".to_string());
        page.page_size = RESULTS_PER_PATTERN as u32;
        page.with_details = true;

        let options = FetchOptions {
            max_results: Some(RESULTS_PER_PATTERN),
            ..Default::default()
        };
        let raw = fetch_paginated(provider, &PagedQuery::Search(page), &options).await?;
        tracing::debug!(count = raw.len(), "Pattern returned raw candidates");

        for candidate in raw {
            // Noise channels are dropped before scoring
            if model.noise_channels.contains(&candidate.channel_title) {
                continue;
            }

            let candidate_score = score(&candidate, model, domain, game_name);
            match by_id.get(&candidate.id) {
                Some(&index) => {
                    // Duplicate across templates: keep the highest-scoring
                    // occurrence, in its first discovery position
                    if candidate_score > merged[index].score {
                        merged[index] = ScoredCandidate {
                            candidate,
                            score: candidate_score,
                        };
                    }
                }
                None => {
                    by_id.insert(candidate.id.clone(), merged.len());
                    merged.push(ScoredCandidate {
                        candidate,
                        score: candidate_score,
                    });
                }
            }
        }
    }

    // Stable sort: equal scores keep discovery order
    merged.sort_by(|a, b| b.score.cmp(&a.score));
    merged.truncate(limit);

    tracing::info!(
        game = game_name,
        %domain,
        %category,
        results = merged.len(),
        "Candidate search complete"
    );
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchModel;

    #[test]
    fn test_build_query_plain_model() {
        let model = SearchModel::new(Domain::Board);
        let query = build_query("\"Catan\" \"how to play\"", &model);
        assert_eq!(query, "\"Catan\" \"how to play\"");
    }

    #[test]
    fn test_build_query_appends_exclusions() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_exclusion("unboxing only", true);
        model.add_exclusion("lot for sale", false);

        let query = build_query("\"Catan\" review board game", &model);

        assert!(query.starts_with("\"Catan\" review board game"));
        assert!(query.contains("-\"unboxing only\""));
        assert!(query.contains("-\"lot for sale\""));
    }

    #[test]
    fn test_build_query_trusted_channel_group() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_trusted_channel("Rules Corner");
        model.add_trusted_channel("Shut Up Sit Down");

        let query = build_query("\"Catan\" \"how to play\"", &model);

        assert!(query
            .contains("(channel:\"Rules Corner\" | channel:\"Shut Up Sit Down\")"));
    }

    #[test]
    fn test_build_query_no_group_without_trusted() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_noise_channel("Spam Channel");
        let query = build_query("\"Catan\" full game", &model);
        assert!(!query.contains("channel:"));
    }
}
