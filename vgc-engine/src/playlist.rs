//! Guide playlist assembly
//!
//! Builds a curated guide playlist for a game: one ranked search per
//! intent category, operator selection by number/range strings, then a new
//! container filled with the picks. Selected playlists are expanded into
//! their items; duplicate video ids are inserted only once.

use crate::history::HistoryStore;
use crate::model::SearchModel;
use crate::orchestrator::{fetch_paginated, FetchOptions, PagedQuery};
use crate::provider::{ContentProvider, OperatorIo};
use crate::quota::QuotaLedger;
use crate::search::{search_candidates, ScoredCandidate};
use std::collections::BTreeSet;
use vgc_common::{Category, Domain, Error, Result};

/// Parse a selection string of numbers and ranges (`"1,3"`, `"1-3"`,
/// `"1,2-4"`) into one-based indices, validated against `len`.
///
/// An empty string selects nothing. Malformed parts and out-of-range
/// indices are `InvalidInput` errors so callers can re-prompt.
pub fn parse_selection(input: &str, len: usize) -> Result<Vec<usize>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let mut indices = Vec::new();
    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        if let Some((start, end)) = part.split_once('-') {
            let start: usize = start
                .trim()
                .parse()
                .map_err(|_| Error::InvalidInput(format!("not a number: {part}")))?;
            let end: usize = end
                .trim()
                .parse()
                .map_err(|_| Error::InvalidInput(format!("not a number: {part}")))?;
            if start == 0 || end < start {
                return Err(Error::InvalidInput(format!("bad range: {part}")));
            }
            indices.extend(start..=end);
        } else {
            let n: usize = part
                .parse()
                .map_err(|_| Error::InvalidInput(format!("not a number: {part}")))?;
            indices.push(n);
        }
    }

    if indices.iter().any(|&n| n < 1 || n > len) {
        return Err(Error::InvalidInput(
            "selection out of range".to_string(),
        ));
    }
    Ok(indices)
}

/// Assembles guide playlists from ranked search results.
pub struct GuideBuilder<'a> {
    pub provider: &'a dyn ContentProvider,
    pub io: &'a dyn OperatorIo,
    pub history: &'a HistoryStore,
}

impl<'a> GuideBuilder<'a> {
    /// Run the full guide flow for one game. Returns the new playlist id,
    /// or None when the operator selected nothing at all.
    pub async fn generate_guide(
        &self,
        ledger: &mut QuotaLedger,
        model: &SearchModel,
        game_name: &str,
        domain: Domain,
    ) -> Result<Option<String>> {
        let mut sections: Vec<(Category, Vec<ScoredCandidate>, Vec<usize>)> = Vec::new();

        for category in Category::ALL {
            self.io
                .say(&format!("\nSearching for {} content...", category));
            let results = search_candidates(
                self.provider,
                ledger,
                self.io,
                model,
                game_name,
                domain,
                category,
                None,
            )
            .await?;

            self.display_results(&results, category);
            let picked = self.prompt_selection(category, results.len()).await?;
            sections.push((category, results, picked));
        }

        if sections.iter().all(|(_, _, picked)| picked.is_empty()) {
            self.io.say("\nNothing selected; no playlist created.");
            return Ok(None);
        }

        let title = format!("{} - Complete Guide", game_name);
        let description = format!(
            "Curated gameplay guide for {}\n\nType: {} game\n\nIncludes:\n- How to Play tutorials\n- Reviews\n- Full Playthroughs",
            game_name, domain
        );
        self.io.say(&format!("\nCreating playlist: {}", title));
        let playlist_id = self.provider.create_container(&title, &description).await?;

        let mut added_ids: BTreeSet<String> = BTreeSet::new();
        let mut added = 0usize;

        for (category, results, picked) in &sections {
            if picked.is_empty() {
                continue;
            }
            self.io.say(&format!("\nAdding {} selections...", category));
            for &index in picked {
                let result = &results[index - 1];
                if result.candidate.is_playlist() {
                    added += self
                        .add_playlist_items(&playlist_id, &result.candidate.id, &mut added_ids)
                        .await?;
                } else if added_ids.insert(result.candidate.id.clone()) {
                    self.provider
                        .insert_item(&playlist_id, &result.candidate.id)
                        .await?;
                    self.io.say(&format!("Added: {}", result.candidate.title));
                    added += 1;
                } else {
                    self.io
                        .say(&format!("Skipped duplicate: {}", result.candidate.title));
                }
            }
        }

        self.io.say(&format!(
            "\nSuccess! Created playlist '{}' with {} videos",
            title, added
        ));
        self.history.record(&playlist_id, &title).await;
        Ok(Some(playlist_id))
    }

    /// Expand a picked playlist into the guide, skipping duplicates.
    async fn add_playlist_items(
        &self,
        guide_id: &str,
        source_playlist_id: &str,
        added_ids: &mut BTreeSet<String>,
    ) -> Result<usize> {
        let query = PagedQuery::ContainerItems {
            container_id: source_playlist_id.to_string(),
        };
        let items = fetch_paginated(self.provider, &query, &FetchOptions::default()).await?;

        let mut added = 0usize;
        for item in items {
            if added_ids.insert(item.id.clone()) {
                self.provider.insert_item(guide_id, &item.id).await?;
                self.io.say(&format!("Added: {}", item.title));
                added += 1;
            } else {
                self.io.say(&format!("Skipped duplicate: {}", item.title));
            }
        }
        Ok(added)
    }

    fn display_results(&self, results: &[ScoredCandidate], category: Category) {
        if results.is_empty() {
            self.io.say(&format!("\nNo {} results found.", category));
            return;
        }

        self.io.say(&format!("\nAvailable {} results:", category));
        for (index, result) in results.iter().enumerate() {
            let c = &result.candidate;
            if c.is_playlist() {
                self.io.say(&format!("\n{}. [PLAYLIST] {}", index + 1, c.title));
            } else {
                self.io.say(&format!("\n{}. {}", index + 1, c.title));
            }
            let views = c
                .view_count()
                .map(|v| v.to_string())
                .unwrap_or_else(|| "?".to_string());
            let duration = c
                .duration_minutes()
                .map(|m| format!("{}m", m))
                .unwrap_or_else(|| "?".to_string());
            self.io.say(&format!(
                "   Channel: {} | Duration: {} | Views: {} | Score: {}",
                c.channel_title, duration, views, result.score
            ));
            self.io.say(&format!("   {}", c.url));
        }
    }

    /// Prompt until the selection parses; empty input skips the section.
    async fn prompt_selection(&self, category: Category, len: usize) -> Result<Vec<usize>> {
        if len == 0 {
            return Ok(Vec::new());
        }
        loop {
            self.io
                .say("\nTip: enter numbers/ranges separated by commas (e.g. '1,3' or '1-3')");
            let input = self
                .io
                .ask(&format!(
                    "Select {} results to add (or press Enter to skip): ",
                    category
                ))
                .await?;
            match parse_selection(&input, len) {
                Ok(picked) => return Ok(picked),
                Err(e) => self.io.say(&format!("{}", e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_numbers() {
        assert_eq!(parse_selection("1,3", 5).unwrap(), vec![1, 3]);
        assert_eq!(parse_selection("2", 5).unwrap(), vec![2]);
    }

    #[test]
    fn test_parse_ranges() {
        assert_eq!(parse_selection("1-3", 5).unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_selection("1,2-4", 5).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_parse_empty_selects_nothing() {
        assert_eq!(parse_selection("", 5).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_selection("   ", 5).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_selection("one,two", 5).is_err());
        assert!(parse_selection("1,,x", 5).is_err());
        assert!(parse_selection("3-1", 5).is_err());
        assert!(parse_selection("0-2", 5).is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!(parse_selection("6", 5).is_err());
        assert!(parse_selection("0", 5).is_err());
        assert!(parse_selection("4-7", 5).is_err());
    }

    #[test]
    fn test_parse_tolerates_spaces() {
        assert_eq!(parse_selection(" 1 , 2-3 ", 5).unwrap(), vec![1, 2, 3]);
    }
}
