//! Interactive training loop
//!
//! Runs search → review → feedback → model-mutation cycles until the
//! operator commits or abandons. This is the only writer of the learned
//! model. Mutations that flip persistent state (persistent exclusions,
//! channel trust) are saved the moment they are made; committing saves
//! once more and exits; abandoning discards whatever was session-only.
//!
//! "Last trained game" is orchestration state, so it lives on the
//! training context rather than on the model: entering a search for a new
//! game clears that domain's session exclusions, and nothing else happens
//! automatically.

use crate::model::SearchModel;
use crate::orchestrator::{fetch_paginated, FetchOptions, PagedQuery};
use crate::provider::{ContentProvider, KindFilter, OperatorIo, SearchPage};
use crate::quota::{QuotaLedger, SEARCH_COST};
use crate::scorer::score;
use crate::search::{build_query, ScoredCandidate, RESULTS_PER_PATTERN};
use crate::store::ModelStore;
use vgc_common::{Domain, Error, Result};

/// How a training session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingOutcome {
    /// Model persisted on exit
    Committed,
    /// Session-only changes discarded; anything persistent was already
    /// saved when it was made
    Abandoned,
}

/// Cross-session orchestration state for the training loop.
#[derive(Debug, Default)]
pub struct TrainingContext {
    last_trained_game: Option<String>,
}

impl TrainingContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear session exclusions when the target game changes. Returns true
    /// when a change was detected.
    pub fn enter_game(&mut self, game_name: &str, model: &mut SearchModel) -> bool {
        let changed = self.last_trained_game.as_deref() != Some(game_name);
        if changed {
            model.clear_session_exclusions();
            self.last_trained_game = Some(game_name.to_string());
        }
        changed
    }
}

/// One interactive training session over a domain's model.
pub struct TrainingSession<'a> {
    pub provider: &'a dyn ContentProvider,
    pub store: &'a ModelStore,
    pub io: &'a dyn OperatorIo,
    pub ledger: &'a mut QuotaLedger,
}

impl<'a> TrainingSession<'a> {
    /// Run the loop until the operator commits or abandons.
    pub async fn run(
        &mut self,
        game_name: &str,
        domain: Domain,
        model: &mut SearchModel,
        ctx: &mut TrainingContext,
    ) -> Result<TrainingOutcome> {
        self.io
            .say(&format!("\n=== Training Session: {} ({} game) ===", game_name, domain));

        if ctx.enter_game(game_name, model) {
            self.io
                .say("\nNew game detected, clearing session-specific exclusions...");
        } else {
            self.io
                .say(&format!("\nContinuing with existing session exclusions for {}", game_name));
        }

        let mut results = self.training_search(game_name, domain, model).await?;

        loop {
            self.io.say("\nTraining Options:");
            self.io.say("1. Flag result as irrelevant");
            self.io.say("2. Mark channel as trusted");
            self.io.say("3. Mark channel as noise");
            self.io.say("4. Add session exclusion phrase");
            self.io.say("5. Add persistent exclusion pattern");
            self.io.say("6. Remove exclusion");
            self.io.say("7. Show current model state");
            self.io.say("8. Refresh search with current model");
            self.io.say("9. Save and exit");
            self.io.say("10. Exit without saving");

            let choice = self.io.ask("\nEnter choice (1-10): ").await?;
            let mutated = match choice.trim() {
                "1" => self.flag_result(&results, model).await?,
                "2" => self.mark_channel(&results, model, true).await?,
                "3" => self.mark_channel(&results, model, false).await?,
                "4" => self.add_exclusion(model, false).await?,
                "5" => self.add_exclusion(model, true).await?,
                "6" => self.remove_exclusion(model).await?,
                "7" => {
                    self.show_model_state(model);
                    false
                }
                "8" => {
                    results = self.refresh(game_name, domain, model).await;
                    false
                }
                "9" => {
                    self.store.save(model).await;
                    self.io.say(&format!("\nSaved {} game model", domain));
                    self.io.say("Note: session-specific exclusions were not persisted");
                    return Ok(TrainingOutcome::Committed);
                }
                "10" => {
                    self.io.say("\nExiting without saving session changes");
                    return Ok(TrainingOutcome::Abandoned);
                }
                _ => {
                    self.io.say("Invalid choice");
                    false
                }
            };

            // Model changed: offer an immediate re-search
            if mutated
                && self
                    .io
                    .confirm("\nWould you like to refresh the search with these changes? (y/n): ")
                    .await?
            {
                results = self.refresh(game_name, domain, model).await;
            }
        }
    }

    /// Broad single-query search used inside the training loop, with the
    /// model's exclusions and trusted channels applied.
    async fn training_search(
        &mut self,
        game_name: &str,
        domain: Domain,
        model: &SearchModel,
    ) -> Result<Vec<ScoredCandidate>> {
        let base = format!("\"{}\" {} game", game_name, domain);
        let query = build_query(&base, model);
        self.io.say(&format!("\nUsing refined query: {}", query));

        self.ledger
            .estimate_and_charge(SEARCH_COST, "Training search", self.io)
            .await?;

        let mut page = SearchPage::new(query);
        page.kind = KindFilter::Video;
        page.relevance_language = Some("en".to_string());
        page.page_size = RESULTS_PER_PATTERN as u32;
        page.with_details = true;

        let options = FetchOptions {
            max_results: Some(RESULTS_PER_PATTERN),
            ..Default::default()
        };
        let raw = fetch_paginated(self.provider, &PagedQuery::Search(page), &options).await?;

        let mut results: Vec<ScoredCandidate> = raw
            .into_iter()
            .filter(|candidate| !model.noise_channels.contains(&candidate.channel_title))
            .map(|candidate| {
                let candidate_score = score(&candidate, model, domain, game_name);
                ScoredCandidate {
                    candidate,
                    score: candidate_score,
                }
            })
            .collect();
        results.sort_by(|a, b| b.score.cmp(&a.score));

        if results.is_empty() {
            self.io.say("\nNo results found with current model settings.");
        } else {
            self.io.say(&format!("\nShowing {} results:", results.len()));
            for (index, result) in results.iter().enumerate() {
                self.io.say(&format!(
                    "{}. {} ({}) [score {}]",
                    index + 1,
                    result.candidate.title,
                    result.candidate.channel_title,
                    result.score
                ));
            }
        }
        Ok(results)
    }

    /// Refresh that tolerates provider faults and declined quota: the loop
    /// keeps running either way.
    async fn refresh(
        &mut self,
        game_name: &str,
        domain: Domain,
        model: &SearchModel,
    ) -> Vec<ScoredCandidate> {
        self.io.say("\nRefreshing search with current model...");
        match self.training_search(game_name, domain, model).await {
            Ok(results) => results,
            Err(Error::QuotaDeclined) => {
                self.io.say("Search skipped (quota charge declined)");
                Vec::new()
            }
            Err(e) => {
                self.io.say(&format!("Search failed: {}", e));
                Vec::new()
            }
        }
    }

    async fn flag_result(
        &mut self,
        results: &[ScoredCandidate],
        model: &mut SearchModel,
    ) -> Result<bool> {
        if results.is_empty() {
            self.io.say("No results to flag. Try refreshing the search.");
            return Ok(false);
        }

        let Some(index) = self
            .pick_index("Enter result number to flag: ", results.len())
            .await?
        else {
            return Ok(false);
        };

        let result = &results[index];
        self.io.say(&format!("\nFlagging: {}", result.candidate.title));
        let phrases = self
            .io
            .ask("Enter phrases that indicate irrelevance (comma-separated): ")
            .await?;

        let mut added = false;
        for phrase in phrases.split(',') {
            let phrase = phrase.trim();
            if !phrase.is_empty() {
                model.add_exclusion(phrase, false);
                self.io.say(&format!("Added session exclusion: {}", phrase.to_lowercase()));
                added = true;
            }
        }
        Ok(added)
    }

    async fn mark_channel(
        &mut self,
        results: &[ScoredCandidate],
        model: &mut SearchModel,
        trusted: bool,
    ) -> Result<bool> {
        if results.is_empty() {
            self.io.say("No results to mark. Try refreshing the search.");
            return Ok(false);
        }

        // Offer only channels not already in the target class
        let channels: Vec<&str> = {
            let mut seen = std::collections::BTreeSet::new();
            results
                .iter()
                .map(|r| r.candidate.channel_title.as_str())
                .filter(|channel| {
                    let classified = if trusted {
                        model.trusted_channels.contains(*channel)
                    } else {
                        model.noise_channels.contains(*channel)
                    };
                    !classified && seen.insert(*channel)
                })
                .collect()
        };

        if channels.is_empty() {
            self.io.say("\nNo unclassified channels to mark.");
            return Ok(false);
        }

        self.io.say("\nAvailable channels to mark:");
        for (index, channel) in channels.iter().enumerate() {
            self.io.say(&format!("{}. {}", index + 1, channel));
        }

        let Some(index) = self
            .pick_index("Enter number to mark channel: ", channels.len())
            .await?
        else {
            return Ok(false);
        };

        let channel = channels[index];
        if trusted {
            model.add_trusted_channel(channel);
            self.io.say(&format!("Added trusted channel: {}", channel));
        } else {
            model.add_noise_channel(channel);
            self.io.say(&format!("Added noise channel: {}", channel));
        }
        // Channel trust is persistent state: save immediately
        self.store.save(model).await;
        Ok(true)
    }

    async fn add_exclusion(&mut self, model: &mut SearchModel, persistent: bool) -> Result<bool> {
        let prompt = if persistent {
            "Enter persistent pattern to exclude: "
        } else {
            "Enter game-specific phrase to exclude: "
        };
        let phrase = self.io.ask(prompt).await?;
        let phrase = phrase.trim();
        if phrase.is_empty() {
            return Ok(false);
        }

        model.add_exclusion(phrase, persistent);
        if persistent {
            self.io.say(&format!("Added persistent exclusion: {}", phrase.to_lowercase()));
            self.store.save(model).await;
        } else {
            self.io.say(&format!("Added session exclusion: {}", phrase.to_lowercase()));
        }
        Ok(true)
    }

    async fn remove_exclusion(&mut self, model: &mut SearchModel) -> Result<bool> {
        self.io.say("\nCurrent exclusions:");
        self.io.say(&format!(
            "Session-specific: {}",
            join_sorted(&model.session_exclusions)
        ));
        self.io.say(&format!(
            "Persistent: {}",
            join_sorted(&model.persistent_exclusions)
        ));

        let phrase = self.io.ask("Enter phrase to remove: ").await?;
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() || !model.get_all_exclusions().contains(&phrase) {
            self.io.say("No such exclusion");
            return Ok(false);
        }

        let persistent = model.persistent_exclusions.contains(&phrase);
        model.remove_exclusion(&phrase, persistent);
        self.io.say(&format!(
            "Removed {} exclusion: {}",
            if persistent { "persistent" } else { "session" },
            phrase
        ));
        if persistent {
            self.store.save(model).await;
        }
        Ok(true)
    }

    fn show_model_state(&self, model: &SearchModel) {
        self.io.say("\nCurrent Model State:");
        self.io.say(&format!(
            "Session-specific exclusions: {}",
            join_sorted(&model.session_exclusions)
        ));
        self.io.say(&format!(
            "Persistent exclusions: {}",
            join_sorted(&model.persistent_exclusions)
        ));
        self.io.say(&format!(
            "Trusted channels: {}",
            join_sorted(&model.trusted_channels)
        ));
        self.io.say(&format!(
            "Noise channels: {}",
            join_sorted(&model.noise_channels)
        ));
        let weights = &model.scoring_weights;
        self.io.say("Scoring weights:");
        self.io.say(&format!("  title_match: {}", weights.title_match));
        self.io.say(&format!("  view_count: {}", weights.view_count));
        self.io.say(&format!("  like_ratio: {}", weights.like_ratio));
        self.io.say(&format!("  trusted_channel: {}", weights.trusted_channel));
        self.io.say(&format!("  noise_channel: {}", weights.noise_channel));
        self.io.say(&format!("  duration_match: {}", weights.duration_match));
        self.io.say(&format!("  context_match: {}", weights.context_match));
        self.io.say(&format!("  recency: {}", weights.recency));
    }

    /// One-based selection prompt. Malformed or out-of-range input reports
    /// and returns None; it never aborts the loop.
    async fn pick_index(&self, prompt: &str, len: usize) -> Result<Option<usize>> {
        let answer = self.io.ask(prompt).await?;
        match answer.trim().parse::<usize>() {
            Ok(n) if n >= 1 && n <= len => Ok(Some(n - 1)),
            Ok(_) => {
                self.io.say("Invalid number");
                Ok(None)
            }
            Err(_) => {
                self.io.say("Invalid input. Please enter a number.");
                Ok(None)
            }
        }
    }
}

fn join_sorted(set: &std::collections::BTreeSet<String>) -> String {
    if set.is_empty() {
        "(none)".to_string()
    } else {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}
