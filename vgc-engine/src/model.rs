//! Learned relevance model
//!
//! One `SearchModel` per content domain holds everything the operator has
//! taught the engine: exclusion phrases (two tiers), channel trust
//! classifications, scoring weights, and per-category duration ranges.
//!
//! The two exclusion tiers are independent sets with a union accessor, not
//! a single set with markers: persistent exclusions survive restarts,
//! session exclusions are scoped to the current target game and are never
//! written to storage.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use vgc_common::{Category, Domain};

/// Named weights for each scoring factor. All additive; `noise_channel` is
/// negative so noise membership penalizes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub title_match: i64,
    pub view_count: i64,
    pub like_ratio: i64,
    pub trusted_channel: i64,
    pub noise_channel: i64,
    pub duration_match: i64,
    pub context_match: i64,
    pub recency: i64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title_match: 20,
            view_count: 10,
            like_ratio: 15,
            trusted_channel: 15,
            noise_channel: -10,
            duration_match: 10,
            context_match: 15,
            recency: 10,
        }
    }
}

/// Minute bounds for a category's ideal duration. `max: None` is
/// open-ended: any duration at or above `min` fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationRange {
    pub min: u32,
    pub max: Option<u32>,
}

impl DurationRange {
    pub fn contains(&self, minutes: u32) -> bool {
        minutes >= self.min && self.max.map_or(true, |max| minutes <= max)
    }
}

fn default_duration_ranges() -> BTreeMap<Category, DurationRange> {
    BTreeMap::from([
        (Category::HowToPlay, DurationRange { min: 5, max: Some(20) }),
        (Category::Review, DurationRange { min: 10, max: Some(30) }),
        (Category::Playthrough, DurationRange { min: 30, max: None }),
    ])
}

/// Per-domain learned relevance model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchModel {
    pub domain: Domain,

    /// Lowercase phrases excluded from every future search for this domain.
    pub persistent_exclusions: BTreeSet<String>,

    /// Lowercase phrases scoped to the current target game. Cleared when
    /// the target changes or the process restarts; never persisted.
    #[serde(skip)]
    pub session_exclusions: BTreeSet<String>,

    /// Channels whose results get a scoring bonus and are pinned into
    /// queries. Disjoint from `noise_channels` at all times.
    pub trusted_channels: BTreeSet<String>,

    /// Channels whose results are dropped before scoring.
    pub noise_channels: BTreeSet<String>,

    pub scoring_weights: ScoringWeights,

    #[serde(default = "default_duration_ranges")]
    pub duration_ranges: BTreeMap<Category, DurationRange>,
}

impl SearchModel {
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            persistent_exclusions: BTreeSet::new(),
            session_exclusions: BTreeSet::new(),
            trusted_channels: BTreeSet::new(),
            noise_channels: BTreeSet::new(),
            scoring_weights: ScoringWeights::default(),
            duration_ranges: default_duration_ranges(),
        }
    }

    /// Add an exclusion phrase, normalized to lowercase.
    pub fn add_exclusion(&mut self, phrase: &str, persistent: bool) {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return;
        }
        if persistent {
            self.persistent_exclusions.insert(phrase);
        } else {
            self.session_exclusions.insert(phrase);
        }
    }

    /// Remove an exclusion phrase from the named tier. Removing a phrase
    /// that is not present is a no-op.
    pub fn remove_exclusion(&mut self, phrase: &str, persistent: bool) {
        let phrase = phrase.trim().to_lowercase();
        if persistent {
            self.persistent_exclusions.remove(&phrase);
        } else {
            self.session_exclusions.remove(&phrase);
        }
    }

    /// Union of persistent and session exclusions. A phrase may appear in
    /// both tiers transiently; callers must not assume disjointness.
    pub fn get_all_exclusions(&self) -> BTreeSet<String> {
        self.persistent_exclusions
            .union(&self.session_exclusions)
            .cloned()
            .collect()
    }

    pub fn clear_session_exclusions(&mut self) {
        self.session_exclusions.clear();
    }

    /// Mark a channel trusted, evicting it from the noise set if present.
    pub fn add_trusted_channel(&mut self, channel: &str) {
        self.noise_channels.remove(channel);
        self.trusted_channels.insert(channel.to_string());
    }

    /// Mark a channel as noise, evicting it from the trusted set if present.
    pub fn add_noise_channel(&mut self, channel: &str) {
        self.trusted_channels.remove(channel);
        self.noise_channels.insert(channel.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusion_add_remove_round_trip() {
        let mut model = SearchModel::new(Domain::Board);
        let before = model.get_all_exclusions();

        model.add_exclusion("Unboxing Only", true);
        assert!(model.get_all_exclusions().contains("unboxing only"));

        model.remove_exclusion("unboxing only", true);
        assert_eq!(model.get_all_exclusions(), before);
    }

    #[test]
    fn test_exclusions_normalize_to_lowercase() {
        let mut model = SearchModel::new(Domain::Video);
        model.add_exclusion("  Reaction VIDEO ", false);
        assert!(model.session_exclusions.contains("reaction video"));
        assert!(model.persistent_exclusions.is_empty());
    }

    #[test]
    fn test_all_exclusions_is_union_of_tiers() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_exclusion("price guide", true);
        model.add_exclusion("lot for sale", false);
        // Same phrase in both tiers appears once in the union
        model.add_exclusion("price guide", false);

        let all = model.get_all_exclusions();
        assert_eq!(all.len(), 2);
        assert!(all.contains("price guide"));
        assert!(all.contains("lot for sale"));
    }

    #[test]
    fn test_clear_session_keeps_persistent() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_exclusion("manufacturing", true);
        model.add_exclusion("dice tower tour", false);

        model.clear_session_exclusions();

        assert!(model.session_exclusions.is_empty());
        assert!(model.persistent_exclusions.contains("manufacturing"));
    }

    #[test]
    fn test_trust_noise_mutual_eviction() {
        let mut model = SearchModel::new(Domain::Video);

        model.add_trusted_channel("GameChannel");
        model.add_noise_channel("GameChannel");
        assert!(model.noise_channels.contains("GameChannel"));
        assert!(!model.trusted_channels.contains("GameChannel"));

        model.add_trusted_channel("GameChannel");
        assert!(model.trusted_channels.contains("GameChannel"));
        assert!(!model.noise_channels.contains("GameChannel"));
    }

    #[test]
    fn test_trust_noise_always_disjoint() {
        let mut model = SearchModel::new(Domain::Board);
        for name in ["A", "B", "C", "A", "B"] {
            model.add_trusted_channel(name);
        }
        for name in ["B", "C"] {
            model.add_noise_channel(name);
        }
        assert!(model.trusted_channels.is_disjoint(&model.noise_channels));
    }

    #[test]
    fn test_default_duration_ranges() {
        let model = SearchModel::new(Domain::Board);
        let how_to = model.duration_ranges[&Category::HowToPlay];
        assert!(how_to.contains(5) && how_to.contains(20));
        assert!(!how_to.contains(4) && !how_to.contains(21));

        // Open-ended playthrough range
        let play = model.duration_ranges[&Category::Playthrough];
        assert!(play.contains(30) && play.contains(300));
        assert!(!play.contains(29));
    }

    #[test]
    fn test_serde_skips_session_exclusions() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_exclusion("persistent one", true);
        model.add_exclusion("session one", false);
        model.add_trusted_channel("Rules Corner");

        let json = serde_json::to_string(&model).unwrap();
        let back: SearchModel = serde_json::from_str(&json).unwrap();

        assert!(back.persistent_exclusions.contains("persistent one"));
        assert!(back.session_exclusions.is_empty());
        assert!(back.trusted_channels.contains("Rules Corner"));
        assert_eq!(back.scoring_weights, model.scoring_weights);
    }
}
