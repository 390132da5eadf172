//! Query pattern library
//!
//! Static mapping from (domain, category) to an ordered list of query
//! templates. Each template contains one `{game}` placeholder substituted
//! with the target game name at expansion time. Read-only at runtime.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use vgc_common::{Category, Domain};

static SEARCH_PATTERNS: Lazy<BTreeMap<(Domain, Category), &'static [&'static str]>> =
    Lazy::new(|| {
        BTreeMap::from([
            (
                (Domain::Board, Category::HowToPlay),
                &[
                    "\"{game}\" \"how to play\"",
                    "\"{game}\" rules explanation",
                    "\"{game}\" tutorial board game",
                    "\"{game}\" learn to play",
                ][..],
            ),
            (
                (Domain::Board, Category::Review),
                &[
                    "\"{game}\" review board game",
                    "\"{game}\" review card game",
                    "\"{game}\" board game overview",
                    "\"{game}\" first impressions",
                ][..],
            ),
            (
                (Domain::Board, Category::Playthrough),
                &[
                    "\"{game}\" playthrough board game",
                    "\"{game}\" gameplay board game",
                    "\"{game}\" full game",
                    "\"{game}\" actual play",
                ][..],
            ),
            (
                (Domain::Video, Category::HowToPlay),
                &[
                    "\"{game}\" beginners guide",
                    "\"{game}\" tutorial",
                    "\"{game}\" getting started",
                    "\"{game}\" basics",
                ][..],
            ),
            (
                (Domain::Video, Category::Review),
                &[
                    "\"{game}\" review",
                    "\"{game}\" worth playing",
                    "\"{game}\" should you play",
                    "\"{game}\" before you buy",
                ][..],
            ),
            (
                (Domain::Video, Category::Playthrough),
                &[
                    "\"{game}\" full gameplay",
                    "\"{game}\" walkthrough no commentary",
                    "\"{game}\" longplay",
                    "\"{game}\" complete game",
                ][..],
            ),
        ])
    });

/// Ordered query templates for a (domain, category) pair.
pub fn templates(domain: Domain, category: Category) -> &'static [&'static str] {
    SEARCH_PATTERNS
        .get(&(domain, category))
        .copied()
        .unwrap_or(&[])
}

/// Substitute the target game name into a template.
pub fn expand(template: &str, game_name: &str) -> String {
    template.replace("{game}", game_name)
}
