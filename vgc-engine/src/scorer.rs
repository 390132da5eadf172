//! Relevance scorer
//!
//! Pure, additive scoring of one candidate against a domain's learned
//! model. No I/O; repeated calls with identical inputs yield identical
//! scores. The result can be negative (a noise-channel penalty with no
//! offsetting factors).

use crate::model::SearchModel;
use chrono::{DateTime, Utc};
use vgc_common::{Candidate, Category, Domain};

/// Score a candidate for relevance to `game_name` within `domain`.
pub fn score(candidate: &Candidate, model: &SearchModel, domain: Domain, game_name: &str) -> i64 {
    score_at(candidate, model, domain, game_name, Utc::now())
}

/// Scoring with an explicit clock, so tests can pin `now`.
pub fn score_at(
    candidate: &Candidate,
    model: &SearchModel,
    domain: Domain,
    game_name: &str,
    now: DateTime<Utc>,
) -> i64 {
    let weights = &model.scoring_weights;
    let mut score = 0i64;

    // Title match: game name as a whole word, case-insensitive
    if contains_whole_word(&candidate.title, game_name) {
        score += weights.title_match;
    }

    // View count: one point per thousand views, capped
    if let Some(views) = candidate.view_count() {
        if views > 1000 {
            score += weights.view_count.min((views / 1000) as i64);
        }
    }

    // Like ratio: percentage of views that are likes, capped
    if let (Some(views), Some(likes)) = (candidate.view_count(), candidate.like_count()) {
        if views > 0 {
            let ratio_points = ((likes as f64 / views as f64) * 100.0) as i64;
            score += weights.like_ratio.min(ratio_points);
        }
    }

    // Channel trust classification; the sets are disjoint, so at most one
    // branch fires
    if model.trusted_channels.contains(&candidate.channel_title) {
        score += weights.trusted_channel;
    } else if model.noise_channels.contains(&candidate.channel_title) {
        score += weights.noise_channel;
    }

    // Duration fit against the range of the category the title suggests.
    // The category is inferred from title keywords rather than taken from
    // the query that produced the candidate; ambiguous titles can land in
    // the wrong range.
    if let Some(minutes) = candidate.duration_minutes() {
        if let Some(category) = infer_category(&candidate.title) {
            if let Some(range) = model.duration_ranges.get(&category) {
                if range.contains(minutes) {
                    score += weights.duration_match;
                }
            }
        }
    }

    // Context match: description mentions "<domain> game"
    if candidate
        .description
        .to_lowercase()
        .contains(&domain.context_phrase())
    {
        score += weights.context_match;
    }

    // Recency: bonus decays over the first year, nothing after.
    // Unparseable timestamps contribute zero.
    if let Some(published) = &candidate.published_at {
        if let Ok(published) = DateTime::parse_from_rfc3339(published) {
            let age_days = (now - published.with_timezone(&Utc)).num_days();
            if (0..365).contains(&age_days) {
                let recency_points = (365 - age_days) / 36;
                score += weights.recency.min(recency_points).max(0);
            }
        }
    }

    score
}

/// Infer the intent category from title keywords.
fn infer_category(title: &str) -> Option<Category> {
    let title = title.to_lowercase();
    if title.contains("how to play") {
        Some(Category::HowToPlay)
    } else if title.contains("review") {
        Some(Category::Review)
    } else if title.contains("playthrough") || title.contains("gameplay") {
        Some(Category::Playthrough)
    } else {
        None
    }
}

/// Case-insensitive whole-word substring search: the needle must not be
/// bordered by alphanumeric characters on either side.
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let haystack = haystack.to_lowercase();
    let needle = needle.to_lowercase();

    for (start, matched) in haystack.match_indices(&needle) {
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[start + matched.len()..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use vgc_common::CandidateKind;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn candidate(title: &str) -> Candidate {
        Candidate {
            id: "vid1".to_string(),
            kind: CandidateKind::Video {
                duration_minutes: None,
                view_count: None,
                like_count: None,
            },
            title: title.to_string(),
            channel_title: "Some Channel".to_string(),
            published_at: None,
            description: String::new(),
            url: "https://example.invalid/vid1".to_string(),
        }
    }

    fn with_stats(mut c: Candidate, views: u64, likes: u64, minutes: Option<u32>) -> Candidate {
        c.kind = CandidateKind::Video {
            duration_minutes: minutes,
            view_count: Some(views),
            like_count: Some(likes),
        };
        c
    }

    #[test]
    fn test_title_whole_word_match() {
        let model = SearchModel::new(Domain::Board);
        let hit = candidate("Catan review and strategy");
        let miss = candidate("Catanzaro travel vlog");

        let hit_score = score_at(&hit, &model, Domain::Board, "Catan", fixed_now());
        let miss_score = score_at(&miss, &model, Domain::Board, "Catan", fixed_now());

        assert!(hit_score >= model.scoring_weights.title_match);
        assert_eq!(miss_score, 0);
    }

    #[test]
    fn test_title_match_case_insensitive() {
        let model = SearchModel::new(Domain::Board);
        let c = candidate("CATAN unboxed");
        assert_eq!(
            score_at(&c, &model, Domain::Board, "catan", fixed_now()),
            model.scoring_weights.title_match
        );
    }

    #[test]
    fn test_view_count_capped_and_gated() {
        let model = SearchModel::new(Domain::Board);

        // Below the 1000-view floor: no contribution
        let few = with_stats(candidate("other"), 500, 0, None);
        assert_eq!(score_at(&few, &model, Domain::Board, "Catan", fixed_now()), 0);

        // 5000 views → 5 points
        let some = with_stats(candidate("other"), 5000, 0, None);
        assert_eq!(score_at(&some, &model, Domain::Board, "Catan", fixed_now()), 5);

        // 2 million views → capped at the weight
        let many = with_stats(candidate("other"), 2_000_000, 0, None);
        assert_eq!(
            score_at(&many, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.view_count
        );
    }

    #[test]
    fn test_view_count_monotonic() {
        let model = SearchModel::new(Domain::Board);
        let low = with_stats(candidate("x"), 500, 0, None);
        let high = with_stats(candidate("x"), 5000, 0, None);
        assert!(
            score_at(&high, &model, Domain::Board, "Catan", fixed_now())
                >= score_at(&low, &model, Domain::Board, "Catan", fixed_now())
        );
    }

    #[test]
    fn test_like_ratio_capped() {
        let model = SearchModel::new(Domain::Board);

        // 5% like ratio on 10k views → 10 (views) + 5 (ratio)
        let c = with_stats(candidate("x"), 10_000, 500, None);
        assert_eq!(score_at(&c, &model, Domain::Board, "Catan", fixed_now()), 15);

        // 50% ratio capped at the weight
        let c = with_stats(candidate("x"), 10_000, 5_000, None);
        assert_eq!(
            score_at(&c, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.view_count + model.scoring_weights.like_ratio
        );
    }

    #[test]
    fn test_channel_trust_and_noise() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_trusted_channel("Good Channel");
        model.add_noise_channel("Bad Channel");

        let mut trusted = candidate("x");
        trusted.channel_title = "Good Channel".to_string();
        let mut noise = candidate("x");
        noise.channel_title = "Bad Channel".to_string();

        assert_eq!(
            score_at(&trusted, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.trusted_channel
        );
        assert_eq!(
            score_at(&noise, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.noise_channel
        );
    }

    #[test]
    fn test_score_can_be_negative() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_noise_channel("Bad Channel");
        let mut c = candidate("unrelated");
        c.channel_title = "Bad Channel".to_string();
        assert!(score_at(&c, &model, Domain::Board, "Catan", fixed_now()) < 0);
    }

    #[test]
    fn test_duration_fit_uses_title_inferred_category() {
        let model = SearchModel::new(Domain::Board);

        // "how to play" title, 12 minutes: inside the 5-20 tutorial range
        let fit = with_stats(candidate("Catan how to play"), 0, 0, Some(12));
        let unfit = with_stats(candidate("Catan how to play"), 0, 0, Some(45));

        let fit_score = score_at(&fit, &model, Domain::Board, "Catan", fixed_now());
        let unfit_score = score_at(&unfit, &model, Domain::Board, "Catan", fixed_now());
        assert_eq!(fit_score - unfit_score, model.scoring_weights.duration_match);
    }

    #[test]
    fn test_duration_open_ended_range() {
        let model = SearchModel::new(Domain::Board);
        let long = with_stats(candidate("Catan full playthrough"), 0, 0, Some(240));
        let short = with_stats(candidate("Catan full playthrough"), 0, 0, Some(10));

        let long_score = score_at(&long, &model, Domain::Board, "Catan", fixed_now());
        let short_score = score_at(&short, &model, Domain::Board, "Catan", fixed_now());
        assert_eq!(long_score - short_score, model.scoring_weights.duration_match);
    }

    #[test]
    fn test_context_match() {
        let model = SearchModel::new(Domain::Board);
        let mut c = candidate("unrelated title");
        c.description = "The best Board Game night ever".to_string();
        assert_eq!(
            score_at(&c, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.context_match
        );
        // Wrong domain phrase contributes nothing
        assert_eq!(score_at(&c, &model, Domain::Video, "Catan", fixed_now()), 0);
    }

    #[test]
    fn test_recency_decay() {
        let model = SearchModel::new(Domain::Board);

        // ~5 days old → (365-5)/36 = 10, at the cap
        let mut fresh = candidate("x");
        fresh.published_at = Some("2025-05-27T12:00:00Z".to_string());
        assert_eq!(
            score_at(&fresh, &model, Domain::Board, "Catan", fixed_now()),
            model.scoring_weights.recency
        );

        // ~300 days old → (365-300)/36 = 1
        let mut older = candidate("x");
        older.published_at = Some("2024-08-05T12:00:00Z".to_string());
        assert_eq!(score_at(&older, &model, Domain::Board, "Catan", fixed_now()), 1);

        // Over a year old → nothing
        let mut old = candidate("x");
        old.published_at = Some("2023-01-01T12:00:00Z".to_string());
        assert_eq!(score_at(&old, &model, Domain::Board, "Catan", fixed_now()), 0);
    }

    #[test]
    fn test_unparseable_timestamp_contributes_zero() {
        let model = SearchModel::new(Domain::Board);
        let mut c = candidate("x");
        c.published_at = Some("yesterday-ish".to_string());
        assert_eq!(score_at(&c, &model, Domain::Board, "Catan", fixed_now()), 0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let mut model = SearchModel::new(Domain::Board);
        model.add_trusted_channel("Some Channel");
        let c = with_stats(candidate("Catan review"), 12_000, 600, Some(15));

        let first = score_at(&c, &model, Domain::Board, "Catan", fixed_now());
        for _ in 0..10 {
            assert_eq!(score_at(&c, &model, Domain::Board, "Catan", fixed_now()), first);
        }
    }
}
