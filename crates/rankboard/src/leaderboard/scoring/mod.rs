//! Weighted-scoring core: rating lookup, weighted average, explanation text,
//! and the display tier ladder.
//!
//! Everything here is a pure function over an entry's raw ratings and an
//! explicit [`ScoringConfig`]; there is no ambient state and no failure mode.
//! Malformed input always degrades to a default instead of erroring, so the
//! rest of the system can treat the computed score as total.

mod explanation;
mod tiers;

pub use explanation::build_explanation;
pub use tiers::bucket_tier;

use super::domain::{AspectRatings, Computed, RatingLabel, ScoringConfig};

/// Maps a raw rating label to its fixed numeric value.
///
/// Trims and uppercases before lookup. `None` means absent, a normal outcome
/// the calculator resolves with the configured default.
pub fn rating_to_value(raw: &str) -> Option<f64> {
    RatingLabel::parse(raw).map(|label| f64::from(label.value()))
}

/// Clamps the configured default aspect value into [1, 5]; non-finite input
/// coerces to 3.
pub fn clamp_default_value(value: f64) -> f64 {
    if !value.is_finite() {
        return 3.0;
    }
    value.clamp(1.0, 5.0)
}

fn safe_weight(weight: f64) -> f64 {
    if weight.is_finite() {
        weight
    } else {
        0.0
    }
}

/// The aspect iteration order: the configured list when non-empty, otherwise
/// the weight map's key set.
pub(crate) fn aspect_order(config: &ScoringConfig) -> Vec<&str> {
    if config.aspects.is_empty() {
        config
            .aspect_weights
            .keys()
            .map(String::as_str)
            .collect()
    } else {
        config.aspects.iter().map(String::as_str).collect()
    }
}

/// One aspect's resolved contribution, shared by the calculator and the
/// explanation builder so the two can never disagree.
pub(crate) struct AspectResolution<'a> {
    pub weight: f64,
    pub value: f64,
    /// Raw label string when it resolved to a known tier; `None` means the
    /// default value was substituted.
    pub label: Option<&'a str>,
}

pub(crate) fn resolve_aspect<'a>(
    aspect: &str,
    ratings: &'a AspectRatings,
    config: &ScoringConfig,
    default_value: f64,
) -> AspectResolution<'a> {
    let weight = safe_weight(config.aspect_weights.get(aspect).copied().unwrap_or(1.0));
    let raw = ratings.get(aspect).map(String::as_str);
    match raw.and_then(|raw| rating_to_value(raw).map(|value| (raw, value))) {
        Some((raw, value)) => AspectResolution {
            weight,
            value,
            label: Some(raw),
        },
        None => AspectResolution {
            weight,
            value: default_value,
            label: None,
        },
    }
}

/// Computes the weighted-average score (1.00-5.00, two decimals) and its
/// integer percent for an entry's ratings under the given config.
///
/// Aspects with weight `<= 0` (including non-finite weights) contribute to
/// neither the numerator nor the denominator; when every aspect is excluded
/// the score falls back to the clamped default value.
pub fn compute_computed(ratings: &AspectRatings, config: &ScoringConfig) -> Computed {
    let default_value = clamp_default_value(config.default_aspect_value);

    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;

    for aspect in aspect_order(config) {
        let resolved = resolve_aspect(aspect, ratings, config, default_value);
        if resolved.weight <= 0.0 {
            continue;
        }
        weighted_sum += resolved.value * resolved.weight;
        weight_sum += resolved.weight;
    }

    let raw = if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        default_value
    };

    let score = (raw * 100.0).round() / 100.0;
    let percent = ((score / 5.0) * 100.0).round() as u8;

    Computed { score, percent }
}
