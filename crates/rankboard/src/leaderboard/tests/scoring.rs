use std::collections::BTreeMap;

use super::common::{equal_weight_config, ratings};
use crate::leaderboard::domain::{RatingLabel, ScoringConfig};
use crate::leaderboard::scoring::{
    bucket_tier, build_explanation, compute_computed, rating_to_value,
};

#[test]
fn rating_table_round_trips_case_insensitively() {
    let table = [
        ("HT1", 5.0),
        ("HT2", 4.0),
        ("HT3", 3.0),
        ("HT4", 2.0),
        ("LT5", 1.0),
    ];

    for (label, value) in table {
        assert_eq!(rating_to_value(label), Some(value));
        assert_eq!(rating_to_value(&label.to_lowercase()), Some(value));
        assert_eq!(rating_to_value(&format!("  {label}  ")), Some(value));
        assert_eq!(rating_to_value(&format!(" {} ", label.to_lowercase())), Some(value));
    }

    assert_eq!(rating_to_value(""), None);
    assert_eq!(rating_to_value("   "), None);
    assert_eq!(rating_to_value("HT9"), None);
    assert_eq!(rating_to_value("S-tier"), None);
    assert_eq!(rating_to_value("HT 1"), None);
}

#[test]
fn equal_weights_average_best_and_worst_to_middle() {
    let config = equal_weight_config();
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "LT5")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 3.00);
    assert_eq!(computed.percent, 60);
}

#[test]
fn missing_aspect_falls_back_to_default_value() {
    let config = equal_weight_config();
    let aspects = ratings(&[("Movement", "HT1")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 4.00);
    assert_eq!(computed.percent, 80);
}

#[test]
fn unrecognized_label_scores_like_a_missing_one() {
    let config = equal_weight_config();
    let with_junk = ratings(&[("Movement", "HT1"), ("Attack", "garbage")]);
    let with_missing = ratings(&[("Movement", "HT1")]);

    assert_eq!(
        compute_computed(&with_junk, &config),
        compute_computed(&with_missing, &config)
    );
}

#[test]
fn zero_weight_aspect_contributes_nothing() {
    let mut config = equal_weight_config();
    config.aspect_weights.insert("Attack".to_string(), 0.0);
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "LT5")]);

    let computed = compute_computed(&aspects, &config);

    // Attack is excluded from numerator and denominator alike.
    assert_eq!(computed.score, 5.00);
    assert_eq!(computed.percent, 100);
}

#[test]
fn negative_and_non_finite_weights_are_excluded() {
    let mut config = equal_weight_config();
    config.aspect_weights.insert("Attack".to_string(), -2.0);
    config
        .aspects
        .push("Phantom".to_string());
    config.aspect_weights.insert("Phantom".to_string(), f64::NAN);
    let aspects = ratings(&[("Movement", "HT2"), ("Attack", "HT1"), ("Phantom", "HT1")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 4.00);
    assert_eq!(computed.percent, 80);
}

#[test]
fn all_zero_weights_fall_back_to_the_default_value() {
    let mut config = equal_weight_config();
    config.aspect_weights.insert("Movement".to_string(), 0.0);
    config.aspect_weights.insert("Attack".to_string(), 0.0);
    config.default_aspect_value = 4.2;
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "HT1")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 4.2);
    assert_eq!(computed.percent, 84);
}

#[test]
fn missing_weight_defaults_to_one() {
    let config = ScoringConfig {
        aspects: vec!["Movement".to_string(), "Attack".to_string()],
        aspect_weights: BTreeMap::new(),
        default_aspect_value: 3.0,
    };
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "HT3")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 4.00);
    assert_eq!(computed.percent, 80);
}

#[test]
fn empty_aspect_list_iterates_the_weight_keys() {
    let mut aspect_weights = BTreeMap::new();
    aspect_weights.insert("Attack".to_string(), 1.0);
    let config = ScoringConfig {
        aspects: Vec::new(),
        aspect_weights,
        default_aspect_value: 3.0,
    };
    let aspects = ratings(&[("Attack", "HT2")]);

    let computed = compute_computed(&aspects, &config);

    assert_eq!(computed.score, 4.00);
    assert_eq!(computed.percent, 80);
}

#[test]
fn empty_config_scores_the_default_value() {
    let config = ScoringConfig::default();
    let computed = compute_computed(&ratings(&[]), &config);

    assert_eq!(computed.score, 3.00);
    assert_eq!(computed.percent, 60);
}

#[test]
fn non_finite_default_value_coerces_to_three() {
    let mut config = equal_weight_config();
    config.default_aspect_value = f64::NAN;

    let computed = compute_computed(&ratings(&[]), &config);

    assert_eq!(computed.score, 3.00);
    assert_eq!(computed.percent, 60);
}

#[test]
fn default_value_is_clamped_into_the_rating_range() {
    let mut config = equal_weight_config();

    config.default_aspect_value = 9.0;
    assert_eq!(compute_computed(&ratings(&[]), &config).score, 5.00);

    config.default_aspect_value = -2.0;
    assert_eq!(compute_computed(&ratings(&[]), &config).score, 1.00);
}

#[test]
fn scores_round_to_two_decimals() {
    let mut config = equal_weight_config();
    config.aspect_weights.insert("Movement".to_string(), 2.0);
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "LT5")]);

    let computed = compute_computed(&aspects, &config);

    // (5*2 + 1*1) / 3 = 3.666..., rounded half away from zero.
    assert_eq!(computed.score, 3.67);
    assert_eq!(computed.percent, 73);
}

#[test]
fn recomputation_is_idempotent() {
    let config = equal_weight_config();
    let aspects = ratings(&[("Movement", "HT2"), ("Attack", "HT4")]);

    let first = compute_computed(&aspects, &config);
    let second = compute_computed(&aspects, &config);

    assert_eq!(first, second);
}

#[test]
fn tier_boundaries_are_inclusive_at_the_lower_bound() {
    assert_eq!(bucket_tier(4.5), RatingLabel::Ht1);
    assert_eq!(bucket_tier(4.0), RatingLabel::Ht2);
    assert_eq!(bucket_tier(3.0), RatingLabel::Ht3);
    assert_eq!(bucket_tier(2.0), RatingLabel::Ht4);
    assert_eq!(bucket_tier(1.99), RatingLabel::Lt5);
}

#[test]
fn tier_ladder_classifies_arbitrary_scores() {
    assert_eq!(bucket_tier(5.0), RatingLabel::Ht1);
    assert_eq!(bucket_tier(4.49), RatingLabel::Ht2);
    assert_eq!(bucket_tier(3.99), RatingLabel::Ht3);
    assert_eq!(bucket_tier(2.5), RatingLabel::Ht4);
    assert_eq!(bucket_tier(0.0), RatingLabel::Lt5);
}

#[test]
fn explanation_lists_every_configured_aspect() {
    let mut config = equal_weight_config();
    config.aspect_weights.insert("Movement".to_string(), 1.5);
    config.aspect_weights.insert("Attack".to_string(), 0.0);
    let aspects = ratings(&[("Movement", "HT1"), ("Attack", "LT5")]);

    let explanation = build_explanation(&aspects, &config);

    assert!(explanation.starts_with("Overall score = weighted average of aspect values."));
    assert!(explanation.contains("Mapping: HT1=5, HT2=4, HT3=3, HT4=2, LT5=1."));
    assert!(explanation.contains("Missing ratings use defaultAspectValue=3."));
    assert!(explanation.contains("Movement: HT1 → 5 (w=1.5)"));
    // Zero-weight aspects still get a line even though they are excluded
    // from the average.
    assert!(explanation.contains("Attack: LT5 → 1 (w=0)"));
}

#[test]
fn explanation_marks_substituted_defaults() {
    let config = equal_weight_config();
    let aspects = ratings(&[("Movement", "HT1")]);

    let explanation = build_explanation(&aspects, &config);

    assert!(explanation.contains("Movement: HT1 → 5 (w=1)"));
    assert!(explanation.contains("Attack: default 3 → 3 (w=1)"));
}

#[test]
fn explanation_preserves_the_raw_label_casing() {
    let config = equal_weight_config();
    let aspects = ratings(&[("Movement", " ht1 "), ("Attack", "HT3")]);

    let explanation = build_explanation(&aspects, &config);

    // The raw string is echoed as the source; only the lookup normalizes.
    assert!(explanation.contains("Movement:  ht1  → 5 (w=1)"));
}
