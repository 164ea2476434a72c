use crate::leaderboard::domain::RatingLabel;

/// Buckets any raw score into a display tier.
///
/// Evaluated top-down, first match wins; each band is inclusive at its lower
/// bound (exactly 4.5 is HT1, exactly 3.0 is HT3). The ladder is deliberately
/// independent of the weighting math and classifies arbitrary scores, so a
/// single low-weighted aspect can still drop an otherwise strong entry a
/// bucket.
pub fn bucket_tier(score: f64) -> RatingLabel {
    if score >= 4.5 {
        RatingLabel::Ht1
    } else if score >= 4.0 {
        RatingLabel::Ht2
    } else if score >= 3.0 {
        RatingLabel::Ht3
    } else if score >= 2.0 {
        RatingLabel::Ht4
    } else {
        RatingLabel::Lt5
    }
}
