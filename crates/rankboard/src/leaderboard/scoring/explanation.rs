use super::{aspect_order, clamp_default_value, resolve_aspect};
use crate::leaderboard::domain::{AspectRatings, ScoringConfig};

/// Builds the human-readable audit trail for an entry's score.
///
/// Uses the exact per-aspect resolution the calculator uses, so the text and
/// the stored number always agree. Every configured aspect gets a line, even
/// ones a zero weight excludes from the average.
pub fn build_explanation(ratings: &AspectRatings, config: &ScoringConfig) -> String {
    let default_value = clamp_default_value(config.default_aspect_value);

    let lines: Vec<String> = aspect_order(config)
        .into_iter()
        .map(|aspect| {
            let resolved = resolve_aspect(aspect, ratings, config, default_value);
            let source = match resolved.label {
                Some(label) => label.to_string(),
                None => format!("default {default_value}"),
            };
            format!(
                "{}: {} → {} (w={})",
                aspect, source, resolved.value, resolved.weight
            )
        })
        .collect();

    format!(
        "Overall score = weighted average of aspect values. \
         Mapping: HT1=5, HT2=4, HT3=3, HT4=2, LT5=1. \
         Missing ratings use defaultAspectValue={default_value}.\n\n{}",
        lines.join("\n")
    )
}
