use tracing::debug;

use crate::types::{Category, ScoreSet};

/// Best-effort numeric parse for score cells. Accepts a comma as decimal
/// separator; anything unparsable becomes 0.
pub fn parse_score(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.replace(',', ".").parse::<f64>() {
        Ok(value) if value.is_finite() => Some(value),
        _ => {
            debug!(raw = trimmed, "non-numeric score coerced to 0");
            None
        }
    }
}

/// Rounds to two decimals, exact halves to even, so `check` agrees with
/// averages already stored in older ledgers.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Mean of the given values rounded to two decimals, 0.0 when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    round2(values.iter().sum::<f64>() / values.len() as f64)
}

/// Subtotals and overall averages. Straight means: every category and both
/// reviewers weigh the same.
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Mean over the fixed category set. Unset categories count as 0, and an
    /// empty set yields 0.0.
    pub fn subtotal(scores: &ScoreSet) -> f64 {
        if scores.is_empty() {
            return 0.0;
        }
        let values: Vec<f64> = Category::ALL
            .iter()
            .map(|category| scores.value_or_zero(*category))
            .collect();
        mean(&values)
    }

    pub fn overall(subtotal_a: f64, subtotal_b: f64) -> f64 {
        round2((subtotal_a + subtotal_b) / 2.0)
    }
}
