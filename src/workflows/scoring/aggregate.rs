use super::categories;
use super::config::WeightConfiguration;
use super::domain::{CategoryScore, ScoreCategory, ScoreResult};
use crate::workflows::intake::CanonicalRecord;

/// Runs every category scorer and folds the results with already-validated weights.
pub(crate) fn aggregate(record: &CanonicalRecord, weights: &WeightConfiguration) -> ScoreResult {
    let mut category_scores = Vec::with_capacity(ScoreCategory::ALL.len());
    let mut risk_flags = Vec::new();

    for category in ScoreCategory::ALL {
        let assessment = categories::assess(category, record);
        risk_flags.extend(assessment.flags.iter().map(|flag| flag.to_string()));
        category_scores.push(CategoryScore::new(
            category,
            assessment.score,
            weights.weight_for(category),
            assessment.factors,
        ));
    }

    let total: f64 = category_scores.iter().map(|score| score.weighted_score).sum();

    ScoreResult {
        idea_name: record.name.clone(),
        total_score: round_hundredth(total),
        category_scores,
        risk_flags,
        explanation: None,
    }
}

pub(crate) fn round_hundredth(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
