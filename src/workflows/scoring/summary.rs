use super::domain::ScoreResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BUCKETS: [(&str, f64); 5] = [
    ("0-20", 20.0),
    ("21-40", 40.0),
    ("41-60", 60.0),
    ("61-80", 80.0),
    ("81-100", f64::INFINITY),
];

/// Portfolio-level statistics over a batch of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub count: usize,
    pub average_score: f64,
    pub highest_score: f64,
    pub lowest_score: f64,
    pub distribution: BTreeMap<String, usize>,
}

impl ScoreSummary {
    pub fn from_results(results: &[ScoreResult]) -> Self {
        let mut distribution: BTreeMap<String, usize> = BUCKETS
            .iter()
            .map(|(label, _)| (label.to_string(), 0))
            .collect();

        if results.is_empty() {
            return Self {
                count: 0,
                average_score: 0.0,
                highest_score: 0.0,
                lowest_score: 0.0,
                distribution,
            };
        }

        let scores: Vec<f64> = results.iter().map(|result| result.total_score).collect();
        for score in &scores {
            *distribution
                .entry(bucket_for(*score).to_string())
                .or_default() += 1;
        }

        let total: f64 = scores.iter().sum();
        Self {
            count: scores.len(),
            average_score: total / scores.len() as f64,
            highest_score: scores.iter().copied().fold(f64::MIN, f64::max),
            lowest_score: scores.iter().copied().fold(f64::MAX, f64::min),
            distribution,
        }
    }
}

/// Upper bounds are inclusive, so 20.0 is in `0-20` and 20.01 is in `21-40`.
fn bucket_for(score: f64) -> &'static str {
    BUCKETS
        .iter()
        .find(|(_, upper)| score <= *upper)
        .map(|(label, _)| *label)
        .unwrap_or("81-100")
}
