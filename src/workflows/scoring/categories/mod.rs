//! Six independent category scorers. Missing data always lands on the neutral midpoint.

pub(crate) mod competition;
pub(crate) mod execution;
pub(crate) mod impact;
pub(crate) mod market;
pub(crate) mod network;
pub(crate) mod risk;

use super::domain::{Factors, ScoreCategory};
use crate::workflows::intake::CanonicalRecord;

pub(crate) const NEUTRAL: f64 = 50.0;
pub(crate) const FLAG_THRESHOLD: f64 = 50.0;

/// A category score together with the sub-scores it was built from.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Assessment {
    pub score: f64,
    pub factors: Factors,
    pub flags: Vec<&'static str>,
}

impl Assessment {
    /// Combines `(factor, sub_score, share)` parts; shares of one category sum to 1.
    pub(crate) fn from_parts(parts: &[(&str, f64, f64)]) -> Self {
        let score = parts
            .iter()
            .map(|(_, sub_score, share)| sub_score * share)
            .sum::<f64>()
            .clamp(0.0, 100.0);
        let factors = parts
            .iter()
            .map(|(name, sub_score, _)| (name.to_string(), *sub_score))
            .collect();

        Self {
            score,
            factors,
            flags: Vec::new(),
        }
    }

    pub(crate) fn flag_below(mut self, sub_score: f64, flag: &'static str) -> Self {
        if sub_score < FLAG_THRESHOLD {
            self.flags.push(flag);
        }
        self
    }
}

pub(crate) fn assess(category: ScoreCategory, record: &CanonicalRecord) -> Assessment {
    match category {
        ScoreCategory::MarketBusinessModel => market::assess(record),
        ScoreCategory::CompetitiveLandscape => competition::assess(record),
        ScoreCategory::ExecutionTeam => execution::assess(record),
        ScoreCategory::RiskFactors => risk::assess(record),
        ScoreCategory::NetworkPlatformRisks => network::assess(record),
        ScoreCategory::SocialEnvironmentalImpact => impact::assess(record),
    }
}

/// 1 maps to 100 and 10 maps to 10; ratings outside the scale are treated as unusable.
pub(crate) fn inverted_rating(rating: u8) -> f64 {
    if (1..=10).contains(&rating) {
        100.0 - f64::from(rating - 1) * 10.0
    } else {
        NEUTRAL
    }
}

pub(crate) fn direct_rating(rating: u8) -> f64 {
    if (1..=10).contains(&rating) {
        f64::from(rating) * 10.0
    } else {
        NEUTRAL
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::workflows::intake::CanonicalRecord;

    pub(crate) fn blank() -> CanonicalRecord {
        CanonicalRecord {
            name: "Blank idea".to_string(),
            ..CanonicalRecord::default()
        }
    }
}
