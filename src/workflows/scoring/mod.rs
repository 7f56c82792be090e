//! Multi-criteria scoring: six category scorers folded into a weighted total.

mod aggregate;
mod categories;
mod config;
pub mod domain;
mod explain;
mod keywords;
mod summary;

pub use categories::execution::unit_economics_score;
pub use categories::market::market_size_score;
pub use categories::network::{MARKETPLACE_CHALLENGE, NETWORK_EFFECT_DEPENDENCY};
pub use categories::risk::{HIGH_REGULATORY_RISK, PUBLIC_SECTOR_COMPLEXITY};
pub use config::{validate_weights, WeightConfiguration, WeightError};
pub use domain::{CategoryScore, Factors, ScoreCategory, ScoreResult};
pub use explain::{
    explain_with_fallback, fallback_summary, DisabledExplainer, ExplanationError, Explainer,
    SummaryExplainer,
};
pub use summary::ScoreSummary;

use crate::workflows::intake::CanonicalRecord;
use rayon::prelude::*;
use tracing::info;

/// Stateless scorer bound to one validated weight configuration.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: WeightConfiguration,
}

impl ScoringEngine {
    pub fn new(weights: WeightConfiguration) -> Result<Self, WeightError> {
        Ok(Self {
            weights: weights.validated()?,
        })
    }

    pub fn weights(&self) -> &WeightConfiguration {
        &self.weights
    }

    pub fn score(&self, record: &CanonicalRecord) -> ScoreResult {
        aggregate::aggregate(record, &self.weights)
    }

    /// One result per record, in input order.
    pub fn score_batch(&self, records: &[CanonicalRecord]) -> Vec<ScoreResult> {
        let results: Vec<ScoreResult> = records
            .par_iter()
            .map(|record| self.score(record))
            .collect();
        info!(count = results.len(), weights = ?self.weights.to_array(), "batch scored");
        results
    }
}

/// Validates `weights` and scores the batch.
pub fn score_batch(
    records: &[CanonicalRecord],
    weights: &WeightConfiguration,
) -> Result<Vec<ScoreResult>, WeightError> {
    Ok(ScoringEngine::new(*weights)?.score_batch(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_record() -> CanonicalRecord {
        CanonicalRecord {
            name: "Ledgerly".to_string(),
            industry: "saas".to_string(),
            business_model: "subscription".to_string(),
            market_size_tam: Some(500.0),
            competition_level: Some(3),
            founding_team_experience: Some(8),
            product_complexity: Some(2),
            regulatory_risk: Some(2),
            estimated_ltv: Some(300.0),
            estimated_cac: Some(50.0),
            has_network_effects: Some(false),
            ..CanonicalRecord::default()
        }
    }

    #[test]
    fn strong_subscription_idea_scores_above_seventy_without_flags() {
        let engine = ScoringEngine::new(WeightConfiguration::default()).expect("valid weights");
        let result = engine.score(&reference_record());
        assert!(result.total_score > 70.0, "got {}", result.total_score);
        assert_eq!(result.total_score, 77.31);
        assert!(result.risk_flags.is_empty());
    }

    #[test]
    fn high_numeric_regulatory_risk_is_flagged() {
        let engine = ScoringEngine::new(WeightConfiguration::default()).expect("valid weights");
        let record = CanonicalRecord {
            regulatory_risk: Some(9),
            ..CanonicalRecord::default()
        };
        let result = engine.score(&record);
        let risk = result
            .category(ScoreCategory::RiskFactors)
            .expect("risk category present");
        assert!(risk.factors["regulatory_risk"] < 50.0);
        assert_eq!(result.risk_flags, vec![HIGH_REGULATORY_RISK.to_string()]);
    }

    #[test]
    fn engine_rejects_invalid_weights_before_scoring() {
        let weights = WeightConfiguration::from_array([50.0, 15.0, 20.0, 10.0, 10.0, 10.0]);
        assert_eq!(
            ScoringEngine::new(weights).expect_err("sum rejected"),
            WeightError::Sum { actual: 115.0 }
        );
        assert!(score_batch(&[reference_record()], &weights).is_err());
    }

    #[test]
    fn batch_preserves_input_order() {
        let mut second = reference_record();
        second.name = "Second".to_string();
        let mut third = CanonicalRecord::default();
        third.name = "Third".to_string();

        let results = score_batch(
            &[reference_record(), second, third],
            &WeightConfiguration::default(),
        )
        .expect("valid weights");
        let names: Vec<&str> = results.iter().map(|r| r.idea_name.as_str()).collect();
        assert_eq!(names, vec!["Ledgerly", "Second", "Third"]);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("log buffer poisoned").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn batch_scoring_is_logged_at_info() {
        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let engine = ScoringEngine::new(WeightConfiguration::default()).expect("valid weights");
        tracing::subscriber::with_default(subscriber, || {
            engine.score_batch(&[reference_record()]);
        });

        let output = String::from_utf8(captured.0.lock().expect("log buffer poisoned").clone())
            .expect("utf8 log output");
        assert!(output.contains("INFO"), "{output}");
        assert!(output.contains("batch scored"), "{output}");
        assert!(output.contains("count=1"), "{output}");
    }
}
