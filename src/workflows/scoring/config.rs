use super::domain::ScoreCategory;
use serde::{Deserialize, Serialize};

const SUM_TOLERANCE_LOW: f64 = 99.5;
const SUM_TOLERANCE_HIGH: f64 = 100.5;

/// Percentage weight of every category. Values are kept rounded to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWeights")]
pub struct WeightConfiguration {
    pub market_business_model: f64,
    pub competitive_landscape: f64,
    pub execution_team: f64,
    pub risk_factors: f64,
    pub network_platform_risks: f64,
    pub social_environmental_impact: f64,
}

impl Default for WeightConfiguration {
    fn default() -> Self {
        Self::from_array([35.0, 15.0, 20.0, 10.0, 10.0, 10.0])
    }
}

impl WeightConfiguration {
    /// Values in `ScoreCategory::ALL` order.
    pub fn from_array(values: [f64; 6]) -> Self {
        let [market, competition, execution, risk, network, impact] = values.map(round_tenth);
        Self {
            market_business_model: market,
            competitive_landscape: competition,
            execution_team: execution,
            risk_factors: risk,
            network_platform_risks: network,
            social_environmental_impact: impact,
        }
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.market_business_model,
            self.competitive_landscape,
            self.execution_team,
            self.risk_factors,
            self.network_platform_risks,
            self.social_environmental_impact,
        ]
    }

    pub fn weight_for(&self, category: ScoreCategory) -> f64 {
        match category {
            ScoreCategory::MarketBusinessModel => self.market_business_model,
            ScoreCategory::CompetitiveLandscape => self.competitive_landscape,
            ScoreCategory::ExecutionTeam => self.execution_team,
            ScoreCategory::RiskFactors => self.risk_factors,
            ScoreCategory::NetworkPlatformRisks => self.network_platform_risks,
            ScoreCategory::SocialEnvironmentalImpact => self.social_environmental_impact,
        }
    }

    pub fn total(&self) -> f64 {
        round_tenth(self.to_array().iter().sum())
    }

    pub fn validate(&self) -> Result<(), WeightError> {
        for category in ScoreCategory::ALL {
            let value = self.weight_for(category);
            if value < 0.0 || !value.is_finite() {
                return Err(WeightError::Negative { category, value });
            }
        }

        let actual = self.total();
        if (SUM_TOLERANCE_LOW..=SUM_TOLERANCE_HIGH).contains(&actual) {
            Ok(())
        } else {
            Err(WeightError::Sum { actual })
        }
    }

    pub fn validated(self) -> Result<Self, WeightError> {
        self.validate()?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WeightError {
    #[error("weight configuration must sum to 100 (current sum: {actual})")]
    Sum { actual: f64 },
    #[error("weight for {category} must be a non-negative number, got {value}")]
    Negative { category: ScoreCategory, value: f64 },
}

/// Contract check run before any scoring; weights are never renormalized.
pub fn validate_weights(weights: &WeightConfiguration) -> Result<(), WeightError> {
    weights.validate()
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Deserialize)]
struct RawWeights {
    #[serde(default = "defaults::market")]
    market_business_model: f64,
    #[serde(default = "defaults::competition")]
    competitive_landscape: f64,
    #[serde(default = "defaults::execution")]
    execution_team: f64,
    #[serde(default = "defaults::risk")]
    risk_factors: f64,
    #[serde(default = "defaults::network")]
    network_platform_risks: f64,
    #[serde(default = "defaults::impact")]
    social_environmental_impact: f64,
}

impl From<RawWeights> for WeightConfiguration {
    fn from(raw: RawWeights) -> Self {
        Self::from_array([
            raw.market_business_model,
            raw.competitive_landscape,
            raw.execution_team,
            raw.risk_factors,
            raw.network_platform_risks,
            raw.social_environmental_impact,
        ])
    }
}

mod defaults {
    pub(super) fn market() -> f64 {
        35.0
    }
    pub(super) fn competition() -> f64 {
        15.0
    }
    pub(super) fn execution() -> f64 {
        20.0
    }
    pub(super) fn risk() -> f64 {
        10.0
    }
    pub(super) fn network() -> f64 {
        10.0
    }
    pub(super) fn impact() -> f64 {
        10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn with_impact(impact: f64) -> WeightConfiguration {
        WeightConfiguration::from_array([35.0, 15.0, 20.0, 10.0, 10.0, impact])
    }

    #[test]
    fn defaults_sum_to_one_hundred() {
        let weights = WeightConfiguration::default();
        assert_eq!(weights.total(), 100.0);
        assert!(validate_weights(&weights).is_ok());
    }

    #[test]
    fn tolerance_boundaries_are_inclusive() {
        assert!(validate_weights(&with_impact(9.5)).is_ok());
        assert!(validate_weights(&with_impact(10.5)).is_ok());
        assert_eq!(
            validate_weights(&with_impact(9.4)),
            Err(WeightError::Sum { actual: 99.4 })
        );
        assert_eq!(
            validate_weights(&with_impact(10.6)),
            Err(WeightError::Sum { actual: 100.6 })
        );
    }

    #[test]
    fn negative_weights_are_rejected_before_the_sum() {
        let weights = WeightConfiguration::from_array([45.0, 15.0, 20.0, 10.0, 20.0, -10.0]);
        assert_eq!(
            validate_weights(&weights),
            Err(WeightError::Negative {
                category: ScoreCategory::SocialEnvironmentalImpact,
                value: -10.0,
            })
        );
    }

    #[test]
    fn values_are_rounded_to_one_decimal() {
        let weights = WeightConfiguration::from_array([34.96, 15.04, 20.0, 10.0, 10.0, 10.0]);
        assert_eq!(weights.market_business_model, 35.0);
        assert_eq!(weights.competitive_landscape, 15.0);
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let weights: WeightConfiguration =
            serde_json::from_str(r#"{"market_business_model": 30.04, "social_environmental_impact": 15}"#)
                .expect("deserializes");
        assert_eq!(weights.market_business_model, 30.0);
        assert_eq!(weights.social_environmental_impact, 15.0);
        assert_eq!(weights.execution_team, 20.0);
        assert!(weights.validate().is_ok());
    }

    #[test]
    fn sum_error_reports_actual_total() {
        let error = with_impact(25.0).validated().expect_err("sum of 115 rejected");
        assert_eq!(error.to_string(), "weight configuration must sum to 100 (current sum: 115)");
    }

    proptest! {
        #[test]
        fn validation_agrees_with_the_rounded_sum(values in prop::array::uniform6(0.0f64..40.0)) {
            let weights = WeightConfiguration::from_array(values);
            let total = weights.total();
            prop_assert_eq!(weights.validate().is_ok(), (99.5..=100.5).contains(&total));
        }
    }
}
