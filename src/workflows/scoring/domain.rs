use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The six scoring dimensions, in the fixed order results are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    MarketBusinessModel,
    CompetitiveLandscape,
    ExecutionTeam,
    RiskFactors,
    NetworkPlatformRisks,
    SocialEnvironmentalImpact,
}

impl ScoreCategory {
    pub const ALL: [ScoreCategory; 6] = [
        ScoreCategory::MarketBusinessModel,
        ScoreCategory::CompetitiveLandscape,
        ScoreCategory::ExecutionTeam,
        ScoreCategory::RiskFactors,
        ScoreCategory::NetworkPlatformRisks,
        ScoreCategory::SocialEnvironmentalImpact,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScoreCategory::MarketBusinessModel => "market_business_model",
            ScoreCategory::CompetitiveLandscape => "competitive_landscape",
            ScoreCategory::ExecutionTeam => "execution_team",
            ScoreCategory::RiskFactors => "risk_factors",
            ScoreCategory::NetworkPlatformRisks => "network_platform_risks",
            ScoreCategory::SocialEnvironmentalImpact => "social_environmental_impact",
        }
    }
}

impl fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type Factors = BTreeMap<String, f64>;

/// One category's contribution to the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: ScoreCategory,
    pub score: f64,
    pub weight: f64,
    pub weighted_score: f64,
    pub factors: Factors,
}

impl CategoryScore {
    /// `weighted_score` is always derived here, never set independently.
    pub fn new(category: ScoreCategory, score: f64, weight: f64, factors: Factors) -> Self {
        Self {
            category,
            score,
            weight,
            weighted_score: score * weight / 100.0,
            factors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub idea_name: String,
    pub total_score: f64,
    pub category_scores: Vec<CategoryScore>,
    pub risk_flags: Vec<String>,
    pub explanation: Option<String>,
}

impl ScoreResult {
    pub fn category(&self, category: ScoreCategory) -> Option<&CategoryScore> {
        self.category_scores
            .iter()
            .find(|score| score.category == category)
    }
}
