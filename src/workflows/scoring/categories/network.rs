use super::{Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{contains_any, first_match, KeywordTable};

pub const NETWORK_EFFECT_DEPENDENCY: &str = "Network Effect Dependency";
pub const MARKETPLACE_CHALLENGE: &str = "Marketplace/Chicken-and-Egg Challenge";

const NETWORK_MODELS: KeywordTable = &[
    (
        &["marketplace", "platform", "social", "network", "community"],
        60.0,
    ),
    (&["saas platform", "multi-sided", "two-sided"], 70.0),
];

const MARKETPLACE_TERMS: &[&str] = &[
    "marketplace",
    "two-sided",
    "multi-sided",
    "platform",
    "peer-to-peer",
];

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    let network = network_effects_score(record);
    let marketplace = marketplace_complexity_score(record);

    Assessment::from_parts(&[
        ("network_effects", network, 0.5),
        ("marketplace_complexity", marketplace, 0.5),
    ])
    .flag_below(network, NETWORK_EFFECT_DEPENDENCY)
    .flag_below(marketplace, MARKETPLACE_CHALLENGE)
}

fn network_effects_score(record: &CanonicalRecord) -> f64 {
    if let Some(effects) = record.has_network_effects {
        return if effects { 60.0 } else { 75.0 };
    }

    let model = record.business_model.to_lowercase();
    if model.is_empty() {
        return NEUTRAL;
    }
    first_match(&model, NETWORK_MODELS).unwrap_or(80.0)
}

fn marketplace_complexity_score(record: &CanonicalRecord) -> f64 {
    let model = record.business_model.to_lowercase();
    if model.is_empty() {
        NEUTRAL
    } else if contains_any(&model, MARKETPLACE_TERMS) {
        50.0
    } else {
        80.0
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::blank;
    use super::*;

    #[test]
    fn marketplace_models_carry_friction_without_flags() {
        let mut record = blank();
        record.business_model = "marketplace".to_string();
        let assessment = assess(&record);
        assert_eq!(assessment.factors["network_effects"], 60.0);
        assert_eq!(assessment.factors["marketplace_complexity"], 50.0);
        assert!((assessment.score - 55.0).abs() < 1e-9);
        assert!(assessment.flags.is_empty());
    }

    #[test]
    fn non_marketplace_models_score_high() {
        let mut record = blank();
        record.business_model = "subscription".to_string();
        record.has_network_effects = Some(false);
        let assessment = assess(&record);
        assert_eq!(assessment.factors["network_effects"], 75.0);
        assert_eq!(assessment.factors["marketplace_complexity"], 80.0);
    }

    #[test]
    fn explicit_network_flag_overrides_model() {
        let mut record = blank();
        record.business_model = "saas".to_string();
        record.has_network_effects = Some(true);
        assert_eq!(network_effects_score(&record), 60.0);
        record.has_network_effects = None;
        assert_eq!(network_effects_score(&record), 80.0);
    }
}
