use super::{inverted_rating, Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{contains_any, first_match, KeywordTable};

pub const HIGH_REGULATORY_RISK: &str = "High Regulatory Risk";
pub const PUBLIC_SECTOR_COMPLEXITY: &str = "Public Sector Complexity";

const REGULATORY_NOTES: KeywordTable = &[
    (&["extreme", "very high", "severe"], 10.0),
    (&["low", "minimal", "none", "limited"], 85.0),
    (&["moderate", "medium", "some"], 60.0),
    (&["high", "significant", "heavy", "strict"], 30.0),
];

const REGULATED_INDUSTRIES: KeywordTable = &[
    (
        &[
            "healthcare",
            "healthtech",
            "fintech",
            "finance",
            "banking",
            "insurance",
            "pharma",
            "biotech",
            "energy",
            "education",
            "edtech",
            "legal",
        ],
        30.0,
    ),
    (
        &[
            "transportation",
            "food",
            "retail",
            "ecommerce",
            "consumer",
            "real estate",
            "telecom",
            "media",
        ],
        60.0,
    ),
    (
        &[
            "software",
            "technology",
            "digital",
            "entertainment",
            "games",
            "saas",
        ],
        85.0,
    ),
];

const PUBLIC_SECTOR_TERMS: &[&str] = &[
    "government",
    "public sector",
    "federal",
    "state",
    "local government",
    "municipality",
    "public agency",
    "public institution",
];

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    let regulatory = regulatory_risk_score(record);
    let public_sector = public_sector_score(record);

    Assessment::from_parts(&[
        ("regulatory_risk", regulatory, 0.6),
        ("public_sector_complexity", public_sector, 0.4),
    ])
    .flag_below(regulatory, HIGH_REGULATORY_RISK)
    .flag_below(public_sector, PUBLIC_SECTOR_COMPLEXITY)
}

/// Explicit rating, then qualitative note, then the industry's regulatory bucket.
fn regulatory_risk_score(record: &CanonicalRecord) -> f64 {
    if let Some(rating) = record.regulatory_risk {
        return inverted_rating(rating);
    }

    let note = &record.qualitative.regulatory_risk;
    if !note.is_empty() {
        return first_match(note, REGULATORY_NOTES).unwrap_or(NEUTRAL);
    }

    first_match(&record.industry.to_lowercase(), REGULATED_INDUSTRIES).unwrap_or(NEUTRAL)
}

fn public_sector_score(record: &CanonicalRecord) -> f64 {
    if let Some(public) = record.has_public_customers {
        return if public { 40.0 } else { 80.0 };
    }

    let target = record.target_market.to_lowercase();
    if target.trim().is_empty() {
        NEUTRAL
    } else if contains_any(&target, PUBLIC_SECTOR_TERMS) {
        40.0
    } else {
        70.0
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::blank;
    use super::*;

    #[test]
    fn high_numeric_regulatory_risk_raises_flag() {
        let mut record = blank();
        record.regulatory_risk = Some(9);
        let assessment = assess(&record);
        assert_eq!(assessment.factors["regulatory_risk"], 20.0);
        assert_eq!(assessment.flags, vec![HIGH_REGULATORY_RISK]);
    }

    #[test]
    fn industry_bucket_applies_without_rating() {
        let mut record = blank();
        record.industry = "healthtech".to_string();
        assert_eq!(regulatory_risk_score(&record), 30.0);

        record.industry = "enterprise_saas".to_string();
        assert_eq!(regulatory_risk_score(&record), 85.0);

        record.industry = "agriculture".to_string();
        assert_eq!(regulatory_risk_score(&record), NEUTRAL);
    }

    #[test]
    fn notes_take_precedence_over_industry() {
        let mut record = blank();
        record.industry = "fintech".to_string();
        record.qualitative.regulatory_risk = "minimal oversight".to_string();
        assert_eq!(regulatory_risk_score(&record), 85.0);

        record.qualitative.regulatory_risk = "severe licensing regime".to_string();
        assert_eq!(regulatory_risk_score(&record), 10.0);
    }

    #[test]
    fn strict_oversight_note_raises_flag_but_unknown_wording_stays_neutral() {
        let mut record = blank();
        record.qualitative.regulatory_risk = "strict oversight".to_string();
        let assessment = assess(&record);
        assert_eq!(assessment.factors["regulatory_risk"], 30.0);
        assert_eq!(assessment.flags, vec![HIGH_REGULATORY_RISK]);

        record.qualitative.regulatory_risk = "heavily regulated".to_string();
        assert_eq!(regulatory_risk_score(&record), NEUTRAL);
    }

    #[test]
    fn public_customers_flag_and_target_market() {
        let mut record = blank();
        record.target_market = "Municipality procurement teams".to_string();
        let assessment = assess(&record);
        assert_eq!(assessment.factors["public_sector_complexity"], 40.0);
        assert_eq!(assessment.flags, vec![PUBLIC_SECTOR_COMPLEXITY]);

        record.has_public_customers = Some(false);
        assert_eq!(public_sector_score(&record), 80.0);

        record.has_public_customers = None;
        record.target_market = "Small retailers".to_string();
        assert_eq!(public_sector_score(&record), 70.0);
    }

    #[test]
    fn flags_keep_regulatory_before_public_sector() {
        let mut record = blank();
        record.regulatory_risk = Some(10);
        record.has_public_customers = Some(true);
        assert_eq!(
            assess(&record).flags,
            vec![HIGH_REGULATORY_RISK, PUBLIC_SECTOR_COMPLEXITY]
        );
    }
}
