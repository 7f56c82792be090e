use super::{direct_rating, inverted_rating, Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{first_match, KeywordTable};

const FOUNDER_NOTES: KeywordTable = &[
    (&["no experience", "inexperienced", "none"], 20.0),
    (
        &["extensive", "expert", "serial", "previous exit", "successful"],
        90.0,
    ),
    (&["experienced", "strong", "prior startups"], 75.0),
    (&["moderate", "some", "industry"], 60.0),
    (&["limited", "first time", "new"], 40.0),
];

const COMPLEXITY_NOTES: KeywordTable = &[
    (&["very complex", "highly complex", "extremely"], 20.0),
    (&["simple", "straightforward", "easy", "low"], 80.0),
    (&["moderate", "medium"], 60.0),
    (&["complex", "difficult", "high", "challenging"], 40.0),
];

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    Assessment::from_parts(&[
        ("founder_experience", founder_experience_score(record), 0.4),
        ("product_complexity", product_complexity_score(record), 0.3),
        ("unit_economics", unit_economics_score(ltv_cac(record)), 0.3),
    ])
}

fn founder_experience_score(record: &CanonicalRecord) -> f64 {
    match record.founding_team_experience {
        Some(rating) => direct_rating(rating),
        None => {
            first_match(&record.qualitative.founder_experience, FOUNDER_NOTES).unwrap_or(NEUTRAL)
        }
    }
}

fn product_complexity_score(record: &CanonicalRecord) -> f64 {
    match record.product_complexity {
        Some(rating) => inverted_rating(rating),
        None => {
            first_match(&record.qualitative.product_complexity, COMPLEXITY_NOTES).unwrap_or(NEUTRAL)
        }
    }
}

fn ltv_cac(record: &CanonicalRecord) -> Option<f64> {
    match (record.estimated_ltv, record.estimated_cac) {
        (Some(ltv), Some(cac)) if cac > 0.0 => Some(ltv / cac),
        _ => record.ltv_cac_ratio,
    }
}

/// Five bands over the LTV/CAC ratio, from unprofitable below 1 to exceptional above 5.
pub fn unit_economics_score(ratio: Option<f64>) -> f64 {
    let Some(ratio) = ratio.filter(|ratio| ratio.is_finite()) else {
        return NEUTRAL;
    };

    if ratio < 1.0 {
        (ratio * 20.0).max(0.0)
    } else if ratio < 2.0 {
        20.0 + (ratio - 1.0) * 30.0
    } else if ratio < 3.0 {
        50.0 + (ratio - 2.0) * 20.0
    } else if ratio < 5.0 {
        70.0 + (ratio - 3.0) * 10.0
    } else {
        (90.0 + (ratio - 5.0) * 2.0).min(100.0)
    }
}
