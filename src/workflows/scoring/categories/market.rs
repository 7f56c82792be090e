use super::{Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{first_match, KeywordTable};

const RECURRING_MODELS: KeywordTable = &[
    (&["saas", "subscription", "sass", "recurring"], 90.0),
    (&["marketplace", "freemium"], 70.0),
    (&["one-time", "onetime", "hardware", "consulting"], 40.0),
];

const SCALABLE_INDUSTRIES: KeywordTable = &[
    (
        &["saas", "software", "ai", "digital", "online", "mobile", "app", "platform"],
        90.0,
    ),
    (&["marketplace", "ecommerce", "consumer"], 70.0),
    (&["hardware", "manufacturing", "physical", "local", "service"], 50.0),
];

const SCALABLE_MODELS: KeywordTable = &[
    (&["saas", "software", "platform", "digital"], 90.0),
    (&["marketplace", "freemium", "subscription"], 80.0),
    (&["ecommerce", "consumer"], 70.0),
    (&["hardware", "physical", "service"], 50.0),
];

const UNMATCHED_SCALABILITY: f64 = 60.0;

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    Assessment::from_parts(&[
        ("market_size", market_size_score(record.market_size_tam), 0.5),
        ("recurring_revenue", recurring_revenue_score(record), 0.3),
        ("scalability", scalability_score(record), 0.2),
    ])
}

/// Piecewise scale over TAM in millions, rising steeply for small markets and flattening past
/// ten billion. Unknown or negative sizes score neutral.
pub fn market_size_score(tam: Option<f64>) -> f64 {
    let Some(tam) = tam.filter(|tam| tam.is_finite() && *tam >= 0.0) else {
        return NEUTRAL;
    };

    if tam < 10.0 {
        30.0 * tam / 10.0
    } else if tam < 100.0 {
        30.0 + 30.0 * (tam - 10.0) / 90.0
    } else if tam < 1_000.0 {
        60.0 + 20.0 * (tam - 100.0) / 900.0
    } else if tam < 10_000.0 {
        80.0 + 15.0 * (tam - 1_000.0) / 9_000.0
    } else {
        95.0 + 5.0 * ((tam - 10_000.0) / 10_000.0).min(1.0)
    }
}

fn recurring_revenue_score(record: &CanonicalRecord) -> f64 {
    if let Some(recurring) = record.has_recurring_revenue {
        return if recurring { 80.0 } else { 60.0 };
    }

    first_match(&record.business_model.to_lowercase(), RECURRING_MODELS).unwrap_or(NEUTRAL)
}

fn scalability_score(record: &CanonicalRecord) -> f64 {
    let industry = record.industry.to_lowercase();
    let model = record.business_model.to_lowercase();
    if industry.is_empty() && model.is_empty() {
        return NEUTRAL;
    }

    let industry_score =
        first_match(&industry, SCALABLE_INDUSTRIES).unwrap_or(UNMATCHED_SCALABILITY);
    let model_score = first_match(&model, SCALABLE_MODELS).unwrap_or(UNMATCHED_SCALABILITY);
    industry_score * 0.4 + model_score * 0.6
}
