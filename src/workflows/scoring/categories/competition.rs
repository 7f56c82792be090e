use super::{inverted_rating, Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{first_match, KeywordTable};

// Saturation terms are checked first so "very high" is not read as plain "high".
const COMPETITION_NOTES: KeywordTable = &[
    (&["saturated", "crowded", "very high"], 20.0),
    (&["low", "minimal", "none", "limited"], 90.0),
    (&["moderate", "medium", "some"], 70.0),
    (&["high", "intense", "significant", "strong"], 40.0),
];

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    let competition = competition_level_score(record);
    Assessment::from_parts(&[
        ("competition_level", competition, 0.7),
        ("first_mover_advantage", first_mover_score(competition), 0.3),
    ])
}

fn competition_level_score(record: &CanonicalRecord) -> f64 {
    match record.competition_level {
        Some(level) => inverted_rating(level),
        None => first_match(&record.qualitative.competition, COMPETITION_NOTES).unwrap_or(NEUTRAL),
    }
}

/// Derived from the competition score; there is no independent first-mover input.
fn first_mover_score(competition: f64) -> f64 {
    if competition >= 80.0 {
        90.0
    } else if competition >= 60.0 {
        70.0
    } else if competition >= 40.0 {
        50.0
    } else {
        30.0
    }
}
