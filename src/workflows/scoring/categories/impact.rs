use super::{direct_rating, Assessment, NEUTRAL};
use crate::workflows::intake::CanonicalRecord;
use crate::workflows::scoring::keywords::{first_match, KeywordTable};

const SOCIAL_TERMS: KeywordTable = &[
    (
        &[
            "social impact",
            "underserved",
            "accessibility",
            "education",
            "healthcare",
            "equality",
            "diversity",
            "inclusion",
            "community",
            "welfare",
            "poverty",
            "developing",
            "sustainable",
        ],
        85.0,
    ),
    (
        &[
            "quality of life",
            "well-being",
            "employment",
            "jobs",
            "skill development",
        ],
        65.0,
    ),
];

const ENVIRONMENTAL_TERMS: KeywordTable = &[
    (
        &[
            "environmental",
            "sustainability",
            "carbon neutral",
            "carbon negative",
            "green",
            "renewable",
            "clean energy",
            "eco-friendly",
            "biodegradable",
            "recycling",
            "circular economy",
            "waste reduction",
            "climate",
        ],
        85.0,
    ),
    (
        &[
            "efficiency",
            "optimization",
            "reduction",
            "paperless",
            "digital transformation",
        ],
        65.0,
    ),
];

pub(crate) fn assess(record: &CanonicalRecord) -> Assessment {
    let narrative = narrative(record);
    Assessment::from_parts(&[
        (
            "social_impact",
            impact_score(record.social_impact_score, &narrative, SOCIAL_TERMS),
            0.5,
        ),
        (
            "environmental_impact",
            impact_score(
                record.environmental_impact_score,
                &narrative,
                ENVIRONMENTAL_TERMS,
            ),
            0.5,
        ),
    ])
}

fn narrative(record: &CanonicalRecord) -> String {
    format!("{} {}", record.description, record.problem_statement)
        .trim()
        .to_lowercase()
}

fn impact_score(rating: Option<u8>, narrative: &str, terms: KeywordTable) -> f64 {
    match rating {
        Some(rating) => direct_rating(rating),
        None => first_match(narrative, terms).unwrap_or(NEUTRAL),
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::blank;
    use super::*;

    #[test]
    fn explicit_ratings_scale_by_ten() {
        let mut record = blank();
        record.social_impact_score = Some(9);
        record.environmental_impact_score = Some(4);
        let assessment = assess(&record);
        assert_eq!(assessment.factors["social_impact"], 90.0);
        assert_eq!(assessment.factors["environmental_impact"], 40.0);
        assert!((assessment.score - 65.0).abs() < 1e-9);
    }

    #[test]
    fn narrative_keywords_infer_impact() {
        let mut record = blank();
        record.description = "Paperless invoicing for underserved clinics".to_string();
        let assessment = assess(&record);
        assert_eq!(assessment.factors["social_impact"], 85.0);
        assert_eq!(assessment.factors["environmental_impact"], 65.0);
    }

    #[test]
    fn problem_statement_counts_toward_narrative() {
        let mut record = blank();
        record.problem_statement = "Climate risk is unpriced".to_string();
        let assessment = assess(&record);
        assert_eq!(assessment.factors["environmental_impact"], 85.0);
        assert_eq!(assessment.factors["social_impact"], NEUTRAL);
    }
}
