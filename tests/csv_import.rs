use idea_scorer::workflows::intake::{BusinessModel, IdeaImporter, Industry, IngestionError};
use idea_scorer::workflows::scoring::{
    score_batch, ScoreCategory, WeightConfiguration, HIGH_REGULATORY_RISK,
    PUBLIC_SECTOR_COMPLEXITY,
};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/ideas.csv");

#[test]
fn fixture_rows_normalize_into_canonical_records() {
    let records = IdeaImporter::from_path(FIXTURE).expect("fixture imports");
    assert_eq!(records.len(), 4);

    let ledgerly = &records[0];
    assert_eq!(ledgerly.name, "Ledgerly");
    assert_eq!(ledgerly.industry_kind(), Industry::EnterpriseSaas);
    assert_eq!(ledgerly.business_model_kind(), BusinessModel::Subscription);
    assert_eq!(ledgerly.market_size_tam, Some(500.0));
    assert_eq!(ledgerly.market_size_sam, Some(120.0));
    assert_eq!(ledgerly.market_size_som, Some(15.0));
    assert_eq!(ledgerly.founding_team_experience, Some(8));
    assert_eq!(ledgerly.has_network_effects, Some(false));
    assert_eq!(ledgerly.has_public_customers, Some(false));
    assert_eq!(ledgerly.ltv_cac_ratio, Some(6.0));
    assert!(!ledgerly.data_quality_issues);

    let govpay = &records[1];
    assert_eq!(govpay.industry, "fintech");
    assert_eq!(govpay.business_model, "marketplace");
    assert_eq!(govpay.market_size_tam, Some(2000.0));
    assert_eq!(govpay.competition_level, None);
    assert_eq!(govpay.qualitative.competition, "intense competition");
    assert_eq!(govpay.qualitative.founder_experience, "first-time founders");
    assert_eq!(govpay.qualitative.regulatory_risk, "strict oversight");
    assert_eq!(govpay.product_complexity, Some(7));
    assert_eq!(govpay.ltv_cac_ratio, None);
}

#[test]
fn quality_issues_and_name_fallback_are_reported() {
    let records = IdeaImporter::from_path(FIXTURE).expect("fixture imports");

    let kit = &records[2];
    assert_eq!(kit.name, "Kit");
    assert!(kit.data_quality_issues, "short name and SAM above TAM");
    assert_eq!(kit.has_network_effects, None);

    let unnamed = &records[3];
    assert_eq!(unnamed.name, "Business Idea 4");
    assert_eq!(unnamed.industry, "");
    assert_eq!(unnamed.market_size_tam, None);
    assert!(unnamed.data_quality_issues);
}

#[test]
fn fixture_batch_scores_with_expected_flags() {
    let records = IdeaImporter::from_path(FIXTURE).expect("fixture imports");
    let results =
        score_batch(&records, &WeightConfiguration::default()).expect("default weights valid");

    let names: Vec<&str> = results.iter().map(|r| r.idea_name.as_str()).collect();
    assert_eq!(names, vec!["Ledgerly", "GovPay", "Kit", "Business Idea 4"]);

    assert!(results[0].total_score > 70.0);
    assert!(results[0].risk_flags.is_empty());
    assert_eq!(
        results[1].risk_flags,
        vec![
            HIGH_REGULATORY_RISK.to_string(),
            PUBLIC_SECTOR_COMPLEXITY.to_string()
        ]
    );

    let competition = results[1]
        .category(ScoreCategory::CompetitiveLandscape)
        .expect("competition category");
    assert!(competition.score < 50.0, "intense competition lowers the score");
}

#[test]
fn missing_file_is_an_io_error() {
    let error = IdeaImporter::from_path("tests/fixtures/absent.csv").expect_err("missing file");
    assert!(matches!(error, IngestionError::Io(_)));
}
