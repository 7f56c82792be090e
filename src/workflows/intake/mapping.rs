use super::normalizer::normalize_column_name;
use super::terms::TermDomain;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

/// How the cells of a column are parsed before canonical fields are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRole {
    Text(Option<TermDomain>),
    Flag,
    Magnitude,
    Rating,
    Numeric,
}

impl ColumnRole {
    pub(crate) fn fills_with_median(self) -> bool {
        matches!(
            self,
            ColumnRole::Magnitude | ColumnRole::Rating | ColumnRole::Numeric
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CanonicalField {
    Name,
    Description,
    Industry,
    BusinessModel,
    ProblemStatement,
    SolutionDescription,
    TargetMarket,
    MarketSizeTam,
    MarketSizeSam,
    MarketSizeSom,
    CompetitionLevel,
    FoundingTeamExperience,
    ProductComplexity,
    RegulatoryRisk,
    HasNetworkEffects,
    HasPublicCustomers,
    HasRecurringRevenue,
    HasIpPatents,
    EstimatedCac,
    EstimatedLtv,
    SocialImpactScore,
    EnvironmentalImpactScore,
}

/// Source columns for each canonical field, in lookup order.
const FIELD_ALIASES: &[(CanonicalField, ColumnRole, &[&str])] = &[
    (
        CanonicalField::Name,
        ColumnRole::Text(None),
        &["name", "idea_name", "idea", "title"],
    ),
    (
        CanonicalField::Description,
        ColumnRole::Text(None),
        &["description", "idea_description", "summary"],
    ),
    (
        CanonicalField::Industry,
        ColumnRole::Text(Some(TermDomain::Industry)),
        &["industry", "sector", "vertical"],
    ),
    (
        CanonicalField::BusinessModel,
        ColumnRole::Text(Some(TermDomain::BusinessModel)),
        &["business_model", "revenue_model", "model"],
    ),
    (
        CanonicalField::ProblemStatement,
        ColumnRole::Text(None),
        &["problem_statement", "problem"],
    ),
    (
        CanonicalField::SolutionDescription,
        ColumnRole::Text(None),
        &["solution_description", "solution"],
    ),
    (
        CanonicalField::TargetMarket,
        ColumnRole::Text(None),
        &["target_market", "target_customers", "customer_segment"],
    ),
    (
        CanonicalField::MarketSizeTam,
        ColumnRole::Magnitude,
        &[
            "market_size_tam",
            "tam",
            "market_size",
            "total_addressable_market",
        ],
    ),
    (
        CanonicalField::MarketSizeSam,
        ColumnRole::Magnitude,
        &["market_size_sam", "sam", "serviceable_addressable_market"],
    ),
    (
        CanonicalField::MarketSizeSom,
        ColumnRole::Magnitude,
        &["market_size_som", "som", "serviceable_obtainable_market"],
    ),
    (
        CanonicalField::CompetitionLevel,
        ColumnRole::Rating,
        &["competition_level", "competition"],
    ),
    (
        CanonicalField::FoundingTeamExperience,
        ColumnRole::Rating,
        &[
            "founding_team_experience",
            "founder_experience",
            "team_experience",
        ],
    ),
    (
        CanonicalField::ProductComplexity,
        ColumnRole::Rating,
        &["product_complexity", "complexity"],
    ),
    (
        CanonicalField::RegulatoryRisk,
        ColumnRole::Rating,
        &["regulatory_risk", "regulation_risk"],
    ),
    (
        CanonicalField::HasNetworkEffects,
        ColumnRole::Flag,
        &["has_network_effects", "network_effects"],
    ),
    (
        CanonicalField::HasPublicCustomers,
        ColumnRole::Flag,
        &["has_public_customers", "public_customers", "public_sector"],
    ),
    (
        CanonicalField::HasRecurringRevenue,
        ColumnRole::Flag,
        &["has_recurring_revenue", "recurring_revenue"],
    ),
    (
        CanonicalField::HasIpPatents,
        ColumnRole::Flag,
        &["has_ip_patents", "ip_patents", "patents"],
    ),
    (
        CanonicalField::EstimatedCac,
        ColumnRole::Numeric,
        &["estimated_cac", "cac", "customer_acquisition_cost"],
    ),
    (
        CanonicalField::EstimatedLtv,
        ColumnRole::Numeric,
        &["estimated_ltv", "ltv", "lifetime_value"],
    ),
    (
        CanonicalField::SocialImpactScore,
        ColumnRole::Rating,
        &["social_impact_score", "social_impact"],
    ),
    (
        CanonicalField::EnvironmentalImpactScore,
        ColumnRole::Rating,
        &["environmental_impact_score", "environmental_impact"],
    ),
];

static ALIAS_ROLES: OnceLock<HashMap<&'static str, ColumnRole>> = OnceLock::new();

fn alias_roles() -> &'static HashMap<&'static str, ColumnRole> {
    ALIAS_ROLES.get_or_init(|| {
        let mut roles = HashMap::new();
        for (_, role, aliases) in FIELD_ALIASES {
            for alias in *aliases {
                roles.entry(*alias).or_insert(*role);
            }
        }
        roles
    })
}

/// Normalized header with known aliases folded onto their field's primary name, so `TAM` and
/// `market_size_tam` address the same column.
pub(crate) fn canonical_header(column: &str) -> String {
    let key = normalize_column_name(column);
    FIELD_ALIASES
        .iter()
        .find(|(_, _, aliases)| aliases.contains(&key.as_str()))
        .and_then(|(_, _, aliases)| aliases.first())
        .map(|primary| primary.to_string())
        .unwrap_or(key)
}

pub(crate) fn aliases_for(field: CanonicalField) -> &'static [&'static str] {
    FIELD_ALIASES
        .iter()
        .find(|(candidate, _, _)| *candidate == field)
        .map(|(_, _, aliases)| *aliases)
        .unwrap_or(&[])
}

struct RolePatterns {
    flag: Regex,
    magnitude: Regex,
    rating: Regex,
}

fn role_patterns() -> &'static RolePatterns {
    static PATTERNS: OnceLock<RolePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| RolePatterns {
        flag: Regex::new(r"^(has|is)_|network_effects|recurring").expect("valid flag regex"),
        magnitude: Regex::new(r"(^|_)(market|tam|sam|som)(_|$)").expect("valid magnitude regex"),
        rating: Regex::new(r"rating|score|level|experience|complexity|risk")
            .expect("valid rating regex"),
    })
}

/// Known aliases keep their declared role; anything else is classified by name pattern.
pub(crate) fn role_for(column: &str) -> ColumnRole {
    if let Some(role) = alias_roles().get(column) {
        return *role;
    }

    let patterns = role_patterns();
    if patterns.flag.is_match(column) {
        ColumnRole::Flag
    } else if patterns.magnitude.is_match(column) {
        ColumnRole::Magnitude
    } else if patterns.rating.is_match(column) {
        ColumnRole::Rating
    } else {
        ColumnRole::Numeric
    }
}
