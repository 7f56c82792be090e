use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::mapping::canonical_header;

/// One scalar cell exactly as it was read from the source table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Boolean(bool),
    Number(f64),
    Text(String),
    Empty,
}

impl RawValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Empty cells and whitespace-only text both count as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(text) => text.trim().is_empty(),
            RawValue::Number(value) => !value.is_finite(),
            RawValue::Boolean(_) => false,
        }
    }

    /// Text rendering used when a non-text cell lands in a text column.
    pub fn as_text(&self) -> String {
        match self {
            RawValue::Boolean(value) => value.to_string(),
            RawValue::Number(value) => value.to_string(),
            RawValue::Text(text) => text.trim().to_string(),
            RawValue::Empty => String::new(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Ordered mapping from arbitrary column names to raw cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: Vec<(String, RawValue)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(column, value);
        self
    }

    /// Replaces an existing cell under the same column name, otherwise appends.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        let column = column.into();
        let value = value.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn cells(&self) -> &[(String, RawValue)] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Overlays every cell of `patch` on top of this row. Columns are matched by the field
    /// they resolve to, so `Founder Experience` in a patch replaces a
    /// `founding_team_experience` cell and `Idea Name` replaces `name`.
    pub fn merge(&mut self, patch: RawRow) {
        for (column, value) in patch.cells {
            let key = canonical_header(&column);
            match self
                .cells
                .iter_mut()
                .find(|(name, _)| canonical_header(name) == key)
            {
                Some((_, existing)) => *existing = value,
                None => self.cells.push((column, value)),
            }
        }
    }
}

impl FromIterator<(String, RawValue)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (String, RawValue)>>(iter: T) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

impl Serialize for RawRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RawRowVisitor;

        impl<'de> Visitor<'de> for RawRowVisitor {
            type Value = RawRow;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRow, A::Error> {
                let mut row = RawRow::new();
                while let Some((column, value)) = access.next_entry::<String, RawValue>()? {
                    row.insert(column, value);
                }
                Ok(row)
            }
        }

        deserializer.deserialize_map(RawRowVisitor)
    }
}

/// Free text retained from rating columns whose cells held no extractable number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualitativeNotes {
    pub competition: String,
    pub founder_experience: String,
    pub product_complexity: String,
    pub regulatory_risk: String,
}

/// Normalized idea shape consumed by every category scorer. All fields are always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub name: String,
    pub description: String,
    pub industry: String,
    pub business_model: String,
    pub problem_statement: String,
    pub solution_description: String,
    pub target_market: String,
    pub market_size_tam: Option<f64>,
    pub market_size_sam: Option<f64>,
    pub market_size_som: Option<f64>,
    pub competition_level: Option<u8>,
    pub founding_team_experience: Option<u8>,
    pub product_complexity: Option<u8>,
    pub regulatory_risk: Option<u8>,
    pub has_network_effects: Option<bool>,
    pub has_public_customers: Option<bool>,
    pub has_recurring_revenue: Option<bool>,
    pub has_ip_patents: Option<bool>,
    pub estimated_cac: Option<f64>,
    pub estimated_ltv: Option<f64>,
    pub ltv_cac_ratio: Option<f64>,
    pub social_impact_score: Option<u8>,
    pub environmental_impact_score: Option<u8>,
    pub data_quality_issues: bool,
    #[serde(default)]
    pub qualitative: QualitativeNotes,
}

impl CanonicalRecord {
    pub fn industry_kind(&self) -> Industry {
        Industry::from_token(&self.industry)
    }

    pub fn business_model_kind(&self) -> BusinessModel {
        BusinessModel::from_token(&self.business_model)
    }

    /// Rebuilds a raw row carrying the same information, so an update can re-run the pipeline.
    pub fn to_raw_row(&self) -> RawRow {
        fn number(value: Option<f64>) -> RawValue {
            value.map(RawValue::Number).unwrap_or(RawValue::Empty)
        }

        fn rating(value: Option<u8>, note: &str) -> RawValue {
            match value {
                Some(value) => RawValue::Number(f64::from(value)),
                None if !note.is_empty() => RawValue::text(note),
                None => RawValue::Empty,
            }
        }

        fn flag(value: Option<bool>) -> RawValue {
            value.map(RawValue::Boolean).unwrap_or(RawValue::Empty)
        }

        RawRow::new()
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("industry", self.industry.as_str())
            .with("business_model", self.business_model.as_str())
            .with("problem_statement", self.problem_statement.as_str())
            .with("solution_description", self.solution_description.as_str())
            .with("target_market", self.target_market.as_str())
            .with("market_size_tam", number(self.market_size_tam))
            .with("market_size_sam", number(self.market_size_sam))
            .with("market_size_som", number(self.market_size_som))
            .with(
                "competition_level",
                rating(self.competition_level, &self.qualitative.competition),
            )
            .with(
                "founding_team_experience",
                rating(
                    self.founding_team_experience,
                    &self.qualitative.founder_experience,
                ),
            )
            .with(
                "product_complexity",
                rating(self.product_complexity, &self.qualitative.product_complexity),
            )
            .with(
                "regulatory_risk",
                rating(self.regulatory_risk, &self.qualitative.regulatory_risk),
            )
            .with("has_network_effects", flag(self.has_network_effects))
            .with("has_public_customers", flag(self.has_public_customers))
            .with("has_recurring_revenue", flag(self.has_recurring_revenue))
            .with("has_ip_patents", flag(self.has_ip_patents))
            .with("estimated_cac", number(self.estimated_cac))
            .with("estimated_ltv", number(self.estimated_ltv))
            .with("social_impact_score", rating(self.social_impact_score, ""))
            .with(
                "environmental_impact_score",
                rating(self.environmental_impact_score, ""),
            )
    }
}

impl From<Option<f64>> for RawValue {
    fn from(value: Option<f64>) -> Self {
        value.map(RawValue::Number).unwrap_or(RawValue::Empty)
    }
}

/// Closed industry vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Industry {
    Fintech,
    Healthtech,
    Edtech,
    Ecommerce,
    EnterpriseSaas,
    ConsumerApps,
    AiMl,
    Biotech,
    Cleantech,
    Iot,
    Blockchain,
    Other,
}

impl Industry {
    /// First substring hit wins; the order keeps `enterprise_saas` ahead of its sub-words.
    pub fn from_token(token: &str) -> Self {
        const MATCHES: &[(&str, Industry)] = &[
            ("fintech", Industry::Fintech),
            ("healthtech", Industry::Healthtech),
            ("edtech", Industry::Edtech),
            ("ecommerce", Industry::Ecommerce),
            ("enterprise_saas", Industry::EnterpriseSaas),
            ("saas", Industry::EnterpriseSaas),
            ("consumer_apps", Industry::ConsumerApps),
            ("ai_ml", Industry::AiMl),
            ("biotech", Industry::Biotech),
            ("cleantech", Industry::Cleantech),
            ("iot", Industry::Iot),
            ("blockchain", Industry::Blockchain),
        ];

        let lowered = token.to_lowercase();
        MATCHES
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, industry)| *industry)
            .unwrap_or(Industry::Other)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Industry::Fintech => "fintech",
            Industry::Healthtech => "healthtech",
            Industry::Edtech => "edtech",
            Industry::Ecommerce => "ecommerce",
            Industry::EnterpriseSaas => "enterprise_saas",
            Industry::ConsumerApps => "consumer_apps",
            Industry::AiMl => "ai_ml",
            Industry::Biotech => "biotech",
            Industry::Cleantech => "cleantech",
            Industry::Iot => "iot",
            Industry::Blockchain => "blockchain",
            Industry::Other => "other",
        }
    }
}

/// Closed business-model vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessModel {
    Saas,
    Marketplace,
    ConsumerApp,
    Ecommerce,
    Subscription,
    Freemium,
    Hardware,
    Advertising,
    DataMonetization,
    Licensing,
    Other,
}

impl BusinessModel {
    pub fn from_token(token: &str) -> Self {
        const MATCHES: &[(&str, BusinessModel)] = &[
            ("saas", BusinessModel::Saas),
            ("marketplace", BusinessModel::Marketplace),
            ("consumer_app", BusinessModel::ConsumerApp),
            ("ecommerce", BusinessModel::Ecommerce),
            ("subscription", BusinessModel::Subscription),
            ("freemium", BusinessModel::Freemium),
            ("hardware", BusinessModel::Hardware),
            ("advertising", BusinessModel::Advertising),
            ("data_monetization", BusinessModel::DataMonetization),
            ("licensing", BusinessModel::Licensing),
        ];

        let lowered = token.to_lowercase();
        MATCHES
            .iter()
            .find(|(needle, _)| lowered.contains(needle))
            .map(|(_, model)| *model)
            .unwrap_or(BusinessModel::Other)
    }

    pub const fn label(self) -> &'static str {
        match self {
            BusinessModel::Saas => "saas",
            BusinessModel::Marketplace => "marketplace",
            BusinessModel::ConsumerApp => "consumer_app",
            BusinessModel::Ecommerce => "ecommerce",
            BusinessModel::Subscription => "subscription",
            BusinessModel::Freemium => "freemium",
            BusinessModel::Hardware => "hardware",
            BusinessModel::Advertising => "advertising",
            BusinessModel::DataMonetization => "data_monetization",
            BusinessModel::Licensing => "licensing",
            BusinessModel::Other => "other",
        }
    }
}
