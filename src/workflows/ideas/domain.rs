use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::intake::{CanonicalRecord, Industry, RawRow};
use crate::workflows::scoring::ScoreResult;

/// Identifier wrapper for stored ideas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdeaId(pub String);

/// An idea as persisted: the raw row it came from, its canonical form and its latest score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredIdea {
    pub id: IdeaId,
    pub batch_id: Option<String>,
    pub raw: RawRow,
    pub record: CanonicalRecord,
    pub score: ScoreResult,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredIdea {
    pub fn total_score(&self) -> f64 {
        self.score.total_score
    }

    pub fn in_batch(&self, batch_id: Option<&str>) -> bool {
        match batch_id {
            Some(batch) => self.batch_id.as_deref() == Some(batch),
            None => true,
        }
    }
}

/// Listing criteria. Every field is optional; an empty filter returns everything.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdeaFilter {
    pub batch_id: Option<String>,
    pub min_score: Option<f64>,
    pub max_score: Option<f64>,
    pub industry: Option<Industry>,
    #[serde(default)]
    pub skip: usize,
    pub limit: Option<usize>,
}

impl IdeaFilter {
    pub fn matches(&self, idea: &StoredIdea) -> bool {
        let total = idea.total_score();
        idea.in_batch(self.batch_id.as_deref())
            && self.min_score.map_or(true, |min| total >= min)
            && self.max_score.map_or(true, |max| total <= max)
            && self
                .industry
                .map_or(true, |industry| idea.record.industry_kind() == industry)
    }
}

/// Result of importing one batch of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    pub batch_id: String,
    pub imported: usize,
    pub flagged: usize,
    pub ideas: Vec<StoredIdea>,
}
