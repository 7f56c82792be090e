use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{IdeaFilter, IdeaId, ImportReport, StoredIdea};
use super::repository::{IdeaRepository, RepositoryError};
use crate::workflows::intake::{
    assemble_records, CanonicalRecord, IdeaImporter, IngestionError, RawRow,
};
use crate::workflows::scoring::{
    explain_with_fallback, Explainer, ScoreResult, ScoreSummary, ScoringEngine,
    WeightConfiguration, WeightError,
};

/// Service composing the intake pipeline, the scoring engine and idea storage.
pub struct IdeaService<R, E> {
    repository: Arc<R>,
    explainer: Arc<E>,
    engine: RwLock<ScoringEngine>,
}

static IDEA_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static BATCH_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_idea_id() -> IdeaId {
    let id = IDEA_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    IdeaId(format!("idea-{id:06}"))
}

fn next_batch_id() -> String {
    let id = BATCH_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("batch-{id:06}")
}

impl<R, E> IdeaService<R, E>
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    pub fn new(repository: Arc<R>, explainer: Arc<E>, engine: ScoringEngine) -> Self {
        Self {
            repository,
            explainer,
            engine: RwLock::new(engine),
        }
    }

    /// Weights applied when a caller does not supply its own.
    pub fn default_weights(&self) -> WeightConfiguration {
        *self.current_engine().weights()
    }

    /// Replaces the default weights after validating them.
    pub fn set_default_weights(
        &self,
        weights: WeightConfiguration,
    ) -> Result<WeightConfiguration, IdeaServiceError> {
        let engine = ScoringEngine::new(weights)?;
        let applied = *engine.weights();
        match self.engine.write() {
            Ok(mut guard) => *guard = engine,
            Err(poisoned) => *poisoned.into_inner() = engine,
        }
        info!(weights = ?applied.to_array(), "default weights updated");
        Ok(applied)
    }

    /// Normalize, score and store a batch of rows under one batch id.
    pub fn import_rows(
        &self,
        rows: Vec<RawRow>,
        batch_id: Option<String>,
    ) -> Result<ImportReport, IdeaServiceError> {
        let records = assemble_records(&rows)?;
        let engine = self.current_engine();
        let results = engine.score_batch(&records);
        let batch_id = batch_id.unwrap_or_else(next_batch_id);
        let now = Utc::now();

        let ideas: Vec<StoredIdea> = rows
            .into_iter()
            .zip(records)
            .zip(results)
            .map(|((raw, record), result)| StoredIdea {
                id: next_idea_id(),
                batch_id: Some(batch_id.clone()),
                raw,
                record,
                score: self.explained(result),
                created_at: now,
                updated_at: now,
            })
            .collect();
        self.store_all(&ideas)?;

        let flagged = ideas
            .iter()
            .filter(|idea| idea.record.data_quality_issues)
            .count();
        info!(batch = %batch_id, imported = ideas.len(), flagged, "idea batch imported");

        Ok(ImportReport {
            batch_id,
            imported: ideas.len(),
            flagged,
            ideas,
        })
    }

    /// Parse CSV text and import it as one batch.
    pub fn import_csv<Rd: Read>(
        &self,
        reader: Rd,
        batch_id: Option<String>,
    ) -> Result<ImportReport, IdeaServiceError> {
        let rows = IdeaImporter::rows_from_reader(reader)?;
        self.import_rows(rows, batch_id)
    }

    /// Create a single idea outside any batch.
    pub fn create(&self, row: RawRow) -> Result<StoredIdea, IdeaServiceError> {
        let (record, score) = self.evaluate(&row)?;
        let now = Utc::now();
        let idea = StoredIdea {
            id: next_idea_id(),
            batch_id: None,
            raw: row,
            record,
            score,
            created_at: now,
            updated_at: now,
        };
        self.repository.put(idea.clone())?;
        debug!(idea = %idea.id.0, total = idea.total_score(), "idea created");
        Ok(idea)
    }

    /// Overlay `patch` on the stored canonical record and re-run normalization and scoring.
    ///
    /// The merge starts from the processed record rather than the uploaded cells, so values
    /// filled from the batch median survive an update that does not touch them.
    pub fn update(&self, id: &IdeaId, patch: RawRow) -> Result<StoredIdea, IdeaServiceError> {
        let mut idea = self.get(id)?;
        let mut processed = idea.record.to_raw_row();
        processed.merge(patch.clone());

        let (record, score) = self.evaluate(&processed)?;
        idea.raw.merge(patch);
        idea.record = record;
        idea.score = score;
        idea.updated_at = Utc::now();
        self.repository.put(idea.clone())?;
        debug!(idea = %id.0, total = idea.total_score(), "idea updated");
        Ok(idea)
    }

    pub fn get(&self, id: &IdeaId) -> Result<StoredIdea, IdeaServiceError> {
        Ok(self.repository.get(id)?.ok_or(RepositoryError::NotFound)?)
    }

    pub fn delete(&self, id: &IdeaId) -> Result<(), IdeaServiceError> {
        if !self.repository.delete(id)? {
            return Err(RepositoryError::NotFound.into());
        }
        debug!(idea = %id.0, "idea deleted");
        Ok(())
    }

    /// Ideas matching `filter`, highest total first, then paged by `skip`/`limit`.
    pub fn list(&self, filter: &IdeaFilter) -> Result<Vec<StoredIdea>, IdeaServiceError> {
        let mut ideas: Vec<StoredIdea> = self
            .repository
            .list()?
            .into_iter()
            .filter(|idea| filter.matches(idea))
            .collect();
        ideas.sort_by(|a, b| {
            b.total_score()
                .total_cmp(&a.total_score())
                .then_with(|| a.id.cmp(&b.id))
        });

        let limit = filter.limit.unwrap_or(usize::MAX);
        Ok(ideas.into_iter().skip(filter.skip).take(limit).collect())
    }

    /// Re-score stored ideas with `weights` (or the defaults). Weights are validated before
    /// anything is touched.
    pub fn rescore_batch(
        &self,
        batch_id: Option<&str>,
        weights: Option<WeightConfiguration>,
    ) -> Result<Vec<ScoreResult>, IdeaServiceError> {
        let engine = match weights {
            Some(weights) => ScoringEngine::new(weights)?,
            None => self.current_engine(),
        };

        let mut ideas: Vec<StoredIdea> = self
            .repository
            .list()?
            .into_iter()
            .filter(|idea| idea.in_batch(batch_id))
            .collect();
        ideas.sort_by(|a, b| a.id.cmp(&b.id));

        let records: Vec<CanonicalRecord> =
            ideas.iter().map(|idea| idea.record.clone()).collect();
        let results = engine.score_batch(&records);

        let now = Utc::now();
        let mut scored = Vec::with_capacity(results.len());
        for (mut idea, result) in ideas.into_iter().zip(results) {
            idea.score = self.explained(result);
            idea.updated_at = now;
            scored.push(idea.score.clone());
            self.repository.put(idea)?;
        }

        info!(batch = batch_id.unwrap_or("*"), count = scored.len(), "ideas rescored");
        Ok(scored)
    }

    pub fn summary(&self, batch_id: Option<&str>) -> Result<ScoreSummary, IdeaServiceError> {
        let results: Vec<ScoreResult> = self
            .repository
            .list()?
            .into_iter()
            .filter(|idea| idea.in_batch(batch_id))
            .map(|idea| idea.score)
            .collect();
        Ok(ScoreSummary::from_results(&results))
    }

    /// Stores every idea or none of them; ideas written before a failure are removed again.
    fn store_all(&self, ideas: &[StoredIdea]) -> Result<(), IdeaServiceError> {
        for (stored, idea) in ideas.iter().enumerate() {
            if let Err(error) = self.repository.put(idea.clone()) {
                for written in &ideas[..stored] {
                    if let Err(cleanup) = self.repository.delete(&written.id) {
                        warn!(idea = %written.id.0, %cleanup, "partial import left behind");
                    }
                }
                return Err(error.into());
            }
        }
        Ok(())
    }

    fn evaluate(&self, row: &RawRow) -> Result<(CanonicalRecord, ScoreResult), IdeaServiceError> {
        let record = assemble_records(std::slice::from_ref(row))?
            .pop()
            .ok_or(IngestionError::NoRows)?;
        let result = self.current_engine().score(&record);
        Ok((record, self.explained(result)))
    }

    fn explained(&self, mut result: ScoreResult) -> ScoreResult {
        result.explanation = Some(explain_with_fallback(&*self.explainer, &result));
        result
    }

    fn current_engine(&self) -> ScoringEngine {
        match self.engine.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IdeaServiceError {
    #[error(transparent)]
    Ingestion(#[from] IngestionError),
    #[error(transparent)]
    Weights(#[from] WeightError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
