use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::workflows::ideas::domain::{IdeaId, StoredIdea};
use crate::workflows::ideas::repository::{IdeaRepository, RepositoryError};
use crate::workflows::ideas::{idea_router, IdeaService};
use crate::workflows::intake::RawRow;
use crate::workflows::scoring::{
    DisabledExplainer, ExplanationError, Explainer, ScoreResult, ScoringEngine,
    WeightConfiguration,
};

pub(super) const UPLOAD_LIMIT: usize = 64 * 1024;

pub(super) const PORTFOLIO_CSV: &str = "\
Idea Name,Industry,Business Model,Market Size,Competition Level,Founder Experience,Regulatory Risk,Has Network Effects
Ledgerly,Financial Services,Software as a Service,$2B,3,8,2,no
Farmlink,Agriculture,Two-Sided Marketplace,500 million,crowded,5,4,yes
Medibook,Healthcare,Subscription,50M,6,,9,no
";

pub(super) fn ledgerly_row() -> RawRow {
    RawRow::new()
        .with("Idea Name", "Ledgerly")
        .with("Industry", "saas")
        .with("Business Model", "subscription")
        .with("TAM", "500 million")
        .with("Competition Level", 3.0)
        .with("Founder Experience", 8.0)
        .with("Product Complexity", 2.0)
        .with("Regulatory Risk", 2.0)
        .with("Estimated LTV", 300.0)
        .with("Estimated CAC", 50.0)
        .with("Has Network Effects", false)
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(WeightConfiguration::default()).expect("default weights are valid")
}

pub(super) fn build_service() -> (
    IdeaService<MemoryRepository, DisabledExplainer>,
    Arc<MemoryRepository>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let service = IdeaService::new(repository.clone(), Arc::new(DisabledExplainer), engine());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) ideas: Arc<Mutex<HashMap<IdeaId, StoredIdea>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.ideas.lock().expect("repository mutex poisoned").len()
    }
}

impl IdeaRepository for MemoryRepository {
    fn put(&self, idea: StoredIdea) -> Result<(), RepositoryError> {
        let mut guard = self.ideas.lock().expect("repository mutex poisoned");
        guard.insert(idea.id.clone(), idea);
        Ok(())
    }

    fn get(&self, id: &IdeaId) -> Result<Option<StoredIdea>, RepositoryError> {
        let guard = self.ideas.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<StoredIdea>, RepositoryError> {
        let guard = self.ideas.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn delete(&self, id: &IdeaId) -> Result<bool, RepositoryError> {
        let mut guard = self.ideas.lock().expect("repository mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

/// Accepts `remaining_puts` writes, then reports an outage on every later put.
#[derive(Default)]
pub(super) struct FlakyRepository {
    pub(super) inner: MemoryRepository,
    pub(super) remaining_puts: Mutex<usize>,
}

impl FlakyRepository {
    pub(super) fn failing_after(puts: usize) -> Self {
        Self {
            inner: MemoryRepository::default(),
            remaining_puts: Mutex::new(puts),
        }
    }
}

impl IdeaRepository for FlakyRepository {
    fn put(&self, idea: StoredIdea) -> Result<(), RepositoryError> {
        let mut remaining = self.remaining_puts.lock().expect("counter mutex poisoned");
        if *remaining == 0 {
            return Err(RepositoryError::Unavailable("write quota exhausted".to_string()));
        }
        *remaining -= 1;
        self.inner.put(idea)
    }

    fn get(&self, id: &IdeaId) -> Result<Option<StoredIdea>, RepositoryError> {
        self.inner.get(id)
    }

    fn list(&self) -> Result<Vec<StoredIdea>, RepositoryError> {
        self.inner.list()
    }

    fn delete(&self, id: &IdeaId) -> Result<bool, RepositoryError> {
        self.inner.delete(id)
    }
}

pub(super) struct UnavailableRepository;

impl IdeaRepository for UnavailableRepository {
    fn put(&self, _idea: StoredIdea) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn get(&self, _id: &IdeaId) -> Result<Option<StoredIdea>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<StoredIdea>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn delete(&self, _id: &IdeaId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Returns a fixed narrative so tests can tell it apart from the local summary.
pub(super) struct CannedExplainer;

impl Explainer for CannedExplainer {
    fn explain(&self, result: &ScoreResult) -> Result<String, ExplanationError> {
        Ok(format!("{} looks promising", result.idea_name))
    }
}

pub(super) fn router_with_service(
    service: IdeaService<MemoryRepository, DisabledExplainer>,
) -> axum::Router {
    idea_router(Arc::new(service), UPLOAD_LIMIT)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
