use idea_scorer::workflows::ideas::{IdeaId, IdeaRepository, RepositoryError, StoredIdea};
use idea_scorer::workflows::scoring::WeightConfiguration;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryIdeaRepository {
    ideas: Arc<Mutex<HashMap<IdeaId, StoredIdea>>>,
}

impl IdeaRepository for InMemoryIdeaRepository {
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

/// Parses `a,b,c,d,e,f` in category order. Sum validation happens when the engine is built.
pub(crate) fn parse_weights(raw: &str) -> Result<WeightConfiguration, String> {
    let values = raw
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|err| format!("invalid weight '{}' ({err})", part.trim()))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    let values: [f64; 6] = values.try_into().map_err(|values: Vec<f64>| {
        format!(
            "expected six comma-separated weights, got {}",
            values.len()
        )
    })?;
    Ok(WeightConfiguration::from_array(values))
}
