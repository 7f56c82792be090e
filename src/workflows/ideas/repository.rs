use super::domain::{IdeaId, StoredIdea};

/// Persistence boundary for scored ideas. Adapters live outside the core crate.
pub trait IdeaRepository: Send + Sync {
    /// Inserts or replaces the idea under its id.
    fn put(&self, idea: StoredIdea) -> Result<(), RepositoryError>;
    fn get(&self, id: &IdeaId) -> Result<Option<StoredIdea>, RepositoryError>;
    fn list(&self) -> Result<Vec<StoredIdea>, RepositoryError>;
    /// Returns whether an idea was removed.
    fn delete(&self, id: &IdeaId) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("idea not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
