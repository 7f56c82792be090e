//! Stored-idea lifecycle: import, create, update, rescore and query scored ideas.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{IdeaFilter, IdeaId, ImportReport, StoredIdea};
pub use repository::{IdeaRepository, RepositoryError};
pub use router::{idea_router, BatchQuery, ImportRequest};
pub use service::{IdeaService, IdeaServiceError};
