use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{IdeaFilter, IdeaId};
use super::repository::IdeaRepository;
use super::service::IdeaService;
use crate::error::AppError;
use crate::workflows::intake::RawRow;
use crate::workflows::scoring::{Explainer, WeightConfiguration};

/// JSON envelope for CSV uploads.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    pub csv: String,
    #[serde(default)]
    pub batch_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchQuery {
    pub batch_id: Option<String>,
}

/// Router exposing idea CRUD, CSV import and scoring endpoints.
///
/// `max_upload_bytes` bounds the import request body.
pub fn idea_router<R, E>(service: Arc<IdeaService<R, E>>, max_upload_bytes: usize) -> Router
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    Router::new()
        .route(
            "/api/v1/ideas",
            post(create_handler::<R, E>).get(list_handler::<R, E>),
        )
        .route(
            "/api/v1/ideas/import",
            post(import_handler::<R, E>).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/api/v1/ideas/:idea_id",
            get(get_handler::<R, E>)
                .put(update_handler::<R, E>)
                .delete(delete_handler::<R, E>),
        )
        .route("/api/v1/scores/calculate", post(calculate_handler::<R, E>))
        .route("/api/v1/scores/summary", get(summary_handler::<R, E>))
        .route("/api/v1/scores/weights", put(weights_handler::<R, E>))
        .with_state(service)
}

pub(crate) async fn create_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    axum::Json(row): axum::Json<RawRow>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.create(row) {
        Ok(idea) => (StatusCode::CREATED, axum::Json(idea)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn list_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Query(filter): Query<IdeaFilter>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.list(&filter) {
        Ok(ideas) => (StatusCode::OK, axum::Json(ideas)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn import_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    axum::Json(request): axum::Json<ImportRequest>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.import_csv(request.csv.as_bytes(), request.batch_id) {
        Ok(report) => (StatusCode::CREATED, axum::Json(report)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn get_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Path(idea_id): Path<String>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.get(&IdeaId(idea_id)) {
        Ok(idea) => (StatusCode::OK, axum::Json(idea)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn update_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Path(idea_id): Path<String>,
    axum::Json(patch): axum::Json<RawRow>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.update(&IdeaId(idea_id), patch) {
        Ok(idea) => (StatusCode::OK, axum::Json(idea)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn delete_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Path(idea_id): Path<String>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.delete(&IdeaId(idea_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

/// An empty body re-scores with the default weights.
pub(crate) async fn calculate_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Query(query): Query<BatchQuery>,
    body: Bytes,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    let weights = if body.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        match serde_json::from_slice::<WeightConfiguration>(&body) {
            Ok(weights) => Some(weights),
            Err(error) => {
                let payload = json!({
                    "error": format!("invalid weight payload: {error}"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        }
    };

    match service.rescore_batch(query.batch_id.as_deref(), weights) {
        Ok(results) => {
            let payload = json!({
                "batch_id": query.batch_id,
                "scored": results.len(),
                "results": results,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn summary_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    Query(query): Query<BatchQuery>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.summary(query.batch_id.as_deref()) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}

pub(crate) async fn weights_handler<R, E>(
    State(service): State<Arc<IdeaService<R, E>>>,
    axum::Json(weights): axum::Json<WeightConfiguration>,
) -> Response
where
    R: IdeaRepository + 'static,
    E: Explainer + 'static,
{
    match service.set_default_weights(weights) {
        Ok(applied) => (StatusCode::OK, axum::Json(applied)).into_response(),
        Err(error) => AppError::from(error).into_response(),
    }
}
