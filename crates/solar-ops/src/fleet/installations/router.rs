use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::Local;
use serde_json::json;

use super::domain::{InstallationDraft, InstallationId};
use super::query::FilterRequest;
use super::repository::InstallationRepository;
use super::service::{InstallationService, InstallationServiceError};

/// Router builder exposing the installation listing, CRUD, and statistics
/// endpoints. The evaluation date is pinned once per request at this
/// boundary; everything below it is deterministic.
pub fn installation_router<R>(service: Arc<InstallationService<R>>) -> Router
where
    R: InstallationRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/installations",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/installations/stats/overview",
            get(stats_handler::<R>),
        )
        .route(
            "/api/v1/installations/:id",
            get(get_handler::<R>)
                .put(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
    Query(filter): Query<FilterRequest>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.list(&filter, today) {
        Ok(page) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": page.data,
                "pagination": page.pagination,
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn get_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.get(&InstallationId(id), today) {
        Ok(view) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": view,
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
    axum::Json(draft): axum::Json<InstallationDraft>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.create(&draft, today) {
        Ok(stored) => (
            StatusCode::CREATED,
            axum::Json(json!({
                "success": true,
                "message": "Installation created successfully",
                "data": stored.view(today),
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
    Path(id): Path<String>,
    axum::Json(draft): axum::Json<InstallationDraft>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.update(&InstallationId(id), &draft, today) {
        Ok(stored) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Installation updated successfully",
                "data": stored.view(today),
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
    Path(id): Path<String>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.remove(&InstallationId(id)) {
        Ok(removed) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "message": "Installation deleted successfully",
                "data": removed.view(today),
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

pub(crate) async fn stats_handler<R>(
    State(service): State<Arc<InstallationService<R>>>,
) -> Response
where
    R: InstallationRepository + 'static,
{
    let today = Local::now().date_naive();
    match service.overview(today) {
        Ok(overview) => (
            StatusCode::OK,
            axum::Json(json!({
                "success": true,
                "data": overview,
            })),
        )
            .into_response(),
        Err(error) => failure_response(error),
    }
}

fn failure_response(error: InstallationServiceError) -> Response {
    match error {
        InstallationServiceError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            axum::Json(json!({
                "success": false,
                "message": "Validation error",
                "errors": errors,
            })),
        )
            .into_response(),
        InstallationServiceError::NotFound => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "success": false,
                "message": "Installation not found",
            })),
        )
            .into_response(),
        InstallationServiceError::Repository(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "success": false,
                "message": error.to_string(),
            })),
        )
            .into_response(),
    }
}
