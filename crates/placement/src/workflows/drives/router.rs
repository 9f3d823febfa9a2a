use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::notifications::store::NotificationStore;

use super::domain::{ApplicationStatus, DriveId};
use super::repository::DriveRepository;
use super::service::{DriveService, DriveServiceError, DriveUpdate, NewDrive};

/// Router builder exposing drive CRUD plus the publish, shortlist, and
/// application-status operations.
pub fn drive_router<S, D, N>(service: Arc<DriveService<S, D, N>>) -> Router
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/drives",
            get(list_handler::<S, D, N>).post(create_handler::<S, D, N>),
        )
        .route(
            "/api/v1/drives/:id",
            get(fetch_handler::<S, D, N>)
                .put(update_handler::<S, D, N>)
                .delete(remove_handler::<S, D, N>),
        )
        .route("/api/v1/drives/:id/publish", post(publish_handler::<S, D, N>))
        .route(
            "/api/v1/drives/:id/shortlist",
            post(shortlist_handler::<S, D, N>),
        )
        .route(
            "/api/v1/drives/:id/applications/:usn",
            put(application_status_handler::<S, D, N>),
        )
        .route(
            "/api/v1/drives/student/:usn",
            get(open_for_student_handler::<S, D, N>),
        )
        .route(
            "/api/v1/drives/student/:usn/all",
            get(all_for_student_handler::<S, D, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplicationStatusRequest {
    pub(crate) status: ApplicationStatus,
}

pub(crate) async fn list_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.list() {
        Ok(drives) => (StatusCode::OK, axum::Json(drives)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    axum::Json(payload): axum::Json<NewDrive>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.create(payload) {
        Ok(drive) => (StatusCode::CREATED, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.fetch(&DriveId(id)) {
        Ok(drive) => (StatusCode::OK, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(payload): axum::Json<DriveUpdate>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.update(&DriveId(id), payload) {
        Ok(drive) => (StatusCode::OK, axum::Json(drive)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.remove(&DriveId(id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn publish_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.publish(&DriveId(id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn shortlist_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.shortlist(&DriveId(id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn application_status_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path((id, usn)): Path<(String, String)>,
    axum::Json(payload): axum::Json<ApplicationStatusRequest>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.set_application_status(&DriveId(id), &Usn::new(&usn), payload.status) {
        Ok(change) => (StatusCode::OK, axum::Json(change)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn open_for_student_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(usn): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.open_drives_for(&Usn::new(&usn)) {
        Ok(drives) => (StatusCode::OK, axum::Json(drives)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn all_for_student_handler<S, D, N>(
    State(service): State<Arc<DriveService<S, D, N>>>,
    Path(usn): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.drives_with_eligibility(&Usn::new(&usn)) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: DriveServiceError) -> Response {
    let status = match &err {
        DriveServiceError::DriveNotFound | DriveServiceError::StudentNotFound => {
            StatusCode::NOT_FOUND
        }
        DriveServiceError::Validation(_) | DriveServiceError::StatusRegression { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        DriveServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DriveServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DriveServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
