use std::io::Cursor;
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
use crate::workflows::drives::domain::EligibilityCriteria;

use super::domain::Usn;
use super::repository::StudentRepository;
use super::service::{DirectoryError, DirectoryService, NewStudent, StudentUpdate};

/// Router builder exposing student CRUD, roster import, and the operator's
/// eligibility preview.
pub fn directory_router<S>(service: Arc<DirectoryService<S>>) -> Router
where
    S: StudentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/students",
            get(list_handler::<S>).post(register_handler::<S>),
        )
        .route(
            "/api/v1/students/:usn",
            get(fetch_handler::<S>)
                .delete(remove_handler::<S>)
                .put(update_handler::<S>),
        )
        .route("/api/v1/students/import", post(import_handler::<S>))
        .route("/api/v1/students/eligible", post(eligible_handler::<S>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RosterImportRequest {
    pub(crate) csv: String,
}

pub(crate) async fn list_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.list() {
        Ok(students) => (StatusCode::OK, axum::Json(students)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn register_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    axum::Json(payload): axum::Json<NewStudent>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.register(payload) {
        Ok(student) => (StatusCode::CREATED, axum::Json(student)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    Path(usn): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.fetch(&Usn::new(&usn)) {
        Ok(student) => (StatusCode::OK, axum::Json(student)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    Path(usn): Path<String>,
    axum::Json(payload): axum::Json<StudentUpdate>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.update_profile(&Usn::new(&usn), payload) {
        Ok(student) => (StatusCode::OK, axum::Json(student)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    Path(usn): Path<String>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.remove(&Usn::new(&usn)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn import_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    axum::Json(payload): axum::Json<RosterImportRequest>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.import_roster(Cursor::new(payload.csv.into_bytes())) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn eligible_handler<S>(
    State(service): State<Arc<DirectoryService<S>>>,
    axum::Json(criteria): axum::Json<EligibilityCriteria>,
) -> Response
where
    S: StudentRepository + 'static,
{
    match service.eligible_for(&criteria) {
        Ok(students) => {
            let payload = json!({ "count": students.len(), "students": students });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: DirectoryError) -> Response {
    let status = match &err {
        DirectoryError::NotFound => StatusCode::NOT_FOUND,
        DirectoryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DirectoryError::Import(_) => StatusCode::BAD_REQUEST,
        DirectoryError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        DirectoryError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DirectoryError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
