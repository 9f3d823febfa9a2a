use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use crate::storage::RepositoryError;
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::drives::domain::DriveId;
use crate::workflows::drives::repository::DriveRepository;
use crate::workflows::notifications::store::NotificationStore;

use super::domain::SlotId;
use super::repository::SlotRepository;
use super::service::{InterviewError, InterviewService, NewSlot, SlotUpdate};

/// Router builder exposing slot CRUD, the candidate picker, and the
/// notification endpoints.
pub fn interview_router<P, S, D, N>(service: Arc<InterviewService<P, S, D, N>>) -> Router
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/interviews/slots",
            get(list_handler::<P, S, D, N>).post(create_handler::<P, S, D, N>),
        )
        .route(
            "/api/v1/interviews/slots/:id",
            axum::routing::put(update_handler::<P, S, D, N>)
                .delete(remove_handler::<P, S, D, N>),
        )
        .route(
            "/api/v1/interviews/slots/drive/:drive_id",
            get(for_drive_handler::<P, S, D, N>),
        )
        .route(
            "/api/v1/interviews/candidates/:drive_id",
            get(candidates_handler::<P, S, D, N>),
        )
        .route(
            "/api/v1/interviews/notify/:slot_id",
            post(notify_slot_handler::<P, S, D, N>),
        )
        .route(
            "/api/v1/interviews/notify/drive/:drive_id",
            post(notify_drive_handler::<P, S, D, N>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.list() {
        Ok(slots) => (StatusCode::OK, axum::Json(slots)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    axum::Json(payload): axum::Json<NewSlot>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.create(payload) {
        Ok(slot) => (StatusCode::CREATED, axum::Json(slot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(id): Path<String>,
    axum::Json(payload): axum::Json<SlotUpdate>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.update(&SlotId(id), payload) {
        Ok(slot) => (StatusCode::OK, axum::Json(slot)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(id): Path<String>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.remove(&SlotId(id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn for_drive_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.slots_for_drive(&DriveId(drive_id)) {
        Ok(slots) => (StatusCode::OK, axum::Json(slots)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn candidates_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.candidates_for_drive(&DriveId(drive_id)) {
        Ok(students) => (StatusCode::OK, axum::Json(students)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notify_slot_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(slot_id): Path<String>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.notify_slot(&SlotId(slot_id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn notify_drive_handler<P, S, D, N>(
    State(service): State<Arc<InterviewService<P, S, D, N>>>,
    Path(drive_id): Path<String>,
) -> Response
where
    P: SlotRepository + 'static,
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    N: NotificationStore + 'static,
{
    match service.notify_drive(&DriveId(drive_id)) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: InterviewError) -> Response {
    let status = match &err {
        InterviewError::DriveNotFound
        | InterviewError::StudentNotFound
        | InterviewError::SlotNotFound => StatusCode::NOT_FOUND,
        InterviewError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        InterviewError::Overlap { .. } => StatusCode::CONFLICT,
        InterviewError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        InterviewError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        InterviewError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
