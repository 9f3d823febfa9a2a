use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;
use crate::workflows::directory::repository::StudentRepository;

use super::domain::{AssessmentId, AttemptId, NewAssessment, WarningOutcome, WARNING_LIMIT};
use super::repository::{AssessmentRepository, AttemptRepository};
use super::service::{AssessmentError, AssessmentService};

/// Router builder exposing the assessment catalog, the taking flow, and the
/// attempt state machine.
pub fn assessment_router<A, T, S>(service: Arc<AssessmentService<A, T, S>>) -> Router
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments",
            get(list_handler::<A, T, S>).post(create_handler::<A, T, S>),
        )
        .route(
            "/api/v1/assessments/:id",
            get(fetch_handler::<A, T, S>).delete(remove_handler::<A, T, S>),
        )
        .route(
            "/api/v1/assessments/:id/toggle",
            post(toggle_handler::<A, T, S>),
        )
        .route("/api/v1/assessments/:id/take", get(take_handler::<A, T, S>))
        .route(
            "/api/v1/assessments/:id/start",
            post(start_handler::<A, T, S>),
        )
        .route(
            "/api/v1/assessments/:id/attempts",
            get(attempts_handler::<A, T, S>),
        )
        .route(
            "/api/v1/assessments/attempts/:attempt_id/warning",
            post(warning_handler::<A, T, S>),
        )
        .route(
            "/api/v1/assessments/attempts/:attempt_id/submit",
            post(submit_handler::<A, T, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartRequest {
    pub(crate) usn: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WarningRequest {
    pub(crate) event: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    #[serde(default)]
    pub(crate) answers: HashMap<usize, String>,
}

pub(crate) async fn list_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.list() {
        Ok(assessments) => (StatusCode::OK, axum::Json(assessments)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn create_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    axum::Json(payload): axum::Json<NewAssessment>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.create(payload) {
        Ok(assessment) => (StatusCode::CREATED, axum::Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn fetch_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.fetch(&AssessmentId(id)) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn remove_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.remove(&AssessmentId(id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn toggle_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.toggle_active(&AssessmentId(id)) {
        Ok(assessment) => (StatusCode::OK, axum::Json(assessment)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn take_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.take_view(&AssessmentId(id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn start_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
    axum::Json(payload): axum::Json<StartRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.start_attempt(&AssessmentId(id), &Usn::new(&payload.usn)) {
        Ok(start) => {
            let resumed = start.resumed();
            let payload = json!({ "resumed": resumed, "attempt": start.attempt() });
            let status = if resumed {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, axum::Json(payload)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn warning_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(attempt_id): Path<String>,
    axum::Json(payload): axum::Json<WarningRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.record_warning(&AttemptId(attempt_id), &payload.event) {
        Ok((outcome, attempt)) => {
            let body = match outcome {
                WarningOutcome::Recorded { warnings } => json!({
                    "status": attempt.status,
                    "warnings": warnings,
                    "remaining": WARNING_LIMIT - warnings,
                }),
                WarningOutcome::Flagged | WarningOutcome::Ignored => json!({
                    "status": attempt.status,
                    "warnings": attempt.warnings,
                    "remaining": 0,
                }),
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn submit_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(attempt_id): Path<String>,
    axum::Json(payload): axum::Json<SubmitRequest>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.submit(&AttemptId(attempt_id), payload.answers) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn attempts_handler<A, T, S>(
    State(service): State<Arc<AssessmentService<A, T, S>>>,
    Path(id): Path<String>,
) -> Response
where
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    S: StudentRepository + 'static,
{
    match service.attempts_for(&AssessmentId(id)) {
        Ok(attempts) => (StatusCode::OK, axum::Json(attempts)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: AssessmentError) -> Response {
    let status = match &err {
        AssessmentError::AssessmentNotFound
        | AssessmentError::AttemptNotFound
        | AssessmentError::StudentNotFound => StatusCode::NOT_FOUND,
        AssessmentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AssessmentError::AlreadyCompleted(_) => StatusCode::CONFLICT,
        AssessmentError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        AssessmentError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AssessmentError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
