use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use placement::storage::RepositoryError;
use placement::workflows::assessments::{
    assessment_router, AssessmentRepository, AssessmentService, AttemptRepository,
};
use placement::workflows::directory::{directory_router, DirectoryService, StudentRepository};
use placement::workflows::drives::{drive_router, DriveRepository, DriveService};
use placement::workflows::interviews::{interview_router, InterviewService, SlotRepository};
use placement::workflows::notifications::{
    notification_router, NotificationDispatcher, NotificationStore,
};
use placement::workflows::reporting::DashboardStats;
use serde_json::json;
use std::sync::Arc;

pub(crate) struct DashboardContext<S, D, A> {
    pub(crate) students: Arc<S>,
    pub(crate) drives: Arc<D>,
    pub(crate) assessments: Arc<A>,
}

impl<S, D, A> Clone for DashboardContext<S, D, A> {
    fn clone(&self) -> Self {
        Self {
            students: self.students.clone(),
            drives: self.drives.clone(),
            assessments: self.assessments.clone(),
        }
    }
}

pub(crate) fn with_placement_routes<S, D, A, T, P, N>(
    directory: Arc<DirectoryService<S>>,
    drives: Arc<DriveService<S, D, N>>,
    assessments: Arc<AssessmentService<A, T, S>>,
    interviews: Arc<InterviewService<P, S, D, N>>,
    notifications: Arc<NotificationDispatcher<N>>,
    dashboard: DashboardContext<S, D, A>,
) -> Router
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    A: AssessmentRepository + 'static,
    T: AttemptRepository + 'static,
    P: SlotRepository + 'static,
    N: NotificationStore + 'static,
{
    Router::new()
        .merge(directory_router(directory))
        .merge(drive_router(drives))
        .merge(assessment_router(assessments))
        .merge(interview_router(interviews))
        .merge(notification_router(notifications))
        .route(
            "/api/v1/dashboard/stats",
            axum::routing::get(dashboard_stats_endpoint::<S, D, A>).with_state(dashboard),
        )
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dashboard_stats_endpoint<S, D, A>(
    State(context): State<DashboardContext<S, D, A>>,
) -> Response
where
    S: StudentRepository + 'static,
    D: DriveRepository + 'static,
    A: AssessmentRepository + 'static,
{
    let snapshot = context.students.list().and_then(|students| {
        let drives = context.drives.list()?;
        let assessments = context.assessments.list()?;
        Ok(DashboardStats::collect(
            &students,
            &drives,
            assessments.len(),
        ))
    });

    match snapshot {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => storage_error_response(err),
    }
}

fn storage_error_response(err: RepositoryError) -> Response {
    let status = match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
