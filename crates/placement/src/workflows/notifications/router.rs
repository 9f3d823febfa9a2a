use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde_json::json;

use crate::storage::RepositoryError;
use crate::workflows::directory::domain::Usn;

use super::dispatcher::NotificationDispatcher;
use super::domain::NotificationId;
use super::store::NotificationStore;

/// Router builder exposing the student notification inbox.
pub fn notification_router<N>(dispatcher: Arc<NotificationDispatcher<N>>) -> Router
where
    N: NotificationStore + 'static,
{
    Router::new()
        .route("/api/v1/notifications/:usn", get(feed_handler::<N>))
        .route(
            "/api/v1/notifications/:id/read",
            put(mark_read_handler::<N>),
        )
        .route(
            "/api/v1/notifications/markall/:usn",
            put(mark_all_read_handler::<N>),
        )
        .with_state(dispatcher)
}

pub(crate) async fn feed_handler<N>(
    State(dispatcher): State<Arc<NotificationDispatcher<N>>>,
    Path(usn): Path<String>,
) -> Response
where
    N: NotificationStore + 'static,
{
    match dispatcher.feed(&Usn::new(&usn)) {
        Ok(feed) => (StatusCode::OK, axum::Json(feed)).into_response(),
        Err(err) => storage_error_response(err),
    }
}

pub(crate) async fn mark_read_handler<N>(
    State(dispatcher): State<Arc<NotificationDispatcher<N>>>,
    Path(id): Path<String>,
) -> Response
where
    N: NotificationStore + 'static,
{
    match dispatcher.mark_read(&NotificationId(id)) {
        Ok(()) => (StatusCode::OK, axum::Json(json!({ "success": true }))).into_response(),
        Err(err) => storage_error_response(err),
    }
}

pub(crate) async fn mark_all_read_handler<N>(
    State(dispatcher): State<Arc<NotificationDispatcher<N>>>,
    Path(usn): Path<String>,
) -> Response
where
    N: NotificationStore + 'static,
{
    match dispatcher.mark_all_read(&Usn::new(&usn)) {
        Ok(updated) => (
            StatusCode::OK,
            axum::Json(json!({ "success": true, "updated": updated })),
        )
            .into_response(),
        Err(err) => storage_error_response(err),
    }
}

fn storage_error_response(err: RepositoryError) -> Response {
    let status = match err {
        RepositoryError::NotFound => StatusCode::NOT_FOUND,
        RepositoryError::Conflict => StatusCode::CONFLICT,
        RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
