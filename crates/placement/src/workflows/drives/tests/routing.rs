use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::{build_service, new_drive, student};
use crate::workflows::directory::repository::StudentRepository;
use crate::workflows::drives::router::{self, drive_router};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn create_route_returns_created_with_the_snapshot() {
    let (service, students, _) = build_service();
    students
        .insert(student("1VV21CS001", Some(8.5), Some(0)))
        .expect("seed");
    let router = drive_router(service);

    let payload = json!({
        "company_name": "Innova Systems",
        "criteria": { "min_cgpa": 7.0 }
    });
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/drives")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(payload.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["eligible_count"], json!(1));
    assert_eq!(body["status"], json!("upcoming"));
}

#[tokio::test]
async fn fetch_route_reports_missing_drives() {
    let (service, _, _) = build_service();
    let router = drive_router(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/drives/drv-999999")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn publish_route_returns_the_notified_count() {
    let (service, students, _) = build_service();
    students
        .insert(student("1VV21CS001", Some(8.5), Some(0)))
        .expect("seed");
    let drive = service.create(new_drive("Innova Systems", 7.0)).expect("create");
    let router = drive_router(service);

    let response = router
        .oneshot(
            axum::http::Request::post(format!("/api/v1/drives/{}/publish", drive.id.0))
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["notified"], json!(1));
}

#[tokio::test]
async fn status_handler_rejects_regressions_as_unprocessable() {
    let (service, students, _) = build_service();
    students
        .insert(student("1VV21CS001", Some(9.5), Some(0)))
        .expect("seed");
    let drive = service.create(new_drive("Innova Systems", 7.0)).expect("create");
    service.shortlist(&drive.id).expect("shortlist");

    let response = router::application_status_handler(
        State(service),
        Path((drive.id.0.clone(), "1VV21CS001".to_string())),
        axum::Json(serde_json::from_value(json!({ "status": "applied" })).expect("payload")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn student_views_route_includes_reasons() {
    let (service, students, _) = build_service();
    students
        .insert(student("1VV21CS001", Some(8.0), Some(0)))
        .expect("seed");
    service.create(new_drive("Quanta Labs", 9.0)).expect("create");
    let router = drive_router(service);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/v1/drives/student/1vv21cs001/all")
                .body(axum::body::Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["is_eligible"], json!(false));
    assert_eq!(body[0]["ineligible_reasons"][0], json!("CGPA 8 < required 9"));
}
