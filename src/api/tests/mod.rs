//! Router-level tests exercising handlers through `tower::ServiceExt::oneshot`

use super::create_router;
use crate::downloader::test_helpers::{downloader_with_mocks, wait_for_terminal};
use crate::error::ApiError;
use crate::types::{JobId, JobStatus};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<crate::MusicDownloader>) {
    let downloader = Arc::new(downloader_with_mocks());
    let config = Arc::new(downloader.config().clone());
    (create_router(downloader.clone(), config), downloader)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_spec_served() {
    let (app, _) = test_app();

    let response = app.oneshot(get("/openapi.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["openapi"].as_str().unwrap().starts_with("3."));
}

#[tokio::test]
async fn test_submit_job_accepted() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json(
            "/jobs",
            json!({"url": "https://youtu.be/x", "quality": "best"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["status"], "started");
    assert!(!body["job_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_job_empty_url_is_rejected() {
    let (app, _) = test_app();

    let response = app
        .oneshot(post_json("/jobs", json!({"url": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: ApiError = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(error.error.code, "config_error");
}

#[tokio::test]
async fn test_submit_then_get_job() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/jobs", json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.oneshot(get(&format!("/jobs/{job_id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["id"], job_id.as_str());
    assert_eq!(body["source_url"], "https://youtu.be/x");
    // default quality applies when the request omits it
    assert_eq!(body["quality"], "m4a_320");
}

#[tokio::test]
async fn test_submit_accepts_documented_preset_names() {
    let (app, _) = test_app();

    for preset in ["m4a_320", "opus_160", "best"] {
        let response = app
            .clone()
            .oneshot(post_json(
                "/jobs",
                json!({"url": "https://youtu.be/x", "quality": preset}),
            ))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::ACCEPTED,
            "preset {preset} must be accepted"
        );

        let job_id = body_json(response).await["job_id"]
            .as_str()
            .unwrap()
            .to_string();
        let response = app.clone().oneshot(get(&format!("/jobs/{job_id}"))).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body["quality"], preset);
    }
}

#[tokio::test]
async fn test_get_unknown_job_is_404() {
    let (app, _) = test_app();

    let response = app.oneshot(get("/jobs/ghost")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_list_jobs_returns_submitted_jobs() {
    let (app, _) = test_app();

    for url in ["https://youtu.be/a", "https://youtu.be/b"] {
        app.clone()
            .oneshot(post_json("/jobs", json!({"url": url})))
            .await
            .unwrap();
    }

    let response = app.oneshot(get("/jobs")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_job() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/jobs", json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/jobs/{job_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&format!("/jobs/{job_id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_unknown_job_is_404() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/jobs/ghost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_terminal_job_is_rejected() {
    let (app, downloader) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/jobs", json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    wait_for_terminal(&downloader, &JobId::from(job_id.clone())).await;
    let record = downloader.get_job(&JobId::from(job_id.clone())).await.unwrap();
    assert_eq!(record.status, JobStatus::Completed);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/jobs/{job_id}/cancel"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_metadata_lookup_failure_is_bad_gateway() {
    // the mock lookups always fail, standing in for an unreachable platform
    let (app, _) = test_app();

    let response = app.oneshot(get("/metadata/catalog/abc123")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "metadata_lookup_failed");
}

#[tokio::test]
async fn test_shutdown_then_submit_is_service_unavailable() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/shutdown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .oneshot(post_json("/jobs", json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "shutting_down");
}

#[tokio::test]
async fn test_api_key_required_when_configured() {
    let downloader = Arc::new(downloader_with_mocks());
    let mut config = downloader.config().clone();
    config.api.api_key = Some("secret-key".to_string());
    let app = create_router(downloader, Arc::new(config));

    // without the header
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // with the header
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Api-Key", "secret-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_job_events_content_type() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(post_json("/jobs", json!({"url": "https://youtu.be/x"})))
        .await
        .unwrap();
    let job_id = body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .oneshot(get(&format!("/jobs/{job_id}/events")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/event-stream"
    );
}
