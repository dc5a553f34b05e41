//! Job handlers: submit, inspect, cancel, delete, event streams.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{
        IntoResponse,
        sse::{Event as SseEvent, KeepAlive, Sse},
    },
};
use futures::Stream;
use std::convert::Infallible;
use tokio_stream::StreamExt;

use super::{SubmitJobRequest, SubmitJobResponse};
use crate::api::AppState;
use crate::error::{ApiError, Error, Result};
use crate::types::{JobId, JobRecord};

/// POST /jobs - Submit a download job
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    tag = "jobs",
    request_body = SubmitJobRequest,
    responses(
        (status = 202, description = "Job accepted", body = SubmitJobResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 503, description = "Shutting down, not accepting jobs", body = ApiError)
    )
)]
pub async fn submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> Result<impl IntoResponse> {
    if request.url.trim().is_empty() {
        return Err(Error::Config {
            message: "url must not be empty".to_string(),
            key: Some("url".to_string()),
        });
    }

    let job_id = state
        .downloader
        .submit(request.url, request.quality, request.metadata)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitJobResponse {
            job_id,
            status: "started".to_string(),
        }),
    ))
}

/// GET /jobs - List all jobs
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "jobs",
    responses(
        (status = 200, description = "All job records, newest first", body = [JobRecord])
    )
)]
pub async fn list_jobs(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.downloader.list_jobs().await)
}

/// GET /jobs/:id - Get a single job
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job identifier")
    ),
    responses(
        (status = 200, description = "Job record", body = JobRecord),
        (status = 404, description = "Job not found", body = ApiError)
    )
)]
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let record = state.downloader.get_job(&JobId::from(id)).await?;
    Ok(Json(record))
}

/// DELETE /jobs/:id - Remove a job record
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{id}",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job identifier")
    ),
    responses(
        (status = 204, description = "Job removed"),
        (status = 404, description = "Job not found", body = ApiError)
    )
)]
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    state.downloader.delete_job(&JobId::from(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /jobs/:id/cancel - Cancel a pending job
#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/cancel",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job identifier")
    ),
    responses(
        (status = 200, description = "Job cancelled", body = JobRecord),
        (status = 400, description = "Job is not pending", body = ApiError),
        (status = 404, description = "Job not found", body = ApiError)
    )
)]
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = JobId::from(id);
    state.downloader.cancel_job(&id).await?;
    let record = state.downloader.get_job(&id).await?;
    Ok(Json(record))
}

/// GET /jobs/:id/events - Server-sent events stream for one job
///
/// Emits a `snapshot` event whenever the job's status, progress, or status
/// line changes, ending with the terminal snapshot. Subscribing to an
/// unknown id yields a single failed snapshot.
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}/events",
    tag = "jobs",
    params(
        ("id" = String, Path, description = "Job identifier")
    ),
    responses(
        (status = 200, description = "Server-sent events stream (text/event-stream)", content_type = "text/event-stream")
    )
)]
pub async fn job_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Sse<impl Stream<Item = std::result::Result<SseEvent, Infallible>>> {
    let snapshots = state.downloader.subscribe(JobId::from(id));

    let sse_stream = snapshots.filter_map(|snapshot| {
        match serde_json::to_string(&snapshot) {
            Ok(json_data) => Some(Ok(SseEvent::default().event("snapshot").data(json_data))),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize job snapshot");
                None
            }
        }
    });

    Sse::new(sse_stream).keep_alive(KeepAlive::default())
}
