//! Metadata lookup handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::api::AppState;
use crate::error::{ApiError, Result};
use crate::types::TrackMetadata;

/// GET /metadata/catalog/:id - Catalog platform track metadata
///
/// Accepts a full track URL or a bare track id.
#[utoipa::path(
    get,
    path = "/api/v1/metadata/catalog/{id}",
    tag = "metadata",
    params(
        ("id" = String, Path, description = "Track URL or bare track id")
    ),
    responses(
        (status = 200, description = "Normalized track metadata", body = TrackMetadata),
        (status = 502, description = "Platform lookup failed", body = ApiError)
    )
)]
pub async fn catalog_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let metadata = state.downloader.catalog_metadata(&id).await?;
    Ok(Json(metadata))
}

/// GET /metadata/regional/:id - Regional platform song metadata
///
/// Accepts a full song URL or a bare song id.
#[utoipa::path(
    get,
    path = "/api/v1/metadata/regional/{id}",
    tag = "metadata",
    params(
        ("id" = String, Path, description = "Song URL or bare song id")
    ),
    responses(
        (status = 200, description = "Normalized track metadata", body = TrackMetadata),
        (status = 502, description = "Platform lookup failed", body = ApiError)
    )
)]
pub async fn regional_metadata(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let metadata = state.downloader.regional_metadata(&id).await?;
    Ok(Json(metadata))
}
