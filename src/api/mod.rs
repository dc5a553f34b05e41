//! REST API server module
//!
//! Provides an OpenAPI compliant REST API for submitting download jobs,
//! monitoring their progress, and looking up platform metadata.

use crate::{Config, MusicDownloader, Result};
use axum::{
    Router,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error_response;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use state::AppState;

/// Create the API router with all route definitions
///
/// # Routes
///
/// ## Jobs
/// - `POST /jobs` - Submit a download job
/// - `GET /jobs` - List all jobs
/// - `GET /jobs/:id` - Get a single job
/// - `DELETE /jobs/:id` - Remove a job record
/// - `POST /jobs/:id/cancel` - Cancel a pending job
/// - `GET /jobs/:id/events` - Server-sent events stream for one job
///
/// ## Metadata
/// - `GET /metadata/catalog/:id` - Catalog platform track metadata
/// - `GET /metadata/regional/:id` - Regional platform song metadata
///
/// ## System
/// - `GET /health` - Health check
/// - `GET /openapi.json` - OpenAPI specification
/// - `GET /swagger-ui` - Interactive Swagger UI documentation (if enabled)
/// - `POST /shutdown` - Stop accepting new jobs
pub fn create_router(downloader: Arc<MusicDownloader>, config: Arc<Config>) -> Router {
    let state = AppState::new(downloader, config.clone());

    let router = Router::new()
        // Jobs
        .route("/jobs", post(routes::submit_job))
        .route("/jobs", get(routes::list_jobs))
        .route("/jobs/:id", get(routes::get_job))
        .route("/jobs/:id", delete(routes::delete_job))
        .route("/jobs/:id/cancel", post(routes::cancel_job))
        .route("/jobs/:id/events", get(routes::job_events))
        // Metadata
        .route("/metadata/catalog/:id", get(routes::catalog_metadata))
        .route("/metadata/regional/:id", get(routes::regional_metadata))
        // System
        .route("/health", get(routes::health_check))
        .route("/openapi.json", get(routes::openapi_spec))
        .route("/shutdown", post(routes::shutdown));

    // Merge Swagger UI routes if enabled in config (before applying state)
    let router = if config.api.serve_swagger_ui {
        router.merge(SwaggerUi::new("/swagger-ui").url("/api/v1/openapi.json", ApiDoc::openapi()))
    } else {
        router
    };

    let router = router.with_state(state);

    // Apply authentication middleware if an API key is configured
    let router = if config.api.api_key.is_some() {
        router.layer(middleware::from_fn_with_state(
            config.api.api_key.clone(),
            auth::require_api_key,
        ))
    } else {
        router
    };

    // CORS is permissive: the API is meant to sit behind local frontends
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

/// Start the API server on the configured bind address.
///
/// Creates a TCP listener, binds it to the configured address, and serves
/// the API router until the server stops.
///
/// # Example
///
/// ```no_run
/// use tune_dl::{MusicDownloader, Config};
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Arc::new(Config::default());
/// let downloader = Arc::new(MusicDownloader::new((*config).clone()).await?);
///
/// // Start API server (blocks until shutdown)
/// tune_dl::api::start_api_server(downloader, config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn start_api_server(
    downloader: Arc<MusicDownloader>,
    config: Arc<Config>,
) -> Result<()> {
    let bind_address = config.api.bind_address;

    tracing::info!(address = %bind_address, "Starting API server");

    let app = create_router(downloader, config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(crate::error::Error::Io)?;

    tracing::info!(address = %bind_address, "API server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| crate::error::Error::ApiServerError(e.to_string()))?;

    tracing::info!("API server stopped");
    Ok(())
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
