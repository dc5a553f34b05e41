//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the tune-dl REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the tune-dl REST API
///
/// This struct is used to generate the OpenAPI specification that describes
/// all available endpoints, request/response types, and API behavior.
///
/// The spec can be accessed via:
/// - `/api/v1/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "tune-dl REST API",
        version = "0.2.0",
        description = "REST API for submitting and monitoring multi-platform music download jobs",
        contact(
            name = "tune-dl",
            url = "https://github.com/tune-dl/tune-dl"
        ),
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:8000/api/v1", description = "Local development server")
    ),
    paths(
        // Jobs
        crate::api::routes::submit_job,
        crate::api::routes::list_jobs,
        crate::api::routes::get_job,
        crate::api::routes::delete_job,
        crate::api::routes::cancel_job,
        crate::api::routes::job_events,

        // Metadata
        crate::api::routes::catalog_metadata,
        crate::api::routes::regional_metadata,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
        crate::api::routes::shutdown,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::JobId,
        crate::types::JobStatus,
        crate::types::Platform,
        crate::types::Quality,
        crate::types::TrackMetadata,
        crate::types::JobRecord,
        crate::types::JobSnapshot,

        // Config types from config.rs
        crate::config::Config,
        crate::config::DownloadConfig,
        crate::config::ToolsConfig,
        crate::config::CatalogConfig,
        crate::config::RegionalConfig,
        crate::config::ApiConfig,
        crate::config::EventsConfig,

        // API request/response types from routes
        crate::api::routes::SubmitJobRequest,
        crate::api::routes::SubmitJobResponse,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "jobs", description = "Download jobs - Submit, monitor, cancel, and prune jobs"),
        (name = "metadata", description = "Metadata lookups - Resolve platform track metadata"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec, shutdown"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Security addon to add API key authentication scheme to OpenAPI spec
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = &mut openapi.components {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new("X-Api-Key"),
                    ),
                ),
            );
        }
    }
}
