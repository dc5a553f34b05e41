//! # tune-dl
//!
//! Backend library for multi-platform music download applications.
//!
//! ## Design Philosophy
//!
//! tune-dl is designed to be:
//! - **Platform-aware** - Detects the source platform per submission and picks
//!   the right acquisition strategy, falling back to search when a platform
//!   cannot be fetched directly
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Library-first** - Purely a Rust crate for embedding; the REST API is
//!   an optional surface over the same downloader
//! - **Observable** - Every job exposes a de-duplicated snapshot stream that
//!   ends with its terminal state
//!
//! ## Quick Start
//!
//! ```no_run
//! use tune_dl::{MusicDownloader, Config, Quality};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let downloader = MusicDownloader::new(config).await?;
//!
//!     let job_id = downloader
//!         .submit(
//!             "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
//!             Quality::M4a320,
//!             None,
//!         )
//!         .await?;
//!
//!     // Follow the job until it reaches a terminal state
//!     let mut events = std::pin::pin!(downloader.subscribe(job_id));
//!     while let Some(snapshot) = events.next().await {
//!         println!("{}: {:.0}% - {}", snapshot.status, snapshot.progress * 100.0, snapshot.status_line);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Core downloader implementation (decomposed into focused submodules)
pub mod downloader;
/// Error types
pub mod error;
/// Audio acquisition via an external fetch tool
pub mod fetcher;
/// Platform metadata clients
pub mod metadata;
/// Per-job download pipeline
pub mod pipeline;
/// In-memory job store and progress reporting
pub mod store;
/// Metadata tag embedding
pub mod tagger;
/// Core types
pub mod types;

// Re-export commonly used types
pub use config::{
    ApiConfig, CatalogConfig, Config, DownloadConfig, EventsConfig, RegionalConfig, ToolsConfig,
};
pub use downloader::MusicDownloader;
pub use error::{ApiError, Error, ErrorDetail, Result, ToHttpStatus};
pub use fetcher::{AudioFetcher, CliFetcher};
pub use metadata::{CatalogClient, MetadataLookup, RegionalClient};
pub use store::{JobStore, ProgressReporter};
pub use tagger::{CliTagger, Tagger};
pub use types::{
    FetchResult, JobId, JobRecord, JobSnapshot, JobStatus, JobUpdate, Platform, Quality,
    TrackMetadata,
};

/// Helper function to run the downloader with graceful signal handling.
///
/// Waits for a termination signal and then calls the downloader's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use tune_dl::{MusicDownloader, Config, run_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Config::default();
///     let downloader = MusicDownloader::new(config).await?;
///
///     // Run with automatic signal handling
///     run_with_shutdown(downloader).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(downloader: MusicDownloader) -> Result<()> {
    wait_for_signal().await;
    downloader.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
