//! Configuration types for tune-dl

use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Download behavior configuration (output directory, fetch tool behavior)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Download directory (default: "./downloads")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Output filename template passed to the fetch tool
    /// (default: "%(title)s.%(ext)s")
    #[serde(default = "default_output_template")]
    pub output_template: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            output_template: default_output_template(),
        }
    }
}

/// External tool paths (yt-dlp, ffmpeg)
///
/// Binaries are auto-detected on PATH when no explicit path is set.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolsConfig {
    /// Path to the yt-dlp executable (auto-detected if None)
    #[serde(default)]
    pub ytdlp_path: Option<PathBuf>,

    /// Path to the ffmpeg executable (auto-detected if None)
    #[serde(default)]
    pub ffmpeg_path: Option<PathBuf>,

    /// Whether to search PATH for external binaries if explicit paths not set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            ytdlp_path: None,
            ffmpeg_path: None,
            search_path: true,
        }
    }
}

/// Catalog platform (Spotify-style) API credentials
///
/// Used for metadata lookups via the client-credentials flow. Lookups are
/// disabled when either field is empty.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CatalogConfig {
    /// OAuth client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: String,

    /// API base URL (default: "https://api.spotify.com/v1")
    #[serde(default = "default_catalog_api_base")]
    pub api_base: String,

    /// Token endpoint URL (default: "https://accounts.spotify.com/api/token")
    #[serde(default = "default_catalog_token_url")]
    pub token_url: String,
}

/// Regional platform (JioSaavn-style) API settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RegionalConfig {
    /// API base URL (default: "https://www.jiosaavn.com/api.php")
    #[serde(default = "default_regional_api_base")]
    pub api_base: String,
}

impl Default for RegionalConfig {
    fn default() -> Self {
        Self {
            api_base: default_regional_api_base(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Bind address for the API server (default: 127.0.0.1:8000)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// API key for authentication (None = no authentication required)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Whether to serve the interactive Swagger UI (default: true)
    #[serde(default = "default_true")]
    pub serve_swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            serve_swagger_ui: true,
        }
    }
}

/// Event stream (SSE) configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct EventsConfig {
    /// Store poll interval in milliseconds (default: 500)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl EventsConfig {
    /// Poll interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Main configuration for [`MusicDownloader`](crate::MusicDownloader)
///
/// Fields are organized into logical sub-configs:
/// - [`download`](DownloadConfig) — output directory and filename template
/// - [`tools`](ToolsConfig) — external binary paths
/// - [`catalog`](CatalogConfig) — catalog platform API credentials
/// - [`regional`](RegionalConfig) — regional platform API base
/// - [`api`](ApiConfig) — REST server settings
/// - [`events`](EventsConfig) — SSE poll interval
///
/// Sub-config fields are flattened so the JSON format stays flat (no nesting).
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// External tool paths
    #[serde(flatten)]
    pub tools: ToolsConfig,

    /// Catalog platform credentials
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Regional platform settings
    #[serde(default)]
    pub regional: RegionalConfig,

    /// REST API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Event stream settings
    #[serde(default)]
    pub events: EventsConfig,
}

impl Config {
    /// Download directory
    pub fn download_dir(&self) -> &PathBuf {
        &self.download.download_dir
    }

    /// Validate the configuration, returning the first problem found
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.download.output_template.is_empty() {
            return Err(crate::error::Error::Config {
                message: "output template must not be empty".to_string(),
                key: Some("output_template".to_string()),
            });
        }
        if self.events.poll_interval_ms == 0 {
            return Err(crate::error::Error::Config {
                message: "poll interval must be at least 1 ms".to_string(),
                key: Some("poll_interval_ms".to_string()),
            });
        }
        Ok(())
    }
}

// Default value functions for serde

fn default_download_dir() -> PathBuf {
    PathBuf::from("./downloads")
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

fn default_catalog_api_base() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_catalog_token_url() -> String {
    "https://accounts.spotify.com/api/token".to_string()
}

fn default_regional_api_base() -> String {
    "https://www.jiosaavn.com/api.php".to_string()
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}
