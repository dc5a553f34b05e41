//! Catalog platform (Spotify-style) metadata client
//!
//! Authenticates with the client-credentials flow: client id and secret are
//! sent base64-encoded as Basic auth to the token endpoint, and the returned
//! bearer token is cached for subsequent track lookups. The cache is refilled
//! whenever a lookup finds it empty; token expiry handling beyond that is out
//! of scope.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::config::CatalogConfig;
use crate::error::{Error, Result};
use crate::metadata::MetadataLookup;
use crate::types::TrackMetadata;

/// Client for the catalog platform's track API
pub struct CatalogClient {
    config: CatalogConfig,
    http: reqwest::Client,
    access_token: Mutex<Option<String>>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct TrackResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ArtistEntry>,
    #[serde(default)]
    album: Option<AlbumEntry>,
    #[serde(default)]
    duration_ms: Option<u64>,
}

#[derive(Deserialize)]
struct ArtistEntry {
    name: String,
}

#[derive(Deserialize)]
struct AlbumEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    images: Vec<ImageEntry>,
    #[serde(default)]
    release_date: Option<String>,
}

#[derive(Deserialize)]
struct ImageEntry {
    url: String,
}

impl CatalogClient {
    /// Create a client from configuration
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            access_token: Mutex::new(None),
        }
    }

    /// Whether credentials are configured at all
    pub fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty() && !self.config.client_secret.is_empty()
    }

    /// Extract the track id from a /track/{id} URL or pass a bare id through.
    ///
    /// Trailing query strings are stripped so share links work unmodified.
    fn track_id(identifier: &str) -> String {
        let after = match identifier.split("/track/").last() {
            Some(rest) => rest,
            None => identifier,
        };
        after.split('?').next().unwrap_or(after).to_string()
    }

    /// Fetch a bearer token and cache it
    async fn authenticate(&self) -> Result<String> {
        if !self.is_configured() {
            return Err(Error::MetadataLookup(
                "catalog credentials not configured".to_string(),
            ));
        }

        let basic = BASE64.encode(format!(
            "{}:{}",
            self.config.client_id, self.config.client_secret
        ));

        let response = self
            .http
            .post(&self.config.token_url)
            .header("Authorization", format!("Basic {basic}"))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| Error::MetadataLookup(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::MetadataLookup(format!(
                "token request returned HTTP {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::MetadataLookup(format!("invalid token response: {e}")))?;

        let mut cached = self.access_token.lock().await;
        *cached = Some(token.access_token.clone());
        Ok(token.access_token)
    }

    async fn token(&self) -> Result<String> {
        if let Some(token) = self.access_token.lock().await.clone() {
            return Ok(token);
        }
        self.authenticate().await
    }
}

#[async_trait]
impl MetadataLookup for CatalogClient {
    async fn lookup(&self, identifier: &str) -> Result<TrackMetadata> {
        let track_id = Self::track_id(identifier);
        let token = self.token().await?;

        tracing::debug!(track_id = %track_id, "looking up catalog track");

        let url = format!("{}/tracks/{}", self.config.api_base, track_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| Error::MetadataLookup(format!("track request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::MetadataLookup(format!(
                "track {} lookup returned HTTP {}",
                track_id,
                response.status()
            )));
        }

        let track: TrackResponse = response
            .json()
            .await
            .map_err(|e| Error::MetadataLookup(format!("invalid track response: {e}")))?;

        // The platform lists album images largest first
        let cover_url = track
            .album
            .as_ref()
            .and_then(|album| album.images.first())
            .map(|image| image.url.clone());

        let year = track
            .album
            .as_ref()
            .and_then(|album| album.release_date.as_deref())
            .and_then(|date| date.split('-').next())
            .map(str::to_string);

        Ok(TrackMetadata {
            title: track.name,
            artists: track.artists.into_iter().map(|a| a.name).collect(),
            album: track.album.and_then(|album| album.name),
            year,
            cover_url,
            duration_secs: track.duration_ms.map(|ms| (ms / 1000) as u32),
        })
    }
}
