//! Regional platform (JioSaavn-style) metadata client
//!
//! The platform exposes a single api.php endpoint keyed by a `__call`
//! parameter. Song details come back in one of several shapes (keyed by song
//! id, inside a `songs` array, or under an arbitrary key), so parsing is
//! deliberately tolerant.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::RegionalConfig;
use crate::error::{Error, Result};
use crate::metadata::MetadataLookup;
use crate::types::TrackMetadata;

/// Client for the regional platform's song details API
pub struct RegionalClient {
    config: RegionalConfig,
    http: reqwest::Client,
}

impl RegionalClient {
    /// Create a client from configuration
    pub fn new(config: RegionalConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Extract the song id from a song URL: the last path segment after any
    /// trailing slash is stripped. Bare ids pass through unchanged.
    fn song_id(identifier: &str) -> &str {
        identifier
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(identifier)
    }

    /// Pull the song object out of whichever shape the API returned
    fn extract_song<'a>(data: &'a Value, song_id: &str) -> Option<&'a Value> {
        let map = data.as_object()?;

        if let Some(song) = map.get(song_id) {
            return Some(song);
        }
        if let Some(songs) = map.get("songs").and_then(Value::as_array) {
            if let Some(first) = songs.first() {
                return Some(first);
            }
        }
        // sometimes the song sits under an unrelated key
        map.values().find(|v| v.is_object())
    }

    fn string_field<'a>(song: &'a Value, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| song.get(*key).and_then(Value::as_str))
    }
}

#[async_trait]
impl MetadataLookup for RegionalClient {
    async fn lookup(&self, identifier: &str) -> Result<TrackMetadata> {
        let song_id = Self::song_id(identifier);

        tracing::debug!(song_id = %song_id, "looking up regional song details");

        let response = self
            .http
            .get(&self.config.api_base)
            .query(&[
                ("__call", "song.getDetails"),
                ("cc", "in"),
                ("pids", song_id),
                ("_format", "json"),
                ("_marker", "0"),
            ])
            .send()
            .await
            .map_err(|e| Error::MetadataLookup(format!("song details request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::MetadataLookup(format!(
                "song {} lookup returned HTTP {}",
                song_id,
                response.status()
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| Error::MetadataLookup(format!("invalid song details response: {e}")))?;

        let song = Self::extract_song(&data, song_id)
            .ok_or_else(|| Error::MetadataLookup(format!("song {song_id} not found")))?;

        let title = Self::string_field(song, &["song", "title"])
            .unwrap_or("Unknown")
            .to_string();

        // artists arrive as one comma-separated string under varying keys
        let artists = Self::string_field(song, &["primary_artists", "singer", "artist"])
            .map(|joined| {
                joined
                    .split(',')
                    .map(|artist| artist.trim().to_string())
                    .filter(|artist| !artist.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let album = Self::string_field(song, &["album", "album_name"]).map(str::to_string);
        let year = Self::string_field(song, &["year"]).map(str::to_string);
        let cover_url =
            Self::string_field(song, &["image", "media_preview_url"]).map(str::to_string);

        let duration_secs = song
            .get("duration")
            .and_then(|d| match d {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.parse().ok(),
                _ => None,
            })
            .map(|secs| secs as u32);

        Ok(TrackMetadata {
            title,
            artists,
            album,
            year,
            cover_url,
            duration_secs,
        })
    }
}
