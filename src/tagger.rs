//! Tag and cover-art embedding collaborator
//!
//! Tagging is a best-effort finishing step: the pipeline calls
//! [`Tagger::embed`] after a successful fetch and treats any error as
//! recoverable, completing the job with the untagged file. The CLI
//! implementation remuxes with ffmpeg into a `<stem>_tagged.<ext>` sibling
//! and atomically replaces the original on success.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::types::TrackMetadata;

/// Embed track metadata (and cover art) into a finished audio file
#[async_trait]
pub trait Tagger: Send + Sync {
    /// Embed `metadata` into `audio_file` in place.
    ///
    /// Returns the path of the tagged file (same as the input path after the
    /// replace). Errors are advisory; callers keep the untagged file.
    async fn embed(&self, audio_file: &Path, metadata: &TrackMetadata) -> Result<PathBuf>;
}

/// CLI-based tagger using the external ffmpeg binary
pub struct CliTagger {
    binary_path: PathBuf,
    work_dir: PathBuf,
    http: reqwest::Client,
}

impl CliTagger {
    /// Create a new tagger with an explicit ffmpeg path
    pub fn new(binary_path: PathBuf, work_dir: PathBuf) -> Self {
        Self {
            binary_path,
            work_dir,
            http: reqwest::Client::new(),
        }
    }

    /// Attempt to find ffmpeg in PATH
    pub fn from_path(work_dir: PathBuf) -> Option<Self> {
        which::which("ffmpeg")
            .ok()
            .map(|path| Self::new(path, work_dir))
    }

    /// Download cover art to a scratch file next to the downloads.
    ///
    /// Failures are reported as [`Error::ArtFetch`]; the caller drops the
    /// art and tags without it.
    async fn fetch_cover_art(&self, url: &str) -> Result<PathBuf> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::ArtFetch(format!("cover art request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::ArtFetch(format!(
                "cover art request returned HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::ArtFetch(format!("cover art body read failed: {e}")))?;

        let cover_path = self.work_dir.join("cover_temp.jpg");
        tokio::fs::write(&cover_path, &bytes)
            .await
            .map_err(|e| Error::ArtFetch(format!("cover art write failed: {e}")))?;

        Ok(cover_path)
    }

    /// Build the ffmpeg argument list for a remux-tag run
    fn build_args(
        audio_file: &Path,
        cover_file: Option<&Path>,
        metadata: &TrackMetadata,
        output_file: &Path,
    ) -> Vec<String> {
        let mut args = vec![
            "-i".to_string(),
            audio_file.to_string_lossy().into_owned(),
            "-y".to_string(),
        ];

        if let Some(cover) = cover_file {
            args.push("-i".to_string());
            args.push(cover.to_string_lossy().into_owned());
            args.extend(
                ["-map", "0", "-map", "1", "-c", "copy", "-disposition:v", "attached_pic"]
                    .iter()
                    .map(|s| s.to_string()),
            );
        } else {
            args.push("-c".to_string());
            args.push("copy".to_string());
        }

        if !metadata.title.is_empty() {
            args.push("-metadata".to_string());
            args.push(format!("title={}", metadata.title));
        }
        if !metadata.artists.is_empty() {
            args.push("-metadata".to_string());
            args.push(format!("artist={}", metadata.artists.join(", ")));
        }
        if let Some(album) = &metadata.album {
            args.push("-metadata".to_string());
            args.push(format!("album={album}"));
        }
        if let Some(year) = &metadata.year {
            args.push("-metadata".to_string());
            args.push(format!("date={year}"));
        }

        args.push(output_file.to_string_lossy().into_owned());
        args
    }

    /// The `<stem>_tagged.<ext>` sibling path for an audio file
    fn tagged_path(audio_file: &Path) -> PathBuf {
        let stem = audio_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        let tagged_name = match audio_file.extension() {
            Some(ext) => format!("{stem}_tagged.{}", ext.to_string_lossy()),
            None => format!("{stem}_tagged"),
        };
        audio_file.with_file_name(tagged_name)
    }
}

#[async_trait]
impl Tagger for CliTagger {
    async fn embed(&self, audio_file: &Path, metadata: &TrackMetadata) -> Result<PathBuf> {
        if !tokio::fs::try_exists(audio_file).await.unwrap_or(false) {
            return Err(Error::TagEmbed(format!(
                "audio file not found: {}",
                audio_file.display()
            )));
        }

        // cover art is optional, never fatal
        let cover_file = match &metadata.cover_url {
            Some(url) => match self.fetch_cover_art(url).await {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "cover art fetch failed, tagging without art");
                    None
                }
            },
            None => None,
        };

        let output_file = Self::tagged_path(audio_file);
        let args = Self::build_args(audio_file, cover_file.as_deref(), metadata, &output_file);

        tracing::debug!(file = %audio_file.display(), "embedding tags with ffmpeg");

        let output = Command::new(&self.binary_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| Error::TagEmbed(format!("failed to execute ffmpeg: {e}")))?;

        if let Some(cover) = &cover_file {
            let _ = tokio::fs::remove_file(cover).await;
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("ffmpeg failed with no error output");
            return Err(Error::TagEmbed(format!(
                "ffmpeg exited with {}: {}",
                output.status, detail
            )));
        }

        // replace the original with the tagged version
        tokio::fs::rename(&output_file, audio_file)
            .await
            .map_err(|e| Error::TagEmbed(format!("failed to replace original: {e}")))?;

        Ok(audio_file.to_path_buf())
    }
}
