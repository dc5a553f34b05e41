//! CLI-based audio fetcher using the external yt-dlp binary

use super::parser::parse_progress_line;
use super::{AudioFetcher, ProgressEvent, ProgressSender};
use crate::error::{Error, Result};
use crate::types::{FetchResult, Quality};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;

/// CLI-based audio fetcher using the external yt-dlp binary
///
/// Runs yt-dlp with `--newline` so progress arrives one line at a time, and
/// `--print after_move:filepath` so the final output path is printed on its
/// own stdout line once all post-processing has finished.
///
/// # Examples
///
/// ```no_run
/// use tune_dl::fetcher::CliFetcher;
/// use std::path::PathBuf;
///
/// // Create with an explicit path
/// let fetcher = CliFetcher::new(
///     PathBuf::from("/usr/local/bin/yt-dlp"),
///     PathBuf::from("./downloads"),
///     "%(title)s.%(ext)s".to_string(),
/// );
///
/// // Or auto-discover from PATH
/// let fetcher = CliFetcher::from_path(
///     PathBuf::from("./downloads"),
///     "%(title)s.%(ext)s".to_string(),
/// ).expect("yt-dlp not found in PATH");
/// ```
pub struct CliFetcher {
    binary_path: PathBuf,
    download_dir: PathBuf,
    output_template: String,
}

impl CliFetcher {
    /// Create a new fetcher with an explicit binary path
    pub fn new(binary_path: PathBuf, download_dir: PathBuf, output_template: String) -> Self {
        Self {
            binary_path,
            download_dir,
            output_template,
        }
    }

    /// Attempt to find yt-dlp in PATH
    pub fn from_path(download_dir: PathBuf, output_template: String) -> Option<Self> {
        which::which("yt-dlp")
            .ok()
            .map(|path| Self::new(path, download_dir, output_template))
    }

    /// Build the yt-dlp argument list for an input and quality preset
    fn build_args(&self, input: &str, quality: Quality) -> Vec<String> {
        let output = self
            .download_dir
            .join(&self.output_template)
            .to_string_lossy()
            .into_owned();

        let mut args = vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--output".to_string(),
            output,
            "--no-playlist".to_string(),
            "--newline".to_string(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
        ];

        let preset = quality.preset();
        if let Some(codec) = preset.codec {
            args.push("--extract-audio".to_string());
            args.push("--audio-format".to_string());
            args.push(codec.to_string());
            if let Some(bitrate) = preset.bitrate {
                args.push("--audio-quality".to_string());
                args.push(format!("{bitrate}K"));
            }
        }

        args.push(input.to_string());
        args
    }
}

#[async_trait]
impl AudioFetcher for CliFetcher {
    async fn fetch(
        &self,
        input: &str,
        quality: Quality,
        progress: ProgressSender,
    ) -> Result<FetchResult> {
        let args = self.build_args(input, quality);

        tracing::debug!(input = %input, tool = %self.binary_path.display(), "spawning fetch");

        let mut child = Command::new(&self.binary_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::ExternalTool(format!("failed to execute yt-dlp: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ExternalTool("yt-dlp stdout not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ExternalTool("yt-dlp stderr not captured".to_string()))?;

        // drain stderr concurrently so the child never blocks on a full pipe
        let stderr_task = tokio::spawn(async move {
            let mut buf = String::new();
            let mut reader = BufReader::new(stderr);
            let _ = reader.read_to_string(&mut buf).await;
            buf
        });

        let mut output_path: Option<PathBuf> = None;
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed reading yt-dlp output: {e}")))?
        {
            if let Some(tick) = parse_progress_line(&line) {
                let speed = tick.speed.as_deref().unwrap_or("N/A");
                // receiver may be gone when the job was pruned mid-fetch
                let _ = progress.send(ProgressEvent {
                    fraction: tick.fraction,
                    status_line: format!(
                        "Downloading: {:.1}% - {}",
                        tick.fraction * 100.0,
                        speed
                    ),
                });
            } else {
                // the --print after_move:filepath line is the bare path,
                // everything else from yt-dlp is prefixed chatter
                let trimmed = line.trim();
                if !trimmed.is_empty()
                    && !trimmed.starts_with('[')
                    && !trimmed.starts_with("WARNING")
                    && !trimmed.starts_with("ERROR")
                {
                    output_path = Some(PathBuf::from(trimmed));
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Error::ExternalTool(format!("failed waiting for yt-dlp: {e}")))?;

        let stderr_text = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let detail = stderr_text
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("yt-dlp failed with no error output");
            return Err(Error::Fetch(format!(
                "yt-dlp exited with {}: {}",
                status, detail
            )));
        }

        let output_path = output_path
            .ok_or_else(|| Error::Fetch("yt-dlp did not report an output file".to_string()))?;

        Ok(FetchResult { output_path })
    }
}
