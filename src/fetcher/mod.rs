//! Audio fetch collaborators
//!
//! The pipeline treats fetching as an external concern behind the
//! [`AudioFetcher`] trait: production uses [`CliFetcher`] (yt-dlp as a
//! subprocess), tests substitute mock fetchers.
//!
//! Progress flows back through an unbounded channel of [`ProgressEvent`]s.
//! Fetchers report raw fetch fractions in [0.0, 1.0]; scaling into the job's
//! overall progress band is the pipeline's business.

mod cli;
mod parser;

pub use cli::CliFetcher;
pub use parser::{ParsedProgress, parse_progress_line};

use crate::error::Result;
use crate::types::{FetchResult, Quality};
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One progress report from a running fetch
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressEvent {
    /// Fraction of the raw fetch done, in [0.0, 1.0]
    pub fraction: f32,
    /// Human-readable line describing the current state
    pub status_line: String,
}

/// Sender half of a fetch progress channel
pub type ProgressSender = mpsc::UnboundedSender<ProgressEvent>;

/// Receiver half of a fetch progress channel
pub type ProgressReceiver = mpsc::UnboundedReceiver<ProgressEvent>;

/// Create a progress channel pair
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    mpsc::unbounded_channel()
}

/// Download audio for an input (URL or `ytsearch1:` query) to disk
#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Run the fetch to completion.
    ///
    /// `input` is passed to the tool verbatim; callers wrap plain-text
    /// queries in a search prefix themselves. Progress events are sent on
    /// `progress` best-effort; a dropped receiver must not abort the fetch.
    async fn fetch(
        &self,
        input: &str,
        quality: Quality,
        progress: ProgressSender,
    ) -> Result<FetchResult>;
}
