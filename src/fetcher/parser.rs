//! Parsing of yt-dlp progress output
//!
//! With `--newline`, yt-dlp emits one `[download]` line per progress tick:
//!
//! ```text
//! [download]  42.3% of 4.05MiB at 1.21MiB/s ETA 00:02
//! [download] 100% of 4.05MiB in 00:03
//! ```

use regex::Regex;
use std::sync::OnceLock;

/// A progress tick parsed out of one yt-dlp output line
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedProgress {
    /// Fetch fraction in [0.0, 1.0]
    pub fraction: f32,
    /// Transfer speed as printed by the tool, when present
    pub speed: Option<String>,
}

fn progress_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // constant pattern, cannot fail
        Regex::new(r"^\[download\]\s+(\d+(?:\.\d+)?)%(?:.*?\bat\s+(\S+))?").unwrap()
    })
}

/// Parse one line of yt-dlp output into a progress tick.
///
/// Returns `None` for every line that is not a `[download] NN%` progress
/// line (destinations, extractor chatter, warnings).
pub fn parse_progress_line(line: &str) -> Option<ParsedProgress> {
    let captures = progress_regex().captures(line.trim())?;

    let percent: f32 = captures.get(1)?.as_str().parse().ok()?;
    let speed = captures.get(2).map(|m| m.as_str().to_string());

    Some(ParsedProgress {
        fraction: (percent / 100.0).clamp(0.0, 1.0),
        speed,
    })
}
