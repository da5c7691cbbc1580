//! Terminal presentation of generation results.
//!
//! Each item is listed with its kind and, for videos, the playback flags a
//! player should honour. Relative references are printed as absolute URLs.

use std::io::{self, Write};

use async_trait::async_trait;
use runner_client::render::MediaRenderer;
use runner_core::media::{MediaKind, MediaLoadError, VideoPlayback};

/// Writes one line per result item to `out`.
pub struct TerminalRenderer<W> {
    base_url: String,
    out: W,
}

impl<W: Write + Send> TerminalRenderer<W> {
    /// `base_url` resolves relative references.
    pub fn new(base_url: impl Into<String>, out: W) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Absolute URL for a result reference.
    pub fn resolve_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            reference.to_string()
        } else {
            format!("{}/{}", self.base_url, reference.trim_start_matches('/'))
        }
    }
}

#[async_trait]
impl<W: Write + Send> MediaRenderer for TerminalRenderer<W> {
    type Error = io::Error;

    async fn render_image(&mut self, index: usize, reference: &str) -> Result<(), Self::Error> {
        let url = self.resolve_url(reference);
        writeln!(self.out, "{}", image_line(index, &url))
    }

    async fn render_video(
        &mut self,
        index: usize,
        reference: &str,
        playback: VideoPlayback,
    ) -> Result<(), Self::Error> {
        let url = self.resolve_url(reference);
        writeln!(self.out, "{}", video_line(index, &url, playback))
    }

    fn report_load_failure(&mut self, failure: &MediaLoadError) {
        if let Err(e) = writeln!(self.out, "{}", failure_line(failure)) {
            tracing::warn!(
                target: "media",
                index = failure.index,
                error = %e,
                "Failed to write load failure",
            );
        }
    }
}

fn image_line(index: usize, url: &str) -> String {
    format!("[{index}] {:<5} {url}", MediaKind::Image.as_str())
}

fn video_line(index: usize, url: &str, playback: VideoPlayback) -> String {
    let mut flags = Vec::new();
    if playback.controls {
        flags.push("controls");
    }
    if playback.looped {
        flags.push("loop");
    }
    if playback.autoplay {
        flags.push("autoplay");
    }
    flags.push(if playback.muted { "muted" } else { "sound" });

    format!(
        "[{index}] {:<5} {url} ({})",
        MediaKind::Video.as_str(),
        flags.join(", ")
    )
}

fn failure_line(failure: &MediaLoadError) -> String {
    format!(
        "[{}] {:<5} {} FAILED: {}",
        failure.index,
        failure.kind.as_str(),
        failure.reference,
        failure.reason
    )
}
