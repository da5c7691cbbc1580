//! Renderer contract for generation results.
//!
//! A [`MediaRenderer`] knows how to present one image or one video. The
//! [`render_results`] driver classifies each reference, dispatches it, and
//! turns a failed item into a [`MediaLoadError`] without stopping the rest.

use std::fmt;

use async_trait::async_trait;
use runner_core::media::{classify, MediaKind, MediaLoadError, VideoPlayback, VIDEO_PLAYBACK};

/// A surface able to present generation results.
#[async_trait]
pub trait MediaRenderer: Send {
    type Error: fmt::Display + Send;

    /// Present a static picture.
    async fn render_image(&mut self, index: usize, reference: &str) -> Result<(), Self::Error>;

    /// Present a video with the given playback flags.
    async fn render_video(
        &mut self,
        index: usize,
        reference: &str,
        playback: VideoPlayback,
    ) -> Result<(), Self::Error>;

    /// Show a distinguishable failure in place of an item that could not
    /// be loaded.
    fn report_load_failure(&mut self, failure: &MediaLoadError);
}

/// Outcome of presenting a full result list.
#[derive(Debug, Default)]
pub struct RenderReport {
    /// Number of items presented successfully.
    pub rendered: usize,
    pub failures: Vec<MediaLoadError>,
}

impl RenderReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Present every result in order.
pub async fn render_results<R: MediaRenderer>(renderer: &mut R, results: &[String]) -> RenderReport {
    let mut report = RenderReport::default();

    for (index, reference) in results.iter().enumerate() {
        let kind = classify(reference);
        let outcome = match kind {
            MediaKind::Image => renderer.render_image(index, reference).await,
            MediaKind::Video => renderer.render_video(index, reference, VIDEO_PLAYBACK).await,
        };

        match outcome {
            Ok(()) => report.rendered += 1,
            Err(e) => {
                let failure = MediaLoadError {
                    index,
                    reference: reference.clone(),
                    kind,
                    reason: e.to_string(),
                };
                tracing::warn!(
                    target: "media",
                    index,
                    kind = %kind,
                    reference = %reference,
                    reason = %failure.reason,
                    "Media item failed to load",
                );
                renderer.report_load_failure(&failure);
                report.failures.push(failure);
            }
        }
    }

    report
}
