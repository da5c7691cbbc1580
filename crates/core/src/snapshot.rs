//! Immutable, fully-resolved request snapshot and its form encoding.
//!
//! A [`RequestSnapshot`] is taken from a
//! [`GenerationConfig`](crate::generation::GenerationConfig) when a
//! generation is submitted. Later configuration edits never reach it.

use std::sync::Arc;

use crate::generation::{GenerationConfig, GenerationMode, VIDEO_HEIGHT, VIDEO_WIDTH};
use crate::reference::ReferenceAsset;

// ---------------------------------------------------------------------------
// Form field names
// ---------------------------------------------------------------------------

pub const FIELD_WORKFLOW_NAME: &str = "workflow_name";
pub const FIELD_PROMPT: &str = "prompt";
pub const FIELD_WIDTH: &str = "width";
pub const FIELD_HEIGHT: &str = "height";
pub const FIELD_STEPS: &str = "steps";
pub const FIELD_SHIFT: &str = "shift";
pub const FIELD_FPS: &str = "fps";
pub const FIELD_FRAME_COUNT: &str = "frame_count";
/// Binary part; omitted when no reference is attached.
pub const FIELD_REFERENCE_IMAGE: &str = "reference_image";

/// Video-only parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoParams {
    pub fps: u32,
    pub frame_count: u32,
}

/// The outbound request, resolved for one generation mode.
#[derive(Debug, Clone)]
pub struct RequestSnapshot {
    mode: GenerationMode,
    workflow_name: String,
    prompt: String,
    width: u32,
    height: u32,
    steps: u32,
    shift_tenths: u32,
    video: Option<VideoParams>,
    reference: Option<Arc<ReferenceAsset>>,
}

impl RequestSnapshot {
    /// Called by [`GenerationConfig::build_request_snapshot`] once the
    /// preconditions have been checked.
    pub(crate) fn resolve(config: &GenerationConfig, workflow_name: String, prompt: String) -> Self {
        let mode = config.mode();
        let (width, height, video) = match mode {
            GenerationMode::Image => (config.width(), config.height(), None),
            GenerationMode::Video => (
                VIDEO_WIDTH,
                VIDEO_HEIGHT,
                Some(VideoParams {
                    fps: config.fps(),
                    frame_count: config.frame_count(),
                }),
            ),
        };

        Self {
            mode,
            workflow_name,
            prompt,
            width,
            height,
            steps: config.steps(),
            shift_tenths: config.shift_tenths(),
            video,
            reference: config.reference().cloned(),
        }
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn workflow_name(&self) -> &str {
        &self.workflow_name
    }

    /// Already trimmed.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    /// Shift as decimal text with exactly one fractional digit.
    pub fn shift_text(&self) -> String {
        format!("{}.{}", self.shift_tenths / 10, self.shift_tenths % 10)
    }

    pub fn video(&self) -> Option<VideoParams> {
        self.video
    }

    pub fn reference(&self) -> Option<&ReferenceAsset> {
        self.reference.as_deref()
    }

    /// The text fields of the multipart body, in send order.
    ///
    /// `fps` and `frame_count` appear only for video snapshots. The
    /// reference attachment is not included; see [`Self::reference`].
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            (FIELD_WORKFLOW_NAME, self.workflow_name.clone()),
            (FIELD_PROMPT, self.prompt.clone()),
            (FIELD_WIDTH, self.width.to_string()),
            (FIELD_HEIGHT, self.height.to_string()),
            (FIELD_STEPS, self.steps.to_string()),
            (FIELD_SHIFT, self.shift_text()),
        ];

        if let Some(video) = self.video {
            fields.push((FIELD_FPS, video.fps.to_string()));
            fields.push((FIELD_FRAME_COUNT, video.frame_count.to_string()));
        }

        fields
    }
}
