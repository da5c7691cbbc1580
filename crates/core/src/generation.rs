//! Mode-aware generation configuration.
//!
//! [`GenerationConfig`] holds every user-adjustable field for both
//! generation modes. Fields are private; they change only through the
//! validated setters or through [`GenerationConfig::apply`] with a
//! [`ConfigEdit`] event. A rejected edit leaves the configuration exactly
//! as it was.
//!
//! Out-of-range numeric values are rejected, never clamped.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::reference::ReferenceAsset;
use crate::snapshot::RequestSnapshot;
use crate::workflow::WorkflowDirectory;

// ---------------------------------------------------------------------------
// Field bounds
// ---------------------------------------------------------------------------

/// Minimum image width/height in pixels.
pub const MIN_DIMENSION: u32 = 256;
/// Nudge increment for image width/height.
pub const DIMENSION_STEP: u32 = 64;

pub const MIN_STEPS: u32 = 4;
pub const MAX_STEPS: u32 = 20;

/// Shift bounds, in tenths (1.0 ..= 7.0).
pub const MIN_SHIFT_TENTHS: u32 = 10;
pub const MAX_SHIFT_TENTHS: u32 = 70;

pub const MIN_FPS: u32 = 12;
pub const MAX_FPS: u32 = 60;

pub const MIN_FRAME_COUNT: u32 = 16;
/// Nudge increment for the video frame count.
pub const FRAME_COUNT_STEP: u32 = 8;

/// Video output size is fixed; image width/height never apply to video.
pub const VIDEO_WIDTH: u32 = 1280;
pub const VIDEO_HEIGHT: u32 = 720;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_DIMENSION: u32 = 1024;
pub const DEFAULT_STEPS: u32 = 9;
pub const DEFAULT_SHIFT_TENTHS: u32 = 30;
pub const DEFAULT_FPS: u32 = 24;
pub const DEFAULT_FRAME_COUNT: u32 = 121;

/// Prompt seeded into image mode on startup.
pub const DEFAULT_IMAGE_PROMPT: &str = "A cute girl version of the reference toddler character, \
same pose, same yellow onesie, Pixar style, full body";

// ---------------------------------------------------------------------------
// GenerationMode
// ---------------------------------------------------------------------------

/// Which kind of output the configuration targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    #[default]
    Image,
    Video,
}

impl GenerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(Self::Image),
            "video" => Ok(Self::Video),
            other => Err(CoreError::Validation(format!(
                "Unknown generation mode '{other}'. Must be one of: image, video"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Edits
// ---------------------------------------------------------------------------

/// A numeric field that can be nudged by its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Width,
    Height,
    Steps,
    Shift,
    Fps,
    FrameCount,
}

/// Direction of a [`ConfigEdit::Nudge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Up,
    Down,
}

/// A single user edit to the configuration.
#[derive(Debug, Clone)]
pub enum ConfigEdit {
    SetMode(GenerationMode),
    /// An empty or blank name unsets the selection.
    SetWorkflow(String),
    SetPrompt { mode: GenerationMode, text: String },
    SetWidth(u32),
    SetHeight(u32),
    SetSteps(u32),
    SetShift(f64),
    SetFps(u32),
    SetFrameCount(u32),
    Nudge {
        field: NumericField,
        direction: NudgeDirection,
    },
    /// Attach or replace the reference image.
    AttachReference(ReferenceAsset),
    ClearReference,
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_dimension(name: &str, value: u32) -> Result<(), CoreError> {
    if value < MIN_DIMENSION {
        return Err(CoreError::Validation(format!(
            "{name} must be at least {MIN_DIMENSION}, got {value}"
        )));
    }
    Ok(())
}

fn validate_range(name: &str, value: u32, min: u32, max: u32) -> Result<(), CoreError> {
    if !(min..=max).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

fn validate_frame_count(value: u32) -> Result<(), CoreError> {
    if value < MIN_FRAME_COUNT {
        return Err(CoreError::Validation(format!(
            "frame_count must be at least {MIN_FRAME_COUNT}, got {value}"
        )));
    }
    Ok(())
}

/// Convert a shift value to tenths, rejecting non-finite and
/// out-of-range input. Values inside the range are rounded to one
/// fractional digit.
fn shift_to_tenths(value: f64) -> Result<u32, CoreError> {
    let min = f64::from(MIN_SHIFT_TENTHS) / 10.0;
    let max = f64::from(MAX_SHIFT_TENTHS) / 10.0;
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(CoreError::Validation(format!(
            "shift must be between {min:.1} and {max:.1}, got {value}"
        )));
    }
    Ok((value * 10.0).round() as u32)
}

fn step(value: u32, by: u32, direction: NudgeDirection) -> Option<u32> {
    match direction {
        NudgeDirection::Up => value.checked_add(by),
        NudgeDirection::Down => value.checked_sub(by),
    }
}

// ---------------------------------------------------------------------------
// GenerationConfig
// ---------------------------------------------------------------------------

/// All user-adjustable generation settings for both modes.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    mode: GenerationMode,
    workflow_name: Option<String>,
    image_prompt: String,
    video_prompt: String,
    width: u32,
    height: u32,
    steps: u32,
    shift_tenths: u32,
    fps: u32,
    frame_count: u32,
    reference: Option<Arc<ReferenceAsset>>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::default(),
            workflow_name: None,
            image_prompt: DEFAULT_IMAGE_PROMPT.to_string(),
            video_prompt: String::new(),
            width: DEFAULT_DIMENSION,
            height: DEFAULT_DIMENSION,
            steps: DEFAULT_STEPS,
            shift_tenths: DEFAULT_SHIFT_TENTHS,
            fps: DEFAULT_FPS,
            frame_count: DEFAULT_FRAME_COUNT,
            reference: None,
        }
    }
}

impl GenerationConfig {
    // ---- getters ----

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn workflow_name(&self) -> Option<&str> {
        self.workflow_name.as_deref()
    }

    /// Raw (untrimmed) prompt for the given mode.
    pub fn prompt(&self, mode: GenerationMode) -> &str {
        match mode {
            GenerationMode::Image => &self.image_prompt,
            GenerationMode::Video => &self.video_prompt,
        }
    }

    /// Trimmed prompt of the active mode.
    pub fn active_prompt(&self) -> &str {
        self.prompt(self.mode).trim()
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

    pub fn shift(&self) -> f64 {
        f64::from(self.shift_tenths) / 10.0
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn reference(&self) -> Option<&Arc<ReferenceAsset>> {
        self.reference.as_ref()
    }

    // ---- setters ----

    pub fn set_mode(&mut self, mode: GenerationMode) {
        self.mode = mode;
    }

    pub fn set_workflow(&mut self, name: impl Into<String>) {
        let name = name.into();
        let trimmed = name.trim();
        self.workflow_name = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn set_prompt(&mut self, mode: GenerationMode, text: impl Into<String>) {
        match mode {
            GenerationMode::Image => self.image_prompt = text.into(),
            GenerationMode::Video => self.video_prompt = text.into(),
        }
    }

    pub fn set_width(&mut self, width: u32) -> Result<(), CoreError> {
        validate_dimension("width", width)?;
        self.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: u32) -> Result<(), CoreError> {
        validate_dimension("height", height)?;
        self.height = height;
        Ok(())
    }

    pub fn set_steps(&mut self, steps: u32) -> Result<(), CoreError> {
        validate_range("steps", steps, MIN_STEPS, MAX_STEPS)?;
        self.steps = steps;
        Ok(())
    }

    /// Set the noise-schedule shift. Stored rounded to one fractional digit.
    pub fn set_shift(&mut self, shift: f64) -> Result<(), CoreError> {
        self.shift_tenths = shift_to_tenths(shift)?;
        Ok(())
    }

    pub fn set_fps(&mut self, fps: u32) -> Result<(), CoreError> {
        validate_range("fps", fps, MIN_FPS, MAX_FPS)?;
        self.fps = fps;
        Ok(())
    }

    pub fn set_frame_count(&mut self, frame_count: u32) -> Result<(), CoreError> {
        validate_frame_count(frame_count)?;
        self.frame_count = frame_count;
        Ok(())
    }

    /// Attach a reference image, replacing any previous one.
    pub fn attach_reference(&mut self, asset: ReferenceAsset) {
        self.reference = Some(Arc::new(asset));
    }

    pub fn clear_reference(&mut self) {
        self.reference = None;
    }

    /// Move a numeric field one step up or down.
    ///
    /// The move is rejected if the result would leave the field's bounds.
    pub fn nudge(&mut self, field: NumericField, direction: NudgeDirection) -> Result<(), CoreError> {
        let out_of_range =
            || CoreError::Validation(format!("Cannot nudge {field:?} {direction:?}: out of range"));

        match field {
            NumericField::Width => {
                let next = step(self.width, DIMENSION_STEP, direction).ok_or_else(out_of_range)?;
                self.set_width(next)
            }
            NumericField::Height => {
                let next = step(self.height, DIMENSION_STEP, direction).ok_or_else(out_of_range)?;
                self.set_height(next)
            }
            NumericField::Steps => {
                let next = step(self.steps, 1, direction).ok_or_else(out_of_range)?;
                self.set_steps(next)
            }
            NumericField::Shift => {
                let next = step(self.shift_tenths, 1, direction).ok_or_else(out_of_range)?;
                self.shift_tenths = shift_to_tenths(f64::from(next) / 10.0)?;
                Ok(())
            }
            NumericField::Fps => {
                let next = step(self.fps, 1, direction).ok_or_else(out_of_range)?;
                self.set_fps(next)
            }
            NumericField::FrameCount => {
                let next =
                    step(self.frame_count, FRAME_COUNT_STEP, direction).ok_or_else(out_of_range)?;
                self.set_frame_count(next)
            }
        }
    }

    /// Apply a single edit event.
    pub fn apply(&mut self, edit: ConfigEdit) -> Result<(), CoreError> {
        match edit {
            ConfigEdit::SetMode(mode) => self.set_mode(mode),
            ConfigEdit::SetWorkflow(name) => self.set_workflow(name),
            ConfigEdit::SetPrompt { mode, text } => self.set_prompt(mode, text),
            ConfigEdit::SetWidth(v) => self.set_width(v)?,
            ConfigEdit::SetHeight(v) => self.set_height(v)?,
            ConfigEdit::SetSteps(v) => self.set_steps(v)?,
            ConfigEdit::SetShift(v) => self.set_shift(v)?,
            ConfigEdit::SetFps(v) => self.set_fps(v)?,
            ConfigEdit::SetFrameCount(v) => self.set_frame_count(v)?,
            ConfigEdit::Nudge { field, direction } => self.nudge(field, direction)?,
            ConfigEdit::AttachReference(asset) => self.attach_reference(asset),
            ConfigEdit::ClearReference => self.clear_reference(),
        }
        Ok(())
    }

    /// Re-validate the workflow selection against a freshly fetched
    /// directory. Returns the resulting selection.
    pub fn sync_workflow(&mut self, directory: &WorkflowDirectory) -> Option<&str> {
        let resolved = directory.resolve_selection(self.workflow_name.as_deref());
        if resolved != self.workflow_name {
            tracing::debug!(
                previous = ?self.workflow_name,
                selected = ?resolved,
                "Workflow selection re-validated",
            );
        }
        self.workflow_name = resolved;
        self.workflow_name.as_deref()
    }

    /// Whether a generation may be submitted with this configuration.
    pub fn is_submittable(&self, directory: &WorkflowDirectory) -> bool {
        is_submittable(self, directory)
    }

    /// Resolve the active mode's fields into an immutable snapshot.
    ///
    /// Fails when no workflow is selected or the active prompt is blank.
    /// Directory membership is not checked here; see [`is_submittable`].
    pub fn build_request_snapshot(&self) -> Result<RequestSnapshot, CoreError> {
        let workflow_name = self
            .workflow_name
            .clone()
            .ok_or_else(|| CoreError::Validation("No workflow selected".to_string()))?;

        let prompt = self.active_prompt();
        if prompt.is_empty() {
            return Err(CoreError::Validation(format!(
                "The {} prompt must not be empty",
                self.mode
            )));
        }

        Ok(RequestSnapshot::resolve(self, workflow_name, prompt.to_string()))
    }

    pub(crate) fn shift_tenths(&self) -> u32 {
        self.shift_tenths
    }
}

/// True iff a workflow is selected and listed, the directory is non-empty,
/// and the active mode's trimmed prompt is non-empty.
pub fn is_submittable(config: &GenerationConfig, directory: &WorkflowDirectory) -> bool {
    let workflow_listed = config
        .workflow_name()
        .is_some_and(|name| directory.contains(name));

    !directory.is_empty() && workflow_listed && !config.active_prompt().is_empty()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn directory(names: &[&str]) -> WorkflowDirectory {
        WorkflowDirectory::new(names.iter().map(|s| s.to_string()).collect())
    }

    fn submittable_config() -> (GenerationConfig, WorkflowDirectory) {
        let dir = directory(&["wf1", "wf2"]);
        let mut config = GenerationConfig::default();
        config.sync_workflow(&dir);
        config.set_prompt(GenerationMode::Image, "a cat");
        (config, dir)
    }

    // -- defaults --

    #[test]
    fn defaults_are_within_bounds() {
        let mut config = GenerationConfig::default();
        let copy = config.clone();
        assert!(config.set_width(copy.width()).is_ok());
        assert!(config.set_height(copy.height()).is_ok());
        assert!(config.set_steps(copy.steps()).is_ok());
        assert!(config.set_shift(copy.shift()).is_ok());
        assert!(config.set_fps(copy.fps()).is_ok());
        assert!(config.set_frame_count(copy.frame_count()).is_ok());
        assert_eq!(config.mode(), GenerationMode::Image);
        assert!(config.workflow_name().is_none());
        assert!(config.reference().is_none());
    }

    // -- mode parsing --

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("Video".parse::<GenerationMode>().unwrap(), GenerationMode::Video);
        assert_eq!(" image ".parse::<GenerationMode>().unwrap(), GenerationMode::Image);
        assert!("audio".parse::<GenerationMode>().is_err());
    }

    // -- numeric bounds --

    #[test]
    fn dimension_below_minimum_rejected_and_unchanged() {
        let mut config = GenerationConfig::default();
        let err = config.set_width(255).unwrap_err();
        assert!(err.to_string().contains("width must be at least 256"));
        assert_eq!(config.width(), DEFAULT_DIMENSION);
        assert!(config.set_height(0).is_err());
        assert_eq!(config.height(), DEFAULT_DIMENSION);
    }

    #[test]
    fn steps_bounds_enforced() {
        let mut config = GenerationConfig::default();
        assert!(config.set_steps(4).is_ok());
        assert!(config.set_steps(20).is_ok());
        assert!(config.set_steps(3).is_err());
        assert!(config.set_steps(21).is_err());
        assert_eq!(config.steps(), 20);
    }

    #[test]
    fn shift_bounds_enforced() {
        let mut config = GenerationConfig::default();
        assert!(config.set_shift(1.0).is_ok());
        assert!(config.set_shift(7.0).is_ok());
        assert!(config.set_shift(0.99).is_err());
        assert!(config.set_shift(7.01).is_err());
        assert!(config.set_shift(f64::NAN).is_err());
        assert_eq!(config.shift(), 7.0);
    }

    #[test]
    fn shift_rounded_to_one_decimal() {
        let mut config = GenerationConfig::default();
        config.set_shift(3.14).unwrap();
        assert_eq!(config.shift(), 3.1);
        config.set_shift(2.96).unwrap();
        assert_eq!(config.shift(), 3.0);
    }

    #[test]
    fn fps_bounds_enforced() {
        let mut config = GenerationConfig::default();
        assert!(config.set_fps(12).is_ok());
        assert!(config.set_fps(60).is_ok());
        assert!(config.set_fps(11).is_err());
        assert!(config.set_fps(61).is_err());
    }

    #[test]
    fn frame_count_accepts_off_step_values_above_minimum() {
        let mut config = GenerationConfig::default();
        assert!(config.set_frame_count(121).is_ok());
        assert!(config.set_frame_count(16).is_ok());
        assert!(config.set_frame_count(15).is_err());
        assert_eq!(config.frame_count(), 16);
    }

    // -- nudge --

    #[test]
    fn nudge_moves_by_step() {
        let mut config = GenerationConfig::default();
        config.nudge(NumericField::Width, NudgeDirection::Up).unwrap();
        assert_eq!(config.width(), DEFAULT_DIMENSION + DIMENSION_STEP);
        config.nudge(NumericField::FrameCount, NudgeDirection::Down).unwrap();
        assert_eq!(config.frame_count(), DEFAULT_FRAME_COUNT - FRAME_COUNT_STEP);
        config.nudge(NumericField::Shift, NudgeDirection::Up).unwrap();
        assert_eq!(config.shift(), 3.1);
    }

    #[test]
    fn nudge_past_bound_rejected() {
        let mut config = GenerationConfig::default();
        config.set_steps(MAX_STEPS).unwrap();
        assert!(config.nudge(NumericField::Steps, NudgeDirection::Up).is_err());
        assert_eq!(config.steps(), MAX_STEPS);

        config.set_width(MIN_DIMENSION).unwrap();
        assert!(config.nudge(NumericField::Width, NudgeDirection::Down).is_err());
        assert_eq!(config.width(), MIN_DIMENSION);

        config.set_shift(1.0).unwrap();
        assert!(config.nudge(NumericField::Shift, NudgeDirection::Down).is_err());
        assert_eq!(config.shift(), 1.0);
    }

    #[test]
    fn shift_nudge_error_uses_user_units() {
        let mut config = GenerationConfig::default();
        config.set_shift(7.0).unwrap();

        let err = config
            .nudge(NumericField::Shift, NudgeDirection::Up)
            .unwrap_err();

        assert_matches!(err, CoreError::Validation(ref msg) if msg.contains("between 1.0 and 7.0"));
        assert!(!err.to_string().contains("tenths"));
        assert_eq!(config.shift(), 7.0);
    }

    // -- apply --

    #[test]
    fn apply_routes_edits() {
        let mut config = GenerationConfig::default();
        config.apply(ConfigEdit::SetMode(GenerationMode::Video)).unwrap();
        config
            .apply(ConfigEdit::SetPrompt {
                mode: GenerationMode::Video,
                text: "waves".into(),
            })
            .unwrap();
        config.apply(ConfigEdit::SetFps(30)).unwrap();
        assert_eq!(config.mode(), GenerationMode::Video);
        assert_eq!(config.active_prompt(), "waves");
        assert_eq!(config.fps(), 30);
    }

    #[test]
    fn apply_rejected_edit_leaves_config_unchanged() {
        let mut config = GenerationConfig::default();
        let result = config.apply(ConfigEdit::SetSteps(25));
        assert_matches!(result, Err(CoreError::Validation(_)));
        assert_eq!(config.steps(), DEFAULT_STEPS);
    }

    #[test]
    fn blank_workflow_unsets_selection() {
        let mut config = GenerationConfig::default();
        config.set_workflow("wf1");
        assert_eq!(config.workflow_name(), Some("wf1"));
        config.apply(ConfigEdit::SetWorkflow("  ".into())).unwrap();
        assert!(config.workflow_name().is_none());
    }

    #[test]
    fn reference_attach_replace_clear() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let mut config = GenerationConfig::default();

        config.attach_reference(ReferenceAsset::new("a.png", png.clone()).unwrap());
        assert_eq!(config.reference().unwrap().file_name(), "a.png");

        config
            .apply(ConfigEdit::AttachReference(
                ReferenceAsset::new("b.png", png).unwrap(),
            ))
            .unwrap();
        assert_eq!(config.reference().unwrap().file_name(), "b.png");

        config.apply(ConfigEdit::ClearReference).unwrap();
        assert!(config.reference().is_none());
    }

    // -- submittability --

    #[test]
    fn directory_defaults_workflow_to_first_entry() {
        let dir = directory(&["wf1", "wf2"]);
        let mut config = GenerationConfig::default();
        assert_eq!(config.sync_workflow(&dir), Some("wf1"));
    }

    #[test]
    fn submittable_when_all_conditions_hold() {
        let (config, dir) = submittable_config();
        assert!(config.is_submittable(&dir));
    }

    #[test]
    fn empty_directory_never_submittable() {
        let (mut config, _) = submittable_config();
        let empty = WorkflowDirectory::default();
        config.set_workflow("wf1");
        assert!(!is_submittable(&config, &empty));
    }

    #[test]
    fn blank_prompt_not_submittable() {
        let (mut config, dir) = submittable_config();
        config.set_prompt(GenerationMode::Image, "   \n");
        assert!(!config.is_submittable(&dir));
    }

    #[test]
    fn unlisted_workflow_not_submittable() {
        let (mut config, dir) = submittable_config();
        config.set_workflow("other");
        assert!(!config.is_submittable(&dir));
    }

    #[test]
    fn prompt_checked_for_active_mode_only() {
        let (mut config, dir) = submittable_config();
        config.set_mode(GenerationMode::Video);
        assert!(!config.is_submittable(&dir));
        config.set_prompt(GenerationMode::Video, "a wave");
        assert!(config.is_submittable(&dir));
    }

    // -- snapshot preconditions --

    #[test]
    fn snapshot_requires_workflow_and_prompt() {
        let mut config = GenerationConfig::default();
        assert_matches!(config.build_request_snapshot(), Err(CoreError::Validation(_)));
        config.set_workflow("wf1");
        config.set_prompt(GenerationMode::Image, "");
        assert_matches!(config.build_request_snapshot(), Err(CoreError::Validation(_)));
    }
}
