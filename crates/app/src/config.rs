use std::path::{Path, PathBuf};

use runner_core::error::CoreError;
use runner_core::generation::{ConfigEdit, GenerationConfig, GenerationMode};
use runner_core::reference::ReferenceAsset;

/// Default backend base URL.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Errors raised while turning the environment into a run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    /// A parsed value was refused by the configuration model (out of range).
    #[error("{var} rejected: {source}")]
    Rejected {
        var: &'static str,
        #[source]
        source: CoreError,
    },

    /// The reference image file could not be read.
    #[error("Failed to read reference image {}: {source}", .path.display())]
    ReferenceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The reference image file was read but is unusable (e.g. empty).
    #[error("Invalid reference image {}: {source}", .path.display())]
    ReferenceAsset {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
}

/// Runner configuration loaded from environment variables.
///
/// Every generation field is optional; unset fields keep the model's
/// defaults. Values are range-checked when applied, not when parsed.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Backend base URL (default: `http://localhost:8000`).
    pub backend_url: String,
    pub mode: GenerationMode,
    /// Preferred workflow. Falls back to the first listed one if absent
    /// from the fetched directory.
    pub workflow_name: Option<String>,
    /// Prompt for the selected mode.
    pub prompt: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub steps: Option<u32>,
    pub shift: Option<f64>,
    pub fps: Option<u32>,
    pub frame_count: Option<u32>,
    /// Path of an image to attach as the reference.
    pub reference_image: Option<PathBuf>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            mode: GenerationMode::default(),
            workflow_name: None,
            prompt: None,
            width: None,
            height: None,
            steps: None,
            shift: None,
            fps: None,
            frame_count: None,
            reference_image: None,
        }
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var           | Default                 |
    /// |-------------------|-------------------------|
    /// | `BACKEND_URL`     | `http://localhost:8000` |
    /// | `GENERATION_MODE` | `image`                 |
    /// | `WORKFLOW_NAME`   | first fetched workflow  |
    /// | `PROMPT`          | seeded image prompt     |
    /// | `WIDTH`           | `1024`                  |
    /// | `HEIGHT`          | `1024`                  |
    /// | `STEPS`           | `9`                     |
    /// | `SHIFT`           | `3.0`                   |
    /// | `FPS`             | `24`                    |
    /// | `FRAME_COUNT`     | `121`                   |
    /// | `REFERENCE_IMAGE` | unset                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty or whitespace-only values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let backend_url = get("BACKEND_URL").unwrap_or_else(|| DEFAULT_BACKEND_URL.into());

        let mode = match get("GENERATION_MODE") {
            Some(value) => {
                value
                    .parse::<GenerationMode>()
                    .map_err(|e| ConfigError::Invalid {
                        var: "GENERATION_MODE",
                        reason: e.to_string(),
                        value,
                    })?
            }
            None => GenerationMode::default(),
        };

        Ok(Self {
            backend_url,
            mode,
            workflow_name: get("WORKFLOW_NAME"),
            prompt: get("PROMPT"),
            width: parse_var("WIDTH", get("WIDTH"))?,
            height: parse_var("HEIGHT", get("HEIGHT"))?,
            steps: parse_var("STEPS", get("STEPS"))?,
            shift: parse_var("SHIFT", get("SHIFT"))?,
            fps: parse_var("FPS", get("FPS"))?,
            frame_count: parse_var("FRAME_COUNT", get("FRAME_COUNT"))?,
            reference_image: get("REFERENCE_IMAGE").map(PathBuf::from),
        })
    }

    /// The configuration edits this environment asks for, each tagged
    /// with the variable it came from.
    pub fn edits(&self) -> Vec<(&'static str, ConfigEdit)> {
        let mut edits = vec![("GENERATION_MODE", ConfigEdit::SetMode(self.mode))];

        if let Some(name) = &self.workflow_name {
            edits.push(("WORKFLOW_NAME", ConfigEdit::SetWorkflow(name.clone())));
        }
        if let Some(text) = &self.prompt {
            edits.push((
                "PROMPT",
                ConfigEdit::SetPrompt {
                    mode: self.mode,
                    text: text.clone(),
                },
            ));
        }

        let numeric = [
            ("WIDTH", self.width.map(ConfigEdit::SetWidth)),
            ("HEIGHT", self.height.map(ConfigEdit::SetHeight)),
            ("STEPS", self.steps.map(ConfigEdit::SetSteps)),
            ("SHIFT", self.shift.map(ConfigEdit::SetShift)),
            ("FPS", self.fps.map(ConfigEdit::SetFps)),
            ("FRAME_COUNT", self.frame_count.map(ConfigEdit::SetFrameCount)),
        ];
        edits.extend(
            numeric
                .into_iter()
                .filter_map(|(var, edit)| edit.map(|edit| (var, edit))),
        );

        edits
    }

    /// Build the initial generation configuration.
    ///
    /// The reference asset, if any, must already be loaded; see
    /// [`load_reference`].
    pub fn generation_config(
        &self,
        reference: Option<ReferenceAsset>,
    ) -> Result<GenerationConfig, ConfigError> {
        let mut config = GenerationConfig::default();

        for (var, edit) in self.edits() {
            config
                .apply(edit)
                .map_err(|source| ConfigError::Rejected { var, source })?;
        }

        if let Some(asset) = reference {
            config.attach_reference(asset);
        }

        Ok(config)
    }
}

/// Read a reference image from disk.
pub async fn load_reference(path: &Path) -> Result<ReferenceAsset, ConfigError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| ConfigError::ReferenceRead {
            path: path.to_path_buf(),
            source,
        })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let asset = ReferenceAsset::new(file_name, bytes).map_err(|source| {
        ConfigError::ReferenceAsset {
            path: path.to_path_buf(),
            source,
        }
    })?;

    tracing::info!(
        path = %path.display(),
        bytes = asset.bytes().len(),
        content_type = asset.content_type(),
        "Reference image loaded",
    );

    Ok(asset)
}

fn parse_var<T>(var: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                var,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}
