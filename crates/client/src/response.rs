//! Response bodies returned by the generation backend.

use serde::Deserialize;

/// Body of `GET /workflows`.
#[derive(Debug, Deserialize)]
pub struct WorkflowsResponse {
    #[serde(default)]
    pub workflows: Vec<String>,
}

/// Body of a successful `POST /generate`.
///
/// Depending on the workflow, the backend lists its outputs under
/// `images` or under `media`. Any other fields (echoed prompt, status,
/// uploaded reference name) are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default)]
    pub media: Option<Vec<String>>,
}

impl GenerateResponse {
    /// Resolve the media list: `images` if present, otherwise `media`,
    /// otherwise empty.
    pub fn into_media(self) -> Vec<String> {
        self.images.or(self.media).unwrap_or_default()
    }
}
