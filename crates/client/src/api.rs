//! REST API client for the generation backend.
//!
//! Wraps the two backend endpoints (`GET /workflows`, `POST /generate`)
//! using [`reqwest`]. The base URL is injected at construction.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use runner_core::lifecycle::GenerationResult;
use runner_core::snapshot::{RequestSnapshot, FIELD_REFERENCE_IMAGE};

use crate::backend::GenerationBackend;
use crate::response::{GenerateResponse, WorkflowsResponse};

/// HTTP client for a single generation backend.
pub struct GenerationApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the backend REST layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationApiError {
    /// The HTTP request itself failed (network, DNS, TLS, undecodable
    /// body, etc.). Displays the raw transport message.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// `GET /workflows` returned a non-2xx status code.
    #[error("Failed to fetch workflows ({status}): {body}")]
    WorkflowFetch {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// `POST /generate` returned a non-2xx status code.
    #[error("Generation failed: {status} - {body}")]
    Backend {
        /// HTTP status code.
        status: u16,
        /// Raw response body, surfaced verbatim.
        body: String,
    },
}

impl GenerationApi {
    /// Create a new API client.
    ///
    /// * `base_url` - Backend HTTP URL, e.g. `http://localhost:8000`.
    ///   A trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the names of the workflows the backend can run.
    ///
    /// Sends `GET /workflows`. A missing `workflows` field yields an empty
    /// list; a non-JSON body is a [`GenerationApiError::Request`].
    pub async fn fetch_workflows(&self) -> Result<Vec<String>, GenerationApiError> {
        let response = self
            .client
            .get(format!("{}/workflows", self.base_url))
            .send()
            .await?;

        let response = Self::ensure_success(response, |status, body| {
            GenerationApiError::WorkflowFetch { status, body }
        })
        .await?;

        let parsed: WorkflowsResponse = response.json().await?;
        tracing::debug!(count = parsed.workflows.len(), "Fetched workflow list");
        Ok(parsed.workflows)
    }

    /// Submit a generation request.
    ///
    /// Sends `POST /generate` with the snapshot encoded as a multipart
    /// form and waits for the backend to finish. There is no timeout.
    pub async fn submit_generation(
        &self,
        snapshot: &RequestSnapshot,
    ) -> Result<GenerateResponse, GenerationApiError> {
        let form = Self::build_form(snapshot)?;

        let response = self
            .client
            .post(format!("{}/generate", self.base_url))
            .multipart(form)
            .send()
            .await?;

        let response = Self::ensure_success(response, |status, body| {
            GenerationApiError::Backend { status, body }
        })
        .await?;

        Ok(response.json::<GenerateResponse>().await?)
    }

    /// Encode a snapshot as the multipart body expected by `/generate`.
    ///
    /// The reference image part is only added when the snapshot carries
    /// one.
    pub fn build_form(snapshot: &RequestSnapshot) -> Result<Form, reqwest::Error> {
        let mut form = snapshot
            .form_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value));

        if let Some(reference) = snapshot.reference() {
            let part = Part::bytes(reference.bytes().to_vec())
                .file_name(reference.file_name().to_string())
                .mime_str(reference.content_type())?;
            form = form.part(FIELD_REFERENCE_IMAGE, part);
        }

        Ok(form)
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or the error built by `on_error`
    /// from the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
        on_error: impl FnOnce(u16, String) -> GenerationApiError,
    ) -> Result<reqwest::Response, GenerationApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(on_error(status.as_u16(), body));
        }
        Ok(response)
    }
}

#[async_trait]
impl GenerationBackend for GenerationApi {
    async fn list_workflows(&self) -> Result<Vec<String>, GenerationApiError> {
        self.fetch_workflows().await
    }

    async fn generate(&self, snapshot: &RequestSnapshot) -> Result<GenerationResult, GenerationApiError> {
        Ok(self.submit_generation(snapshot).await?.into_media())
    }
}
