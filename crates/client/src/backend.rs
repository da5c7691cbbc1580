//! Seam between the controller and the transport.
//!
//! [`GenerationApi`](crate::api::GenerationApi) is the production
//! implementation; tests substitute an in-memory backend.

use async_trait::async_trait;
use runner_core::lifecycle::GenerationResult;
use runner_core::snapshot::RequestSnapshot;

use crate::api::GenerationApiError;

/// A backend able to list workflows and run a generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Names of the workflows available on the backend, in backend order.
    async fn list_workflows(&self) -> Result<Vec<String>, GenerationApiError>;

    /// Run one generation and return its media references in
    /// presentation order.
    async fn generate(
        &self,
        snapshot: &RequestSnapshot,
    ) -> Result<GenerationResult, GenerationApiError>;
}
