//! Library half of the `runner-app` binary.
//!
//! Split out so the fetch → configure → submit → render pass can be driven
//! against any [`GenerationBackend`] and [`MediaRenderer`] in tests.

pub mod config;
pub mod render;

use runner_client::api::GenerationApiError;
use runner_client::backend::GenerationBackend;
use runner_client::controller::GenerationController;
use runner_client::render::{render_results, MediaRenderer, RenderReport};
use runner_core::generation::GenerationConfig;
use runner_core::lifecycle::RequestState;

use crate::config::{load_reference, ConfigError, RunnerConfig};

/// Errors that end a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The workflow directory could not be fetched.
    #[error(transparent)]
    Api(#[from] GenerationApiError),

    #[error("Nothing to submit: {0}")]
    NotSubmittable(String),

    /// The generation request resolved to `Failed`.
    #[error("{0}")]
    Generation(String),
}

/// Build the starting configuration, reading the reference image if one
/// is configured.
pub async fn prepare(config: &RunnerConfig) -> Result<GenerationConfig, RunError> {
    let reference = match &config.reference_image {
        Some(path) => Some(load_reference(path).await?),
        None => None,
    };
    Ok(config.generation_config(reference)?)
}

/// Run one fetch → submit → render pass.
pub async fn run_once<B, R>(
    controller: &mut GenerationController<B>,
    renderer: &mut R,
) -> Result<RenderReport, RunError>
where
    B: GenerationBackend,
    R: MediaRenderer,
{
    let count = controller.load_workflows().await?;
    tracing::info!(
        count,
        workflows = ?controller.directory().names(),
        selected = ?controller.config().workflow_name(),
        "Workflows available",
    );

    if !controller.is_submittable() {
        return Err(RunError::NotSubmittable(unsubmittable_reason(controller)));
    }

    controller.submit().await;

    match controller.state() {
        RequestState::Succeeded { results } => {
            let report = render_results(renderer, results).await;
            tracing::info!(
                rendered = report.rendered,
                failed = report.failures.len(),
                "Results rendered",
            );
            Ok(report)
        }
        RequestState::Failed { message } => Err(RunError::Generation(message.clone())),
        other => Err(RunError::Generation(format!(
            "Request ended in unexpected state: {}",
            other.as_str()
        ))),
    }
}

fn unsubmittable_reason<B: GenerationBackend>(controller: &GenerationController<B>) -> String {
    if controller.directory().is_empty() {
        return "the backend lists no workflows".to_string();
    }
    match controller.config().build_request_snapshot() {
        Err(e) => e.to_string(),
        Ok(_) => "the selected workflow is not listed".to_string(),
    }
}
