//! Integration tests for a full fetch → submit → render pass.

use assert_matches::assert_matches;
use async_trait::async_trait;
use runner_app::config::RunnerConfig;
use runner_app::RunError;
use runner_client::api::GenerationApiError;
use runner_client::backend::GenerationBackend;
use runner_client::controller::GenerationController;
use runner_client::render::MediaRenderer;
use runner_core::lifecycle::GenerationResult;
use runner_core::media::{MediaKind, MediaLoadError, VideoPlayback};
use runner_core::snapshot::RequestSnapshot;

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct StaticBackend {
    workflows: Vec<String>,
    outcome: Result<Vec<String>, (u16, String)>,
}

impl StaticBackend {
    fn ok(workflows: &[&str], media: &[&str]) -> Self {
        Self {
            workflows: workflows.iter().map(|s| s.to_string()).collect(),
            outcome: Ok(media.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn failing(status: u16, body: &str) -> Self {
        Self {
            workflows: vec!["wf1".to_string()],
            outcome: Err((status, body.to_string())),
        }
    }
}

#[async_trait]
impl GenerationBackend for StaticBackend {
    async fn list_workflows(&self) -> Result<Vec<String>, GenerationApiError> {
        Ok(self.workflows.clone())
    }

    async fn generate(&self, _: &RequestSnapshot) -> Result<GenerationResult, GenerationApiError> {
        match &self.outcome {
            Ok(media) => Ok(media.clone()),
            Err((status, body)) => Err(GenerationApiError::Backend {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

#[derive(Default)]
struct Collected {
    items: Vec<(MediaKind, String)>,
}

#[async_trait]
impl MediaRenderer for Collected {
    type Error = std::convert::Infallible;

    async fn render_image(&mut self, _: usize, reference: &str) -> Result<(), Self::Error> {
        self.items.push((MediaKind::Image, reference.to_string()));
        Ok(())
    }

    async fn render_video(
        &mut self,
        _: usize,
        reference: &str,
        _: VideoPlayback,
    ) -> Result<(), Self::Error> {
        self.items.push((MediaKind::Video, reference.to_string()));
        Ok(())
    }

    fn report_load_failure(&mut self, _: &MediaLoadError) {}
}

async fn controller_for(
    backend: StaticBackend,
    config: &RunnerConfig,
) -> GenerationController<StaticBackend> {
    let generation_config = runner_app::prepare(config).await.unwrap();
    GenerationController::with_config(backend, generation_config)
}

// ---------------------------------------------------------------------------
// Test: successful pass renders every item by kind
// ---------------------------------------------------------------------------

#[tokio::test]
async fn results_are_rendered_in_order() {
    let mut controller = controller_for(
        StaticBackend::ok(&["wf1"], &["x.mp4", "y.png"]),
        &RunnerConfig::default(),
    )
    .await;
    let mut renderer = Collected::default();

    let report = runner_app::run_once(&mut controller, &mut renderer).await.unwrap();

    assert_eq!(report.rendered, 2);
    assert_eq!(
        renderer.items,
        vec![
            (MediaKind::Video, "x.mp4".to_string()),
            (MediaKind::Image, "y.png".to_string()),
        ]
    );
}

#[tokio::test]
async fn preferred_workflow_kept_when_listed() {
    let config = RunnerConfig {
        workflow_name: Some("wf2".into()),
        ..RunnerConfig::default()
    };
    let mut controller = controller_for(StaticBackend::ok(&["wf1", "wf2"], &[]), &config).await;

    runner_app::run_once(&mut controller, &mut Collected::default())
        .await
        .unwrap();

    assert_eq!(controller.config().workflow_name(), Some("wf2"));
}

// ---------------------------------------------------------------------------
// Test: failures end the run with a descriptive error
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_directory_is_not_submittable() {
    let mut controller =
        controller_for(StaticBackend::ok(&[], &[]), &RunnerConfig::default()).await;

    let result = runner_app::run_once(&mut controller, &mut Collected::default()).await;

    assert_matches!(result, Err(RunError::NotSubmittable(_)));
}

#[tokio::test]
async fn video_mode_without_prompt_is_not_submittable() {
    let config = RunnerConfig {
        mode: runner_core::generation::GenerationMode::Video,
        ..RunnerConfig::default()
    };
    let mut controller = controller_for(StaticBackend::ok(&["wf1"], &[]), &config).await;

    let result = runner_app::run_once(&mut controller, &mut Collected::default()).await;

    assert_matches!(result, Err(RunError::NotSubmittable(reason)) if reason.contains("prompt"));
}

#[tokio::test]
async fn backend_failure_surfaces_message() {
    let mut controller =
        controller_for(StaticBackend::failing(500, "GPU OOM"), &RunnerConfig::default()).await;

    let result = runner_app::run_once(&mut controller, &mut Collected::default()).await;

    assert_matches!(
        result,
        Err(RunError::Generation(message)) if message == "Generation failed: 500 - GPU OOM"
    );
}

#[tokio::test]
async fn missing_reference_file_fails_preparation() {
    let config = RunnerConfig {
        reference_image: Some("/nonexistent/runner/ref.png".into()),
        ..RunnerConfig::default()
    };

    let result = runner_app::prepare(&config).await;

    assert_matches!(result, Err(RunError::Config(_)));
}
