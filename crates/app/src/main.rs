//! `runner-app` -- one-shot generation runner.
//!
//! Lists the backend's workflows, submits a single image or video
//! generation, and prints the resulting media to stdout.
//!
//! # Environment variables
//!
//! | Variable          | Required | Default                 | Description                          |
//! |-------------------|----------|-------------------------|--------------------------------------|
//! | `BACKEND_URL`     | no       | `http://localhost:8000` | Generation backend base URL          |
//! | `GENERATION_MODE` | no       | `image`                 | `image` or `video`                   |
//! | `WORKFLOW_NAME`   | no       | first listed            | Workflow to run                      |
//! | `PROMPT`          | no       | seeded image prompt     | Prompt for the selected mode         |
//! | `WIDTH`/`HEIGHT`  | no       | `1024`                  | Image size (ignored in video mode)   |
//! | `STEPS`           | no       | `9`                     | Sampling steps, 4-20                 |
//! | `SHIFT`           | no       | `3.0`                   | Noise schedule shift, 1.0-7.0        |
//! | `FPS`             | no       | `24`                    | Video frame rate, 12-60              |
//! | `FRAME_COUNT`     | no       | `121`                   | Video frame count, at least 16       |
//! | `REFERENCE_IMAGE` | no       | --                      | Path of an image to attach           |

use runner_app::config::RunnerConfig;
use runner_app::render::TerminalRenderer;
use runner_client::api::GenerationApi;
use runner_client::controller::GenerationController;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "runner_app=info,runner_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RunnerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        backend_url = %config.backend_url,
        mode = %config.mode,
        "Starting runner-app",
    );

    let generation_config = runner_app::prepare(&config).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let api = GenerationApi::new(&config.backend_url);
    let mut controller = GenerationController::with_config(api, generation_config);
    let mut renderer = TerminalRenderer::new(&config.backend_url, std::io::stdout());

    match runner_app::run_once(&mut controller, &mut renderer).await {
        Ok(report) if report.is_clean() => {}
        Ok(report) => {
            tracing::warn!(failed = report.failures.len(), "Some results could not be presented");
            std::process::exit(2);
        }
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            std::process::exit(1);
        }
    }
}
