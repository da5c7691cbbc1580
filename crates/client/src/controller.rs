//! Generation lifecycle controller.
//!
//! [`GenerationController`] owns the configuration, the latest workflow
//! directory and the request lifecycle, and moves them forward only in
//! response to explicit events: [`apply`](GenerationController::apply),
//! [`load_workflows`](GenerationController::load_workflows),
//! [`begin_submit`](GenerationController::begin_submit) and
//! [`complete`](GenerationController::complete).
//!
//! The controller is meant to be owned by a single task. The network call
//! is the only suspension point; all mutation goes through `&mut self`.
//!
//! State changes are broadcast via a [`tokio::sync::broadcast`] channel.
//! Call [`GenerationController::subscribe`] to receive them.

use runner_core::error::CoreError;
use runner_core::generation::{ConfigEdit, GenerationConfig};
use runner_core::lifecycle::{GenerationResult, RequestId, RequestLifecycle, RequestState, Resolution};
use runner_core::snapshot::RequestSnapshot;
use runner_core::workflow::WorkflowDirectory;
use tokio::sync::broadcast;

use crate::api::GenerationApiError;
use crate::backend::GenerationBackend;
use crate::events::{ControllerEvent, ControllerEventKind};

/// Broadcast channel capacity for controller events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A submission that has entered `InFlight` and awaits its response.
#[derive(Debug, Clone)]
pub struct PendingGeneration {
    pub request_id: RequestId,
    pub snapshot: RequestSnapshot,
}

/// Drives fetch → configure → submit → resolve for one backend.
pub struct GenerationController<B> {
    backend: B,
    config: GenerationConfig,
    directory: WorkflowDirectory,
    lifecycle: RequestLifecycle,
    event_tx: broadcast::Sender<ControllerEvent>,
}

impl<B: GenerationBackend> GenerationController<B> {
    /// Create a controller with the default configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, GenerationConfig::default())
    }

    /// Create a controller starting from an existing configuration.
    pub fn with_config(backend: B, config: GenerationConfig) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            backend,
            config,
            directory: WorkflowDirectory::default(),
            lifecycle: RequestLifecycle::new(),
            event_tx,
        }
    }

    /// Subscribe to controller events.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.event_tx.subscribe()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn directory(&self) -> &WorkflowDirectory {
        &self.directory
    }

    pub fn state(&self) -> &RequestState {
        self.lifecycle.state()
    }

    /// Whether `submit` would currently issue a request.
    pub fn is_submittable(&self) -> bool {
        !self.lifecycle.state().is_in_flight() && self.config.is_submittable(&self.directory)
    }

    /// Apply a configuration edit.
    ///
    /// Edits never reach a request that is already in flight; its
    /// snapshot was taken at submission time.
    pub fn apply(&mut self, edit: ConfigEdit) -> Result<(), CoreError> {
        self.config.apply(edit)?;
        self.emit(ControllerEventKind::ConfigChanged);
        Ok(())
    }

    /// Fetch the workflow directory and replace the current one.
    ///
    /// On failure the directory becomes empty (disabling submission) and
    /// the error is surfaced as the current request state. Returns the
    /// number of workflows listed.
    pub async fn load_workflows(&mut self) -> Result<usize, GenerationApiError> {
        match self.backend.list_workflows().await {
            Ok(names) => {
                self.directory = WorkflowDirectory::new(names);
                let selected = self.config.sync_workflow(&self.directory).map(str::to_string);

                tracing::info!(
                    count = self.directory.len(),
                    selected = ?selected,
                    "Workflow directory loaded",
                );

                self.emit(ControllerEventKind::WorkflowsLoaded {
                    count: self.directory.len(),
                    selected,
                });
                Ok(self.directory.len())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load workflow directory");

                self.directory = WorkflowDirectory::default();
                self.config.sync_workflow(&self.directory);
                if self.lifecycle.report_error(e.to_string()) == Resolution::Applied {
                    self.emit_state();
                }
                Err(e)
            }
        }
    }

    /// Take a snapshot and enter `InFlight`.
    ///
    /// Returns `None` without changing anything when the configuration is
    /// not submittable or a request is already in flight. The caller is
    /// expected to run the snapshot through the backend and hand the
    /// outcome to [`complete`](Self::complete).
    pub fn begin_submit(&mut self) -> Option<PendingGeneration> {
        if !self.is_submittable() {
            tracing::debug!(
                state = self.lifecycle.state().as_str(),
                "Submit ignored: not submittable",
            );
            return None;
        }

        let snapshot = match self.config.build_request_snapshot() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(error = %e, "Submit ignored: snapshot unavailable");
                return None;
            }
        };

        let request_id = self.lifecycle.begin()?;

        tracing::info!(
            request_id,
            mode = %snapshot.mode(),
            workflow = snapshot.workflow_name(),
            width = snapshot.width(),
            height = snapshot.height(),
            video = ?snapshot.video(),
            has_reference = snapshot.reference().is_some(),
            "Generation submitted",
        );

        self.emit_state();
        Some(PendingGeneration {
            request_id,
            snapshot,
        })
    }

    /// Resolve a pending request with its outcome.
    ///
    /// Outcomes for anything other than the most recently issued request
    /// are discarded.
    pub fn complete(
        &mut self,
        request_id: RequestId,
        outcome: Result<GenerationResult, GenerationApiError>,
    ) -> Resolution {
        let resolution = match outcome {
            Ok(results) => {
                tracing::info!(request_id, count = results.len(), "Generation succeeded");
                self.lifecycle.resolve_success(request_id, results)
            }
            Err(e) => {
                tracing::error!(request_id, error = %e, "Generation failed");
                self.lifecycle.resolve_failure(request_id, e.to_string())
            }
        };

        if resolution == Resolution::Applied {
            self.emit_state();
        }
        resolution
    }

    /// Run one full submission against the backend.
    ///
    /// A no-op returning `None` when [`begin_submit`](Self::begin_submit)
    /// declines. Otherwise suspends until the backend answers and returns
    /// the id of the resolved request.
    pub async fn submit(&mut self) -> Option<RequestId> {
        let pending = self.begin_submit()?;
        let outcome = self.backend.generate(&pending.snapshot).await;
        self.complete(pending.request_id, outcome);
        Some(pending.request_id)
    }

    // ---- private helpers ----

    fn emit_state(&self) {
        self.emit(ControllerEventKind::StateChanged {
            state: self.lifecycle.state().clone(),
        });
    }

    fn emit(&self, kind: ControllerEventKind) {
        // Ignore the SendError; it only means there are no subscribers.
        let _ = self.event_tx.send(ControllerEvent::new(kind));
    }
}
