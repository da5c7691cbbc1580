//! Events emitted by the generation controller.
//!
//! Any rendering layer can subscribe via
//! [`GenerationController::subscribe`](crate::controller::GenerationController::subscribe)
//! and redraw from these instead of polling the controller.

use chrono::{DateTime, Utc};
use runner_core::lifecycle::RequestState;
use serde::Serialize;

/// What changed.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEventKind {
    /// A new workflow directory replaced the previous one.
    WorkflowsLoaded {
        count: usize,
        /// The selection after re-validation.
        selected: Option<String>,
    },

    /// A configuration edit was applied.
    ConfigChanged,

    /// The request state transitioned.
    StateChanged { state: RequestState },
}

/// A controller event with the time it was produced.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerEvent {
    #[serde(flatten)]
    pub kind: ControllerEventKind,
    pub timestamp: DateTime<Utc>,
}

impl ControllerEvent {
    pub fn new(kind: ControllerEventKind) -> Self {
        Self {
            kind,
            timestamp: Utc::now(),
        }
    }
}
