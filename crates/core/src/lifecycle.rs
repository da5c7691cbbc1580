//! Request lifecycle state machine.
//!
//! ```text
//! Idle ──begin──▶ InFlight ──resolve_success──▶ Succeeded
//!                    │
//!                    └────resolve_failure─────▶ Failed
//! Succeeded | Failed ──begin──▶ InFlight   (previous payload dropped)
//! ```
//!
//! Each `begin` issues a new [`RequestId`]. Resolutions carrying any other
//! id are stale and are discarded without touching the state.

use serde::Serialize;

/// Monotonically increasing identifier attached to each submission.
pub type RequestId = u64;

/// Ordered media references returned by the backend.
pub type GenerationResult = Vec<String>;

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    InFlight { request_id: RequestId },
    Succeeded { results: GenerationResult },
    Failed { message: String },
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight { .. })
    }

    /// The results of a successful request, if any.
    pub fn results(&self) -> Option<&[String]> {
        match self {
            Self::Succeeded { results } => Some(results),
            _ => None,
        }
    }

    /// The currently displayed error, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InFlight { .. } => "in_flight",
            Self::Succeeded { .. } => "succeeded",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Whether a resolution was applied to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    /// The id did not match the latest issued request.
    Stale,
}

/// Owns the [`RequestState`] and the request id counter.
#[derive(Debug, Default)]
pub struct RequestLifecycle {
    state: RequestState,
    last_issued: RequestId,
}

impl RequestLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    /// Id of the most recently issued request (0 before the first).
    pub fn last_issued(&self) -> RequestId {
        self.last_issued
    }

    /// Enter `InFlight`, dropping any previous result or error.
    ///
    /// Returns `None` (and changes nothing) if a request is already in
    /// flight.
    pub fn begin(&mut self) -> Option<RequestId> {
        if self.state.is_in_flight() {
            return None;
        }
        self.last_issued += 1;
        self.state = RequestState::InFlight {
            request_id: self.last_issued,
        };
        Some(self.last_issued)
    }

    pub fn resolve_success(&mut self, request_id: RequestId, results: GenerationResult) -> Resolution {
        self.resolve(request_id, RequestState::Succeeded { results })
    }

    pub fn resolve_failure(&mut self, request_id: RequestId, message: impl Into<String>) -> Resolution {
        self.resolve(
            request_id,
            RequestState::Failed {
                message: message.into(),
            },
        )
    }

    /// Surface an error that did not come from a generation request
    /// (e.g. the workflow listing failed).
    ///
    /// Ignored while a request is in flight so the pending response can
    /// still land.
    pub fn report_error(&mut self, message: impl Into<String>) -> Resolution {
        if self.state.is_in_flight() {
            return Resolution::Stale;
        }
        self.state = RequestState::Failed {
            message: message.into(),
        };
        Resolution::Applied
    }

    fn resolve(&mut self, request_id: RequestId, next: RequestState) -> Resolution {
        match self.state {
            RequestState::InFlight { request_id: current } if current == request_id => {
                self.state = next;
                Resolution::Applied
            }
            _ => {
                tracing::warn!(
                    request_id,
                    latest = self.last_issued,
                    state = self.state.as_str(),
                    "Discarding stale generation response",
                );
                Resolution::Stale
            }
        }
    }
}
