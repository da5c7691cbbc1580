//! Snapshot of the workflow names offered by the backend.
//!
//! A [`WorkflowDirectory`] is replaced wholesale on every fetch and never
//! mutated in place. The selected workflow in the configuration is
//! re-validated against each new snapshot via
//! [`WorkflowDirectory::resolve_selection`].

use std::sync::Arc;

/// Ordered, immutable list of workflow names.
///
/// Cloning is cheap; the names are shared behind an `Arc`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowDirectory {
    names: Arc<[String]>,
}

impl WorkflowDirectory {
    /// Build a snapshot from the names returned by the backend, in
    /// backend order.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names: names.into(),
        }
    }

    /// All names in presentation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether `name` is one of the listed workflows (exact match).
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// The first listed workflow, used as the default selection.
    pub fn first(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    /// Decide which workflow should be selected after this snapshot
    /// replaces the previous one.
    ///
    /// - An existing selection that is still listed is kept.
    /// - An unset or no-longer-listed selection falls back to the first
    ///   entry.
    /// - An empty directory yields `None`.
    pub fn resolve_selection(&self, current: Option<&str>) -> Option<String> {
        match current {
            Some(name) if self.contains(name) => Some(name.to_string()),
            _ => self.first().map(str::to_string),
        }
    }
}
