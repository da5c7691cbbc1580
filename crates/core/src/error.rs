//! Error type shared by the domain modules.

/// Failure of a domain operation.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A value was outside its allowed range or a precondition was not met.
    #[error("Validation failed: {0}")]
    Validation(String),
}
