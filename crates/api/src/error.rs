/// Error type returned by collaborator implementations
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised by the bundled collaborator implementations.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),
    #[error("Invalid static path: {0}")]
    InvalidPath(String),
}
