use thiserror::Error;

/// Main error type for the packing planner
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Provider error (HTTP {status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Provider returned no text: {0}")]
    EmptyResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Share error: {0}")]
    Share(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Stable code used in structured log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::Http(_) => "HTTP_ERROR",
            PlannerError::Provider { .. } => "PROVIDER_ERROR",
            PlannerError::EmptyResponse(_) => "EMPTY_RESPONSE",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::Parse(_) => "PARSE_ERROR",
            PlannerError::Validation(_) => "VALIDATION_ERROR",
            PlannerError::Storage(_) => "STORAGE_ERROR",
            PlannerError::Share(_) => "SHARE_ERROR",
            PlannerError::Io(_) => "IO_ERROR",
        }
    }
}
