use thiserror::Error;

/// Errors raised while reading a referrer database.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("Referrer database must be a JSON object of categories")]
    NotAnObject,
    #[error("Category '{0}' must be a JSON object of providers")]
    InvalidCategory(String),
    #[error("Provider in category '{0}' has an empty name")]
    EmptyProviderName(String),
    #[error("Provider '{0}' must be a JSON object")]
    InvalidProvider(String),
    #[error("Provider '{provider}': '{field}' must be a list of strings")]
    InvalidList { provider: String, field: &'static str },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Core(#[from] refattr_core::Error),
}

impl From<CompileError> for refattr_core::Error {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Core(inner) => inner,
            CompileError::Json(inner) => refattr_core::Error::Json(inner),
            other => refattr_core::Error::Database(other.to_string()),
        }
    }
}
