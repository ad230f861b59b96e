use std::path::PathBuf;

use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Every variant is fatal for the run. Retryable LLM failures only end up here
/// once the backoff loop has given up.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Required environment variable '{0}' is not set")]
    MissingCredential(&'static str),

    #[error("Cannot access file '{}': {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AppError {
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::FileAccess {
            path: path.into(),
            source,
        }
    }
}
