//! Error types for lastic

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lastic
///
/// Every pipeline stage resolves to the next stage's input or to one of
/// these; nothing is retried or recovered locally.
#[derive(Error, Debug)]
pub enum LasticError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not read body file '{}': {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not resolve AWS credentials: {0}")]
    CredentialResolution(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0:.1} seconds")]
    Timeout(f64),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for LasticError {
    fn from(err: reqwest::Error) -> Self {
        // reqwest's top-level message omits the cause (refused, DNS, TLS)
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        LasticError::Transport(message)
    }
}

pub type Result<T> = std::result::Result<T, LasticError>;
