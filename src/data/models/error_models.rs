use reqwest::StatusCode;
use thiserror::Error;

// Failure of a single backend call. Never escapes the controller.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("code {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend url cannot carry item paths: {0}")]
    InvalidBaseUrl(String),
}

impl BackendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            BackendError::Transport(e) => e.status(),
            BackendError::InvalidBaseUrl(_) => None,
        }
    }
}

// Errors surfaced by the view layer to the browser
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("No result with ID {0}")]
    ItemNotFound(String),
    #[error("Session error: {0}")]
    SessionError(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: &'static str, reason: String },
    #[error("{key} must be a positive integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("{key} is not a valid log level: {value:?}")]
    InvalidLogLevel { key: &'static str, value: String },
}
