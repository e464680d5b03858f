use crate::core::http::HttpError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WrenkitError>;

#[derive(Error, Debug)]
pub enum WrenkitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Download failed: all {mirrors} mirrors exhausted")]
    AllMirrorsFailed { mirrors: usize },

    #[error("Invalid archive: {path}")]
    InvalidArchive { path: PathBuf },

    #[error("Missing source directory: {path}")]
    MissingSource { path: PathBuf },

    #[error("Git executable not found: {path}")]
    GitNotFound { path: PathBuf },

    #[error("Git command failed: {message}")]
    GitError { message: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Prompt error: {message}")]
    Prompt { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Bundle root could not be determined")]
    RootNotFound,
}

impl From<dialoguer::Error> for WrenkitError {
    fn from(error: dialoguer::Error) -> Self {
        WrenkitError::Prompt {
            message: error.to_string(),
        }
    }
}

impl WrenkitError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        WrenkitError::ConfigError {
            message: message.into(),
        }
    }
}
