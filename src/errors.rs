// ABOUTME: Error types for the matisse application
// ABOUTME: Provides structured error handling for each stage of the pipeline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatisseError {
    #[error("Failed to read file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Invalid resource path: {0}")]
    InvalidResourcePath(String),

    #[error("Markdown converter not available: {0}")]
    ConverterUnavailable(String),

    #[error("HTML generation error: {0}")]
    HtmlError(String),

    #[error("Input validation error: {0}")]
    ValidationError(String),

    #[error("Path not found: {0}")]
    PathNotFoundError(PathBuf),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Watch error: {0}")]
    WatchError(String),
}

impl From<notify::Error> for MatisseError {
    fn from(err: notify::Error) -> Self {
        MatisseError::WatchError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MatisseError>;
