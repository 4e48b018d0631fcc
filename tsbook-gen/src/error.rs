//! Error types for the book generator

use crate::converter::ConverterError;
use crate::document::ParseError;
use thiserror::Error;

/// Generator error type
#[derive(Debug, Error)]
pub enum GenError {
    /// Store, configuration or other shared-layer failure
    #[error(transparent)]
    Common(#[from] tsbook_common::Error),

    /// Converted document could not be loaded as markup
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// External converter failed
    #[error(transparent)]
    Converter(#[from] ConverterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A term could not be compiled into a search pattern
    #[error("Invalid term pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    /// Background task panicked or was cancelled
    #[error("Background task failed: {0}")]
    Task(String),
}

impl From<sqlx::Error> for GenError {
    fn from(err: sqlx::Error) -> Self {
        GenError::Common(tsbook_common::Error::Database(err))
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, GenError>;
