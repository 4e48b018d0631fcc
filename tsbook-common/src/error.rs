//! Errors shared by the book generator crates
//!
//! Failures come from the SQLite book store, the TOML config file and the
//! hand-maintained input files such as the rights list.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for book store, configuration and input loading
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Connecting to or querying the book store failed
    #[error("Book store error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file unreadable or not valid TOML, or a setting out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Book store file does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// An input file exists but could not be read
    #[error("Cannot read input file {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
