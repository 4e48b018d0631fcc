//! # Terran Society Book Common Library
//!
//! Shared code for the book generation tools including:
//! - Book store connection and schema bootstrap
//! - Typed records for every store query
//! - Configuration loading (CLI > environment > TOML > compiled default)

pub mod config;
pub mod db;
pub mod error;

pub use config::BookConfig;
pub use error::{Error, Result};
