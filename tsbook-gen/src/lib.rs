//! tsbook-gen library - book generation pipeline
//!
//! Turns the book database into a Markdown manuscript, has it converted to
//! HTML, cross-links glossary terms in the converted document and produces
//! the final HTML or PDF edition.

pub mod anchor;
pub mod catalog;
pub mod converter;
pub mod document;
pub mod error;
pub mod linker;
pub mod manuscript;
pub mod pipeline;
pub mod postprocess;

pub use catalog::TermCatalog;
pub use error::{GenError, Result};
pub use linker::{LinkReport, TermLinker};
pub use pipeline::{OutputMode, Pipeline};
