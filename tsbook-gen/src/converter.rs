//! External document conversion
//!
//! Markdown is turned into standalone HTML by pandoc and HTML into PDF by an
//! HTML renderer (weasyprint by default). Both run as child processes; the
//! [`DocumentConverter`] trait is the seam the pipeline depends on so tests
//! can substitute their own implementation.

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Output};
use thiserror::Error;
use tracing::{debug, info};
use tsbook_common::config::ConverterConfig;

/// Converter errors
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Binary missing from PATH or not executable
    #[error("Converter binary not found: {0}")]
    BinaryNotFound(String),

    /// Binary could not be started
    #[error("Failed to run {program}: {message}")]
    ExecutionError { program: String, message: String },

    /// Binary ran and reported failure
    #[error("{program} failed (exit status {status}): {stderr}")]
    ConversionFailed {
        program: String,
        status: String,
        stderr: String,
    },

    /// Input document does not exist
    #[error("Converter input not found: {0}")]
    InputNotFound(String),
}

/// Converts documents between formats
pub trait DocumentConverter: Send + Sync {
    /// Markdown to standalone HTML with a generated table of contents
    fn markdown_to_html(
        &self,
        markdown: &Path,
        html: &Path,
        title: &str,
    ) -> Result<(), ConverterError>;

    /// HTML to PDF
    fn html_to_pdf(&self, html: &Path, pdf: &Path) -> Result<(), ConverterError>;
}

/// pandoc + HTML-to-PDF renderer
#[derive(Debug, Clone)]
pub struct PandocConverter {
    pandoc: String,
    pdf_engine: String,
    toc_depth: u8,
}

impl PandocConverter {
    pub fn new(config: &ConverterConfig) -> Self {
        Self {
            pandoc: config.pandoc.clone(),
            pdf_engine: config.pdf_engine.clone(),
            toc_depth: config.toc_depth,
        }
    }

    /// Arguments handed to pandoc for a Markdown to HTML conversion
    pub fn pandoc_args(&self, markdown: &Path, html: &Path, title: &str) -> Vec<String> {
        vec![
            markdown.display().to_string(),
            "-o".to_string(),
            html.display().to_string(),
            "--standalone".to_string(),
            "--toc".to_string(),
            format!("--toc-depth={}", self.toc_depth),
            "--metadata".to_string(),
            format!("title={}", title),
        ]
    }

    /// Arguments handed to the PDF engine
    pub fn pdf_engine_args(&self, html: &Path, pdf: &Path) -> Vec<String> {
        vec![html.display().to_string(), pdf.display().to_string()]
    }
}

impl DocumentConverter for PandocConverter {
    fn markdown_to_html(
        &self,
        markdown: &Path,
        html: &Path,
        title: &str,
    ) -> Result<(), ConverterError> {
        require_input(markdown)?;
        info!("Converting {} to HTML with {}", markdown.display(), self.pandoc);
        run(&self.pandoc, &self.pandoc_args(markdown, html, title))
    }

    fn html_to_pdf(&self, html: &Path, pdf: &Path) -> Result<(), ConverterError> {
        require_input(html)?;
        info!("Rendering {} to PDF with {}", html.display(), self.pdf_engine);
        run(&self.pdf_engine, &self.pdf_engine_args(html, pdf))
    }
}

fn require_input(path: &Path) -> Result<(), ConverterError> {
    if path.exists() {
        Ok(())
    } else {
        Err(ConverterError::InputNotFound(path.display().to_string()))
    }
}

/// Run a converter binary and check its exit status
fn run(program: &str, args: &[String]) -> Result<(), ConverterError> {
    debug!(program, ?args, "Spawning converter");

    let output: Output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ConverterError::BinaryNotFound(program.to_string())
        } else {
            ConverterError::ExecutionError {
                program: program.to_string(),
                message: e.to_string(),
            }
        }
    })?;

    if !output.status.success() {
        return Err(ConverterError::ConversionFailed {
            program: program.to_string(),
            status: output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string()),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(())
}
