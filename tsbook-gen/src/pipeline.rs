//! Generation pipeline
//!
//! One run is a single sequential pass: assemble the manuscript, convert it,
//! load the converted document, link glossary terms, post-process and write.
//! Any failure aborts the run.

use crate::catalog::TermCatalog;
use crate::converter::{ConverterError, DocumentConverter};
use crate::document::Document;
use crate::error::{GenError, Result};
use crate::linker::{LinkReport, TermLinker};
use crate::manuscript::{Manuscript, ManuscriptAssembler};
use crate::postprocess::{
    embed_stylesheet, hide_title_block, insert_navigation, relocate_toc, TocHeading,
};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use tsbook_common::BookConfig;

/// Final output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Web HTML with embedded stylesheet and navigation
    Html,
    /// Print HTML rendered to PDF
    Pdf,
}

/// Result of a full build
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: PathBuf,
    pub report: LinkReport,
}

/// Parse markup, link it and hand back the tree with the linking report
pub fn link_markup(html: &str, linker: &TermLinker) -> Result<(Document, LinkReport)> {
    let mut doc = Document::parse(html)?;
    let report = linker.link(&mut doc);
    Ok((doc, report))
}

pub struct Pipeline<'a> {
    config: &'a BookConfig,
    pool: &'a SqlitePool,
    converter: Arc<dyn DocumentConverter>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a BookConfig,
        pool: &'a SqlitePool,
        converter: Arc<dyn DocumentConverter>,
    ) -> Self {
        Self {
            config,
            pool,
            converter,
        }
    }

    /// Assemble the manuscript and write it to the output directory
    pub async fn manuscript(&self) -> Result<Manuscript> {
        let manuscript = ManuscriptAssembler::new(self.pool, self.config.rights_path())
            .assemble()
            .await?;
        manuscript.write_to(&self.config.manuscript_path())?;
        Ok(manuscript)
    }

    /// Term catalog and linker for this run
    pub async fn linker(&self) -> Result<TermLinker> {
        let catalog = TermCatalog::build(self.pool).await?;
        TermLinker::new(&catalog, &self.config.linking)
    }

    /// Full build to HTML or PDF
    pub async fn build(&self, mode: OutputMode) -> Result<RunSummary> {
        let manuscript = self.manuscript().await?;
        let title = manuscript.metadata.title.clone();

        let markdown_path = self.config.manuscript_path();
        let converted_path = self.config.converted_html_path();
        {
            let (markdown_path, converted_path, title) =
                (markdown_path.clone(), converted_path.clone(), title.clone());
            self.run_converter(move |converter| {
                converter.markdown_to_html(&markdown_path, &converted_path, &title)
            })
            .await?;
        }

        let html = std::fs::read_to_string(&converted_path)?;
        if let Err(e) = std::fs::remove_file(&converted_path) {
            debug!("Could not remove {}: {}", converted_path.display(), e);
        }

        let linker = self.linker().await?;
        let (mut doc, report) = link_markup(&html, &linker)?;

        let heading = TocHeading {
            title: title.clone(),
            subtitle: manuscript.metadata.subtitle.clone(),
        };
        let toc_id = &self.config.linking.toc_id;

        let output = match mode {
            OutputMode::Html => {
                relocate_toc(&mut doc, toc_id, &heading);
                self.embed_configured_stylesheet(&mut doc)?;
                insert_navigation(&mut doc, &title, toc_id);

                let path = self.config.html_path();
                write_document(&doc, &path)?;
                path
            }
            OutputMode::Pdf => {
                hide_title_block(&mut doc);
                relocate_toc(&mut doc, toc_id, &heading);
                self.embed_configured_stylesheet(&mut doc)?;

                let html_path = self.config.pdf_html_path();
                write_document(&doc, &html_path)?;

                let pdf_path = self.config.pdf_path();
                {
                    let (html_path, pdf_path) = (html_path.clone(), pdf_path.clone());
                    self.run_converter(move |converter| converter.html_to_pdf(&html_path, &pdf_path))
                        .await?;
                }
                pdf_path
            }
        };

        info!(
            output = %output.display(),
            links = report.links_inserted,
            "Build complete"
        );
        Ok(RunSummary { output, report })
    }

    /// Link an existing HTML file against the store's catalog
    pub async fn link_file(&self, input: &Path, output: &Path) -> Result<LinkReport> {
        let html = std::fs::read_to_string(input)?;
        let linker = self.linker().await?;
        let (doc, report) = link_markup(&html, &linker)?;
        write_document(&doc, output)?;
        Ok(report)
    }

    fn embed_configured_stylesheet(&self, doc: &mut Document) -> Result<()> {
        let Some(path) = &self.config.converter.stylesheet else {
            return Ok(());
        };
        match std::fs::read_to_string(path) {
            Ok(css) => {
                embed_stylesheet(doc, &css);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Stylesheet {} not found, output left unstyled", path.display());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run a blocking converter call off the async executor
    async fn run_converter<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&dyn DocumentConverter) -> std::result::Result<(), ConverterError>
            + Send
            + 'static,
    {
        let converter = Arc::clone(&self.converter);
        tokio::task::spawn_blocking(move || job(converter.as_ref()))
            .await
            .map_err(|e| GenError::Task(e.to_string()))??;
        Ok(())
    }
}

fn write_document(doc: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, doc.to_html()?)?;
    info!("Wrote {}", path.display());
    Ok(())
}
