//! tsbook-gen - Terran Society book generator
//!
//! Reads the book database, assembles the manuscript and renders the HTML or
//! PDF edition with glossary cross-links.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tsbook_common::config::{CliOverrides, ConfigResolver, LoggingConfig};
use tsbook_common::db::{connect_readonly, init_database};
use tsbook_common::BookConfig;
use tsbook_gen::converter::{DocumentConverter, PandocConverter};
use tsbook_gen::{LinkReport, OutputMode, Pipeline, TermCatalog};

/// Command-line arguments for tsbook-gen
#[derive(Parser, Debug)]
#[command(name = "tsbook-gen")]
#[command(about = "Generate the Terran Society book from the book database")]
#[command(version)]
struct Args {
    /// Path to TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the book database (overrides TSBOOK_DATABASE and config file)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Output directory (overrides TSBOOK_OUTPUT_DIR and config file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// Directory with hand-maintained inputs such as rights.txt
    #[arg(long, global = true)]
    inputs_dir: Option<PathBuf>,

    /// Write the glossary linking report as JSON to this file
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Assemble the Markdown manuscript only
    Manuscript,
    /// Build the web HTML edition
    Html,
    /// Build the PDF edition
    Pdf,
    /// Add glossary links to an existing HTML file
    Link {
        /// HTML file to read
        input: PathBuf,
        /// Where to write the linked HTML
        output: PathBuf,
    },
    /// Print the glossary term catalog in matching order
    Terms,
    /// Create the book database schema
    InitDb,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config: self.config.clone(),
            database: self.database.clone(),
            output_dir: self.output_dir.clone(),
            inputs_dir: self.inputs_dir.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new(args.overrides())
        .resolve()
        .context("Failed to resolve configuration")?;

    init_tracing(&config.logging)?;

    // Build identification first, before any database or converter work
    info!(
        "Starting tsbook-gen v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config.log_summary();

    let report = run(&args.command, &config).await?;

    if let Some(path) = &args.report {
        match &report {
            Some(report) => report
                .write_json(path)
                .with_context(|| format!("Failed to write report {}", path.display()))?,
            None => warn!("No linking report for this command, {} not written", path.display()),
        }
    }

    Ok(())
}

async fn run(command: &Command, config: &BookConfig) -> Result<Option<LinkReport>> {
    if let Command::InitDb = command {
        let pool = init_database(&config.database_path)
            .await
            .with_context(|| format!("Failed to initialize {}", config.database_path.display()))?;
        pool.close().await;
        info!("Book database schema ready");
        return Ok(None);
    }

    let pool = connect_readonly(&config.database_path)
        .await
        .with_context(|| format!("Failed to open {}", config.database_path.display()))?;

    let converter: Arc<dyn DocumentConverter> = Arc::new(PandocConverter::new(&config.converter));
    let pipeline = Pipeline::new(config, &pool, converter);

    let report = match command {
        Command::Manuscript => {
            pipeline.manuscript().await?;
            None
        }
        Command::Html => Some(pipeline.build(OutputMode::Html).await?.report),
        Command::Pdf => Some(pipeline.build(OutputMode::Pdf).await?.report),
        Command::Link { input, output } => Some(
            pipeline
                .link_file(input, output)
                .await
                .with_context(|| format!("Failed to link {}", input.display()))?,
        ),
        Command::Terms => {
            let catalog = TermCatalog::build(&pool).await?;
            for term in catalog.iter() {
                println!("{}", term);
            }
            None
        }
        Command::InitDb => None,
    };

    pool.close().await;
    Ok(report)
}

/// Initialize the tracing subscriber
///
/// RUST_LOG wins over the configured level. Logs go to stderr, or to the
/// configured file without ANSI colors.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &logging.file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
