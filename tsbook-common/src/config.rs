//! Configuration loading and resolution
//!
//! Every setting is resolved once at process start, in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! The result is an immutable [`BookConfig`] that is passed by reference to
//! whatever needs it. Nothing here writes to the process environment.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming an explicit TOML config file
pub const CONFIG_ENV: &str = "TSBOOK_CONFIG";
/// Environment variable overriding the database path
pub const DATABASE_ENV: &str = "TSBOOK_DATABASE";
/// Environment variable overriding the output directory
pub const OUTPUT_DIR_ENV: &str = "TSBOOK_OUTPUT_DIR";
/// Environment variable overriding the inputs directory
pub const INPUTS_DIR_ENV: &str = "TSBOOK_INPUTS_DIR";

/// Compiled defaults used when no other source provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub inputs_dir: PathBuf,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("tsbook.db"),
            output_dir: PathBuf::from("book"),
            inputs_dir: PathBuf::from("inputs"),
            log_level: default_log_level(),
        }
    }
}

/// Bootstrap configuration loaded from TOML file
///
/// All fields are optional; anything missing falls through to the
/// compiled defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Path to the SQLite book database
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Directory receiving manuscript.md and the rendered outputs
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Directory holding hand-maintained source texts (rights.txt)
    #[serde(default)]
    pub inputs_dir: Option<PathBuf>,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub linking: LinkingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// External document converter settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConverterConfig {
    /// Pandoc binary (name on PATH or absolute path)
    #[serde(default = "default_pandoc")]
    pub pandoc: String,

    /// HTML to PDF renderer binary
    #[serde(default = "default_pdf_engine")]
    pub pdf_engine: String,

    /// Heading depth included in the generated table of contents
    #[serde(default = "default_toc_depth")]
    pub toc_depth: u8,

    /// Stylesheet embedded into the HTML output (optional)
    #[serde(default)]
    pub stylesheet: Option<PathBuf>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pandoc: default_pandoc(),
            pdf_engine: default_pdf_engine(),
            toc_depth: default_toc_depth(),
            stylesheet: None,
        }
    }
}

/// Glossary linking landmarks and link styling
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkingConfig {
    /// Element id of the glossary section
    #[serde(default = "default_glossary_id")]
    pub glossary_id: String,

    /// Element id of the table of contents container
    #[serde(default = "default_toc_id")]
    pub toc_id: String,

    /// Class attribute placed on generated links
    #[serde(default = "default_link_class")]
    pub link_class: String,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            glossary_id: default_glossary_id(),
            toc_id: default_toc_id(),
            link_class: default_link_class(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

fn default_pandoc() -> String {
    "pandoc".to_string()
}

fn default_pdf_engine() -> String {
    "weasyprint".to_string()
}

fn default_toc_depth() -> u8 {
    3
}

fn default_glossary_id() -> String {
    "glossary".to_string()
}

fn default_toc_id() -> String {
    "TOC".to_string()
}

fn default_link_class() -> String {
    "glossary-term".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub inputs_dir: Option<PathBuf>,
}

/// Fully resolved, immutable configuration for one generation run
#[derive(Debug, Clone)]
pub struct BookConfig {
    pub database_path: PathBuf,
    pub output_dir: PathBuf,
    pub inputs_dir: PathBuf,
    pub converter: ConverterConfig,
    pub linking: LinkingConfig,
    pub logging: LoggingConfig,
    /// Config file the values were read from, if any
    pub config_file: Option<PathBuf>,
}

impl BookConfig {
    /// Build a configuration from compiled defaults only
    pub fn defaults() -> Self {
        let defaults = CompiledDefaults::default();
        Self {
            database_path: defaults.database_path,
            output_dir: defaults.output_dir,
            inputs_dir: defaults.inputs_dir,
            converter: ConverterConfig::default(),
            linking: LinkingConfig::default(),
            logging: LoggingConfig::default(),
            config_file: None,
        }
    }

    /// Markdown manuscript written by the assembler
    pub fn manuscript_path(&self) -> PathBuf {
        self.output_dir.join("manuscript.md")
    }

    /// Raw converter output before linking and post-processing
    pub fn converted_html_path(&self) -> PathBuf {
        self.output_dir.join("TerranSocietyBook_converted.html")
    }

    /// Final web HTML
    pub fn html_path(&self) -> PathBuf {
        self.output_dir.join("TerranSocietyBook.html")
    }

    /// Print-oriented HTML handed to the PDF engine
    pub fn pdf_html_path(&self) -> PathBuf {
        self.output_dir.join("TerranSocietyBook_pdf.html")
    }

    /// Final PDF
    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join("TerranSocietyBook.pdf")
    }

    /// Rights of the People source text
    pub fn rights_path(&self) -> PathBuf {
        self.inputs_dir.join("rights.txt")
    }

    /// Log where the configuration came from and the paths it resolved to
    ///
    /// Resolution runs before the subscriber exists, so callers log the
    /// result once tracing is initialized.
    pub fn log_summary(&self) {
        match &self.config_file {
            Some(path) => info!("Config file: {}", path.display()),
            None => warn!("No config file found, using compiled defaults"),
        }
        info!("Database path: {}", self.database_path.display());
        info!("Output directory: {}", self.output_dir.display());
        info!("Inputs directory: {}", self.inputs_dir.display());
        debug!(
            converter = ?self.converter,
            linking = ?self.linking,
            logging = ?self.logging,
            "Configuration resolved"
        );
    }
}

/// Resolves a [`BookConfig`] from CLI, environment, TOML and defaults
pub struct ConfigResolver {
    cli: CliOverrides,
    defaults: CompiledDefaults,
}

impl ConfigResolver {
    pub fn new(cli: CliOverrides) -> Self {
        Self {
            cli,
            defaults: CompiledDefaults::default(),
        }
    }

    /// Resolve the configuration
    ///
    /// An explicitly named config file (CLI or environment) must exist and
    /// parse. The platform default config file is optional: when absent the
    /// run proceeds on defaults and `config_file` is `None`.
    pub fn resolve(&self) -> Result<BookConfig> {
        let config_file = self
            .explicit_config_path()
            .or_else(|| default_config_path().filter(|p| p.exists()));
        let toml_config = match &config_file {
            Some(path) => load_toml_config(path)?,
            None => TomlConfig::default(),
        };

        let config = BookConfig {
            database_path: pick(
                self.cli.database.clone(),
                DATABASE_ENV,
                toml_config.database_path,
                &self.defaults.database_path,
            ),
            output_dir: pick(
                self.cli.output_dir.clone(),
                OUTPUT_DIR_ENV,
                toml_config.output_dir,
                &self.defaults.output_dir,
            ),
            inputs_dir: pick(
                self.cli.inputs_dir.clone(),
                INPUTS_DIR_ENV,
                toml_config.inputs_dir,
                &self.defaults.inputs_dir,
            ),
            converter: toml_config.converter,
            linking: toml_config.linking,
            logging: toml_config.logging,
            config_file,
        };

        if config.converter.toc_depth == 0 || config.converter.toc_depth > 6 {
            return Err(Error::Config(format!(
                "converter.toc_depth must be between 1 and 6, got {}",
                config.converter.toc_depth
            )));
        }

        Ok(config)
    }

    fn explicit_config_path(&self) -> Option<PathBuf> {
        self.cli
            .config
            .clone()
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from))
    }
}

/// Priority: CLI > environment > TOML > default
fn pick(cli: Option<PathBuf>, env_var: &str, toml: Option<PathBuf>, default: &Path) -> PathBuf {
    if let Some(path) = cli {
        return path;
    }
    if let Ok(value) = std::env::var(env_var) {
        if !value.is_empty() {
            return PathBuf::from(value);
        }
    }
    toml.unwrap_or_else(|| default.to_path_buf())
}

/// Platform config file location: `<config_dir>/tsbook/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tsbook").join("config.toml"))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Cannot read config file {}: {}", path.display(), e))
    })?;
    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Invalid config file {}: {}", path.display(), e))
    })?;
    Ok(config)
}
