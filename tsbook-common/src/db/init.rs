//! Database connection and schema bootstrap
//!
//! Generation runs open the store read-only; `init_database` is only used to
//! create an empty schema.

use crate::{Error, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Connect to an existing book database in read-only mode
///
/// A missing file is reported as `NotFound` rather than silently creating an
/// empty database.
pub async fn connect_readonly(db_path: &Path) -> Result<SqlitePool> {
    if !db_path.exists() {
        return Err(Error::NotFound(format!(
            "Database not found: {}",
            db_path.display()
        )));
    }

    // mode=ro: SQLite refuses every write on this connection
    let db_url = format!("sqlite://{}?mode=ro", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await?;

    info!("Opened book database (read-only): {}", db_path.display());
    Ok(pool)
}

/// Create the database if needed and ensure every table exists
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create all book tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS tier (
        tier_id INTEGER PRIMARY KEY,
        tier_name TEXT NOT NULL UNIQUE,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS branch (
        branch_id INTEGER PRIMARY KEY,
        branch_name TEXT NOT NULL UNIQUE,
        branch_header TEXT,
        branch_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS institution (
        institution_id INTEGER PRIMARY KEY,
        institution_name TEXT NOT NULL UNIQUE,
        institution_header TEXT,
        institution_desc TEXT,
        tier_id INTEGER NOT NULL,
        branch_id INTEGER,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role (
        role_id INTEGER PRIMARY KEY,
        role_name TEXT NOT NULL,
        role_desc TEXT,
        institution_id INTEGER NOT NULL,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_duty (
        duty_id INTEGER PRIMARY KEY,
        role_id INTEGER NOT NULL,
        duty_header TEXT NOT NULL,
        duty_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS role_explain (
        explain_id INTEGER PRIMARY KEY,
        role_id INTEGER NOT NULL,
        explain_header TEXT,
        explain_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS institution_explain (
        explain_id INTEGER PRIMARY KEY,
        institution_id INTEGER NOT NULL,
        explain_header TEXT,
        explain_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tier_explain (
        explain_id INTEGER PRIMARY KEY,
        tier_id INTEGER NOT NULL,
        explain_header TEXT,
        explain_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS process (
        process_id INTEGER PRIMARY KEY,
        process_name TEXT NOT NULL UNIQUE,
        process_header TEXT,
        process_desc TEXT,
        sort_order INTEGER
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS book_metadata (
        metadata_id INTEGER PRIMARY KEY,
        title TEXT NOT NULL DEFAULT 'Terran Society: A New Social Contract',
        subtitle TEXT,
        copyright_holder TEXT DEFAULT 'Terran Society',
        copyright_year INTEGER,
        dedication_text TEXT,
        dedication_attribution TEXT,
        current_version TEXT DEFAULT '0.1',
        version_date TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS book_author (
        author_id INTEGER PRIMARY KEY,
        author_name TEXT NOT NULL,
        author_bio TEXT,
        author_role TEXT,
        sort_order INTEGER DEFAULT 0
    )
    "#,
];
