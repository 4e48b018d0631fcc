//! Read-only queries against the book store
//!
//! Every list query is ordered by the table's `sort_order` column, with the
//! primary key as tie-breaker so output is deterministic.

use super::models::*;
use crate::Result;
use sqlx::SqlitePool;

pub async fn list_tiers(pool: &SqlitePool) -> Result<Vec<Tier>> {
    let tiers = sqlx::query_as::<_, Tier>(
        "SELECT tier_id, tier_name, sort_order FROM tier ORDER BY sort_order, tier_id",
    )
    .fetch_all(pool)
    .await?;
    Ok(tiers)
}

pub async fn list_branches(pool: &SqlitePool) -> Result<Vec<Branch>> {
    let branches = sqlx::query_as::<_, Branch>(
        r#"
        SELECT branch_id, branch_name, branch_header, branch_desc
        FROM branch
        ORDER BY sort_order, branch_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(branches)
}

/// All institutions, across tiers
pub async fn list_institutions(pool: &SqlitePool) -> Result<Vec<InstitutionSummary>> {
    let institutions = sqlx::query_as::<_, InstitutionSummary>(
        r#"
        SELECT institution_id, institution_name, institution_header, institution_desc,
               tier_id, branch_id
        FROM institution
        ORDER BY sort_order, institution_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(institutions)
}

pub async fn institutions_for_tier(
    pool: &SqlitePool,
    tier_id: i64,
) -> Result<Vec<InstitutionSummary>> {
    let institutions = sqlx::query_as::<_, InstitutionSummary>(
        r#"
        SELECT institution_id, institution_name, institution_header, institution_desc,
               tier_id, branch_id
        FROM institution
        WHERE tier_id = ?
        ORDER BY sort_order, institution_id
        "#,
    )
    .bind(tier_id)
    .fetch_all(pool)
    .await?;
    Ok(institutions)
}

/// All roles, across institutions
pub async fn list_roles(pool: &SqlitePool) -> Result<Vec<RoleSummary>> {
    let roles = sqlx::query_as::<_, RoleSummary>(
        r#"
        SELECT role_id, role_name, role_desc, institution_id
        FROM role
        ORDER BY sort_order, role_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

pub async fn roles_for_institution(
    pool: &SqlitePool,
    institution_id: i64,
) -> Result<Vec<RoleSummary>> {
    let roles = sqlx::query_as::<_, RoleSummary>(
        r#"
        SELECT role_id, role_name, role_desc, institution_id
        FROM role
        WHERE institution_id = ?
        ORDER BY sort_order, role_id
        "#,
    )
    .bind(institution_id)
    .fetch_all(pool)
    .await?;
    Ok(roles)
}

/// All duties, grouped by role and ordered within each role
pub async fn list_duties(pool: &SqlitePool) -> Result<Vec<Duty>> {
    let duties = sqlx::query_as::<_, Duty>(
        r#"
        SELECT duty_id, role_id, duty_header, duty_desc
        FROM role_duty
        ORDER BY role_id, sort_order, duty_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(duties)
}

pub async fn tier_explanations(pool: &SqlitePool, tier_id: i64) -> Result<Vec<Explanation>> {
    let explanations = sqlx::query_as::<_, Explanation>(
        r#"
        SELECT explain_id, tier_id AS owner_id, explain_header, explain_desc
        FROM tier_explain
        WHERE tier_id = ?
        ORDER BY sort_order, explain_id
        "#,
    )
    .bind(tier_id)
    .fetch_all(pool)
    .await?;
    Ok(explanations)
}

pub async fn institution_explanations(
    pool: &SqlitePool,
    institution_id: i64,
) -> Result<Vec<Explanation>> {
    let explanations = sqlx::query_as::<_, Explanation>(
        r#"
        SELECT explain_id, institution_id AS owner_id, explain_header, explain_desc
        FROM institution_explain
        WHERE institution_id = ?
        ORDER BY sort_order, explain_id
        "#,
    )
    .bind(institution_id)
    .fetch_all(pool)
    .await?;
    Ok(explanations)
}

pub async fn role_explanations(pool: &SqlitePool, role_id: i64) -> Result<Vec<Explanation>> {
    let explanations = sqlx::query_as::<_, Explanation>(
        r#"
        SELECT explain_id, role_id AS owner_id, explain_header, explain_desc
        FROM role_explain
        WHERE role_id = ?
        ORDER BY sort_order, explain_id
        "#,
    )
    .bind(role_id)
    .fetch_all(pool)
    .await?;
    Ok(explanations)
}

pub async fn list_processes(pool: &SqlitePool) -> Result<Vec<Process>> {
    let processes = sqlx::query_as::<_, Process>(
        r#"
        SELECT process_id, process_name, process_header, process_desc
        FROM process
        ORDER BY sort_order, process_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(processes)
}

/// Distinct role names with the description of the first role carrying each name
pub async fn role_entries(pool: &SqlitePool) -> Result<Vec<NamedEntry>> {
    let entries = sqlx::query_as::<_, NamedEntry>(
        r#"
        SELECT r.role_name AS name, r.role_desc AS description
        FROM role r
        WHERE r.role_id = (
            SELECT MIN(r2.role_id) FROM role r2 WHERE r2.role_name = r.role_name
        )
        ORDER BY r.role_name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Institution names with their descriptions
pub async fn institution_entries(pool: &SqlitePool) -> Result<Vec<NamedEntry>> {
    let entries = sqlx::query_as::<_, NamedEntry>(
        r#"
        SELECT institution_name AS name, institution_desc AS description
        FROM institution
        ORDER BY institution_name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Book metadata row, falling back to defaults when the row is absent
pub async fn load_book_metadata(pool: &SqlitePool) -> Result<BookMetadata> {
    let metadata = sqlx::query_as::<_, BookMetadata>(
        r#"
        SELECT title, subtitle, copyright_holder, copyright_year, dedication_text,
               dedication_attribution, current_version, version_date
        FROM book_metadata
        ORDER BY metadata_id
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;
    Ok(metadata.unwrap_or_default())
}

pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<BookAuthor>> {
    let authors = sqlx::query_as::<_, BookAuthor>(
        r#"
        SELECT author_name, author_role, author_bio
        FROM book_author
        ORDER BY sort_order, author_id
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(authors)
}
