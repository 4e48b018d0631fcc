//! Integration tests for book store bootstrap and typed queries

use tempfile::TempDir;
use tsbook_common::db::{
    connect_readonly, init_database, institution_entries, institutions_for_tier, list_authors,
    list_duties, list_processes, list_tiers, load_book_metadata, role_entries,
    roles_for_institution, tier_explanations,
};
use tsbook_common::Error;

async fn seeded_db(dir: &TempDir) -> std::path::PathBuf {
    let db_path = dir.path().join("book.db");
    let pool = init_database(&db_path).await.expect("init database");

    for statement in [
        "INSERT INTO tier (tier_id, tier_name, sort_order) VALUES (1, 'World', 3), (2, 'District', 1), (3, 'Region', 2)",
        "INSERT INTO tier_explain (tier_id, explain_header, explain_desc, sort_order) VALUES (2, 'Scope', 'Small enough to know an Elder.', 1)",
        "INSERT INTO institution (institution_id, institution_name, institution_desc, tier_id, sort_order) VALUES (10, 'Council of Elders', 'District council.', 2, 1), (11, 'Office of Regional Sheriff', 'Law enforcement.', 3, 2)",
        "INSERT INTO role (role_id, role_name, role_desc, institution_id, sort_order) VALUES (100, 'Elder', 'Council member.', 10, 1), (101, 'Regional Sheriff', 'Heads the office.', 11, 1), (102, 'Deputy Sheriff', 'Assists.', 11, 2), (103, 'Elder', 'Duplicate name.', 11, 3)",
        "INSERT INTO role_duty (role_id, duty_header, duty_desc, sort_order) VALUES (101, 'Patrol', 'Keeps the peace.', 2), (101, 'Investigate', 'Looks into crimes.', 1), (999, 'Orphan', 'No such role.', 1)",
        "INSERT INTO process (process_name, process_header, process_desc, sort_order) VALUES ('Court Trial', 'Trials', 'How trials run.', 2), ('District Election', 'Elections', 'How elections run.', 1)",
        "INSERT INTO book_author (author_name, author_role, sort_order) VALUES ('Second', NULL, 2), ('First', 'Editor', 1)",
    ] {
        sqlx::query(statement).execute(&pool).await.expect("seed");
    }
    pool.close().await;
    db_path
}

#[tokio::test]
async fn test_init_database_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("book.db");

    let pool = init_database(&db_path).await.expect("first init");
    pool.close().await;
    assert!(db_path.exists(), "database file should be created");

    let pool = init_database(&db_path).await.expect("second init");
    let tables: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(tables, 11);
}

#[tokio::test]
async fn test_connect_readonly_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = connect_readonly(&dir.path().join("absent.db")).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn test_readonly_connection_rejects_writes() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;
    let pool = connect_readonly(&db_path).await.unwrap();

    let write = sqlx::query("INSERT INTO tier (tier_name) VALUES ('Galaxy')")
        .execute(&pool)
        .await;
    assert!(write.is_err(), "write should fail on a read-only connection");
}

#[tokio::test]
async fn test_lists_follow_sort_order() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;
    let pool = connect_readonly(&db_path).await.unwrap();

    let tiers: Vec<String> = list_tiers(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.tier_name)
        .collect();
    assert_eq!(tiers, vec!["District", "Region", "World"]);

    let duties = list_duties(&pool).await.unwrap();
    let sheriff_duties: Vec<&str> = duties
        .iter()
        .filter(|d| d.role_id == 101)
        .map(|d| d.duty_header.as_str())
        .collect();
    assert_eq!(sheriff_duties, vec!["Investigate", "Patrol"]);

    let processes: Vec<String> = list_processes(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.process_name)
        .collect();
    assert_eq!(processes, vec!["District Election", "Court Trial"]);

    let authors = list_authors(&pool).await.unwrap();
    assert_eq!(authors[0].author_name, "First");
    assert_eq!(authors[0].author_role.as_deref(), Some("Editor"));
}

#[tokio::test]
async fn test_filtered_queries_by_parent() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;
    let pool = connect_readonly(&db_path).await.unwrap();

    let region_institutions = institutions_for_tier(&pool, 3).await.unwrap();
    assert_eq!(region_institutions.len(), 1);
    assert_eq!(region_institutions[0].institution_name, "Office of Regional Sheriff");

    let roles = roles_for_institution(&pool, 11).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.role_name.as_str()).collect();
    assert_eq!(names, vec!["Regional Sheriff", "Deputy Sheriff", "Elder"]);

    let explanations = tier_explanations(&pool, 2).await.unwrap();
    assert_eq!(explanations.len(), 1);
    assert_eq!(explanations[0].owner_id, 2);
}

#[tokio::test]
async fn test_role_entries_are_distinct_by_name() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;
    let pool = connect_readonly(&db_path).await.unwrap();

    let roles = role_entries(&pool).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Deputy Sheriff", "Elder", "Regional Sheriff"]);

    let elder = roles.iter().find(|r| r.name == "Elder").unwrap();
    assert_eq!(elder.description.as_deref(), Some("Council member."));

    let institutions = institution_entries(&pool).await.unwrap();
    assert_eq!(institutions.len(), 2);
}

#[tokio::test]
async fn test_missing_metadata_row_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let db_path = seeded_db(&dir).await;
    let pool = connect_readonly(&db_path).await.unwrap();

    let metadata = load_book_metadata(&pool).await.unwrap();
    assert_eq!(metadata.title, "Terran Society: A New Social Contract");
    assert!(metadata.subtitle.is_none());
    assert!(metadata.dedication_text.is_none());
}
