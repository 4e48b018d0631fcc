//! Typed records returned by book store queries
//!
//! One record type per query shape, built at the store boundary so that
//! downstream code works with named fields only.

use chrono::NaiveDate;
use serde::Serialize;

/// Governance tier (District, Region, World)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Tier {
    pub tier_id: i64,
    pub tier_name: String,
    pub sort_order: Option<i64>,
}

/// Branch of governance (Executive, Legislative, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Branch {
    pub branch_id: i64,
    pub branch_name: String,
    pub branch_header: Option<String>,
    pub branch_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct InstitutionSummary {
    pub institution_id: i64,
    pub institution_name: String,
    pub institution_header: Option<String>,
    pub institution_desc: Option<String>,
    pub tier_id: i64,
    pub branch_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RoleSummary {
    pub role_id: i64,
    pub role_name: String,
    pub role_desc: Option<String>,
    pub institution_id: i64,
}

/// A duty attached to a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Duty {
    pub duty_id: i64,
    pub role_id: i64,
    pub duty_header: String,
    pub duty_desc: Option<String>,
}

/// Explanatory text attached to a tier, institution or role
///
/// `owner_id` is the id of whichever entity the explanation belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Explanation {
    pub explain_id: i64,
    pub owner_id: i64,
    pub explain_header: Option<String>,
    pub explain_desc: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Process {
    pub process_id: i64,
    pub process_name: String,
    pub process_header: Option<String>,
    pub process_desc: Option<String>,
}

/// Name/description pair used for the glossary and the term catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct NamedEntry {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BookMetadata {
    pub title: String,
    pub subtitle: Option<String>,
    pub copyright_holder: Option<String>,
    pub copyright_year: Option<i64>,
    pub dedication_text: Option<String>,
    pub dedication_attribution: Option<String>,
    pub current_version: Option<String>,
    pub version_date: Option<NaiveDate>,
}

impl Default for BookMetadata {
    fn default() -> Self {
        Self {
            title: "Terran Society: A New Social Contract".to_string(),
            subtitle: None,
            copyright_holder: Some("Terran Society".to_string()),
            copyright_year: None,
            dedication_text: None,
            dedication_attribution: None,
            current_version: Some("0.1".to_string()),
            version_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BookAuthor {
    pub author_name: String,
    pub author_role: Option<String>,
    pub author_bio: Option<String>,
}
