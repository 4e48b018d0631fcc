//! Glossary term catalog
//!
//! Collects role names, institution names and a fixed list of common terms,
//! collapses case-insensitive duplicates and orders the result so that longer
//! terms are tried before any term they contain.

use crate::error::Result;
use sqlx::SqlitePool;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};
use tsbook_common::db::{list_institutions, list_roles};

/// Terms linked even when no role or institution carries the name
pub const COMMON_TERMS: &[&str] = &[
    "District",
    "Region",
    "World",
    "Tier",
    "Branch",
    "Elder",
    "Representative",
    "Fair Witness",
    "Arbitrator",
    "Jury",
    "Cooperative",
];

/// Ordered, de-duplicated set of glossary terms
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermCatalog {
    terms: Vec<String>,
}

impl TermCatalog {
    /// Build a catalog from terms in precedence order
    ///
    /// When two terms differ only in letter case the first one seen keeps its
    /// casing. Blank entries are dropped.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut collected = Vec::new();

        for term in terms {
            let term = term.as_ref().trim();
            if term.is_empty() {
                warn!("Skipping blank glossary term");
                continue;
            }
            if seen.insert(term.to_lowercase()) {
                collected.push(term.to_string());
            }
        }

        collected.sort_by(|a, b| by_length_then_text(a, b));
        Self { terms: collected }
    }

    /// Build the catalog from the store: roles, then institutions, then the
    /// common terms
    pub async fn build(pool: &SqlitePool) -> Result<Self> {
        let roles = list_roles(pool).await?;
        let institutions = list_institutions(pool).await?;

        let catalog = Self::from_terms(
            roles
                .iter()
                .map(|r| r.role_name.as_str())
                .chain(institutions.iter().map(|i| i.institution_name.as_str()))
                .chain(COMMON_TERMS.iter().copied()),
        );

        debug!(
            roles = roles.len(),
            institutions = institutions.len(),
            terms = catalog.len(),
            "Term catalog built"
        );
        Ok(catalog)
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}

/// Longest first by character count, ties broken lexicographically
fn by_length_then_text(a: &str, b: &str) -> Ordering {
    b.chars()
        .count()
        .cmp(&a.chars().count())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_longer_terms_come_first() {
        let catalog = TermCatalog::from_terms(["Sheriff", "Regional Sheriff", "Elder"]);
        assert_eq!(catalog.terms(), &["Regional Sheriff", "Sheriff", "Elder"]);
    }

    #[test]
    fn test_equal_length_ties_are_lexicographic() {
        let catalog = TermCatalog::from_terms(["World", "Elder", "Jury"]);
        assert_eq!(catalog.terms(), &["Elder", "World", "Jury"]);
    }

    #[test]
    fn test_case_insensitive_duplicates_keep_first_casing() {
        let catalog = TermCatalog::from_terms(["Council of Elders", "council of elders", "Elder"]);
        assert_eq!(catalog.terms(), &["Council of Elders", "Elder"]);
    }

    #[test]
    fn test_blank_terms_are_dropped() {
        let catalog = TermCatalog::from_terms(["", "  ", "Jury"]);
        assert_eq!(catalog.terms(), &["Jury"]);
    }

    #[test]
    fn test_common_terms_alone() {
        let catalog = TermCatalog::from_terms(COMMON_TERMS.iter().copied());
        assert_eq!(catalog.len(), COMMON_TERMS.len());
        assert_eq!(catalog.terms()[0], "Representative");
        assert_eq!(catalog.terms()[1], "Fair Witness");
    }
}
