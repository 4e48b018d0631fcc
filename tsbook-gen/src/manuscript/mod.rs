//! Manuscript assembly
//!
//! Book data is read from the store once into a [`BookData`] snapshot, then a
//! fixed sequence of section emitters turns it into Markdown. Emitters are
//! plain functions over the snapshot, so the text they produce depends only
//! on store content and the rights file.
//!
//! The assembler never emits glossary links. It does emit the glossary's
//! anchor targets, which the linker later points at.

mod content;
mod rights;
mod sections;

pub use rights::{load_rights, parse_rights, Right};
pub use sections::{process_category, SECTIONS};

use crate::error::Result;
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tsbook_common::db::{
    institution_entries, institution_explanations, institutions_for_tier, list_authors,
    list_branches, list_duties, list_institutions, list_processes, list_roles, list_tiers,
    load_book_metadata, role_entries, role_explanations, roles_for_institution,
    tier_explanations, BookAuthor, BookMetadata, Branch, Duty, Explanation, InstitutionSummary,
    NamedEntry, Process, RoleSummary, Tier,
};

/// Everything the section emitters read
#[derive(Debug, Clone, Default)]
pub struct BookData {
    pub metadata: BookMetadata,
    pub authors: Vec<BookAuthor>,
    /// `None` when the rights file is missing
    pub rights: Option<Vec<Right>>,
    pub tiers: Vec<TierChapter>,
    pub branches: Vec<Branch>,
    pub processes: Vec<Process>,
    pub role_entries: Vec<NamedEntry>,
    pub institution_entries: Vec<NamedEntry>,
}

#[derive(Debug, Clone)]
pub struct TierChapter {
    pub tier: Tier,
    pub explanations: Vec<Explanation>,
    pub institutions: Vec<InstitutionSection>,
}

#[derive(Debug, Clone)]
pub struct InstitutionSection {
    pub institution: InstitutionSummary,
    pub explanations: Vec<Explanation>,
    /// First role heads the institution
    pub roles: Vec<RoleSection>,
}

#[derive(Debug, Clone)]
pub struct RoleSection {
    pub role: RoleSummary,
    pub explanations: Vec<Explanation>,
    pub duties: Vec<Duty>,
}

impl BookData {
    /// Read the snapshot from the store and the rights file
    ///
    /// Rows that reference a missing parent (a duty whose role does not
    /// exist, an institution whose tier does not exist) are logged and
    /// skipped.
    pub async fn load(pool: &SqlitePool, rights_path: &Path) -> Result<Self> {
        let metadata = load_book_metadata(pool).await?;
        let authors = list_authors(pool).await?;
        let rights = load_rights(rights_path)?;
        let branches = list_branches(pool).await?;
        let tiers = list_tiers(pool).await?;

        let known_tiers: HashSet<i64> = tiers.iter().map(|t| t.tier_id).collect();
        let known_institutions: HashSet<i64> = list_institutions(pool)
            .await?
            .into_iter()
            .filter(|institution| {
                let known = known_tiers.contains(&institution.tier_id);
                if !known {
                    warn!(
                        institution = %institution.institution_name,
                        tier_id = institution.tier_id,
                        "Skipping institution with unknown tier"
                    );
                }
                known
            })
            .map(|institution| institution.institution_id)
            .collect();

        let mut known_roles = HashSet::new();
        for role in list_roles(pool).await? {
            if known_institutions.contains(&role.institution_id) {
                known_roles.insert(role.role_id);
            } else {
                warn!(
                    role = %role.role_name,
                    institution_id = role.institution_id,
                    "Skipping role with unknown institution"
                );
            }
        }

        let mut duties_by_role: BTreeMap<i64, Vec<Duty>> = BTreeMap::new();
        for duty in list_duties(pool).await? {
            if known_roles.contains(&duty.role_id) {
                duties_by_role.entry(duty.role_id).or_default().push(duty);
            } else {
                warn!(
                    duty_id = duty.duty_id,
                    role_id = duty.role_id,
                    duty = %duty.duty_header,
                    "Skipping duty for unknown role"
                );
            }
        }

        let mut chapters = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let explanations = tier_explanations(pool, tier.tier_id).await?;
            let mut institutions = Vec::new();
            for institution in institutions_for_tier(pool, tier.tier_id).await? {
                let mut roles = Vec::new();
                for role in roles_for_institution(pool, institution.institution_id).await? {
                    roles.push(RoleSection {
                        explanations: role_explanations(pool, role.role_id).await?,
                        duties: duties_by_role.remove(&role.role_id).unwrap_or_default(),
                        role,
                    });
                }
                institutions.push(InstitutionSection {
                    explanations: institution_explanations(pool, institution.institution_id)
                        .await?,
                    institution,
                    roles,
                });
            }
            chapters.push(TierChapter {
                tier,
                explanations,
                institutions,
            });
        }

        let data = Self {
            metadata,
            authors,
            rights,
            tiers: chapters,
            branches,
            processes: list_processes(pool).await?,
            role_entries: role_entries(pool).await?,
            institution_entries: institution_entries(pool).await?,
        };

        debug!(
            tiers = data.tiers.len(),
            processes = data.processes.len(),
            "Book data loaded"
        );
        Ok(data)
    }
}

/// Render the snapshot as Markdown, section by section in book order
pub fn render(data: &BookData) -> String {
    let mut chunks = Vec::with_capacity(SECTIONS.len());
    for (name, emit) in SECTIONS {
        let chunk = emit(data);
        debug!(section = *name, bytes = chunk.len(), "Section emitted");
        chunks.push(chunk);
    }
    chunks.concat()
}

/// Assembled Markdown plus the metadata later stages need
#[derive(Debug, Clone)]
pub struct Manuscript {
    pub markdown: String,
    pub metadata: BookMetadata,
}

impl Manuscript {
    /// Write the Markdown to `path`, creating parent directories
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.markdown)?;
        info!(
            bytes = self.markdown.len(),
            "Manuscript written to {}",
            path.display()
        );
        Ok(())
    }
}

/// Assembles the manuscript from the store
pub struct ManuscriptAssembler<'a> {
    pool: &'a SqlitePool,
    rights_path: PathBuf,
}

impl<'a> ManuscriptAssembler<'a> {
    pub fn new(pool: &'a SqlitePool, rights_path: impl Into<PathBuf>) -> Self {
        Self {
            pool,
            rights_path: rights_path.into(),
        }
    }

    /// Build the Markdown manuscript
    pub async fn assemble(&self) -> Result<Manuscript> {
        let data = BookData::load(self.pool, &self.rights_path).await?;
        let markdown = render(&data);
        info!(bytes = markdown.len(), "Manuscript assembled");
        Ok(Manuscript {
            markdown,
            metadata: data.metadata,
        })
    }
}
