//! Section emitters
//!
//! One function per book section, each returning a Markdown fragment.

use super::content::{
    Principle, COMMON_DEFINITIONS, FOUNDATIONAL_STATEMENT, INTRODUCTION, PAGE_BREAK_AFTER,
    PAGE_BREAK_BEFORE, PRINCIPLES,
};
use super::{BookData, InstitutionSection, RoleSection, TierChapter};
use crate::anchor;
use std::collections::BTreeMap;
use std::fmt::Write;
use tsbook_common::db::{Branch, Explanation};

/// Id of the container the converter builds around the glossary
pub const GLOSSARY_ID: &str = "glossary";

/// Id given to the glossary heading, distinct from the container
pub const GLOSSARY_HEADING_ID: &str = "book-glossary";

/// Produces one section of the manuscript
pub type Emitter = fn(&BookData) -> String;

/// Sections in book order
pub const SECTIONS: &[(&str, Emitter)] = &[
    ("front matter", front_matter),
    ("introduction", introduction),
    ("principles", principles),
    ("rights", rights),
    ("organizational overview", overview),
    ("tier chapters", tier_chapters),
    ("processes", processes),
    ("glossary", glossary),
];

fn front_matter(data: &BookData) -> String {
    let meta = &data.metadata;
    let authors = author_line(data);
    let date = meta.version_date.map(|d| d.to_string());

    let mut md = String::from("---\n");
    let _ = writeln!(md, "title: \"{}\"", yaml_escape(&meta.title));
    if let Some(subtitle) = &meta.subtitle {
        let _ = writeln!(md, "subtitle: \"{}\"", yaml_escape(subtitle));
    }
    if let Some(authors) = &authors {
        let _ = writeln!(md, "author: \"{}\"", yaml_escape(authors));
    }
    if let Some(version) = &meta.current_version {
        let _ = writeln!(md, "version: \"{}\"", yaml_escape(version));
    }
    if let Some(date) = &date {
        let _ = writeln!(md, "date: \"{}\"", date);
    }
    md.push_str("---\n\n");

    // Cover
    md.push_str("<div class=\"cover-page\">\n\n");
    let _ = write!(md, "# {}\n\n", meta.title);
    if let Some(subtitle) = &meta.subtitle {
        let _ = write!(md, "**{}**\n\n", subtitle);
    }
    if let Some(authors) = &authors {
        let _ = write!(md, "<span class=\"cover-author\">{}</span>\n\n", authors);
    }
    if let Some(date) = &date {
        let _ = write!(md, "<span class=\"cover-date\">{}</span>\n\n", date);
    }
    md.push_str("</div>\n\n");
    md.push_str(PAGE_BREAK_AFTER);

    // Author page
    md.push_str("<div class=\"author-page\">\n\n");
    let _ = write!(md, "{}\n\n", meta.title);
    if let Some(subtitle) = &meta.subtitle {
        let _ = write!(md, "{}\n\n", subtitle);
    }
    for author in &data.authors {
        match &author.author_role {
            Some(role) => {
                let _ = write!(md, "{}, {}\n\n", author.author_name, role);
            }
            None => {
                let _ = write!(md, "{}\n\n", author.author_name);
            }
        }
    }
    if let (Some(holder), Some(year)) = (&meta.copyright_holder, meta.copyright_year) {
        let _ = write!(md, "\u{a9} {} {}\n\n", year, holder);
    }
    md.push_str("</div>\n\n");
    md.push_str(PAGE_BREAK_AFTER);
    md.push_str("<div class=\"blank-page\"></div>\n\n");

    // Dedication; the table of contents is moved here after conversion
    if let Some(dedication) = &meta.dedication_text {
        md.push_str("<div class=\"dedication-page\">\n\n## Dedication\n\n");
        let _ = write!(md, "{}\n\n", dedication);
        if let Some(attribution) = &meta.dedication_attribution {
            let _ = write!(md, "{}\n\n", attribution);
        }
        md.push_str("</div>\n\n");
        md.push_str(PAGE_BREAK_AFTER);
    }

    md
}

fn author_line(data: &BookData) -> Option<String> {
    if data.authors.is_empty() {
        return None;
    }
    Some(
        data.authors
            .iter()
            .map(|a| a.author_name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )
}

fn yaml_escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn introduction(data: &BookData) -> String {
    format!("# {}\n\n## Introduction\n\n{}", data.metadata.title, INTRODUCTION)
}

fn principles(_data: &BookData) -> String {
    let mut md = String::from(PAGE_BREAK_BEFORE);
    md.push_str("## Basic Principles of Terran Society\n\n");
    let _ = write!(
        md,
        "These {} principles guide all operations and decisions within Terran Society. They keep every system focused on member welfare, transparency, and sustainability.\n\n",
        PRINCIPLES.len()
    );
    for (i, Principle { title, statement, elaboration }) in PRINCIPLES.iter().enumerate() {
        let _ = write!(
            md,
            "### Principle {}: {}\n\n{}\n\n{}\n\n",
            i + 1,
            title,
            statement,
            elaboration
        );
    }
    md
}

fn rights(data: &BookData) -> String {
    let mut md = String::from(PAGE_BREAK_BEFORE);
    md.push_str("## Rights of the People\n\n");
    let count = match &data.rights {
        Some(rights) => format!("These {} rights", rights.len()),
        None => "These rights".to_string(),
    };
    let _ = write!(
        md,
        "{} form the cornerstone of Terran Society. They are in-alienable, meaning they cannot be legislated away, suspended, or revoked. Every law, every Society action, and every institution must respect these rights.\n\n",
        count
    );
    let _ = write!(md, "### Foundational Statement\n\n{}\n\n", FOUNDATIONAL_STATEMENT);

    if let Some(rights) = &data.rights {
        md.push_str("### The Rights\n\n");
        for right in rights {
            let _ = write!(md, "#### Right {}\n\n{}\n\n", right.number, right.text);
        }
    }
    md
}

fn overview(data: &BookData) -> String {
    let mut md = String::from(PAGE_BREAK_BEFORE);
    md.push_str("## Organizational Structure Overview\n\n");
    let _ = write!(
        md,
        "Terran Society is organized into {} tiers, each with specific roles and responsibilities. Above the District, tiers are further divided into branches that provide checks and balances on each other.\n\n",
        data.tiers.len()
    );

    md.push_str("### Organizational Hierarchy\n\n");
    for chapter in &data.tiers {
        let _ = writeln!(md, "**{} Level:**\n", chapter.tier.tier_name);
        for institution in &chapter.institutions {
            let _ = write!(md, "- {}", institution.institution.institution_name);
            if let Some(head) = institution.roles.first() {
                let _ = write!(md, " (headed by {})", head.role.role_name);
            }
            md.push('\n');
        }
        md.push('\n');
    }

    md.push_str("### The Tiers\n\n");
    for chapter in &data.tiers {
        let _ = write!(md, "#### {}\n\n", chapter.tier.tier_name);
        for explanation in &chapter.explanations {
            if let Some(desc) = &explanation.explain_desc {
                let _ = write!(md, "{}\n\n", desc);
            }
        }
    }

    if !data.branches.is_empty() {
        md.push_str("### The Branches\n\n");
        md.push_str("Governance above the District is organized into distinct branches, each with different responsibilities:\n\n");
        for branch in &data.branches {
            match &branch.branch_desc {
                Some(desc) => {
                    let _ = write!(md, "**{} Branch**: {}\n\n", branch.branch_name, desc);
                }
                None => {
                    let _ = write!(md, "**{} Branch**\n\n", branch.branch_name);
                }
            }
        }
    }
    md
}

fn tier_chapters(data: &BookData) -> String {
    data.tiers
        .iter()
        .map(|chapter| tier_chapter(chapter, &data.branches))
        .collect()
}

fn tier_chapter(chapter: &TierChapter, branches: &[Branch]) -> String {
    let mut md = String::from(PAGE_BREAK_BEFORE);
    let _ = write!(md, "## {} Level Governance\n\n", chapter.tier.tier_name);
    for explanation in &chapter.explanations {
        push_explanation(&mut md, explanation);
    }

    // Institutions without a (known) branch come first, ungrouped
    let branch_of = |section: &InstitutionSection| {
        section
            .institution
            .branch_id
            .filter(|id| branches.iter().any(|b| b.branch_id == *id))
    };
    for section in chapter.institutions.iter().filter(|&s| branch_of(s).is_none()) {
        institution_block(&mut md, section, "###");
    }

    for branch in branches {
        let members: Vec<&InstitutionSection> = chapter
            .institutions
            .iter()
            .filter(|&s| branch_of(s) == Some(branch.branch_id))
            .collect();
        if members.is_empty() {
            continue;
        }
        let _ = write!(md, "### {} Branch\n\n", branch.branch_name);
        for section in members {
            institution_block(&mut md, section, "####");
        }
    }
    md
}

fn institution_block(md: &mut String, section: &InstitutionSection, level: &str) {
    let institution = &section.institution;
    let _ = write!(md, "{} {}\n\n", level, institution.institution_name);
    if let Some(header) = &institution.institution_header {
        let _ = write!(md, "*{}*\n\n", header);
    }
    if let Some(desc) = &institution.institution_desc {
        let _ = write!(md, "{}\n\n", desc);
    }
    for explanation in &section.explanations {
        push_explanation(md, explanation);
    }

    let Some((head, subordinates)) = section.roles.split_first() else {
        return;
    };
    head_role(md, head);

    if !subordinates.is_empty() {
        md.push_str("**Subordinate Roles:**\n\n");
        for role in subordinates {
            subordinate_role(md, role);
        }
        md.push('\n');
    }
}

fn head_role(md: &mut String, section: &RoleSection) {
    let role = &section.role;
    match &role.role_desc {
        Some(desc) => {
            let _ = write!(md, "**{}**: {}\n\n", role.role_name, desc);
        }
        None => {
            let _ = write!(md, "**{}**\n\n", role.role_name);
        }
    }
    for explanation in &section.explanations {
        push_explanation(md, explanation);
    }
    if !section.duties.is_empty() {
        md.push_str("**Key Responsibilities:**\n\n");
        for duty in &section.duties {
            match &duty.duty_desc {
                Some(desc) => {
                    let _ = writeln!(md, "- **{}**: {}", duty.duty_header, desc);
                }
                None => {
                    let _ = writeln!(md, "- **{}**", duty.duty_header);
                }
            }
        }
        md.push('\n');
    }
}

fn subordinate_role(md: &mut String, section: &RoleSection) {
    let role = &section.role;
    match &role.role_desc {
        Some(desc) => {
            let _ = writeln!(md, "- **{}**: {}", role.role_name, desc);
        }
        None => {
            let _ = writeln!(md, "- **{}**", role.role_name);
        }
    }
    for duty in &section.duties {
        let _ = writeln!(md, "    - {}", duty.duty_header);
    }
}

fn push_explanation(md: &mut String, explanation: &Explanation) {
    match (&explanation.explain_header, &explanation.explain_desc) {
        (Some(header), Some(desc)) => {
            let _ = write!(md, "**{}**: {}\n\n", header, desc);
        }
        (Some(header), None) => {
            let _ = write!(md, "**{}**\n\n", header);
        }
        (None, Some(desc)) => {
            let _ = write!(md, "{}\n\n", desc);
        }
        (None, None) => {}
    }
}

/// Category heading a process is listed under
pub fn process_category(process_name: &str) -> &'static str {
    if process_name.contains("Election") {
        "Election Processes"
    } else if process_name.contains("Court") {
        "Judicial Processes"
    } else if process_name.contains("Fair Witness") {
        "Fair Witness Processes"
    } else {
        "Other Processes"
    }
}

fn processes(data: &BookData) -> String {
    let mut md = String::from(PAGE_BREAK_BEFORE);
    md.push_str("## Processes and Procedures\n\n");
    md.push_str("Terran Society operates through clearly defined processes that ensure transparency, fairness, and accountability.\n\n");

    let mut current: Option<&str> = None;
    for process in &data.processes {
        let category = process_category(&process.process_name);
        if current != Some(category) {
            let _ = write!(md, "### {}\n\n", category);
            current = Some(category);
        }
        let heading = process
            .process_header
            .as_deref()
            .unwrap_or(&process.process_name);
        let _ = write!(md, "#### {}\n\n", heading);
        if let Some(desc) = &process.process_desc {
            let _ = write!(md, "{}\n\n", desc);
        }
    }
    md
}

fn glossary(data: &BookData) -> String {
    let mut entries: BTreeMap<String, Option<String>> = COMMON_DEFINITIONS
        .iter()
        .map(|(term, definition)| (term.to_string(), Some(definition.to_string())))
        .collect();

    // Role descriptions take precedence over the fixed definitions
    for role in &data.role_entries {
        match &role.description {
            Some(desc) => {
                entries.insert(role.name.clone(), Some(desc.clone()));
            }
            None => {
                entries.entry(role.name.clone()).or_insert(None);
            }
        }
    }
    for institution in &data.institution_entries {
        entries
            .entry(institution.name.clone())
            .or_insert_with(|| institution.description.clone());
    }

    // The fenced div gives the converter's output one container holding the
    // whole glossary, which the linker leaves untouched
    let mut md = String::from(PAGE_BREAK_BEFORE);
    let _ = write!(
        md,
        "::: {{#{}}}\n\n## Glossary {{#{}}}\n\n",
        GLOSSARY_ID, GLOSSARY_HEADING_ID
    );
    for (term, definition) in &entries {
        let _ = write!(
            md,
            "<span id=\"{}\"></span>**{}**",
            attr_escape(&anchor::target_id(term)),
            term
        );
        if let Some(definition) = definition {
            let _ = write!(md, ": {}", definition);
        }
        md.push_str("\n\n");
    }
    md.push_str(":::\n\n");
    md
}

/// Escape a value for a double-quoted raw HTML attribute
fn attr_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manuscript::{render, Right};
    use chrono::NaiveDate;
    use tsbook_common::db::{
        BookAuthor, BookMetadata, Duty, InstitutionSummary, NamedEntry, Process, RoleSummary,
        Tier,
    };

    fn role(id: i64, name: &str, desc: Option<&str>) -> RoleSection {
        RoleSection {
            role: RoleSummary {
                role_id: id,
                role_name: name.to_string(),
                role_desc: desc.map(str::to_string),
                institution_id: 11,
            },
            explanations: Vec::new(),
            duties: Vec::new(),
        }
    }

    fn sample() -> BookData {
        let mut sheriff = role(101, "Regional Sheriff", Some("Heads the office."));
        sheriff.duties.push(Duty {
            duty_id: 1,
            role_id: 101,
            duty_header: "Investigate".to_string(),
            duty_desc: Some("Looks into crimes.".to_string()),
        });

        BookData {
            metadata: BookMetadata {
                subtitle: None,
                dedication_text: None,
                version_date: NaiveDate::from_ymd_opt(2025, 7, 1),
                ..BookMetadata::default()
            },
            authors: vec![BookAuthor {
                author_name: "A. Author".to_string(),
                author_role: None,
                author_bio: None,
            }],
            rights: Some(vec![Right {
                number: "01".to_string(),
                text: "Each Person has the right to life.".to_string(),
            }]),
            tiers: vec![TierChapter {
                tier: Tier {
                    tier_id: 3,
                    tier_name: "Region".to_string(),
                    sort_order: Some(2),
                },
                explanations: Vec::new(),
                institutions: vec![InstitutionSection {
                    institution: InstitutionSummary {
                        institution_id: 11,
                        institution_name: "Office of Regional Sheriff".to_string(),
                        institution_header: None,
                        institution_desc: Some("Law enforcement.".to_string()),
                        tier_id: 3,
                        branch_id: Some(1),
                    },
                    explanations: Vec::new(),
                    roles: vec![sheriff, role(102, "Deputy Sheriff", None)],
                }],
            }],
            branches: vec![Branch {
                branch_id: 1,
                branch_name: "Executive".to_string(),
                branch_header: None,
                branch_desc: Some("Runs things.".to_string()),
            }],
            processes: vec![
                Process {
                    process_id: 1,
                    process_name: "District Election".to_string(),
                    process_header: Some("Elections".to_string()),
                    process_desc: None,
                },
                Process {
                    process_id: 2,
                    process_name: "Regional Election".to_string(),
                    process_header: None,
                    process_desc: Some("Regional vote.".to_string()),
                },
                Process {
                    process_id: 3,
                    process_name: "Major Court Trial".to_string(),
                    process_header: Some("Trials".to_string()),
                    process_desc: None,
                },
            ],
            role_entries: vec![NamedEntry {
                name: "Elder".to_string(),
                description: Some("Council member.".to_string()),
            }],
            institution_entries: vec![
                NamedEntry {
                    name: "Office of Public Arbitrator (Region)".to_string(),
                    description: Some("Arbitration office.".to_string()),
                },
                NamedEntry {
                    name: "District".to_string(),
                    description: Some("Should not replace the fixed definition.".to_string()),
                },
            ],
        }
    }

    #[test]
    fn test_sections_appear_in_book_order() {
        let md = render(&sample());
        let order = [
            "title: \"Terran Society: A New Social Contract\"",
            "## Introduction",
            "## Basic Principles of Terran Society",
            "## Rights of the People",
            "## Organizational Structure Overview",
            "## Region Level Governance",
            "## Processes and Procedures",
            "## Glossary",
        ];
        let positions: Vec<usize> = order.iter().map(|h| md.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }

    #[test]
    fn test_missing_optional_fields_are_omitted() {
        let md = front_matter(&sample());
        assert!(!md.contains("subtitle:"));
        assert!(!md.contains("dedication-page"));
        assert!(md.contains("date: \"2025-07-01\""));
        assert!(md.contains("author: \"A. Author\""));
    }

    #[test]
    fn test_dedication_emitted_when_present() {
        let mut data = sample();
        data.metadata.dedication_text = Some("For the children.".to_string());
        let md = front_matter(&data);
        assert!(md.contains("<div class=\"dedication-page\">\n\n## Dedication\n\nFor the children."));
    }

    #[test]
    fn test_head_role_and_subordinates() {
        let md = tier_chapters(&sample());
        assert!(md.contains("### Executive Branch\n\n#### Office of Regional Sheriff"));
        assert!(md.contains("**Regional Sheriff**: Heads the office."));
        assert!(md.contains("**Key Responsibilities:**\n\n- **Investigate**: Looks into crimes."));
        assert!(md.contains("**Subordinate Roles:**\n\n- **Deputy Sheriff**\n"));
    }

    #[test]
    fn test_processes_grouped_by_category() {
        let md = processes(&sample());
        assert_eq!(md.matches("### Election Processes").count(), 1);
        assert!(md.contains("#### Elections"));
        assert!(md.contains("#### Regional Election\n\nRegional vote."));
        assert!(md.contains("### Judicial Processes\n\n#### Trials"));
    }

    #[test]
    fn test_process_category() {
        assert_eq!(process_category("Fair Witness Certification"), "Fair Witness Processes");
        assert_eq!(process_category("Recall"), "Other Processes");
    }

    #[test]
    fn test_glossary_entries_have_anchor_targets() {
        let md = glossary(&sample());
        assert!(md.contains(
            "<span id=\"glossary-office-of-public-arbitrator-region\"></span>**Office of Public Arbitrator (Region)**: Arbitration office."
        ));
        assert!(md.contains("<span id=\"glossary-elder\"></span>**Elder**: Council member."));
        assert!(md.contains("**District**: The smallest tier"));
        let arbitration = md.find("**Arbitration**").unwrap();
        let world = md.find("**World**").unwrap();
        assert!(arbitration < world);
    }

    #[test]
    fn test_glossary_is_fenced_div_with_distinct_heading_id() {
        let md = glossary(&sample());
        assert!(md.contains("::: {#glossary}\n\n## Glossary {#book-glossary}\n\n"));
        assert!(md.trim_end().ends_with(":::"));
        let opened = md.find("::: {#glossary}").unwrap();
        let elder = md.find("**Elder**").unwrap();
        assert!(opened < elder);
    }

    #[test]
    fn test_every_common_term_has_glossary_target() {
        let md = glossary(&BookData::default());
        for term in crate::catalog::COMMON_TERMS {
            let target = format!("<span id=\"{}\"></span>**{}**: ", anchor::target_id(term), term);
            assert!(md.contains(&target), "no glossary entry for {}", term);
        }
    }

    #[test]
    fn test_rights_without_source_file() {
        let mut data = sample();
        data.rights = None;
        let md = rights(&data);
        assert!(md.contains("### Foundational Statement"));
        assert!(!md.contains("### The Rights"));
    }

    #[test]
    fn test_manuscript_contains_no_links() {
        let md = render(&sample());
        assert!(!md.contains("<a "));
        assert!(!md.contains("]("));
    }
}
