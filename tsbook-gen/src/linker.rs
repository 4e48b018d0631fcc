//! Glossary term linking
//!
//! Scans paragraph and list-item text in a converted document and wraps the
//! first recognised glossary term of each text leaf in a link to its glossary
//! entry. Text inside existing links, the table of contents and the glossary
//! itself is never touched.
//!
//! Matching is case-insensitive and whole-word: the characters on either side
//! of a match must not be letters, digits or `_`. Terms are tried longest
//! first, so "Regional Sheriff" wins over "Sheriff" in the same leaf. Leaf
//! text is already decoded, so `&amp;` in the source matches a literal `&`.
//!
//! When the glossary landmark is a heading rather than a container, its
//! section runs until the next heading of the same or a higher level.

use crate::anchor;
use crate::catalog::TermCatalog;
use crate::document::{Document, NodeRef, TextLeaf};
use crate::error::Result;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};
use tsbook_common::config::LinkingConfig;

/// Outcome of one linking pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LinkReport {
    /// Whether the glossary landmark was present
    pub glossary_found: bool,
    /// Paragraph and list-item blocks outside the protected regions
    pub blocks_scanned: usize,
    pub leaves_scanned: usize,
    /// Leaves left alone because they already sit inside a link
    pub leaves_in_links: usize,
    pub links_inserted: usize,
    /// Links inserted per catalog term
    pub per_term: BTreeMap<String, usize>,
}

impl LinkReport {
    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        info!("Linking report written to {}", path.display());
        Ok(())
    }
}

struct CompiledTerm {
    term: String,
    href: String,
    pattern: Regex,
}

/// Inserts glossary links into a [`Document`]
pub struct TermLinker {
    terms: Vec<CompiledTerm>,
    glossary_id: String,
    toc_id: String,
    link_class: String,
}

impl TermLinker {
    /// Compile the catalog's terms in catalog order
    pub fn new(catalog: &TermCatalog, options: &LinkingConfig) -> Result<Self> {
        let terms = catalog
            .iter()
            .map(|term| {
                let pattern = RegexBuilder::new(&regex::escape(term))
                    .case_insensitive(true)
                    .build()?;
                Ok(CompiledTerm {
                    term: term.to_string(),
                    href: anchor::href(term),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            terms,
            glossary_id: options.glossary_id.clone(),
            toc_id: options.toc_id.clone(),
            link_class: options.link_class.clone(),
        })
    }

    /// Link glossary terms in place
    ///
    /// A document without the glossary landmark is left untouched.
    pub fn link(&self, doc: &mut Document) -> LinkReport {
        let mut report = LinkReport::default();

        let Some(glossary) = doc.find_by_id(&self.glossary_id) else {
            warn!(
                "No element with id '{}' found, skipping glossary linking",
                self.glossary_id
            );
            return report;
        };
        report.glossary_found = true;

        let mut protected = glossary_region(&glossary);
        protected.extend(doc.find_by_id(&self.toc_id));

        // Leaves already handled, including text split off around new links
        let mut visited: HashSet<NodeRef> = HashSet::new();

        for block in doc.content_blocks() {
            if protected.iter().any(|region| block.is_within(region)) {
                continue;
            }
            report.blocks_scanned += 1;

            for leaf in doc.text_leaves(&block) {
                if !visited.insert(leaf.node.clone()) {
                    continue;
                }
                report.leaves_scanned += 1;

                if inside_link(&leaf) {
                    report.leaves_in_links += 1;
                    continue;
                }

                if let Some(inserted) = self.link_leaf(&leaf.node, &mut visited) {
                    report.links_inserted += 1;
                    *report.per_term.entry(inserted).or_insert(0) += 1;
                }
            }
        }

        info!(
            links = report.links_inserted,
            blocks = report.blocks_scanned,
            leaves = report.leaves_scanned,
            "Glossary linking complete"
        );
        report
    }

    /// Replace the leaf with before-text, link and after-text for the first
    /// matching term; returns the term linked
    fn link_leaf(&self, leaf: &NodeRef, visited: &mut HashSet<NodeRef>) -> Option<String> {
        let text = leaf.text()?;

        let (term, start, end) = self.terms.iter().find_map(|compiled| {
            find_whole_word(&compiled.pattern, &text).map(|(start, end)| (compiled, start, end))
        })?;

        let link = NodeRef::new_element(
            "a",
            &[
                ("href", term.href.as_str()),
                ("class", self.link_class.as_str()),
                ("title", term.term.as_str()),
            ],
        );
        let label = NodeRef::new_text(&text[start..end]);
        link.append(&label);

        let mut replacement = Vec::with_capacity(3);
        if start > 0 {
            replacement.push(NodeRef::new_text(&text[..start]));
        }
        replacement.push(link);
        if end < text.len() {
            replacement.push(NodeRef::new_text(&text[end..]));
        }
        leaf.replace_with(&replacement);

        visited.insert(label);
        visited.extend(replacement);

        debug!(term = %term.term, "Linked glossary term");
        Some(term.term.clone())
    }
}

fn inside_link(leaf: &TextLeaf) -> bool {
    leaf.ancestors.iter().any(|a| a.is("a"))
}

/// Nodes covered by the glossary landmark
///
/// A heading landmark covers its following siblings up to the next heading
/// of the same or a higher level.
fn glossary_region(glossary: &NodeRef) -> Vec<NodeRef> {
    let mut region = vec![glossary.clone()];
    let Some(level) = glossary.heading_level() else {
        return region;
    };
    let mut next = glossary.next_element_sibling();
    while let Some(sibling) = next {
        if sibling.heading_level().is_some_and(|l| l <= level) {
            break;
        }
        next = sibling.next_element_sibling();
        region.push(sibling);
    }
    region
}

/// Byte range of the leftmost match of `pattern` in `text` that stands as a
/// whole word
fn find_whole_word(pattern: &Regex, text: &str) -> Option<(usize, usize)> {
    let mut from = 0;
    while from <= text.len() {
        let found = pattern.find_at(text, from)?;
        let (start, end) = (found.start(), found.end());
        if is_boundary_before(text, start) && is_boundary_after(text, end) {
            return Some((start, end));
        }
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_boundary_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().map_or(true, |c| !is_word_char(c))
}

fn is_boundary_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().map_or(true, |c| !is_word_char(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linker(terms: &[&str]) -> TermLinker {
        TermLinker::new(
            &TermCatalog::from_terms(terms.iter().copied()),
            &LinkingConfig::default(),
        )
        .unwrap()
    }

    fn with_glossary(body: &str) -> String {
        format!(
            "<html><body>\n{}\n<div id=\"glossary\"><p>Elder: a member.</p></div>\n</body></html>",
            body
        )
    }

    fn run(terms: &[&str], body: &str) -> (String, LinkReport) {
        let mut doc = Document::parse(&with_glossary(body)).unwrap();
        let report = linker(terms).link(&mut doc);
        (doc.to_html().unwrap(), report)
    }

    #[test]
    fn test_links_first_occurrence_case_insensitively() {
        let (html, report) = run(&["Elder"], "<p>See the Elder.</p>");
        assert!(html.contains(
            "<p>See the <a href=\"#glossary-elder\" class=\"glossary-term\" title=\"Elder\">Elder</a>.</p>"
        ));
        assert_eq!(report.links_inserted, 1);
        assert_eq!(report.per_term.get("Elder"), Some(&1));

        let (html, _) = run(&["Elder"], "<p>an elder spoke</p>");
        assert!(html.contains("an <a href=\"#glossary-elder\" class=\"glossary-term\" title=\"Elder\">elder</a> spoke"));
    }

    #[test]
    fn test_longest_term_wins() {
        let (html, report) = run(
            &["Sheriff", "Regional Sheriff"],
            "<p>The Regional Sheriff met the Sheriff.</p>",
        );
        assert!(html.contains(
            "The <a href=\"#glossary-regional-sheriff\" class=\"glossary-term\" title=\"Regional Sheriff\">Regional Sheriff</a> met the Sheriff."
        ));
        assert_eq!(report.links_inserted, 1);
    }

    #[test]
    fn test_partial_words_do_not_match() {
        let (html, report) = run(&["Elder"], "<p>Elderly Elders_ and XElder</p>");
        assert_eq!(report.links_inserted, 0);
        assert!(html.contains("<p>Elderly Elders_ and XElder</p>"));
    }

    #[test]
    fn test_later_whole_word_occurrence_is_found() {
        let (html, _) = run(&["Elder"], "<p>Elderly folk ask an Elder.</p>");
        assert!(html.contains("Elderly folk ask an <a href=\"#glossary-elder\""));
    }

    #[test]
    fn test_existing_links_are_left_alone() {
        let body = "<p>Ask <a href=\"#x\">the Elder</a> now</p>";
        let (html, report) = run(&["Elder"], body);
        assert!(html.contains(body));
        assert_eq!(report.leaves_in_links, 1);
        assert_eq!(report.links_inserted, 0);
    }

    #[test]
    fn test_glossary_and_toc_are_protected() {
        let body = "<nav id=\"TOC\"><ul><li>Elder</li></ul></nav>";
        let (html, report) = run(&["Elder"], body);
        assert!(html.contains("<li>Elder</li>"));
        assert!(html.contains("<p>Elder: a member.</p>"));
        assert_eq!(report.links_inserted, 0);
    }

    #[test]
    fn test_missing_glossary_leaves_document_unchanged() {
        let input = "<html><body><p>The Elder &amp; the Jury spoke.</p></body></html>";
        let unlinked = Document::parse(input).unwrap().to_html().unwrap();
        let mut doc = Document::parse(input).unwrap();
        let report = linker(&["Elder"]).link(&mut doc);
        assert!(!report.glossary_found);
        assert_eq!(report.links_inserted, 0);
        assert_eq!(doc.to_html().unwrap(), unlinked);
    }

    #[test]
    fn test_one_link_per_leaf() {
        let (html, report) = run(&["Elder", "Jury"], "<p>The Jury and the Elder and the Jury.</p>");
        assert_eq!(report.links_inserted, 1);
        assert_eq!(html.matches("class=\"glossary-term\"").count(), 1);
        assert!(html.contains("title=\"Elder\">Elder</a> and the Jury."));
    }

    #[test]
    fn test_each_leaf_gets_its_own_link() {
        let (_, report) = run(&["Elder"], "<p>Elder <em>Elder</em> Elder</p>");
        assert_eq!(report.links_inserted, 3);
    }

    #[test]
    fn test_nested_blocks_do_not_relink_split_text() {
        let (html, report) = run(&["Elder"], "<ul><li><p>Elder then Elder</p></li></ul>");
        assert_eq!(report.links_inserted, 1);
        assert!(html.contains("</a> then Elder</p>"));
    }

    #[test]
    fn test_reference_names_are_not_text() {
        let (html, report) = run(&["amp"], "<p>Fish &amp; chips</p>");
        assert_eq!(report.links_inserted, 0);
        assert!(html.contains("<p>Fish &amp; chips</p>"));
    }

    #[test]
    fn test_terms_with_ampersand_match_decoded_text() {
        let (html, report) = run(&["Trade & Commerce"], "<p>The Trade &amp; Commerce board.</p>");
        assert_eq!(report.links_inserted, 1);
        assert!(html.contains(
            "title=\"Trade &amp; Commerce\">Trade &amp; Commerce</a> board."
        ));
    }

    #[test]
    fn test_surrounding_text_is_preserved_exactly() {
        let (html, _) = run(&["Elder"], "<p>  Before\u{a0}Elder&nbsp;after  </p>");
        assert!(html.contains(
            "<p>  Before&nbsp;<a href=\"#glossary-elder\" class=\"glossary-term\" title=\"Elder\">Elder</a>&nbsp;after  </p>"
        ));
    }

    #[test]
    fn test_heading_landmark_protects_its_section() {
        // Shape produced when the glossary id lands on the heading itself
        let html = "<html><body>\n\
            <p>The Jury meets.</p>\n\
            <h2 id=\"glossary\">Glossary</h2>\n\
            <p><span id=\"glossary-elder\"></span><strong>Elder</strong>: Serves the Jury.</p>\n\
            <p><span id=\"glossary-jury\"></span><strong>Jury</strong>: Hears the Elder.</p>\n\
            <h3>Notes</h3>\n<ul><li>Ask an Elder.</li></ul>\n\
            <h2 id=\"after\">After</h2>\n<p>The Elder returns.</p>\n\
            </body></html>";
        let mut doc = Document::parse(html).unwrap();
        let report = linker(&["Elder", "Jury"]).link(&mut doc);
        let out = doc.to_html().unwrap();

        assert!(report.glossary_found);
        assert_eq!(report.links_inserted, 2);
        assert!(out.contains("<strong>Elder</strong>: Serves the Jury.</p>"));
        assert!(out.contains("<strong>Jury</strong>: Hears the Elder.</p>"));
        assert!(out.contains("<li>Ask an Elder.</li>"));
        assert!(out.contains("<p>The <a href=\"#glossary-jury\""));
        assert!(out.contains("<p>The <a href=\"#glossary-elder\" class=\"glossary-term\" title=\"Elder\">Elder</a> returns.</p>"));
    }

    #[test]
    fn test_container_landmark_does_not_extend_past_itself() {
        let (html, report) = run(&["Elder"], "");
        assert_eq!(report.links_inserted, 0);
        assert!(html.contains("<p>Elder: a member.</p>"));

        let doc = Document::parse(&with_glossary("<p>Elder</p>")).unwrap();
        let glossary = doc.find_by_id("glossary").unwrap();
        assert_eq!(glossary_region(&glossary), vec![glossary]);
    }
}
