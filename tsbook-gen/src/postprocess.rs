//! Structural post-processing of the converted document
//!
//! Each step edits the parsed tree directly. Steps that cannot find their
//! landmark log a warning and leave the document as it was.

use crate::document::{Document, NodeRef};
use tracing::{debug, warn};

/// Length at which sidebar entries are cut
pub const SIDEBAR_LABEL_MAX_CHARS: usize = 50;

/// Headings shown above the relocated table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocHeading {
    pub title: String,
    pub subtitle: Option<String>,
}

/// Move the table of contents to just after the dedication
///
/// The contents are wrapped in a `div.toc-page` carrying the book title and a
/// "Table of Contents" heading. When a page-break marker directly follows the
/// dedication, the wrapper goes after the marker. Returns whether the
/// contents were moved.
pub fn relocate_toc(doc: &mut Document, toc_id: &str, heading: &TocHeading) -> bool {
    let Some(toc) = doc.find_by_id(toc_id) else {
        warn!("No element with id '{}' found, table of contents not moved", toc_id);
        return false;
    };
    let Some(dedication) = find_dedication(doc) else {
        warn!("No dedication found, table of contents left in place");
        return false;
    };

    let anchor = match dedication.next_element_sibling() {
        Some(next) if is_page_break(&next) => next,
        _ => dedication,
    };

    let page = NodeRef::new_element("div", &[("class", "toc-page")]);
    page.append(&text_element("h1", "toc-title", &heading.title));
    if let Some(subtitle) = &heading.subtitle {
        page.append(&text_element("h2", "toc-subtitle", subtitle));
    }
    page.append(&text_element("h3", "toc-heading", "Table of Contents"));

    page.append(&toc);
    anchor.insert_after(&page);

    debug!("Table of contents relocated after dedication");
    true
}

/// Dedication container: `.dedication-page`, else the element with id
/// `dedication`
fn find_dedication(doc: &Document) -> Option<NodeRef> {
    doc.find_elements(|el| el.has_class("dedication-page"))
        .into_iter()
        .next()
        .or_else(|| doc.find_by_id("dedication"))
}

fn is_page_break(node: &NodeRef) -> bool {
    node.attr("style")
        .map(|style| style.contains("page-break-after") || style.contains("page-break-before"))
        .unwrap_or(false)
}

/// Element with a class and a single text child
fn text_element(name: &str, class: &str, text: &str) -> NodeRef {
    let element = NodeRef::new_element(name, &[("class", class)]);
    element.append(&NodeRef::new_text(text));
    element
}

/// Hide the converter's title block for print output
pub fn hide_title_block(doc: &mut Document) -> bool {
    match doc.find_by_id("title-block-header") {
        Some(header) => {
            header.set_attribute("style", "display: none;");
            true
        }
        None => {
            debug!("No title block to hide");
            false
        }
    }
}

/// Embed stylesheet text in a `<style>` element at the end of `<head>`
pub fn embed_stylesheet(doc: &mut Document, css: &str) -> bool {
    let Some(head) = doc.find_first("head") else {
        warn!("Document has no <head>, stylesheet not embedded");
        return false;
    };
    let style = NodeRef::new_element("style", &[]);
    // Serialized verbatim inside <style>
    style.append(&NodeRef::new_text(&format!("\n{}\n", css)));
    head.append(&style);
    true
}

/// Add the fixed header bar and a sidebar listing every second-level
/// heading that carries an id
pub fn insert_navigation(doc: &mut Document, book_title: &str, toc_id: &str) -> bool {
    let Some(body) = doc.find_first("body") else {
        warn!("Document has no <body>, navigation not added");
        return false;
    };

    let sections: Vec<(String, String)> = doc
        .find_elements(|el| el.is("h2"))
        .into_iter()
        .filter_map(|h2| Some((h2.id()?, sidebar_label(&h2.text_content()))))
        .collect();

    let sidebar = NodeRef::new_element("div", &[("class", "sidebar-nav")]);
    let nav_heading = NodeRef::new_element("h4", &[]);
    nav_heading.append(&NodeRef::new_text("Navigation"));
    sidebar.append(&nav_heading);

    let list = NodeRef::new_element("ul", &[]);
    for (id, label) in &sections {
        let item = NodeRef::new_element("li", &[]);
        item.append(&link_to(id, label));
        list.append(&item);
    }
    sidebar.append(&list);

    let header = NodeRef::new_element("div", &[("class", "book-header")]);
    header.append(&text_element("div", "book-header-title", book_title));
    let header_nav = NodeRef::new_element("div", &[("class", "book-header-nav")]);
    header_nav.append(&link_to(toc_id, "Table of Contents"));
    header.append(&header_nav);

    body.prepend(&sidebar);
    body.prepend(&header);

    debug!(entries = sections.len(), "Navigation inserted");
    true
}

fn link_to(id: &str, label: &str) -> NodeRef {
    let href = format!("#{}", id);
    let link = NodeRef::new_element("a", &[("href", href.as_str())]);
    link.append(&NodeRef::new_text(label));
    link
}

fn sidebar_label(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() > SIDEBAR_LABEL_MAX_CHARS {
        let cut: String = text.chars().take(SIDEBAR_LABEL_MAX_CHARS).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONVERTED: &str = "<html><head><title>T</title></head><body>\
        <header id=\"title-block-header\"><h1 class=\"title\">T</h1></header>\
        <nav id=\"TOC\"><ul><li><a href=\"#intro\">Intro</a></li></ul></nav>\
        <div class=\"dedication-page\"><h2 id=\"dedication\">Dedication</h2><p>For all.</p></div>\
        <div style=\"page-break-after: always;\"></div>\
        <h2 id=\"intro\">Introduction &amp; Purpose</h2><p>Text.</p>\
        </body></html>";

    fn heading() -> TocHeading {
        TocHeading {
            title: "Terran Society".to_string(),
            subtitle: Some("A New Social Contract".to_string()),
        }
    }

    #[test]
    fn test_toc_moves_after_dedication_page_break() {
        let mut doc = Document::parse(CONVERTED).unwrap();
        assert!(relocate_toc(&mut doc, "TOC", &heading()));
        let html = doc.to_html().unwrap();

        let brk = html.find("page-break-after").unwrap();
        let page = html.find("<div class=\"toc-page\">").unwrap();
        let toc = html.find("<nav id=\"TOC\">").unwrap();
        let intro = html.find("<h2 id=\"intro\">").unwrap();
        assert!(brk < page && page < toc && toc < intro);
        assert!(html.contains("<h1 class=\"toc-title\">Terran Society</h1>"));
        assert!(html.contains("<h3 class=\"toc-heading\">Table of Contents</h3>"));
        assert_eq!(html.matches("id=\"TOC\"").count(), 1);
    }

    #[test]
    fn test_toc_stays_without_dedication() {
        let input = "<body><nav id=\"TOC\"></nav><p>x</p></body>";
        let unchanged = Document::parse(input).unwrap().to_html().unwrap();
        let mut doc = Document::parse(input).unwrap();
        assert!(!relocate_toc(&mut doc, "TOC", &heading()));
        assert_eq!(doc.to_html().unwrap(), unchanged);
    }

    #[test]
    fn test_title_block_hidden() {
        let mut doc = Document::parse(CONVERTED).unwrap();
        assert!(hide_title_block(&mut doc));
        assert!(doc
            .to_html()
            .unwrap()
            .contains("<header id=\"title-block-header\" style=\"display: none;\">"));
    }

    #[test]
    fn test_stylesheet_embedded_in_head() {
        let mut doc = Document::parse(CONVERTED).unwrap();
        assert!(embed_stylesheet(&mut doc, "p > a { color: #333; }"));
        assert!(doc
            .to_html()
            .unwrap()
            .contains("<style>\np > a { color: #333; }\n</style></head>"));
    }

    #[test]
    fn test_navigation_lists_second_level_headings() {
        let mut doc = Document::parse(CONVERTED).unwrap();
        assert!(insert_navigation(&mut doc, "Terran Society", "TOC"));
        let html = doc.to_html().unwrap();

        assert!(html.contains("<body><div class=\"book-header\"><div class=\"book-header-title\">Terran Society</div>"));
        assert!(html.contains("<a href=\"#TOC\">Table of Contents</a>"));
        assert!(html.contains("<li><a href=\"#dedication\">Dedication</a></li>"));
        assert!(html.contains("<li><a href=\"#intro\">Introduction &amp; Purpose</a></li>"));
        assert!(html.find("book-header").unwrap() < html.find("sidebar-nav").unwrap());
    }

    #[test]
    fn test_sidebar_label_is_truncated() {
        let long = "A".repeat(60);
        let label = sidebar_label(&long);
        assert_eq!(label.chars().count(), SIDEBAR_LABEL_MAX_CHARS + 3);
        assert!(label.ends_with("..."));
        assert_eq!(sidebar_label(" Short "), "Short");
    }
}
