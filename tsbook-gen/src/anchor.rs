//! Glossary anchor identifiers
//!
//! The manuscript emits `<span id="glossary-<anchor>">` targets and the linker
//! emits `href="#glossary-<anchor>"` references; both go through [`anchor`] so
//! the two always agree.

/// Prefix shared by every glossary target id
pub const ANCHOR_PREFIX: &str = "glossary-";

/// Derive the anchor identifier for a term
///
/// Lowercases the term, turns each space into `-` and drops `(`, `)` and `/`.
/// The result is deterministic and depends only on the input text.
pub fn anchor(term: &str) -> String {
    term.to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            '(' | ')' | '/' => None,
            other => Some(other),
        })
        .collect()
}

/// Element id of the glossary entry for a term
pub fn target_id(term: &str) -> String {
    format!("{}{}", ANCHOR_PREFIX, anchor(term))
}

/// Fragment reference pointing at the glossary entry for a term
pub fn href(term: &str) -> String {
    format!("#{}", target_id(term))
}
