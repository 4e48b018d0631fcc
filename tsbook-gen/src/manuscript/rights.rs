//! Rights of the People source text
//!
//! The rights live in a hand-maintained text file. A line opening with a
//! two-digit number starts a new right; the following non-empty lines
//! continue it. Lines before the first numbered line are ignored and a line
//! starting with `~ ~ ~` ends the list.

use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};
use tsbook_common::{Error, Result};

const END_MARKER: &str = "~ ~ ~";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Right {
    /// Two-digit number as written ("01")
    pub number: String,
    pub text: String,
}

/// Parse rights from the source text
pub fn parse_rights(source: &str) -> Vec<Right> {
    let mut rights: Vec<Right> = Vec::new();

    for line in source.lines().map(str::trim) {
        if line.starts_with(END_MARKER) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        let bytes = line.as_bytes();
        if bytes.len() >= 2 && bytes[0].is_ascii_digit() && bytes[1].is_ascii_digit() {
            rights.push(Right {
                number: line[..2].to_string(),
                text: line[2..].trim().to_string(),
            });
        } else if let Some(current) = rights.last_mut() {
            if !current.text.is_empty() {
                current.text.push(' ');
            }
            current.text.push_str(line);
        }
    }

    rights
}

/// Load rights from `path`
///
/// A missing file yields `None` with a warning. Any other read failure is an
/// [`Error::Input`].
pub fn load_rights(path: &Path) -> Result<Option<Vec<Right>>> {
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let rights = parse_rights(&source);
            info!(count = rights.len(), "Loaded rights from {}", path.display());
            Ok(Some(rights))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "Rights file {} not found, emitting section without the list",
                path.display()
            );
            Ok(None)
        }
        Err(source) => Err(Error::Input {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_lines_start_rights_and_continue() {
        let source = "Preamble text\n\n01 Each Person has the right\nto life.\n\n02 Each Person may travel.\n~ ~ ~ ~\n03 ignored";
        let rights = parse_rights(source);
        assert_eq!(
            rights,
            vec![
                Right {
                    number: "01".to_string(),
                    text: "Each Person has the right to life.".to_string()
                },
                Right {
                    number: "02".to_string(),
                    text: "Each Person may travel.".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = load_rights(&dir.path().join("rights.txt")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_unreadable_file_is_an_input_error() {
        let dir = tempfile::TempDir::new().unwrap();
        match load_rights(dir.path()) {
            Err(Error::Input { path, .. }) => assert_eq!(path, dir.path()),
            other => panic!("expected input error, got {:?}", other),
        }
    }
}
