//! Narrative content (headings, markdown bodies, static tables).
//!
//! The default content ships inside the binary; `--content <file.json>` swaps it
//! for another project's write-up without touching code. The schema is
//! `domain::Content`.

use std::fs::File;
use std::path::Path;

use crate::domain::Content;
use crate::error::AppError;

const DEFAULT_CONTENT: &str = include_str!("../../content/mmm_simple.json");

/// Load narrative content from `path`, or the embedded default when `None`.
pub fn load_content(path: Option<&Path>) -> Result<Content, AppError> {
    let Some(path) = path else {
        return default_content();
    };
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open content JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid content JSON '{}': {e}", path.display())))
}

pub fn default_content() -> Result<Content, AppError> {
    serde_json::from_str(DEFAULT_CONTENT)
        .map_err(|e| AppError::new(2, format!("Invalid embedded content JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn embedded_content_parses() {
        let content = default_content().unwrap();
        assert!(!content.title.is_empty());
        assert_eq!(content.coefficients.len(), 4);
        assert_eq!(content.coefficients[0].name, "Baseline");
        assert!(!content.scenarios.is_empty());
    }

    #[test]
    fn override_file_replaces_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        let mut f = File::create(&path).unwrap();
        f.write_all(br#"{"title": "Other project"}"#).unwrap();

        let content = load_content(Some(&path)).unwrap();
        assert_eq!(content.title, "Other project");
        assert!(content.sections.is_empty());
    }

    #[test]
    fn malformed_override_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(load_content(Some(&path)).unwrap_err().exit_code(), 2);
    }
}
