//! Structural checks: length, paragraph count and heading presence.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::markdown;
use crate::text;

/// Raw structural measurements of a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StructureReport {
    /// Length in characters (not bytes).
    pub char_count: usize,
    /// Number of blank-line separated segments.
    pub paragraph_count: usize,
    /// Whether a Markdown or HTML heading is present.
    pub has_heading: bool,
}

/// Measure the structure of `content`.
#[tracing::instrument(skip_all, fields(text_len = content.len()))]
pub fn analyze_structure(content: &str) -> StructureReport {
    StructureReport {
        char_count: content.chars().count(),
        paragraph_count: text::split_paragraphs(content).len(),
        has_heading: markdown::has_heading(content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document() {
        let report = analyze_structure("");
        assert_eq!(report.char_count, 0);
        assert_eq!(report.paragraph_count, 1);
        assert!(!report.has_heading);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(analyze_structure("café").char_count, 4);
    }

    #[test]
    fn markdown_post() {
        let report = analyze_structure("# Title\n\nIntro.\n\nBody.\n\nOutro.");
        assert_eq!(report.paragraph_count, 4);
        assert!(report.has_heading);
    }
}
