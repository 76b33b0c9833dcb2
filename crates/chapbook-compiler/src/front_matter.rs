//! Chapter front-matter support.
//!
//! Chapters start with a fenced YAML preamble carrying at minimum a `title`
//! and an integer `order` (the chapter's identity and sort key). The
//! preamble is split off before Markdown parsing and deserialized with
//! `serde_yaml`.

use serde::{Deserialize, Serialize};

/// Parsed front-matter fields. All optional at this layer; required-field
/// validation happens at the chapter boundary where the document path is
/// known.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontMatter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Chapter number: numeric identity and sort key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    /// Creation time as epoch seconds; overrides the filesystem value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<u64>,

    /// Modification time as epoch seconds; overrides the filesystem value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<u64>,
}

impl FrontMatter {
    /// Parse front-matter from YAML content.
    ///
    /// Empty content yields a default instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed.
    pub fn from_yaml(content: &str) -> Result<Self, FrontMatterError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(trimmed)
            .map_err(|e| FrontMatterError::Parse(format!("Invalid YAML: {e}")))
    }
}

/// Error type for front-matter parsing.
#[derive(Debug, thiserror::Error)]
pub enum FrontMatterError {
    #[error("{0}")]
    Parse(String),
}

/// Split a document into its front-matter block and Markdown body.
///
/// The front-matter block is delimited by `---` lines at the very start of
/// the document. Returns `(yaml, body)`; `yaml` is `None` when the document
/// has no preamble, in which case `body` is the whole input.
#[must_use]
pub fn split_front_matter(source: &str) -> (Option<&str>, &str) {
    let rest = if let Some(rest) = source.strip_prefix("---\n") {
        rest
    } else if let Some(rest) = source.strip_prefix("---\r\n") {
        rest
    } else {
        return (None, source);
    };

    // Closing fence: a `---` line, possibly the last line of the file.
    for (end, after) in [("\n---\n", 5), ("\n---\r\n", 6)] {
        if let Some(pos) = rest.find(end) {
            return (Some(&rest[..pos]), &rest[pos + after..]);
        }
    }
    if let Some(yaml) = rest.strip_suffix("\n---") {
        return (Some(yaml), "");
    }

    // Unterminated preamble: treat the whole document as body.
    (None, source)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_no_front_matter() {
        let doc = "# Title\n\nBody.\n";
        assert_eq!(split_front_matter(doc), (None, doc));
    }

    #[test]
    fn test_split_basic() {
        let doc = "---\ntitle: Hello\norder: 1\n---\n\n# Heading\n";
        let (yaml, body) = split_front_matter(doc);
        assert_eq!(yaml, Some("title: Hello\norder: 1"));
        assert_eq!(body, "\n# Heading\n");
    }

    #[test]
    fn test_split_fence_at_eof() {
        let doc = "---\ntitle: Hello\n---";
        let (yaml, body) = split_front_matter(doc);
        assert_eq!(yaml, Some("title: Hello"));
        assert_eq!(body, "");
    }

    #[test]
    fn test_split_unterminated() {
        let doc = "---\ntitle: Hello\n\nNo closing fence.";
        assert_eq!(split_front_matter(doc), (None, doc));
    }

    #[test]
    fn test_split_thematic_break_later_is_not_front_matter() {
        let doc = "intro\n\n---\n\nmore\n";
        assert_eq!(split_front_matter(doc), (None, doc));
    }

    #[test]
    fn test_parse_empty() {
        let fm = FrontMatter::from_yaml("").unwrap();
        assert_eq!(fm, FrontMatter::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let yaml = r#"
title: "Drawing Lines"
description: "First steps with the canvas"
order: 3
keywords:
  - canvas
  - lines
created: 1700000000
modified: 1700001000
"#;
        let fm = FrontMatter::from_yaml(yaml).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Drawing Lines"));
        assert_eq!(fm.order, Some(3));
        assert_eq!(fm.keywords, vec!["canvas", "lines"]);
        assert_eq!(fm.created, Some(1_700_000_000));
        assert_eq!(fm.modified, Some(1_700_001_000));
    }

    #[test]
    fn test_parse_unknown_field_ignored() {
        let fm = FrontMatter::from_yaml("title: T\nlayout: wide\n").unwrap();
        assert_eq!(fm.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_parse_invalid_yaml() {
        assert!(FrontMatter::from_yaml("title: [unclosed").is_err());
    }

    #[test]
    fn test_parse_wrong_type() {
        assert!(FrontMatter::from_yaml("order: not-a-number").is_err());
    }
}
