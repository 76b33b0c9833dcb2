//! Pseudo-HTML attribute parsing.
//!
//! Parses the attribute substring of a custom tag: `title="Setup"`,
//! `width={400}`, or `count=3`. The scanner is best-effort: unparseable
//! fragments are skipped silently and never produce an error.

use std::collections::HashMap;

use regex::Regex;
use std::sync::LazyLock;

/// `key="value"`, `key={value}`, or bare `key=123` pairs.
static ATTR_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*(?:"([^"]*)"|\{([^}]*)\}|(\d+))"#)
        .expect("attribute pair regex is valid")
});

/// A single attribute value.
///
/// Values consisting solely of digits are parsed as integers regardless of
/// whether they were quoted, braced, or bare; everything else is kept as a
/// string with quotes/braces stripped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    Str(String),
    Int(i64),
}

impl AttrValue {
    /// String payload, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Integer payload, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

/// Parsed attributes of one tag. Keys are unique; order is irrelevant.
pub type AttrMap = HashMap<String, AttrValue>;

/// Scan a tag's attribute substring into an [`AttrMap`].
///
/// Never fails: malformed input simply yields a smaller map.
#[must_use]
pub fn parse_attrs(input: &str) -> AttrMap {
    let mut map = AttrMap::new();

    for cap in ATTR_PAIR.captures_iter(input) {
        let key = &cap[1];
        let raw = cap
            .get(2)
            .or_else(|| cap.get(3))
            .or_else(|| cap.get(4))
            .map_or("", |m| m.as_str());

        let value = if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse::<i64>()
                .map_or_else(|_| AttrValue::Str(raw.to_owned()), AttrValue::Int)
        } else {
            AttrValue::Str(raw.to_owned())
        };

        map.insert(key.to_owned(), value);
    }

    map
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(parse_attrs("").is_empty());
        assert!(parse_attrs("   ").is_empty());
    }

    #[test]
    fn test_quoted_string() {
        let map = parse_attrs(r#"title="Hello World""#);
        assert_eq!(
            map.get("title"),
            Some(&AttrValue::Str("Hello World".to_owned()))
        );
    }

    #[test]
    fn test_braced_integer() {
        let map = parse_attrs("width={400}");
        assert_eq!(map.get("width"), Some(&AttrValue::Int(400)));
    }

    #[test]
    fn test_bare_integer() {
        let map = parse_attrs("count=3");
        assert_eq!(map.get("count"), Some(&AttrValue::Int(3)));
    }

    #[test]
    fn test_quoted_digits_become_integer() {
        let map = parse_attrs(r#"width="400""#);
        assert_eq!(map.get("width"), Some(&AttrValue::Int(400)));
    }

    #[test]
    fn test_braced_expression_stays_string() {
        let map = parse_attrs("size={w * 2}");
        assert_eq!(map.get("size"), Some(&AttrValue::Str("w * 2".to_owned())));
    }

    #[test]
    fn test_multiple_pairs() {
        let map = parse_attrs(r#"title="x" language="js" width={400}"#);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("language"), Some(&AttrValue::Str("js".to_owned())));
        assert_eq!(map.get("width"), Some(&AttrValue::Int(400)));
    }

    #[test]
    fn test_malformed_fragment_skipped() {
        // The dangling `broken=` fragment has no recognizable value.
        let map = parse_attrs(r#"title="ok" broken= language="js""#);
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("title"));
        assert!(map.contains_key("language"));
    }

    #[test]
    fn test_empty_quoted_value() {
        let map = parse_attrs(r#"title="""#);
        assert_eq!(map.get("title"), Some(&AttrValue::Str(String::new())));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let map = parse_attrs(r#"lang="js" lang="rust""#);
        assert_eq!(map.get("lang"), Some(&AttrValue::Str("rust".to_owned())));
    }

    #[test]
    fn test_accessors() {
        let map = parse_attrs(r#"title="x" width={400}"#);
        assert_eq!(map.get("title").and_then(AttrValue::as_str), Some("x"));
        assert_eq!(map.get("title").and_then(AttrValue::as_int), None);
        assert_eq!(map.get("width").and_then(AttrValue::as_int), Some(400));
        assert_eq!(map.get("width").and_then(AttrValue::as_str), None);
    }
}
