//! Shared tag-matching grammar and placeholder tokens.
//!
//! Both the forward extraction pass and the reverse recovery pipeline match
//! the same tag shapes, so the regexes live here once. Inner content is
//! always matched non-greedily: an unterminated tag simply fails to match
//! and its text passes through untouched.

use std::sync::LazyLock;

use regex::Regex;

/// Sentinel language tag placed on placeholder code fences so they survive
/// generic Markdown parsing as inert `code` nodes.
pub const PLACEHOLDER_LANG: &str = "chapbook-placeholder";

/// Standalone snippet tag: `<CodeBlock attrs>code</CodeBlock>`.
pub static CODE_BLOCK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<CodeBlock\b([^>]*)>(.*?)</CodeBlock>").expect("snippet tag regex is valid")
});

/// Flip-card tag: `<FlipCard attrs>inner</FlipCard>`.
pub static FLIP_CARD_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<FlipCard\b([^>]*)>(.*?)</FlipCard>").expect("flip-card tag regex is valid")
});

/// Demo initializer sub-tag inside a flip card.
pub static DEMO_INIT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<DemoInit\b[^>]*>(.*?)</DemoInit>").expect("demo-init tag regex is valid")
});

/// Two-parameter arrow-function wrapper around an initializer body, e.g.
/// `(canvas, gl) => { ... }`. Purely textual; the wrapped code is never
/// validated.
pub static INIT_LAMBDA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\(\s*[A-Za-z_$][\w$]*\s*,\s*[A-Za-z_$][\w$]*\s*\)\s*=>\s*\{(.*)\}$")
        .expect("initializer lambda regex is valid")
});

/// Placeholder token body: `SNIPPET_PLACEHOLDER_<n>` / `FLIPCARD_PLACEHOLDER_<n>`.
static PLACEHOLDER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(SNIPPET|FLIPCARD)_PLACEHOLDER_(\d+)$").expect("placeholder regex is valid")
});

/// Which kind of extracted block a placeholder refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceholderKind {
    Snippet,
    FlipCard,
}

/// Placeholder token for the snippet at `index`.
#[must_use]
pub fn snippet_placeholder(index: usize) -> String {
    format!("SNIPPET_PLACEHOLDER_{index}")
}

/// Placeholder token for the flip card at `index`.
#[must_use]
pub fn flipcard_placeholder(index: usize) -> String {
    format!("FLIPCARD_PLACEHOLDER_{index}")
}

/// A placeholder token wrapped in a sentinel-language code fence, padded
/// with blank lines so the fence parses as its own block.
#[must_use]
pub fn placeholder_fence(token: &str) -> String {
    format!("\n```{PLACEHOLDER_LANG}\n{token}\n```\n")
}

/// Parse a trimmed placeholder token back into its kind and index.
#[must_use]
pub fn parse_placeholder(token: &str) -> Option<(PlaceholderKind, usize)> {
    let cap = PLACEHOLDER_TOKEN.captures(token)?;
    let kind = match &cap[1] {
        "SNIPPET" => PlaceholderKind::Snippet,
        _ => PlaceholderKind::FlipCard,
    };
    let index = cap[2].parse().ok()?;
    Some((kind, index))
}
