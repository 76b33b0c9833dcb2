//! Custom-block extraction.
//!
//! Lifts `<FlipCard>` and `<CodeBlock>` blocks out of raw chapter text,
//! replacing each with a placeholder code fence the generic Markdown parser
//! passes through untouched. Flip cards are extracted first because they may
//! contain snippet sub-tags of their own; the second pass then only sees
//! standalone snippets.
//!
//! Extraction state (counters and accumulated blocks) is scoped to the
//! returned [`Extraction`] so documents can be processed independently.

use std::borrow::Cow;

use regex::Captures;

use crate::attrs::{AttrValue, parse_attrs};
use crate::grammar::{
    CODE_BLOCK_TAG, DEMO_INIT_TAG, FLIP_CARD_TAG, INIT_LAMBDA, flipcard_placeholder,
    placeholder_fence, snippet_placeholder,
};

/// Default flip-card edge length in pixels.
const DEFAULT_CARD_SIZE: i64 = 400;

/// One titled, language-tagged code sample.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snippet {
    pub title: Option<String>,
    /// Language tag, `"text"` when not specified.
    pub language: String,
    /// Code text, trimmed of leading and trailing blank lines.
    pub code: String,
}

/// A live-demo card: an initializer body plus its labeled source snippets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlipCard {
    pub width: i64,
    pub height: i64,
    /// Initializer code with any two-parameter arrow wrapper stripped.
    pub init_code: Option<String>,
    pub snippets: Vec<Snippet>,
}

/// Result of extracting custom blocks from one document.
///
/// Snippet indices are exactly `0..snippets.len()` and flip-card indices
/// exactly `0..flip_cards.len()`, assigned in first-seen order; each index
/// appears exactly once as a placeholder in `text`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Input text with every extracted block replaced by a placeholder fence.
    pub text: String,
    pub snippets: Vec<Snippet>,
    pub flip_cards: Vec<FlipCard>,
}

/// Extract flip cards and snippets from raw chapter text.
///
/// Matching is non-overlapping, left to right, and non-greedy on inner
/// content: a malformed or unterminated tag fails to match and its text
/// passes through unchanged rather than raising an error.
#[must_use]
pub fn extract_blocks(input: &str) -> Extraction {
    // Pass 1: flip cards, which may contain snippet sub-tags.
    let mut flip_cards = Vec::new();
    let after_cards = FLIP_CARD_TAG.replace_all(input, |cap: &Captures<'_>| {
        let card = parse_flip_card(&cap[1], &cap[2]);
        let token = flipcard_placeholder(flip_cards.len());
        flip_cards.push(card);
        placeholder_fence(&token)
    });

    // Pass 2: standalone snippets remaining after card extraction.
    let mut snippets = Vec::new();
    let text = CODE_BLOCK_TAG.replace_all(&after_cards, |cap: &Captures<'_>| {
        let snippet = parse_snippet(&cap[1], &cap[2]);
        let token = snippet_placeholder(snippets.len());
        snippets.push(snippet);
        placeholder_fence(&token)
    });

    tracing::debug!(
        snippets = snippets.len(),
        flip_cards = flip_cards.len(),
        "extracted custom blocks"
    );

    Extraction {
        text: text.into_owned(),
        snippets,
        flip_cards,
    }
}

fn parse_snippet(attrs_str: &str, body: &str) -> Snippet {
    let attrs = parse_attrs(attrs_str);
    Snippet {
        title: attrs
            .get("title")
            .and_then(AttrValue::as_str)
            .map(str::to_owned),
        language: attrs
            .get("language")
            .and_then(AttrValue::as_str)
            .unwrap_or("text")
            .to_owned(),
        code: trim_blank_lines(body),
    }
}

fn parse_flip_card(attrs_str: &str, inner: &str) -> FlipCard {
    let attrs = parse_attrs(attrs_str);
    let width = attrs
        .get("width")
        .and_then(AttrValue::as_int)
        .unwrap_or(DEFAULT_CARD_SIZE);
    let height = attrs
        .get("height")
        .and_then(AttrValue::as_int)
        .unwrap_or(DEFAULT_CARD_SIZE);

    // The first initializer sub-tag is consumed; snippet scanning runs on
    // whatever text remains around it.
    let mut init_code = None;
    let mut rest: Cow<'_, str> = Cow::Borrowed(inner);
    if let Some(cap) = DEMO_INIT_TAG.captures(inner)
        && let (Some(whole), Some(body)) = (cap.get(0), cap.get(1))
    {
        init_code = Some(unwrap_init_body(body.as_str()));
        rest = Cow::Owned(format!(
            "{}{}",
            &inner[..whole.start()],
            &inner[whole.end()..]
        ));
    }

    let snippets = CODE_BLOCK_TAG
        .captures_iter(&rest)
        .map(|cap| parse_snippet(&cap[1], &cap[2]))
        .collect();

    FlipCard {
        width,
        height,
        init_code,
        snippets,
    }
}

/// Strip a `(a, b) => { ... }` wrapper from an initializer body, keeping
/// only the brace contents. Textual convenience only: anything that does not
/// match the wrapper shape is kept verbatim (trimmed).
fn unwrap_init_body(body: &str) -> String {
    let trimmed = body.trim();
    match INIT_LAMBDA.captures(trimmed) {
        Some(cap) => cap[1].trim().to_owned(),
        None => trimmed.to_owned(),
    }
}

/// Drop leading and trailing blank lines, preserving interior indentation.
fn trim_blank_lines(s: &str) -> String {
    let lines: Vec<&str> = s.lines().collect();
    let start = lines
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}
