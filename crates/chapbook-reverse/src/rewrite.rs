//! Markup-to-Markdown rewriting.
//!
//! Undoes the emitter's rendering with ordered regex substitution. Flip
//! cards and titled code blocks are rebuilt as custom tag blocks and
//! shielded behind placeholder tokens first, so the generic tag stripping
//! cannot chew through their payloads; they are restored at the end, after
//! the escape layers have been peeled off the surrounding prose.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use chapbook_blocks::{flipcard_placeholder, snippet_placeholder};
use chapbook_emit::{EMPTY_BODY_COMMENT, unescape_html, unescape_template};

static FLIP_CARD_HTML: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<flip-card width="(\d+)" height="(\d+)">(.*?)</flip-card>"#)
        .expect("flip-card markup pattern")
});

static DEMO_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script type="demo-init">(.*?)</script>"#).expect("demo script pattern")
});

static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<pre class="code-block" data-language="([^"]*)"(?: data-title="([^"]*)")?><code>(.*?)</code></pre>"#,
    )
    .expect("code block markup pattern")
});

static FOOTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<footer class="chapter-nav">.*?</footer>"#).expect("footer pattern")
});

static H1: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h1[^>]*>(.*?)</h1>").expect("h1 pattern"));

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<h([2-4])[^>]*>(.*?)</h[2-4]>").expect("heading pattern"));

static BLOCKQUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<blockquote>(.*?)</blockquote>").expect("quote pattern"));

static ORDERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ol>(.*?)</ol>").expect("ordered list pattern"));

static UNORDERED_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ul>(.*?)</ul>").expect("unordered list pattern"));

static LIST_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<li>(.*?)</li>").expect("list item pattern"));

static STRONG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<strong>(.*?)</strong>").expect("strong pattern"));

static EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<em>(.*?)</em>").expect("emphasis pattern"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<code>(.*?)</code>").expect("inline code pattern"));

static ANCHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<a href="([^"]*)"[^>]*>(.*?)</a>"#).expect("anchor pattern")
});

static PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<p>(.*?)</p>").expect("paragraph pattern"));

static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^>]*>").expect("generic tag pattern"));

static EXTRA_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline collapse pattern"));

/// Rewrite a rendered chapter body back into Markdown. Lossy by design:
/// anything the substitutions do not recognize is stripped to its text.
#[must_use]
pub fn body_to_markdown(body: &str) -> String {
    let mut shields: Vec<(String, String)> = Vec::new();

    // Structured payloads out first, behind inert tokens.
    let text = FLIP_CARD_HTML.replace_all(body, |cap: &Captures<'_>| {
        let token = flipcard_placeholder(shields.len());
        shields.push((token.clone(), rebuild_flip_card(cap)));
        token
    });
    let text = PRE_BLOCK.replace_all(&text, |cap: &Captures<'_>| {
        let token = snippet_placeholder(shields.len());
        shields.push((token.clone(), rebuild_code_block(cap)));
        token
    });

    let text = FOOTER.replace_all(&text, "");
    let text = text.replace(EMPTY_BODY_COMMENT, "");
    let text = H1.replace_all(&text, "# $1\n");
    let text = HEADING.replace_all(&text, |cap: &Captures<'_>| {
        let depth: usize = cap[1].parse().unwrap_or(2);
        format!("{} {}\n", "#".repeat(depth), &cap[2])
    });
    let text = BLOCKQUOTE.replace_all(&text, |cap: &Captures<'_>| rebuild_blockquote(&cap[1]));
    let text = ORDERED_LIST.replace_all(&text, |cap: &Captures<'_>| rebuild_list(&cap[1], true));
    let text = UNORDERED_LIST.replace_all(&text, |cap: &Captures<'_>| rebuild_list(&cap[1], false));
    // Stray items outside a recognized list wrapper.
    let text = LIST_ITEM.replace_all(&text, "- $1\n");
    let text = STRONG.replace_all(&text, "**$1**");
    let text = EMPHASIS.replace_all(&text, "*$1*");
    let text = INLINE_CODE.replace_all(&text, "`$1`");
    let text = ANCHOR.replace_all(&text, "[$2]($1)");
    let text = PARAGRAPH.replace_all(&text, "$1\n");
    let text = ANY_TAG.replace_all(&text, "");

    // Prose escapes off before the already-clean payloads come back.
    let mut text = unescape_html(&unescape_template(&text));
    for (token, replacement) in shields {
        text = text.replacen(&token, &replacement, 1);
    }

    let text = EXTRA_NEWLINES.replace_all(&text, "\n\n");
    let mut out = text.trim().to_owned();
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

/// Undo both escape layers on a code payload.
fn recover_code(raw: &str) -> String {
    unescape_html(&unescape_template(raw))
}

fn rebuild_flip_card(cap: &Captures<'_>) -> String {
    let (width, height) = (&cap[1], &cap[2]);
    let inner = &cap[3];

    let mut out = format!("<FlipCard width={{{width}}} height={{{height}}}>\n");
    if let Some(script) = DEMO_SCRIPT.captures(inner) {
        let init = recover_code(script[1].trim());
        let _ = write!(out, "<DemoInit>\n(canvas, context) => {{\n{init}\n}}\n</DemoInit>\n");
    }
    for pre in PRE_BLOCK.captures_iter(inner) {
        out.push('\n');
        out.push_str(&rebuild_snippet_tag(&pre));
    }
    out.push_str("</FlipCard>\n");
    out
}

/// A standalone rendered code block: titled ones go back to the custom tag
/// form, untitled ones to a plain fence.
fn rebuild_code_block(cap: &Captures<'_>) -> String {
    if cap.get(2).is_some() {
        rebuild_snippet_tag(cap)
    } else {
        let language = &cap[1];
        let code = recover_code(&cap[3]);
        format!("```{language}\n{code}\n```\n")
    }
}

fn rebuild_snippet_tag(cap: &Captures<'_>) -> String {
    let language = &cap[1];
    let code = recover_code(&cap[3]);
    let mut out = String::from("<CodeBlock");
    if let Some(title) = cap.get(2) {
        let _ = write!(out, " title=\"{}\"", recover_code(title.as_str()));
    }
    let _ = write!(out, " language=\"{language}\">\n{code}\n</CodeBlock>\n");
    out
}

/// Items of one list wrapper, numbered when the wrapper was `<ol>`.
fn rebuild_list(inner: &str, ordered: bool) -> String {
    let mut out = String::new();
    for (index, item) in LIST_ITEM.captures_iter(inner).enumerate() {
        if ordered {
            let _ = writeln!(out, "{}. {}", index + 1, item[1].trim());
        } else {
            let _ = writeln!(out, "- {}", item[1].trim());
        }
    }
    out
}

fn rebuild_blockquote(inner: &str) -> String {
    let mut out = String::new();
    for cap in PARAGRAPH.captures_iter(inner) {
        let _ = writeln!(out, "> {}", cap[1].trim());
    }
    out.push('\n');
    out
}
