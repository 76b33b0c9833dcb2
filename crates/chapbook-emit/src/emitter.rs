//! Component-module source generation.
//!
//! A compiled chapter becomes one JavaScript module: an exported `meta`
//! object literal plus a `render()` function returning the chapter markup
//! as a template literal. The markup shapes here are load-bearing for the
//! reverse direction, which recovers Markdown from them with regexes.

use std::fmt::Write as _;

use chapbook_blocks::{FlipCard, Snippet};
use chapbook_compiler::{ChapterMeta, CompiledChapter, Inline, ListNode, Node, Section};

use crate::escape::{escape_attr, escape_html, escape_template, js_string};

/// Placed in the template literal when a chapter compiles to no sections,
/// so the generated module is still valid and the gap is visible.
pub const EMPTY_BODY_COMMENT: &str = "<!-- content empty or conversion failed -->";

/// Neighbor chapter reference for the footer navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLink {
    pub order: i64,
    pub title: String,
}

/// Previous/next links for one chapter. Either side may be absent at the
/// ends of the chapter sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NavLinks {
    pub prev: Option<NavLink>,
    pub next: Option<NavLink>,
}

/// Render a compiled chapter as JavaScript module source.
#[must_use]
pub fn emit_component(chapter: &CompiledChapter, nav: &NavLinks) -> String {
    let mut out = String::new();
    out.push_str("// Generated module. Do not edit by hand.\n\n");
    emit_meta(&mut out, &chapter.meta);
    out.push_str("\nexport function render() {\n  return `");
    emit_body(&mut out, chapter, nav);
    out.push_str("`;\n}\n\nexport default { meta, render };\n");
    tracing::debug!(order = chapter.meta.order, bytes = out.len(), "emitted component");
    out
}

fn emit_meta(out: &mut String, meta: &ChapterMeta) {
    let keywords = serde_json::to_string(&meta.keywords).unwrap_or_else(|_| "[]".to_owned());
    out.push_str("export const meta = {\n");
    let _ = writeln!(out, "  title: {},", js_string(&meta.title));
    let _ = writeln!(out, "  description: {},", js_string(&meta.description));
    let _ = writeln!(out, "  order: {},", meta.order);
    let _ = writeln!(out, "  path: {},", js_string(&meta.path.display().to_string()));
    let _ = writeln!(out, "  created: {},", meta.created);
    let _ = writeln!(out, "  modified: {},", meta.modified);
    let _ = writeln!(out, "  size: {},", meta.size);
    let _ = writeln!(out, "  keywords: {keywords},");
    out.push_str("};\n");
}

fn emit_body(out: &mut String, chapter: &CompiledChapter, nav: &NavLinks) {
    let _ = writeln!(
        out,
        "<h1 class=\"chapter-title\">{}</h1>",
        escaped(&chapter.meta.title)
    );

    if chapter.sections.is_empty() {
        out.push_str(EMPTY_BODY_COMMENT);
        out.push('\n');
    }
    for section in &chapter.sections {
        emit_section(out, section);
    }

    emit_nav(out, nav);
}

fn emit_section(out: &mut String, section: &Section) {
    out.push_str("<section class=\"chapter-section\">\n");
    for node in &section.nodes {
        emit_node(out, node);
    }
    out.push_str("</section>\n");
}

fn emit_node(out: &mut String, node: &Node) {
    match node {
        Node::Heading { level, inlines } => {
            // Class depth caps at 5, the HTML tag at h6.
            let class = (*level).min(5);
            let tag = (*level).min(6);
            let _ = writeln!(
                out,
                "<h{tag} class=\"heading-{class}\">{}</h{tag}>",
                render_inlines(inlines)
            );
        }
        Node::Paragraph(inlines) => {
            let _ = writeln!(out, "<p>{}</p>", render_inlines(inlines));
        }
        Node::List(list) => emit_list(out, list),
        Node::CodeBlock { title, language, code } => {
            emit_code_block(out, title.as_deref(), language, code);
        }
        Node::FlipCard(card) => emit_flip_card(out, card),
        Node::Blockquote(children) => {
            out.push_str("<blockquote>\n");
            for child in children {
                emit_node(out, child);
            }
            out.push_str("</blockquote>\n");
        }
    }
}

fn emit_list(out: &mut String, list: &ListNode) {
    let tag = if list.ordered { "ol" } else { "ul" };
    let _ = writeln!(out, "<{tag}>");
    for item in &list.items {
        let _ = write!(out, "<li>{}", render_inlines(&item.inlines));
        if let Some(nested) = &item.nested {
            out.push('\n');
            emit_list(out, nested);
        }
        out.push_str("</li>\n");
    }
    let _ = writeln!(out, "</{tag}>");
}

fn emit_code_block(out: &mut String, title: Option<&str>, language: &str, code: &str) {
    let _ = write!(
        out,
        "<pre class=\"code-block\" data-language=\"{}\"",
        escaped_attr(language)
    );
    if let Some(title) = title {
        let _ = write!(out, " data-title=\"{}\"", escaped_attr(title));
    }
    let _ = writeln!(out, "><code>{}</code></pre>", escaped(code));
}

fn emit_flip_card(out: &mut String, card: &FlipCard) {
    let _ = writeln!(
        out,
        "<flip-card width=\"{}\" height=\"{}\">",
        card.width, card.height
    );
    if let Some(init) = &card.init_code {
        let _ = writeln!(out, "<script type=\"demo-init\">{}</script>", escaped(init));
    }
    for Snippet { title, language, code } in &card.snippets {
        emit_code_block(out, title.as_deref(), language, code);
    }
    out.push_str("</flip-card>\n");
}

fn emit_nav(out: &mut String, nav: &NavLinks) {
    out.push_str("<footer class=\"chapter-nav\">\n");
    if let Some(prev) = &nav.prev {
        let _ = writeln!(
            out,
            "<a class=\"nav-prev\" href=\"chapter-{}\">&laquo; {}</a>",
            prev.order,
            escaped(&prev.title)
        );
    }
    if let Some(next) = &nav.next {
        let _ = writeln!(
            out,
            "<a class=\"nav-next\" href=\"chapter-{}\">{} &raquo;</a>",
            next.order,
            escaped(&next.title)
        );
    }
    out.push_str("</footer>");
}

fn render_inlines(inlines: &[Inline]) -> String {
    let mut out = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(text) => out.push_str(&escaped(text)),
            Inline::Strong(text) => {
                let _ = write!(out, "<strong>{}</strong>", escaped(text));
            }
            Inline::Code(text) => {
                let _ = write!(out, "<code>{}</code>", escaped(text));
            }
            Inline::Link { href, text } => {
                let _ = write!(
                    out,
                    "<a href=\"{}\">{}</a>",
                    escaped_attr(href),
                    escaped(text)
                );
            }
        }
    }
    out
}

/// HTML entities first, then template-literal escapes on the result.
fn escaped(text: &str) -> String {
    escape_template(&escape_html(text))
}

/// Attribute values live inside the template literal too, so they need the
/// same template-escaping layer on top of the attribute quoting rules.
fn escaped_attr(text: &str) -> String {
    escape_template(&escape_attr(text))
}
