//! Custom chapter-tag grammar shared by the forward and reverse pipelines.
//!
//! Tutorial chapters are Markdown augmented with two pseudo-component tags:
//!
//! - `<CodeBlock title="..." language="...">` wrapping literal code (a
//!   *snippet*), and
//! - `<FlipCard width={400} height={400}>` wrapping one `<DemoInit>`
//!   initializer plus zero or more nested `<CodeBlock>` snippets (a
//!   *flip card*).
//!
//! This crate owns the tag grammar ([`grammar`]), the best-effort attribute
//! scanner ([`attrs`]), and the extraction pass ([`extract`]) that lifts
//! custom blocks out of the text and leaves opaque placeholder fences behind
//! so a generic Markdown parser treats them as inert content.

pub mod attrs;
pub mod extract;
pub mod grammar;

pub use attrs::{AttrMap, AttrValue, parse_attrs};
pub use extract::{Extraction, FlipCard, Snippet, extract_blocks};
pub use grammar::{
    PLACEHOLDER_LANG, PlaceholderKind, flipcard_placeholder, parse_placeholder,
    snippet_placeholder,
};
