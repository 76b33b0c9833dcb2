//! Component-module emission.
//!
//! Turns a [`chapbook_compiler::CompiledChapter`] into JavaScript module
//! source: a `meta` export plus a `render()` function returning the chapter
//! markup as one template literal. [`escape`] holds the escaping rules the
//! literal depends on; the reverse crate reuses them to undo the damage.

pub mod emitter;
pub mod escape;

pub use emitter::{EMPTY_BODY_COMMENT, NavLink, NavLinks, emit_component};
pub use escape::{escape_html, escape_template, js_string, unescape_html, unescape_template};
