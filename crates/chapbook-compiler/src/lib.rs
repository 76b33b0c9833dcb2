//! Chapter compilation: Markdown plus custom blocks in, renderable sections out.
//!
//! The pipeline for one document:
//!
//! 1. [`front_matter`] splits and parses the YAML preamble.
//! 2. [`chapbook_blocks::extract_blocks`] lifts flip cards and snippets out of
//!    the body, leaving placeholder fences behind.
//! 3. pulldown-cmark parses the rewritten body (external boundary — the
//!    placeholders survive as fenced code blocks with a sentinel language).
//! 4. [`compile::compile`] walks the events into [`node::Section`]s, dropping
//!    the leading H1 and resolving placeholders back to their blocks.
//!
//! [`chapter::compile_chapter`] ties the steps together and is the
//! per-document error boundary: it returns `Result<CompiledChapter,
//! CompileError>` so a batch driver can log failures and continue.

pub mod chapter;
pub mod compile;
pub mod front_matter;
pub mod node;

pub use chapter::{ChapterMeta, CompileError, CompiledChapter, FileInfo, compile_chapter};
pub use compile::compile;
pub use front_matter::{FrontMatter, FrontMatterError, split_front_matter};
pub use node::{Inline, ListItem, ListNode, Node, Section};
