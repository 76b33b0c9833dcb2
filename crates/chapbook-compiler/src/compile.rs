//! AST-to-component-tree compilation.
//!
//! Walks pulldown-cmark events into a flat list of top-level [`Node`]s, then
//! groups them into [`Section`]s split at level-2 headings. Placeholder
//! fences left behind by block extraction are resolved back to their
//! snippet/flip-card by kind and index.
//!
//! Compilation never fails: unsupported constructs (tables, raw HTML,
//! footnotes, math) are dropped silently, and a structurally surprising
//! document legitimately compiles to an empty section list.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use chapbook_blocks::{Extraction, PLACEHOLDER_LANG, PlaceholderKind, parse_placeholder};

use crate::node::{Inline, ListItem, ListNode, Node, Section};

/// Parser options for chapter bodies: tables and front-matter fencing are
/// recognized so neither leaks into the compiled output as prose.
#[must_use]
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_YAML_STYLE_METADATA_BLOCKS
}

/// Compile a rewritten chapter body against its extracted blocks.
///
/// The body is expected to carry the placeholder fences produced by
/// [`chapbook_blocks::extract_blocks`]; a placeholder with no matching block
/// resolves to nothing.
#[must_use]
pub fn compile(markdown: &str, blocks: &Extraction) -> Vec<Section> {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut builder = TreeBuilder::new(blocks);
    for event in parser {
        builder.process_event(event);
    }
    into_sections(builder.finish())
}

/// A top-level child of the document, before sectioning.
///
/// Unsupported kinds are kept as markers so the leading-H1 drop sees the
/// document's true first child, then discarded during sectioning.
enum TopBlock {
    Node(Node),
    Unsupported,
}

/// Event-walk state. One instance per document.
struct TreeBuilder<'a> {
    blocks: &'a Extraction,
    top: Vec<TopBlock>,
    // Inline state
    inlines: Vec<Inline>,
    strong: Option<String>,
    link: Option<(String, String)>,
    image_depth: usize,
    // Block state
    heading_level: Option<u8>,
    in_paragraph: bool,
    code: Option<(Option<String>, String)>,
    lists: Vec<ListNode>,
    items: Vec<ListItem>,
    quotes: Vec<Vec<Node>>,
    skip_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    fn new(blocks: &'a Extraction) -> Self {
        Self {
            blocks,
            top: Vec::new(),
            inlines: Vec::new(),
            strong: None,
            link: None,
            image_depth: 0,
            heading_level: None,
            in_paragraph: false,
            code: None,
            lists: Vec::new(),
            items: Vec::new(),
            quotes: Vec::new(),
            skip_depth: 0,
        }
    }

    fn finish(self) -> Vec<TopBlock> {
        self.top
    }

    fn process_event(&mut self, event: Event<'_>) {
        // Inside an unsupported container every event is ignored, tracking
        // only nesting of further skipped containers.
        if self.skip_depth > 0 {
            match &event {
                Event::Start(tag) if is_skipped_container(tag) => self.skip_depth += 1,
                Event::End(tag) if is_skipped_container_end(*tag) => self.skip_depth -= 1,
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            Event::Rule => {
                if self.at_top_level() {
                    self.top.push(TopBlock::Unsupported);
                }
            }
            // Raw HTML, footnote refs, task markers and math are dropped.
            Event::Html(_)
            | Event::InlineHtml(_)
            | Event::FootnoteReference(_)
            | Event::TaskListMarker(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {}
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // Paragraphs inside list items feed the item's inlines
                // directly; only top/blockquote paragraphs open a buffer.
                if self.items.is_empty() {
                    self.in_paragraph = true;
                }
            }
            Tag::Heading { level, .. } => {
                self.heading_level = Some(heading_level_to_num(level));
                self.inlines.clear();
            }
            Tag::BlockQuote(_) => self.quotes.push(Vec::new()),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) if !info.is_empty() => {
                        info.split_whitespace().next().map(str::to_owned)
                    }
                    _ => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::List(start) => self.lists.push(ListNode {
                ordered: start.is_some(),
                items: Vec::new(),
            }),
            Tag::Item => self.items.push(ListItem::default()),
            Tag::Strong => self.strong = Some(String::new()),
            Tag::Link { dest_url, .. } => {
                self.link = Some((dest_url.into_string(), String::new()));
            }
            Tag::Image { .. } => self.image_depth += 1,
            // Front-matter handled separately; never content.
            Tag::MetadataBlock(_) => self.skip_depth = 1,
            Tag::Table(_) | Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::DefinitionList => {
                if self.at_top_level() {
                    self.top.push(TopBlock::Unsupported);
                }
                tracing::debug!("skipping unsupported block");
                self.skip_depth = 1;
            }
            // Emphasis and friends: the wrapper is dropped, inner text
            // flows through as plain text.
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if self.items.is_empty() && self.in_paragraph {
                    self.in_paragraph = false;
                    let inlines = std::mem::take(&mut self.inlines);
                    if inlines.is_empty() {
                        tracing::debug!("dropping paragraph with no supported inline content");
                    } else {
                        self.push_node(Node::Paragraph(inlines));
                    }
                }
            }
            TagEnd::Heading(_) => {
                if let Some(level) = self.heading_level.take() {
                    let inlines = std::mem::take(&mut self.inlines);
                    self.push_node(Node::Heading { level, inlines });
                }
            }
            TagEnd::BlockQuote(_) => {
                if let Some(children) = self.quotes.pop() {
                    let paragraphs: Vec<Node> = children
                        .into_iter()
                        .filter(|n| matches!(n, Node::Paragraph(_)))
                        .collect();
                    if !paragraphs.is_empty() {
                        self.push_node(Node::Blockquote(paragraphs));
                    }
                }
            }
            TagEnd::CodeBlock => {
                if let Some((lang, code)) = self.code.take() {
                    self.finish_code_block(lang, code);
                }
            }
            TagEnd::List(_) => {
                if let Some(list) = self.lists.pop() {
                    if let Some(item) = self.items.last_mut() {
                        item.nested = Some(list);
                    } else if !list.items.is_empty() {
                        self.push_node(Node::List(list));
                    }
                }
            }
            TagEnd::Item => {
                if let Some(item) = self.items.pop()
                    && let Some(list) = self.lists.last_mut()
                {
                    list.items.push(item);
                }
            }
            TagEnd::Strong => {
                if let Some(text) = self.strong.take() {
                    self.push_inline(Inline::Strong(text));
                }
            }
            TagEnd::Link => {
                if let Some((href, text)) = self.link.take() {
                    self.push_inline(Inline::Link { href, text });
                }
            }
            TagEnd::Image => self.image_depth = self.image_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, buf)) = self.code.as_mut() {
            buf.push_str(text);
            return;
        }
        self.push_inline(Inline::Text(text.to_owned()));
    }

    /// Route a completed inline to whichever buffer is innermost. Content
    /// with no supported destination (e.g. image alt text) is dropped.
    fn push_inline(&mut self, inline: Inline) {
        if self.image_depth > 0 {
            return;
        }
        if let Some(buf) = self.strong.as_mut() {
            buf.push_str(flattened_text(&inline));
            return;
        }
        if let Some((_, text)) = self.link.as_mut() {
            text.push_str(flattened_text(&inline));
            return;
        }
        if self.heading_level.is_some() {
            self.inlines.push(inline);
            return;
        }
        if let Some(item) = self.items.last_mut() {
            item.inlines.push(inline);
            return;
        }
        if self.in_paragraph {
            self.inlines.push(inline);
        }
    }

    /// Resolve a finished code block: a placeholder fence maps back to the
    /// extracted block at its index, everything else becomes a plain code
    /// block with `"text"` as the fallback language.
    fn finish_code_block(&mut self, lang: Option<String>, code: String) {
        if lang.as_deref() == Some(PLACEHOLDER_LANG) {
            match parse_placeholder(code.trim()) {
                Some((PlaceholderKind::Snippet, index)) => {
                    if let Some(snippet) = self.blocks.snippets.get(index) {
                        self.push_node(Node::CodeBlock {
                            title: snippet.title.clone(),
                            language: snippet.language.clone(),
                            code: snippet.code.clone(),
                        });
                    } else {
                        tracing::debug!(index, "snippet placeholder out of range, dropped");
                    }
                }
                Some((PlaceholderKind::FlipCard, index)) => {
                    if let Some(card) = self.blocks.flip_cards.get(index) {
                        self.push_node(Node::FlipCard(card.clone()));
                    } else {
                        tracing::debug!(index, "flip-card placeholder out of range, dropped");
                    }
                }
                None => tracing::debug!("unrecognized placeholder fence, dropped"),
            }
            return;
        }

        let code = match code.strip_suffix('\n') {
            Some(stripped) => stripped.to_owned(),
            None => code,
        };
        self.push_node(Node::CodeBlock {
            title: None,
            language: lang.unwrap_or_else(|| "text".to_owned()),
            code,
        });
    }

    /// Attach a completed node to the innermost open container.
    fn push_node(&mut self, node: Node) {
        if !self.items.is_empty() {
            // Non-paragraph children of list items are dropped (nested
            // lists are attached at their closing tag instead).
            tracing::debug!("dropping block-level content inside list item");
            return;
        }
        if let Some(quote) = self.quotes.last_mut() {
            quote.push(node);
        } else {
            self.top.push(TopBlock::Node(node));
        }
    }

    fn at_top_level(&self) -> bool {
        self.quotes.is_empty()
            && self.lists.is_empty()
            && !self.in_paragraph
            && self.heading_level.is_none()
            && self.code.is_none()
    }
}

/// Group top-level nodes into sections.
///
/// The leading H1 (if the document's very first child is one) is dropped —
/// the component shell renders the chapter title itself. A new section
/// starts at every level-2 heading; content before the first level-2
/// heading forms an untitled leading section. Empty sections are omitted.
fn into_sections(mut tops: Vec<TopBlock>) -> Vec<Section> {
    if matches!(tops.first(), Some(TopBlock::Node(node)) if node.is_heading(1)) {
        tops.remove(0);
    }

    let mut sections = Vec::new();
    let mut current: Vec<Node> = Vec::new();
    for top in tops {
        let TopBlock::Node(node) = top else { continue };
        if node.is_heading(2) && !current.is_empty() {
            sections.push(Section {
                nodes: std::mem::take(&mut current),
            });
        }
        current.push(node);
    }
    if !current.is_empty() {
        sections.push(Section { nodes: current });
    }
    sections
}

fn is_skipped_container(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Table(_)
            | Tag::FootnoteDefinition(_)
            | Tag::HtmlBlock
            | Tag::MetadataBlock(_)
            | Tag::DefinitionList
    )
}

fn is_skipped_container_end(tag: TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Table
            | TagEnd::FootnoteDefinition
            | TagEnd::HtmlBlock
            | TagEnd::MetadataBlock(_)
            | TagEnd::DefinitionList
    )
}

/// Text content of an inline, for flattening into strong/link buffers.
fn flattened_text(inline: &Inline) -> &str {
    match inline {
        Inline::Text(s) | Inline::Strong(s) | Inline::Code(s) => s,
        Inline::Link { text, .. } => text,
    }
}

/// Convert heading level enum to number (1-6).
fn heading_level_to_num(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
