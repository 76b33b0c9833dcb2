//! Renderable node tree produced by compilation.
//!
//! The tree is deliberately small: it models only what the emitter knows how
//! to serialize. Anything the compiler cannot express here is dropped during
//! compilation, never carried along.

use chapbook_blocks::FlipCard;

/// Inline content inside headings, paragraphs, and list items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    Code(String),
    Link { href: String, text: String },
}

/// One list item: its inline content plus at most one nested list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    pub inlines: Vec<Inline>,
    pub nested: Option<ListNode>,
}

/// An ordered or unordered list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListNode {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

/// A block-level renderable node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Heading with its exact source level (1-6).
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph(Vec<Inline>),
    List(ListNode),
    /// A code sample: either a plain fenced block (`title` is `None`) or a
    /// resolved snippet.
    CodeBlock {
        title: Option<String>,
        language: String,
        code: String,
    },
    FlipCard(FlipCard),
    /// Blockquote; children are paragraphs only.
    Blockquote(Vec<Node>),
}

/// A one-level grouping of consecutive chapter content, started by a level-2
/// heading (which is the group's first node) or untitled when content
/// precedes the first level-2 heading. Sections never nest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Section {
    pub nodes: Vec<Node>,
}

impl Node {
    /// True for a heading node at the given level.
    #[must_use]
    pub fn is_heading(&self, at_level: u8) -> bool {
        matches!(self, Self::Heading { level, .. } if *level == at_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_heading() {
        let h2 = Node::Heading {
            level: 2,
            inlines: vec![Inline::Text("Intro".to_owned())],
        };
        assert!(h2.is_heading(2));
        assert!(!h2.is_heading(1));
        assert!(!Node::Paragraph(Vec::new()).is_heading(2));
    }
}
