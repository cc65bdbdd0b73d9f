//! Structural blocks produced by the layout reassembler.

use serde::{Deserialize, Serialize};

/// One structural unit of the reassembled document.
///
/// Blocks are produced in strict document order and never reordered. Text
/// merging (hyphen continuation, indent joins) happens before a block is
/// created; renderers emit blocks one-to-one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// Assembled body text, possibly merged from several source lines
    Paragraph {
        /// Paragraph text, including any leading indent spaces
        text: String,
    },

    /// All-caps display line promoted to a heading
    Heading {
        /// Heading text
        text: String,
    },

    /// A footnote line, marked by a leading `*` in the source
    Footnote {
        /// Footnote text including the marker
        text: String,
    },

    /// Side-note text assembled from the definition column window
    Definition {
        /// Definition text, merged across its column lines
        text: String,
    },

    /// An empty paragraph representing inferred vertical whitespace
    Spacer,

    /// A horizontal separator emitted before a footnote
    Divider,

    /// Separator between source pages' contributions
    PageBreak,
}

impl Block {
    /// The block's text content, if it carries any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph { text }
            | Block::Heading { text }
            | Block::Footnote { text }
            | Block::Definition { text } => Some(text),
            Block::Spacer | Block::Divider | Block::PageBreak => None,
        }
    }

    /// Check if this block is a paragraph.
    pub fn is_paragraph(&self) -> bool {
        matches!(self, Block::Paragraph { .. })
    }

    /// Check if this block marks a page boundary.
    pub fn is_page_break(&self) -> bool {
        matches!(self, Block::PageBreak)
    }
}
