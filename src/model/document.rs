//! Document-level types.

use super::Block;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reassembled document: ordered structural blocks across all pages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Document metadata
    pub metadata: Metadata,

    /// Structural blocks in document order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of source pages contributing to the document.
    ///
    /// Counted as page-break separators plus one, or zero for an empty
    /// document.
    pub fn page_count(&self) -> usize {
        if self.blocks.is_empty() {
            return 0;
        }
        1 + self.blocks.iter().filter(|b| b.is_page_break()).count()
    }

    /// Check if the document has no blocks.
    ///
    /// An empty document is legal and renders to an empty but valid file.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Plain text content, one block per line, page breaks as blank lines.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                Block::PageBreak | Block::Spacer => out.push('\n'),
                Block::Divider => {
                    out.push_str("----");
                    out.push('\n');
                }
                _ => {
                    if let Some(text) = block.text() {
                        out.push_str(text);
                        out.push('\n');
                    }
                }
            }
        }
        out
    }
}

/// Document metadata.
///
/// All fields are caller-supplied; nothing here is sampled from the clock
/// or environment inside the core, so reassembly stays deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Producing application
    pub generator: Option<String>,

    /// Creation timestamp
    pub created: Option<DateTime<Utc>>,

    /// Number of source pages fed into assembly
    pub source_pages: u32,
}

impl Metadata {
    /// Create metadata with a title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_page_count() {
        let mut doc = Document::new();
        doc.push(Block::Paragraph {
            text: "a".to_string(),
        });
        doc.push(Block::PageBreak);
        doc.push(Block::Paragraph {
            text: "b".to_string(),
        });
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.block_count(), 3);
    }

    #[test]
    fn test_plain_text() {
        let mut doc = Document::new();
        doc.push(Block::Heading {
            text: "CHAPTER ONE".to_string(),
        });
        doc.push(Block::Paragraph {
            text: "    It begins.".to_string(),
        });
        let text = doc.plain_text();
        assert!(text.contains("CHAPTER ONE"));
        assert!(text.contains("It begins."));
    }
}
