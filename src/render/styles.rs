//! The fixed style table mapping block kinds to output style names.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::model::{Block, Document};

/// Paragraph style slots the emitter can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StyleKind {
    /// Body paragraphs and spacers
    Body,
    /// Headings
    Heading,
    /// Footnotes
    Footnote,
    /// Definition side-blocks
    Definition,
    /// The separator rule before footnotes
    Divider,
    /// The empty paragraph that forces a page break
    PageBreak,
}

impl StyleKind {
    /// The slot a block renders through, if it renders at all.
    pub fn for_block(block: &Block) -> Option<StyleKind> {
        match block {
            Block::Paragraph { .. } | Block::Spacer => Some(StyleKind::Body),
            Block::Heading { .. } => Some(StyleKind::Heading),
            Block::Footnote { .. } => Some(StyleKind::Footnote),
            Block::Definition { .. } => Some(StyleKind::Definition),
            Block::Divider => Some(StyleKind::Divider),
            Block::PageBreak => Some(StyleKind::PageBreak),
        }
    }
}

/// Mapping from style slots to named paragraph styles.
///
/// The table must cover every slot a document actually uses before any
/// element is emitted; a gap is a fatal configuration error, never a
/// partial document.
#[derive(Debug, Clone)]
pub struct StyleTable {
    names: BTreeMap<StyleKind, String>,
}

impl StyleTable {
    /// The standard table with every slot defined.
    pub fn standard() -> Self {
        let mut names = BTreeMap::new();
        names.insert(StyleKind::Body, "TextBody".to_string());
        names.insert(StyleKind::Heading, "Heading".to_string());
        names.insert(StyleKind::Footnote, "Footnote".to_string());
        names.insert(StyleKind::Definition, "Definition".to_string());
        names.insert(StyleKind::Divider, "Divider".to_string());
        names.insert(StyleKind::PageBreak, "PageBreakParagraph".to_string());
        Self { names }
    }

    /// Remove a slot. Exists so validation failures can be exercised.
    pub fn without(mut self, kind: StyleKind) -> Self {
        self.names.remove(&kind);
        self
    }

    /// Resolve the style name backing a slot.
    pub fn name_for(&self, kind: StyleKind) -> Result<&str> {
        self.names
            .get(&kind)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingStyle(format!("{kind:?}")))
    }

    /// Iterate over every defined (slot, name) pair.
    pub fn iter(&self) -> impl Iterator<Item = (StyleKind, &str)> {
        self.names.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Verify the table covers every slot the document uses.
    pub fn validate_for(&self, doc: &Document) -> Result<()> {
        for block in &doc.blocks {
            if let Some(kind) = StyleKind::for_block(block) {
                self.name_for(kind)?;
            }
        }
        Ok(())
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_complete() {
        let table = StyleTable::standard();
        for kind in [
            StyleKind::Body,
            StyleKind::Heading,
            StyleKind::Footnote,
            StyleKind::Definition,
            StyleKind::Divider,
            StyleKind::PageBreak,
        ] {
            assert!(table.name_for(kind).is_ok());
        }
        assert_eq!(table.name_for(StyleKind::PageBreak).unwrap(), "PageBreakParagraph");
    }

    #[test]
    fn test_missing_slot_is_fatal() {
        let table = StyleTable::standard().without(StyleKind::Footnote);
        let mut doc = Document::new();
        doc.push(Block::Footnote {
            text: "* note".to_string(),
        });
        assert!(matches!(
            table.validate_for(&doc),
            Err(Error::MissingStyle(_))
        ));
    }

    #[test]
    fn test_unused_slot_may_be_absent() {
        let table = StyleTable::standard().without(StyleKind::Footnote);
        let mut doc = Document::new();
        doc.push(Block::Paragraph {
            text: "body".to_string(),
        });
        assert!(table.validate_for(&doc).is_ok());
    }
}
