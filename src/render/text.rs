//! Plain text rendering.

use crate::model::Document;

/// Render a document as plain text, one block per line.
///
/// Useful for previews and tests; spacers and page breaks become blank
/// lines, dividers a short rule.
pub fn to_text(doc: &Document) -> String {
    doc.plain_text().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Block;

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        doc.push(Block::Heading {
            text: "HEADING TEXT".to_string(),
        });
        doc.push(Block::PageBreak);
        doc.push(Block::Paragraph {
            text: "Body.".to_string(),
        });

        let text = to_text(&doc);
        assert!(text.starts_with("HEADING TEXT"));
        assert!(text.ends_with("Body."));
    }
}
