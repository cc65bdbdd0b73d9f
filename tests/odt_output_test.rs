//! Container-level tests for the ODT output.

use std::io::{Cursor, Read};

use rescribe::render::{render_odt, write_odt_file};
use rescribe::{Block, Document, OdtConfig};

fn sample_doc() -> Document {
    let mut doc = Document::new();
    doc.metadata.generator = Some("rescribe test".to_string());
    doc.push(Block::Heading {
        text: "BOOK OF TESTS".to_string(),
    });
    doc.push(Block::Paragraph {
        text: "    First paragraph of the body.".to_string(),
    });
    doc.push(Block::Spacer);
    doc.push(Block::Definition {
        text: "a side note".to_string(),
    });
    doc.push(Block::PageBreak);
    doc.push(Block::Paragraph {
        text: "Second page text.".to_string(),
    });
    doc
}

fn entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
    let mut file = archive.by_name(name).unwrap();
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

#[test]
fn mimetype_is_first_and_uncompressed() {
    let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);
}

#[test]
fn every_block_kind_uses_its_style() {
    let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
    let content = entry(&bytes, "content.xml");

    assert!(content.contains(r#"<text:p text:style-name="Heading">BOOK OF TESTS</text:p>"#));
    assert!(content.contains(r#"text:style-name="Definition""#));
    // The spacer is an empty body paragraph.
    assert!(content.contains(r#"<text:p text:style-name="TextBody"/>"#));
    // The page break paragraph precedes the second page's text.
    let break_pos = content.find("PageBreakParagraph").unwrap();
    let second_pos = content.find("Second page text.").unwrap();
    assert!(break_pos < second_pos);
}

#[test]
fn style_definitions_match_the_table() {
    let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
    let styles = entry(&bytes, "styles.xml");
    for name in [
        "TextBody",
        "Heading",
        "Footnote",
        "Definition",
        "Divider",
        "PageBreakParagraph",
    ] {
        assert!(
            styles.contains(&format!(r#"style:name="{name}""#)),
            "style {name} missing"
        );
    }
}

#[test]
fn metadata_lands_in_meta_xml() {
    let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
    let meta = entry(&bytes, "meta.xml");
    assert!(meta.contains("rescribe test"));
}

#[test]
fn written_file_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.odt");
    write_odt_file(&sample_doc(), &path, &OdtConfig::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let content = entry(&bytes, "content.xml");
    assert!(content.contains("BOOK OF TESTS"));
    // No temporary sibling remains after the rename.
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path() != path)
        .collect();
    assert!(leftovers.is_empty());
}
