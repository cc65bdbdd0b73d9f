//! ODT container writer.
//!
//! An ODT file is a ZIP archive whose first entry is an uncompressed
//! `mimetype`, followed by `META-INF/manifest.xml`, `styles.xml`,
//! `content.xml`, and `meta.xml`. The emitter walks the block sequence in
//! order, maps each block to its named paragraph style, and realizes page
//! breaks as an empty paragraph whose style carries a before-page break.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::OdtConfig;
use crate::error::Result;
use crate::model::{Block, Document};

use super::styles::{StyleKind, StyleTable};

const ODT_MIMETYPE: &str = "application/vnd.oasis.opendocument.text";

const XMLNS_OFFICE: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const XMLNS_TEXT: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
const XMLNS_STYLE: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";
const XMLNS_FO: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";
const XMLNS_META: &str = "urn:oasis:names:tc:opendocument:xmlns:meta:1.0";
const XMLNS_MANIFEST: &str = "urn:oasis:names:tc:opendocument:xmlns:manifest:1.0";

/// Renders a [`Document`] into ODT bytes.
#[derive(Debug, Clone)]
pub struct OdtRenderer {
    config: OdtConfig,
    styles: StyleTable,
}

impl OdtRenderer {
    /// Create a renderer with the standard style table.
    pub fn new(config: OdtConfig) -> Self {
        Self {
            config,
            styles: StyleTable::standard(),
        }
    }

    /// Replace the style table.
    pub fn with_styles(mut self, styles: StyleTable) -> Self {
        self.styles = styles;
        self
    }

    /// Render the document to ODT bytes.
    ///
    /// The style table is validated against the document before any
    /// element is emitted; an empty document produces an empty but valid
    /// file.
    pub fn render(&self, doc: &Document) -> Result<Vec<u8>> {
        self.styles.validate_for(doc)?;

        let content = self.content_xml(doc)?;
        let styles = self.styles_xml()?;
        let meta = meta_xml(doc)?;
        let manifest = manifest_xml()?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        zip.start_file("mimetype", stored)?;
        zip.write_all(ODT_MIMETYPE.as_bytes())?;

        let deflated = SimpleFileOptions::default();
        for (name, data) in [
            ("META-INF/manifest.xml", manifest),
            ("styles.xml", styles),
            ("content.xml", content),
            ("meta.xml", meta),
        ] {
            zip.start_file(name, deflated)?;
            zip.write_all(&data)?;
        }

        Ok(zip.finish()?.into_inner())
    }

    /// Render and write atomically: the bytes land in a temporary sibling
    /// file that is renamed over the target only on success, so a failed
    /// run never leaves a partial output file.
    pub fn write_file(&self, doc: &Document, path: &Path) -> Result<()> {
        let bytes = self.render(doc)?;
        let tmp = path.with_extension("odt.part");
        fs::write(&tmp, &bytes)?;
        if let Err(e) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn content_xml(&self, doc: &Document) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("office:document-content");
        root.push_attribute(("xmlns:office", XMLNS_OFFICE));
        root.push_attribute(("xmlns:text", XMLNS_TEXT));
        root.push_attribute(("office:version", "1.2"));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("office:body")))?;
        writer.write_event(Event::Start(BytesStart::new("office:text")))?;

        let mut pending_break = false;
        for block in &doc.blocks {
            if matches!(block, Block::PageBreak) {
                pending_break = true;
                continue;
            }
            let kind = match StyleKind::for_block(block) {
                Some(kind) => kind,
                None => continue,
            };
            if pending_break {
                let break_style = self.styles.name_for(StyleKind::PageBreak)?;
                write_paragraph(&mut writer, break_style, None)?;
                pending_break = false;
            }
            let style = self.styles.name_for(kind)?;
            write_paragraph(&mut writer, style, block.text())?;
        }

        writer.write_event(Event::End(BytesEnd::new("office:text")))?;
        writer.write_event(Event::End(BytesEnd::new("office:body")))?;
        writer.write_event(Event::End(BytesEnd::new("office:document-content")))?;
        Ok(writer.into_inner().into_inner())
    }

    fn styles_xml(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("office:document-styles");
        root.push_attribute(("xmlns:office", XMLNS_OFFICE));
        root.push_attribute(("xmlns:style", XMLNS_STYLE));
        root.push_attribute(("xmlns:fo", XMLNS_FO));
        root.push_attribute(("office:version", "1.2"));
        writer.write_event(Event::Start(root))?;
        writer.write_event(Event::Start(BytesStart::new("office:styles")))?;

        let body_size = format!("{}pt", self.config.font_size_pt);
        let heading_size = format!("{}pt", self.config.font_size_pt + 4.0);
        let note_size = format!("{}pt", (self.config.font_size_pt - 2.0).max(6.0));

        for (kind, name) in self.styles.iter() {
            let mut text_props: Vec<(&str, &str)> =
                vec![("style:font-name", self.config.font_name.as_str())];
            let mut par_props: Vec<(&str, &str)> = Vec::new();

            match kind {
                StyleKind::Body => {
                    text_props.push(("fo:font-size", body_size.as_str()));
                    par_props.push(("fo:text-align", self.config.text_align.as_str()));
                    par_props.push(("fo:margin-left", self.config.margin_left.as_str()));
                }
                StyleKind::Heading => {
                    text_props.push(("fo:font-size", heading_size.as_str()));
                    text_props.push(("fo:font-weight", "bold"));
                    par_props.push(("fo:text-align", "center"));
                    par_props.push(("fo:margin-bottom", "0.3cm"));
                }
                StyleKind::Footnote => {
                    text_props.push(("fo:font-size", note_size.as_str()));
                    par_props.push(("fo:text-align", "left"));
                    par_props.push(("fo:margin-left", self.config.margin_left.as_str()));
                }
                StyleKind::Definition => {
                    text_props.push(("fo:font-size", body_size.as_str()));
                    text_props.push(("fo:font-style", "italic"));
                    par_props.push(("fo:margin-left", "1.5cm"));
                }
                StyleKind::Divider => {
                    text_props.push(("fo:font-size", note_size.as_str()));
                    par_props.push(("fo:text-align", "center"));
                    par_props.push(("fo:border-bottom", "0.5pt solid #000000"));
                }
                StyleKind::PageBreak => {
                    text_props.push(("fo:font-size", body_size.as_str()));
                    par_props.push(("fo:break-before", "page"));
                }
            }

            let mut style = BytesStart::new("style:style");
            style.push_attribute(("style:name", name));
            style.push_attribute(("style:family", "paragraph"));
            writer.write_event(Event::Start(style))?;

            let mut text_el = BytesStart::new("style:text-properties");
            for (k, v) in text_props {
                text_el.push_attribute((k, v));
            }
            writer.write_event(Event::Empty(text_el))?;

            let mut par_el = BytesStart::new("style:paragraph-properties");
            for (k, v) in par_props {
                par_el.push_attribute((k, v));
            }
            writer.write_event(Event::Empty(par_el))?;

            writer.write_event(Event::End(BytesEnd::new("style:style")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("office:styles")))?;
        writer.write_event(Event::End(BytesEnd::new("office:document-styles")))?;
        Ok(writer.into_inner().into_inner())
    }
}

fn write_paragraph(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    style: &str,
    text: Option<&str>,
) -> Result<()> {
    let mut el = BytesStart::new("text:p");
    el.push_attribute(("text:style-name", style));
    match text {
        Some(t) if !t.is_empty() => {
            writer.write_event(Event::Start(el))?;
            writer.write_event(Event::Text(BytesText::new(t)))?;
            writer.write_event(Event::End(BytesEnd::new("text:p")))?;
        }
        _ => writer.write_event(Event::Empty(el))?,
    }
    Ok(())
}

fn meta_xml(doc: &Document) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("office:document-meta");
    root.push_attribute(("xmlns:office", XMLNS_OFFICE));
    root.push_attribute(("xmlns:meta", XMLNS_META));
    root.push_attribute(("office:version", "1.2"));
    writer.write_event(Event::Start(root))?;
    writer.write_event(Event::Start(BytesStart::new("office:meta")))?;

    if let Some(generator) = &doc.metadata.generator {
        write_text_element(&mut writer, "meta:generator", generator)?;
    }
    if let Some(title) = &doc.metadata.title {
        write_text_element(&mut writer, "meta:user-defined", title)?;
    }
    if let Some(created) = &doc.metadata.created {
        write_text_element(&mut writer, "meta:creation-date", &created.to_rfc3339())?;
    }

    writer.write_event(Event::End(BytesEnd::new("office:meta")))?;
    writer.write_event(Event::End(BytesEnd::new("office:document-meta")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn manifest_xml() -> Result<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("manifest:manifest");
    root.push_attribute(("xmlns:manifest", XMLNS_MANIFEST));
    root.push_attribute(("manifest:version", "1.2"));
    writer.write_event(Event::Start(root))?;

    let entries = [
        ("/", ODT_MIMETYPE),
        ("content.xml", "text/xml"),
        ("styles.xml", "text/xml"),
        ("meta.xml", "text/xml"),
    ];
    for (path, media_type) in entries {
        let mut entry = BytesStart::new("manifest:file-entry");
        entry.push_attribute(("manifest:full-path", path));
        entry.push_attribute(("manifest:media-type", media_type));
        writer.write_event(Event::Empty(entry))?;
    }

    writer.write_event(Event::End(BytesEnd::new("manifest:manifest")))?;
    Ok(writer.into_inner().into_inner())
}

/// Render a document to ODT bytes with the standard style table.
pub fn render_odt(doc: &Document, config: &OdtConfig) -> Result<Vec<u8>> {
    OdtRenderer::new(config.clone()).render(doc)
}

/// Render and atomically write a document to an `.odt` file.
pub fn write_odt_file(doc: &Document, path: &Path, config: &OdtConfig) -> Result<()> {
    OdtRenderer::new(config.clone()).write_file(doc, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Read;

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        doc.push(Block::Heading {
            text: "CHAPTER ONE".to_string(),
        });
        doc.push(Block::Paragraph {
            text: "    Body text.".to_string(),
        });
        doc.push(Block::PageBreak);
        doc.push(Block::Divider);
        doc.push(Block::Footnote {
            text: "* note".to_string(),
        });
        doc
    }

    fn unzip_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut out = String::new();
        file.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn test_container_layout() {
        let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.clone())).unwrap();
        // mimetype must be the first entry.
        assert_eq!(archive.by_index(0).unwrap().name(), "mimetype");
        assert_eq!(unzip_entry(&bytes, "mimetype"), ODT_MIMETYPE);
        for name in ["META-INF/manifest.xml", "styles.xml", "content.xml", "meta.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_content_styles_and_break() {
        let bytes = render_odt(&sample_doc(), &OdtConfig::default()).unwrap();
        let content = unzip_entry(&bytes, "content.xml");
        assert!(content.contains(r#"text:style-name="Heading""#));
        assert!(content.contains(r#"text:style-name="TextBody""#));
        assert!(content.contains(r#"text:style-name="Footnote""#));
        // The page break materializes as an empty break paragraph before
        // the next block.
        let break_pos = content.find("PageBreakParagraph").unwrap();
        let divider_pos = content.find(r#"text:style-name="Divider""#).unwrap();
        assert!(break_pos < divider_pos);
    }

    #[test]
    fn test_styles_carry_config() {
        let mut config = OdtConfig::default();
        config.font_name = "Liberation Serif".to_string();
        config.text_align = "left".to_string();
        let bytes = render_odt(&sample_doc(), &config).unwrap();
        let styles = unzip_entry(&bytes, "styles.xml");
        assert!(styles.contains("Liberation Serif"));
        assert!(styles.contains(r#"fo:text-align="left""#));
        assert!(styles.contains(r#"fo:break-before="page""#));
    }

    #[test]
    fn test_empty_document_is_valid() {
        let bytes = render_odt(&Document::new(), &OdtConfig::default()).unwrap();
        let content = unzip_entry(&bytes, "content.xml");
        assert!(content.contains("office:text"));
    }

    #[test]
    fn test_missing_style_is_fatal_before_emission() {
        let renderer = OdtRenderer::new(OdtConfig::default())
            .with_styles(StyleTable::standard().without(StyleKind::Heading));
        let err = renderer.render(&sample_doc()).unwrap_err();
        assert!(matches!(err, Error::MissingStyle(_)));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::new();
        doc.push(Block::Paragraph {
            text: "a < b & c".to_string(),
        });
        let bytes = render_odt(&doc, &OdtConfig::default()).unwrap();
        let content = unzip_entry(&bytes, "content.xml");
        assert!(content.contains("a &lt; b &amp; c"));
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.odt");
        write_odt_file(&sample_doc(), &path, &OdtConfig::default()).unwrap();
        assert!(path.is_file());
        assert!(!dir.path().join("book.odt.part").exists());
    }
}
