//! # rescribe
//!
//! Reconstructs the logical structure of scanned book pages from per-page
//! OCR output and emits a styled ODT document.
//!
//! The input is a stream of text lines with pixel bounding boxes (grouped
//! from OCR word boxes, or read back from TSV dumps). A single-pass layout
//! state machine infers paragraphs, hyphenated continuations, headings,
//! footnotes, and indented definition side-blocks from geometry alone, and
//! a renderer maps the resulting block sequence onto named paragraph
//! styles in an ODT container.
//!
//! ## Quick Start
//!
//! ```no_run
//! use rescribe::{assemble_tsv_files, render, AssemblyConfig};
//! use std::path::PathBuf;
//!
//! fn main() -> rescribe::Result<()> {
//!     let config = AssemblyConfig::new();
//!     let pages: Vec<PathBuf> =
//!         vec!["cache/ocr/page_0001.tsv".into(), "cache/ocr/page_0002.tsv".into()];
//!
//!     let doc = assemble_tsv_files(&pages, &config)?;
//!     render::write_odt_file(&doc, "book.odt".as_ref(), &config.odt)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Geometric layout inference**: paragraph indent and continuation
//!   windows, definition column detection, gap-driven spacers
//! - **Noise tolerance**: malformed records are dropped per record, bad
//!   pages per page; a run only fails when every page does
//! - **Deterministic output**: parallel per-page parsing joins into one
//!   page-ordered sequential reassembly pass
//! - **Styled ODT output**: fixed style table over a minimal, genuine ODT
//!   container, plus a plain-text preview renderer

pub mod classify;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod observe;
pub mod parser;
pub mod pipeline;
pub mod render;

// Re-export commonly used types
pub use classify::LineClassifier;
pub use config::{AssemblyConfig, ClassifyConfig, LayoutConfig, OdtConfig};
pub use error::{Error, Result};
pub use layout::{reassemble_pages, Reassembler};
pub use model::{BBox, Block, ClassifiedLine, Document, Line, LineClass, Metadata};
pub use observe::{AssemblyObserver, NullObserver};
pub use parser::{group_words, WordRecord};
pub use pipeline::{assemble_tsv_files, Assembler};
pub use render::{StyleKind, StyleTable};
