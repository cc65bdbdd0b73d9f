//! Document assembly pipeline.
//!
//! Per-page work (TSV parse, word grouping, classification) is independent
//! and side-effect-free, so it may run on a thread pool; the results are
//! joined and re-sorted by page number before the sequential reassembly
//! pass, which keeps the output deterministic regardless of completion
//! order. One bad page is contained with a warning; a run only fails when
//! every page does.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use rayon::prelude::*;
use regex::Regex;

use crate::config::AssemblyConfig;
use crate::error::{Error, Result};
use crate::layout::Reassembler;
use crate::model::{Document, Line};
use crate::observe::{AssemblyObserver, NullObserver};
use crate::parser::{group_words, read_lines_tsv, read_word_tsv, TsvKind};

/// One parsed page, ready for reassembly.
#[derive(Debug)]
struct ParsedPage {
    page: u32,
    source: PathBuf,
    lines: Vec<Line>,
    dropped: Vec<String>,
}

/// Assembles documents from per-page TSV files.
#[derive(Debug, Clone)]
pub struct Assembler {
    config: AssemblyConfig,
}

impl Assembler {
    /// Create an assembler. The configuration is validated once here;
    /// an invalid configuration never starts a run.
    pub fn new(config: AssemblyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Assemble a document from TSV files (line-record or word-box shape).
    ///
    /// Files are parsed independently (in parallel when configured), then
    /// re-sorted by page number for the sequential reassembly pass. A
    /// missing or unreadable file is skipped with a warning; the run fails
    /// only if every file fails. No input files produce an empty document.
    pub fn assemble_files(
        &self,
        paths: &[PathBuf],
        observer: &mut dyn AssemblyObserver,
    ) -> Result<Document> {
        let results: Vec<std::result::Result<ParsedPage, (PathBuf, Error)>> =
            if self.config.parallel {
                paths.par_iter().map(|p| self.load_page(p)).collect()
            } else {
                paths.iter().map(|p| self.load_page(p)).collect()
            };

        let mut pages = Vec::new();
        let mut failed = 0usize;
        for result in results {
            match result {
                Ok(page) => pages.push(page),
                Err((path, error)) => {
                    log::warn!("skipping page source {}: {}", path.display(), error);
                    observer.page_failed(&path, &error);
                    failed += 1;
                }
            }
        }
        if !paths.is_empty() && failed == paths.len() {
            return Err(Error::AllPagesFailed(failed));
        }

        pages.sort_by_key(|p| p.page);
        Ok(self.reassemble(pages, observer))
    }

    /// Assemble a document from in-memory pages, sorted by page number.
    pub fn assemble_pages(
        &self,
        mut pages: Vec<(u32, Vec<Line>)>,
        observer: &mut dyn AssemblyObserver,
    ) -> Document {
        pages.sort_by_key(|(page, _)| *page);
        let pages = pages
            .into_iter()
            .map(|(page, lines)| ParsedPage {
                page,
                source: PathBuf::new(),
                lines,
                dropped: Vec::new(),
            })
            .collect();
        self.reassemble(pages, observer)
    }

    fn reassemble(&self, pages: Vec<ParsedPage>, observer: &mut dyn AssemblyObserver) -> Document {
        let mut reassembler = Reassembler::new(self.config.layout.clone());
        let mut page_count = 0u32;

        for page in &pages {
            for reason in &page.dropped {
                observer.record_dropped(page.page, reason);
            }
            if !page.source.as_os_str().is_empty() {
                log::debug!("page {} from {}", page.page, page.source.display());
            }
            // A standalone line TSV may carry several pages; each run of a
            // page number is one reassembly page. An empty source is still
            // a page transition (blank scan).
            let runs = page_runs(&page.lines);
            if runs.is_empty() {
                observer.page_started(page.page, 0);
                reassembler.push_page(&[]);
                page_count += 1;
            }
            for run in runs {
                let run_page = run.first().map_or(page.page, |l| l.page);
                observer.page_started(run_page, run.len());
                reassembler.push_page(run);
                page_count += 1;
            }
        }

        let mut doc = Document::new();
        doc.metadata.source_pages = page_count;
        for block in reassembler.finish() {
            observer.block_emitted(&block);
            doc.push(block);
        }
        doc
    }

    fn load_page(
        &self,
        path: &Path,
    ) -> std::result::Result<ParsedPage, (PathBuf, Error)> {
        self.load_page_inner(path)
            .map_err(|e| (path.to_path_buf(), e))
    }

    fn load_page_inner(&self, path: &Path) -> Result<ParsedPage> {
        let kind = TsvKind::detect_file(path)?;
        match kind {
            TsvKind::Lines => {
                let read = read_lines_tsv(path)?;
                let page = read
                    .records
                    .first()
                    .map(|l| l.page)
                    .or_else(|| natural_key(path))
                    .unwrap_or(0);
                Ok(ParsedPage {
                    page,
                    source: path.to_path_buf(),
                    lines: read.records,
                    dropped: read.dropped,
                })
            }
            TsvKind::Words => {
                let page = natural_key(path).ok_or_else(|| {
                    Error::MalformedRecord(format!(
                        "{}: word TSV without a numeric page in its name",
                        path.display()
                    ))
                })?;
                let read = read_word_tsv(path)?;
                Ok(ParsedPage {
                    page,
                    source: path.to_path_buf(),
                    lines: group_words(page, &read.records),
                    dropped: read.dropped,
                })
            }
        }
    }
}

/// Split ordered lines into runs sharing a page number.
fn page_runs(lines: &[Line]) -> Vec<&[Line]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..lines.len() {
        if lines[i].page != lines[start].page {
            runs.push(&lines[start..i]);
            start = i;
        }
    }
    if start < lines.len() {
        runs.push(&lines[start..]);
    }
    runs
}

/// Page number from the first digit run in a file name, e.g.
/// `page_0004.tsv` → 4.
pub fn natural_key(path: &Path) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let digits = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("digit pattern is valid"));
    let stem = path.file_stem()?.to_str()?;
    digits.find(stem)?.as_str().parse().ok()
}

/// Assemble a document from TSV files with defaults and no observer.
pub fn assemble_tsv_files(paths: &[PathBuf], config: &AssemblyConfig) -> Result<Document> {
    Assembler::new(config.clone())?.assemble_files(paths, &mut NullObserver)
}
