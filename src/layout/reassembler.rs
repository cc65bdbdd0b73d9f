//! The layout reassembler: a single-pass state machine that turns ordered
//! OCR lines into structural blocks.
//!
//! Per page the machine carries at most one open block — a paragraph being
//! merged or a definition side-block being absorbed — expressed as a tagged
//! state so the two can never be open at once. Decisions are purely
//! geometric (pixel windows, vertical gaps, mean line height) plus two text
//! cues: the trailing continuation hyphen and the `*` footnote marker.
//!
//! Priority per line: definition column, then footnote marker, then
//! paragraph continuation / indent / fallback.

use crate::config::LayoutConfig;
use crate::model::{BBox, Block, Line};

use super::geometry::{
    definition_gap_limit, in_definition_window, in_indent_range, mean_line_height, vertical_gap,
};

/// Streaming reassembler. Feed pages in order with [`Reassembler::push_page`],
/// then take the blocks with [`Reassembler::finish`].
#[derive(Debug)]
pub struct Reassembler {
    config: LayoutConfig,
    blocks: Vec<Block>,
    state: BuildState,
    pages_seen: u32,
}

/// The open-block state. Paragraph and Definition are mutually exclusive
/// by construction.
#[derive(Debug)]
enum BuildState {
    Idle,
    Paragraph(ParagraphBuf),
    Definition(String),
}

#[derive(Debug)]
struct ParagraphBuf {
    kind: ParagraphKind,
    text: String,
}

/// Style of a paragraph block, frozen when the block opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParagraphKind {
    Body,
    Heading,
    Footnote,
}

impl Reassembler {
    /// Create a reassembler with the given thresholds.
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            blocks: Vec::new(),
            state: BuildState::Idle,
            pages_seen: 0,
        }
    }

    /// Consume one page's lines, in increasing `line_no` order.
    ///
    /// Empty-text lines are skipped up front. A `PageBreak` block separates
    /// this page's contribution from the previous page's, except before the
    /// first page and, in cross-page mode, while a paragraph is still open
    /// across the boundary.
    pub fn push_page(&mut self, lines: &[Line]) {
        let lines: Vec<&Line> = lines
            .iter()
            .filter(|l| !l.text.trim().is_empty())
            .collect();

        self.begin_page();
        log::debug!(
            "page {}: reassembling {} lines",
            self.pages_seen,
            lines.len()
        );

        let avg_height = mean_line_height(&lines);
        let mut prev: Option<BBox> = None;
        let mut it = lines.iter().copied().peekable();

        while let Some(line) = it.next() {
            let in_window = in_definition_window(&self.config, &line.bbox, 0);
            if matches!(self.state, BuildState::Definition(_)) || in_window {
                // Opening fresh: close the paragraph flow and decide on a
                // leading spacer from the gap to the previous line. The
                // first line of a page has no previous edge to measure.
                if !matches!(self.state, BuildState::Definition(_)) {
                    self.flush_open();
                    if let Some(prev_bbox) = prev {
                        let gap = vertical_gap(&prev_bbox, &line.bbox) as f32;
                        if gap > definition_gap_limit(&self.config, avg_height) {
                            self.blocks.push(Block::Spacer);
                        }
                    }
                    self.state = BuildState::Definition(String::new());
                }
                if let BuildState::Definition(buf) = &mut self.state {
                    join_fragment(buf, &line.text);
                }

                // One line of lookahead decides whether the column block
                // continues; the peeked box is widened on every boundary.
                let continues = it.peek().is_some_and(|next| {
                    in_definition_window(
                        &self.config,
                        &next.bbox,
                        self.config.definition_lookahead_px,
                    )
                });
                if !continues {
                    self.flush_open();
                    if let Some(next) = it.peek() {
                        let gap = vertical_gap(&line.bbox, &next.bbox) as f32;
                        let wide_gap = gap > definition_gap_limit(&self.config, avg_height);
                        let indented = in_indent_range(&self.config, next.bbox.x1);
                        if wide_gap || indented {
                            self.blocks.push(Block::Spacer);
                        }
                    }
                }
                prev = Some(line.bbox);
                continue;
            }

            // A footnote marker closes the paragraph flow outright: the
            // line never merges into an open paragraph and carries no
            // continuation state past itself.
            if line.text.starts_with('*') {
                self.flush_open();
                self.blocks.push(Block::Divider);
                self.blocks.push(Block::Footnote {
                    text: line.text.clone(),
                });
                prev = Some(line.bbox);
                continue;
            }

            // Visual continuation of the open paragraph.
            if let BuildState::Paragraph(par) = &mut self.state {
                if line.bbox.x1 < self.config.paragraph_continue_max {
                    join_fragment(&mut par.text, &line.text);
                    prev = Some(line.bbox);
                    continue;
                }
            }

            // Indented left edge opens a new paragraph.
            if in_indent_range(&self.config, line.bbox.x1) {
                self.flush_open();
                self.push_blank_lines(prev, &line.bbox, avg_height);
                let mut text = " ".repeat(self.config.paragraph_indent_spaces);
                text.push_str(&line.text);
                self.state = BuildState::Paragraph(ParagraphBuf {
                    kind: paragraph_kind_for(&line.text),
                    text,
                });
                prev = Some(line.bbox);
                continue;
            }

            // Catch-all for noisy geometry: keep joining while the buffer
            // ends in a continuation hyphen, otherwise start a fresh block
            // with the text verbatim.
            match &mut self.state {
                BuildState::Paragraph(par) if ends_with_continuation_hyphen(&par.text) => {
                    join_fragment(&mut par.text, &line.text);
                }
                _ => {
                    self.flush_open();
                    self.push_blank_lines(prev, &line.bbox, avg_height);
                    self.state = BuildState::Paragraph(ParagraphBuf {
                        kind: paragraph_kind_for(&line.text),
                        text: line.text.clone(),
                    });
                }
            }
            prev = Some(line.bbox);
        }

        self.end_page();
    }

    /// Flush any open block and return the assembled sequence.
    pub fn finish(mut self) -> Vec<Block> {
        self.flush_open();
        self.blocks
    }

    fn begin_page(&mut self) {
        if self.pages_seen > 0 && matches!(self.state, BuildState::Idle) {
            self.blocks.push(Block::PageBreak);
        }
        self.pages_seen += 1;
    }

    fn end_page(&mut self) {
        // Definitions never cross a page boundary; paragraphs only do in
        // cross-page mode.
        if matches!(self.state, BuildState::Definition(_)) || !self.config.cross_page_continuation
        {
            self.flush_open();
        }
    }

    /// Emit the open block, if any, and return to idle.
    fn flush_open(&mut self) {
        match std::mem::replace(&mut self.state, BuildState::Idle) {
            BuildState::Idle => {}
            BuildState::Paragraph(par) => {
                let block = match par.kind {
                    ParagraphKind::Heading => Block::Heading { text: par.text },
                    ParagraphKind::Footnote => Block::Footnote { text: par.text },
                    ParagraphKind::Body => Block::Paragraph { text: par.text },
                };
                self.blocks.push(block);
            }
            BuildState::Definition(text) => {
                self.blocks.push(Block::Definition { text });
            }
        }
    }

    /// Blank-line policy: large vertical gaps at a paragraph open emit up
    /// to `max_empty_lines` spacers.
    fn push_blank_lines(&mut self, prev: Option<BBox>, bbox: &BBox, avg_height: f32) {
        if !self.config.insert_empty_lines || avg_height <= 0.0 {
            return;
        }
        let Some(prev) = prev else {
            return;
        };
        let gap = vertical_gap(&prev, bbox) as f32;
        if gap <= self.config.gap_empty_threshold * avg_height {
            return;
        }
        let extra = ((gap / avg_height) - 1.0).round() as i64;
        let count = extra.clamp(1, self.config.max_empty_lines as i64);
        for _ in 0..count {
            self.blocks.push(Block::Spacer);
        }
    }
}

/// Reassemble a sequence of pages with a fresh machine.
pub fn reassemble_pages(config: &LayoutConfig, pages: &[Vec<Line>]) -> Vec<Block> {
    let mut reassembler = Reassembler::new(config.clone());
    for page in pages {
        reassembler.push_page(page);
    }
    reassembler.finish()
}

/// Merge a fragment into the buffer: a single trailing `-` is stripped and
/// the texts concatenate directly; anything else joins with one space.
fn join_fragment(buf: &mut String, text: &str) {
    if buf.is_empty() {
        buf.push_str(text);
        return;
    }
    if ends_with_continuation_hyphen(buf) {
        buf.pop();
    } else {
        buf.push(' ');
    }
    buf.push_str(text);
}

fn ends_with_continuation_hyphen(s: &str) -> bool {
    s.ends_with('-') && !s.ends_with("--")
}

/// Style for a freshly opened paragraph block, decided once from its first
/// line of text.
fn paragraph_kind_for(text: &str) -> ParagraphKind {
    if text.starts_with('*') {
        ParagraphKind::Footnote
    } else if is_heading_text(text) {
        ParagraphKind::Heading
    } else {
        ParagraphKind::Body
    }
}

/// All-uppercase and longer than ten characters.
fn is_heading_text(text: &str) -> bool {
    let mut has_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if c.is_lowercase() {
                return false;
            }
            has_alpha = true;
        }
    }
    has_alpha && text.chars().count() > 10
}
