//! Word grouping: OCR word boxes → ordered text lines.
//!
//! The OCR engine emits one record per recognized word, tagged with the
//! engine's own `(block, paragraph, line)` identifiers. Consecutive words
//! sharing that key form one line; the engine emits words in raster order,
//! so groups close in reading order.

use unicode_normalization::UnicodeNormalization;

use crate::model::{BBox, Line};

/// One word-level OCR record, the shape of a standard word-box export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordRecord {
    /// Recognized word text
    pub text: String,
    /// Left edge in pixels
    pub left: i32,
    /// Top edge in pixels
    pub top: i32,
    /// Box width in pixels
    pub width: i32,
    /// Box height in pixels
    pub height: i32,
    /// Engine block identifier
    pub block_num: u32,
    /// Engine paragraph identifier within the block
    pub par_num: u32,
    /// Engine line identifier within the paragraph
    pub line_num: u32,
}

impl WordRecord {
    fn key(&self) -> (u32, u32, u32) {
        (self.block_num, self.par_num, self.line_num)
    }

    fn bbox(&self) -> BBox {
        BBox::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }
}

/// Group word records into ordered lines for one page.
///
/// Words with empty text after trimming, or with non-positive width or
/// height, are noise artifacts and skipped. Within a group, words are
/// sorted by left edge before joining with single spaces; the line bbox is
/// the union of the member boxes. An empty input yields an empty list —
/// a blank scanned page is valid.
pub fn group_words(page: u32, words: &[WordRecord]) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<(String, i32)> = Vec::new();
    let mut current_bbox: Option<BBox> = None;
    let mut prev_key: Option<(u32, u32, u32)> = None;
    let mut line_no = 0u32;

    let mut close_group = |current: &mut Vec<(String, i32)>,
                           bbox: &mut Option<BBox>,
                           line_no: &mut u32,
                           lines: &mut Vec<Line>| {
        if current.is_empty() {
            return;
        }
        current.sort_by_key(|&(_, x)| x);
        let text = current
            .iter()
            .map(|(w, _)| w.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let bbox = bbox.take().unwrap_or(BBox::new(0, 0, 0, 0));
        lines.push(Line::new(page, *line_no, text, bbox));
        *line_no += 1;
        current.clear();
    };

    for word in words {
        let text: String = word.text.trim().nfc().collect();
        if text.is_empty() {
            continue;
        }
        if word.width <= 0 || word.height <= 0 {
            log::debug!(
                "page {}: skipping degenerate word box {}x{}",
                page,
                word.width,
                word.height
            );
            continue;
        }

        let key = word.key();
        if prev_key.is_some() && prev_key != Some(key) {
            close_group(&mut current, &mut current_bbox, &mut line_no, &mut lines);
        }
        current.push((text, word.left));
        current_bbox = Some(match current_bbox {
            Some(b) => b.union(&word.bbox()),
            None => word.bbox(),
        });
        prev_key = Some(key);
    }
    close_group(&mut current, &mut current_bbox, &mut line_no, &mut lines);

    lines
}
