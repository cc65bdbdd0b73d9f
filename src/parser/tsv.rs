//! TSV interchange for line and word records.
//!
//! Two shapes are accepted: the line-record format this crate writes
//! (`page	line_no	text	bbox`, bbox as a bracketed 4-number list) and the
//! word-level TSV a standard OCR engine exports (one row per word with
//! `block_num`/`par_num`/`line_num`/`left`/`top`/`width`/`height`/`text`
//! columns). A malformed row is dropped and reported; it never aborts the
//! page.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{BBox, Line};

use super::words::WordRecord;

/// Result of a lenient TSV read: parsed records plus descriptions of
/// dropped rows.
#[derive(Debug)]
pub struct TsvRead<T> {
    /// Successfully parsed records, in file order
    pub records: Vec<T>,
    /// One human-readable description per dropped row
    pub dropped: Vec<String>,
}

/// Which record shape a TSV file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsvKind {
    /// Line records: `page	line_no	text	bbox`
    Lines,
    /// Word-box export rows
    Words,
}

impl TsvKind {
    /// Sniff the record shape from a header row.
    pub fn detect(header: &str) -> Option<TsvKind> {
        let cols: Vec<&str> = header.trim_end().split('\t').collect();
        if cols.contains(&"bbox") && cols.contains(&"line_no") {
            Some(TsvKind::Lines)
        } else if cols.contains(&"word_num") || cols.contains(&"block_num") {
            Some(TsvKind::Words)
        } else {
            None
        }
    }

    /// Sniff a file's record shape from its first row.
    pub fn detect_file(path: &Path) -> Result<TsvKind> {
        let content = read_to_string(path)?;
        let header = content.lines().next().unwrap_or("");
        TsvKind::detect(header)
            .ok_or_else(|| Error::MalformedRecord(format!("unrecognized TSV header: {header:?}")))
    }
}

fn bbox_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^\[\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*\]$",
        )
        .expect("bbox pattern is valid")
    })
}

/// Parse a bracketed 4-number bbox literal, e.g. `[550, 120, 3930, 180]`.
pub(crate) fn parse_bbox(raw: &str) -> Option<BBox> {
    let caps = bbox_pattern().captures(raw.trim())?;
    let mut nums = [0i32; 4];
    for (slot, cap) in nums.iter_mut().zip(caps.iter().skip(1)) {
        *slot = cap?.as_str().parse::<f32>().ok()? as i32;
    }
    Some(BBox::new(nums[0], nums[1], nums[2], nums[3]))
}

fn read_to_string(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(Error::InputNotFound(path.to_path_buf()));
    }
    Ok(fs::read_to_string(path)?)
}

/// Read a line-record TSV file.
///
/// Rows missing a field or carrying an unparseable bbox are dropped with a
/// warning. Empty or whitespace-only text rows are discarded as well — they
/// never reach classification.
pub fn read_lines_tsv(path: &Path) -> Result<TsvRead<Line>> {
    let content = read_to_string(path)?;
    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for (idx, row) in content.lines().enumerate().skip(1) {
        if row.trim().is_empty() {
            continue;
        }
        match parse_line_row(row) {
            Ok(Some(line)) => records.push(line),
            Ok(None) => {}
            Err(reason) => {
                log::warn!("{}: row {}: {}", path.display(), idx + 1, reason);
                dropped.push(format!("row {}: {}", idx + 1, reason));
            }
        }
    }

    Ok(TsvRead { records, dropped })
}

fn parse_line_row(row: &str) -> std::result::Result<Option<Line>, String> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() < 4 {
        return Err(format!("expected 4 fields, got {}", fields.len()));
    }
    let page: u32 = fields[0]
        .trim()
        .parse()
        .map_err(|_| format!("bad page number {:?}", fields[0]))?;
    let line_no: u32 = fields[1]
        .trim()
        .parse()
        .map_err(|_| format!("bad line_no {:?}", fields[1]))?;
    let text = fields[2].trim();
    if text.is_empty() {
        return Ok(None);
    }
    let bbox =
        parse_bbox(fields[3]).ok_or_else(|| format!("unparseable bbox {:?}", fields[3]))?;
    Ok(Some(Line::new(page, line_no, text, bbox)))
}

/// Read a word-box TSV export.
///
/// Rows whose `level` column (when present) is not the word level are
/// structural rows and silently skipped; rows with missing numeric fields
/// are dropped with a warning.
pub fn read_word_tsv(path: &Path) -> Result<TsvRead<WordRecord>> {
    let content = read_to_string(path)?;
    let mut rows = content.lines();
    let header = rows.next().unwrap_or("");
    let cols: Vec<&str> = header.trim_end().split('\t').collect();

    let col = |name: &str| cols.iter().position(|c| *c == name);
    let idx_text = col("text").ok_or_else(|| {
        Error::MalformedRecord(format!("{}: word TSV lacks a text column", path.display()))
    })?;
    let geometry = ["left", "top", "width", "height"].map(col);
    let grouping = ["block_num", "par_num", "line_num"].map(col);
    let idx_level = col("level");

    let mut records = Vec::new();
    let mut dropped = Vec::new();

    for (idx, row) in rows.enumerate() {
        if row.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = row.split('\t').collect();

        // Non-word structural rows in an engine export carry level < 5.
        if let Some(level_idx) = idx_level {
            if fields.get(level_idx).and_then(|v| v.trim().parse::<u32>().ok()) != Some(5) {
                continue;
            }
        }

        match parse_word_row(&fields, idx_text, &geometry, &grouping) {
            Ok(word) => records.push(word),
            Err(reason) => {
                log::warn!("{}: row {}: {}", path.display(), idx + 2, reason);
                dropped.push(format!("row {}: {}", idx + 2, reason));
            }
        }
    }

    Ok(TsvRead { records, dropped })
}

fn parse_word_row(
    fields: &[&str],
    idx_text: usize,
    geometry: &[Option<usize>; 4],
    grouping: &[Option<usize>; 3],
) -> std::result::Result<WordRecord, String> {
    let int_at = |slot: Option<usize>, name: &str| -> std::result::Result<i32, String> {
        let idx = slot.ok_or_else(|| format!("missing column {name}"))?;
        fields
            .get(idx)
            .and_then(|v| v.trim().parse::<i32>().ok())
            .ok_or_else(|| format!("bad {name} value"))
    };

    let text = fields
        .get(idx_text)
        .map(|t| t.to_string())
        .ok_or_else(|| "missing text field".to_string())?;

    Ok(WordRecord {
        text,
        left: int_at(geometry[0], "left")?,
        top: int_at(geometry[1], "top")?,
        width: int_at(geometry[2], "width")?,
        height: int_at(geometry[3], "height")?,
        block_num: int_at(grouping[0], "block_num")? as u32,
        par_num: int_at(grouping[1], "par_num")? as u32,
        line_num: int_at(grouping[2], "line_num")? as u32,
    })
}

/// Write line records as a TSV file with the interchange header.
///
/// Lines with empty text are filtered out, matching the reader's contract.
pub fn write_lines_tsv(path: &Path, lines: &[Line]) -> Result<()> {
    let mut out = fs::File::create(path)?;
    writeln!(out, "page\tline_no\ttext\tbbox")?;
    for line in lines {
        if line.text.trim().is_empty() {
            continue;
        }
        writeln!(
            out,
            "{}\t{}\t{}\t[{}, {}, {}, {}]",
            line.page, line.line_no, line.text, line.bbox.x1, line.bbox.y1, line.bbox.x2, line.bbox.y2
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        assert_eq!(
            parse_bbox("[550, 120, 3930, 180]"),
            Some(BBox::new(550, 120, 3930, 180))
        );
        assert_eq!(
            parse_bbox(" [1.0, 2.5, 3.0, 4.0] "),
            Some(BBox::new(1, 2, 3, 4))
        );
        assert_eq!(parse_bbox("[1, 2, 3]"), None);
        assert_eq!(parse_bbox("550 120 3930 180"), None);
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(
            TsvKind::detect("page\tline_no\ttext\tbbox"),
            Some(TsvKind::Lines)
        );
        assert_eq!(
            TsvKind::detect(
                "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext"
            ),
            Some(TsvKind::Words)
        );
        assert_eq!(TsvKind::detect("a\tb\tc"), None);
    }

    #[test]
    fn test_line_row_parsing() {
        let line = parse_line_row("2\t5\tSome text\t[10, 20, 30, 40]")
            .unwrap()
            .unwrap();
        assert_eq!(line.page, 2);
        assert_eq!(line.line_no, 5);
        assert_eq!(line.text, "Some text");
        assert_eq!(line.bbox, BBox::new(10, 20, 30, 40));
    }

    #[test]
    fn test_blank_text_row_discarded() {
        assert_eq!(parse_line_row("2\t5\t   \t[10, 20, 30, 40]").unwrap(), None);
    }

    #[test]
    fn test_malformed_rows_reported() {
        assert!(parse_line_row("2\t5\ttext").is_err());
        assert!(parse_line_row("x\t5\ttext\t[1,2,3,4]").is_err());
        assert!(parse_line_row("2\t5\ttext\t[1,2,3]").is_err());
    }

    #[test]
    fn test_roundtrip_via_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_0001.tsv");
        let lines = vec![
            Line::new(1, 0, "First line", BBox::new(150, 100, 3000, 160)),
            Line::new(1, 1, "second-", BBox::new(0, 170, 2900, 230)),
        ];
        write_lines_tsv(&path, &lines).unwrap();

        let read = read_lines_tsv(&path).unwrap();
        assert!(read.dropped.is_empty());
        assert_eq!(read.records, lines);
    }

    #[test]
    fn test_missing_file_is_input_not_found() {
        let err = read_lines_tsv(Path::new("/nonexistent/page.tsv")).unwrap_err();
        assert!(matches!(err, Error::InputNotFound(_)));
    }
}
