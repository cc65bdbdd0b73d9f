//! Line classification: TITLE vs PARAGRAPH.
//!
//! Advisory labels computed from the uppercase ratio and horizontal
//! centering of each line. The layout reassembler applies its own, stricter
//! structural rules; this classification only informs styling and the
//! annotation export.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::ClassifyConfig;
use crate::error::Result;
use crate::model::{ClassifiedLine, Line, LineClass};

/// Classifier for a single scan source.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    config: ClassifyConfig,
}

impl LineClassifier {
    /// Create a classifier with the given thresholds.
    pub fn new(config: ClassifyConfig) -> Self {
        Self { config }
    }

    /// Classify every line of a page, preserving order.
    ///
    /// `image_width` is the source page's pixel width, used for the
    /// centering check.
    pub fn classify_page(&self, lines: &[Line], image_width: i32) -> Vec<ClassifiedLine> {
        lines
            .iter()
            .map(|line| self.classify_line(line, image_width))
            .collect()
    }

    /// Classify one line.
    pub fn classify_line(&self, line: &Line, image_width: i32) -> ClassifiedLine {
        let centered = self.is_centered(line, image_width);
        let cls = if caps_ratio(&line.text).map_or(false, |r| r >= self.config.caps_ratio)
            || centered
        {
            LineClass::Title
        } else {
            LineClass::Paragraph
        };
        ClassifiedLine {
            ends_with_hyphen: line.ends_with_hyphen(),
            line: line.clone(),
            cls,
            centered,
        }
    }

    fn is_centered(&self, line: &Line, image_width: i32) -> bool {
        let center = image_width as f32 / 2.0;
        (line.bbox.mid_x() - center).abs() <= self.config.center_tolerance_px as f32
    }
}

/// Uppercase share of the alphabetic characters, or `None` when the text
/// has no alphabetic characters at all (such lines are always PARAGRAPH).
fn caps_ratio(text: &str) -> Option<f32> {
    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.is_empty() {
        return None;
    }
    let caps = letters.iter().filter(|c| c.is_uppercase()).count();
    Some(caps as f32 / letters.len() as f32)
}

/// Write classification annotations as JSONL, one object per line.
pub fn write_annotations_jsonl(path: &Path, lines: &[ClassifiedLine]) -> Result<()> {
    let mut out = fs::File::create(path)?;
    for line in lines {
        let json = serde_json::to_string(line)
            .map_err(|e| crate::error::Error::Render(e.to_string()))?;
        writeln!(out, "{json}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn classifier() -> LineClassifier {
        LineClassifier::new(ClassifyConfig::default())
    }

    fn line(text: &str, bbox: BBox) -> Line {
        Line::new(1, 0, text, bbox)
    }

    #[test]
    fn test_mostly_uppercase_is_title() {
        // 7 of 10 letters uppercase: exactly at the inclusive threshold.
        let l = line("ABCDEFGxyz", BBox::new(0, 0, 100, 40));
        let c = classifier().classify_line(&l, 4000);
        assert_eq!(c.cls, LineClass::Title);
        assert!(!c.centered);
    }

    #[test]
    fn test_below_threshold_off_center_is_paragraph() {
        let l = line("abcdefghij", BBox::new(0, 0, 100, 40));
        let c = classifier().classify_line(&l, 4000);
        assert_eq!(c.cls, LineClass::Paragraph);
    }

    #[test]
    fn test_centered_lowercase_is_title() {
        // Midpoint 2000 on a 4000px page, within the 40px tolerance.
        let l = line("chapter one", BBox::new(1800, 0, 2200, 40));
        let c = classifier().classify_line(&l, 4000);
        assert!(c.centered);
        assert_eq!(c.cls, LineClass::Title);
    }

    #[test]
    fn test_centering_tolerance_boundary() {
        // Midpoint 2040 is exactly tolerance away from center 2000.
        let l = line("edge case text", BBox::new(2020, 0, 2060, 40));
        let c = classifier().classify_line(&l, 4000);
        assert!(c.centered);

        let l = line("edge case text", BBox::new(2021, 0, 2062, 40));
        let c = classifier().classify_line(&l, 4000);
        assert!(!c.centered);
    }

    #[test]
    fn test_no_letters_is_paragraph() {
        let l = line("1234 — 567", BBox::new(0, 0, 100, 40));
        let c = classifier().classify_line(&l, 4000);
        assert_eq!(c.cls, LineClass::Paragraph);
    }

    #[test]
    fn test_order_preserved() {
        let lines = vec![
            line("FIRST HEADING", BBox::new(0, 0, 100, 40)),
            line("body text here", BBox::new(0, 50, 100, 90)),
        ];
        let classified = classifier().classify_page(&lines, 4000);
        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].cls, LineClass::Title);
        assert_eq!(classified[1].cls, LineClass::Paragraph);
    }

    #[test]
    fn test_hyphen_attribute() {
        let l = line("contin-", BBox::new(0, 0, 100, 40));
        let c = classifier().classify_line(&l, 4000);
        assert!(c.ends_with_hyphen);
    }
}
