//! Assembly configuration.
//!
//! All pixel thresholds are absolute integers calibrated per scan source;
//! nothing is auto-calibrated at runtime. The structs deserialize from a
//! plain JSON mapping with every field optional (serde defaults), so a
//! config file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level configuration consumed by the assembly pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    /// Line classification thresholds
    pub classify: ClassifyConfig,

    /// Layout reassembly thresholds
    pub layout: LayoutConfig,

    /// Output document settings
    pub odt: OdtConfig,

    /// Whether per-page parsing may run on a thread pool
    pub parallel: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            classify: ClassifyConfig::default(),
            layout: LayoutConfig::default(),
            odt: OdtConfig::default(),
            parallel: true,
        }
    }
}

impl AssemblyConfig {
    /// Create a configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable parallel per-page parsing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Validate all sections. Called once at startup; a failure here is
    /// fatal and never partial.
    pub fn validate(&self) -> Result<()> {
        self.classify.validate()?;
        self.layout.validate()?;
        self.odt.validate()
    }
}

/// Thresholds for the TITLE/PARAGRAPH line classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyConfig {
    /// Minimum uppercase ratio (inclusive) for TITLE
    pub caps_ratio: f32,

    /// Horizontal centering tolerance in pixels
    pub center_tolerance_px: i32,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            caps_ratio: 0.7,
            center_tolerance_px: 40,
        }
    }
}

impl ClassifyConfig {
    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.caps_ratio) {
            return Err(Error::Config(format!(
                "classify.caps_ratio must be within [0, 1], got {}",
                self.caps_ratio
            )));
        }
        if self.center_tolerance_px < 0 {
            return Err(Error::Config(
                "classify.center_tolerance_px must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Pixel thresholds driving the layout reassembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Left-edge range that opens a new indented paragraph
    pub paragraph_indent_min: i32,
    /// Upper bound of the indent range
    pub paragraph_indent_max: i32,

    /// Left edges below this continue the open paragraph
    pub paragraph_continue_max: i32,

    /// Space characters prefixed to an indented paragraph
    pub paragraph_indent_spaces: usize,

    /// Definition column window: left edge range
    pub definition_left_min: i32,
    /// Upper bound of the definition left-edge range
    pub definition_left_max: i32,
    /// Definition column window: right edge range
    pub definition_right_min: i32,
    /// Upper bound of the definition right-edge range
    pub definition_right_max: i32,

    /// Gap factor (of the page's mean line height) that inserts a spacer
    /// around a definition block
    pub definition_gap_threshold: f32,
    /// Absolute floor for the definition gap test, in pixels
    pub definition_gap_min: i32,
    /// Window widening applied when peeking the next line
    pub definition_lookahead_px: i32,

    /// Whether large gaps between paragraphs emit blank lines
    pub insert_empty_lines: bool,
    /// Gap factor (of mean line height) that triggers blank lines
    pub gap_empty_threshold: f32,
    /// Cap on consecutive inserted blank lines
    pub max_empty_lines: u32,

    /// Carry an open paragraph across page boundaries instead of flushing
    /// at every page end
    pub cross_page_continuation: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            paragraph_indent_min: 150,
            paragraph_indent_max: 400,
            paragraph_continue_max: 150,
            paragraph_indent_spaces: 4,
            definition_left_min: 500,
            definition_left_max: 600,
            definition_right_min: 3900,
            definition_right_max: 3960,
            definition_gap_threshold: 1.2,
            definition_gap_min: 24,
            definition_lookahead_px: 50,
            insert_empty_lines: false,
            gap_empty_threshold: 1.8,
            max_empty_lines: 2,
            cross_page_continuation: false,
        }
    }
}

impl LayoutConfig {
    fn validate(&self) -> Result<()> {
        let ranges = [
            (
                "layout.paragraph_indent",
                self.paragraph_indent_min,
                self.paragraph_indent_max,
            ),
            (
                "layout.definition_left",
                self.definition_left_min,
                self.definition_left_max,
            ),
            (
                "layout.definition_right",
                self.definition_right_min,
                self.definition_right_max,
            ),
        ];
        for (name, min, max) in ranges {
            if min > max {
                return Err(Error::Config(format!(
                    "{name}_min ({min}) exceeds {name}_max ({max})"
                )));
            }
        }
        if self.definition_gap_threshold < 0.0 || self.gap_empty_threshold < 0.0 {
            return Err(Error::Config(
                "layout gap thresholds must be non-negative".to_string(),
            ));
        }
        if self.insert_empty_lines && self.max_empty_lines == 0 {
            return Err(Error::Config(
                "layout.max_empty_lines must be at least 1 when insert_empty_lines is set"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

/// Output document settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OdtConfig {
    /// Body font family
    pub font_name: String,

    /// Body font size in points
    pub font_size_pt: f32,

    /// Paragraph alignment: `justify`, `left`, `center`, or `right`
    pub text_align: String,

    /// Left margin of body paragraphs, as an ODT length (e.g. `0.5cm`)
    pub margin_left: String,
}

impl Default for OdtConfig {
    fn default() -> Self {
        Self {
            font_name: "Times New Roman".to_string(),
            font_size_pt: 12.0,
            text_align: "justify".to_string(),
            margin_left: "0.5cm".to_string(),
        }
    }
}

impl OdtConfig {
    fn validate(&self) -> Result<()> {
        if self.font_size_pt <= 0.0 {
            return Err(Error::Config(format!(
                "odt.font_size_pt must be positive, got {}",
                self.font_size_pt
            )));
        }
        match self.text_align.as_str() {
            "justify" | "left" | "center" | "right" => Ok(()),
            other => Err(Error::Config(format!(
                "odt.text_align must be one of justify/left/center/right, got {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AssemblyConfig::new().validate().is_ok());
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut config = AssemblyConfig::new();
        config.layout.definition_left_min = 700;
        config.layout.definition_left_max = 600;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_bad_align_rejected() {
        let mut config = AssemblyConfig::new();
        config.odt.text_align = "middle".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AssemblyConfig =
            serde_json::from_str(r#"{"layout": {"definition_left_min": 480}}"#).unwrap();
        assert_eq!(config.layout.definition_left_min, 480);
        assert_eq!(config.layout.definition_left_max, 600);
        assert_eq!(config.classify.center_tolerance_px, 40);
    }
}
