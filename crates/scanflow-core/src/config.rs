// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanflowError};

/// Word-wrap width used when merging continuation lines.
pub const DEFAULT_MERGE_WIDTH: usize = 70;
/// Upper bound on line length after break repair.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 80;

/// Settings for one scan-to-PDF run.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Character budget for a merged line (last word + pending words).
    pub merge_width: usize,
    /// Maximum characters per line after break repair.
    pub max_line_length: usize,
    /// Glue word fragments separated by a run of two or more spaces.
    pub reassemble_fragments: bool,
    /// Page size of the generated PDF.
    pub paper_size: crate::PaperSize,
    /// Font size in points.
    pub font_size: f32,
    /// Left edge of every drawn line, in points.
    pub origin_x: f32,
    /// Distance from the top of the page to the first baseline, in points.
    pub top_margin: f32,
    /// Vertical advance per line, in points.
    pub line_spacing: f32,
    /// Fraction of the page width a line may occupy.
    pub width_ratio: f32,
    pub ocr_timeout_secs: u64,
    pub spell_timeout_secs: u64,
    /// Extra spell-correction attempts after a transient failure.
    pub spell_retries: u32,
    /// Title metadata embedded in the PDF.
    pub title: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            merge_width: DEFAULT_MERGE_WIDTH,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            reassemble_fragments: true,
            paper_size: crate::PaperSize::Letter,
            font_size: 12.0,
            origin_x: 100.0,
            top_margin: 100.0,
            line_spacing: 15.0,
            width_ratio: 0.8,
            ocr_timeout_secs: 120,
            spell_timeout_secs: 60,
            spell_retries: 2,
            title: "Scanned Document".into(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the layout or reflow stages cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.merge_width == 0 {
            return Err(ScanflowError::Configuration(
                "merge_width must be at least 1".into(),
            ));
        }
        if self.max_line_length == 0 {
            return Err(ScanflowError::Configuration(
                "max_line_length must be at least 1".into(),
            ));
        }
        if !(self.width_ratio > 0.0 && self.width_ratio <= 1.0) {
            return Err(ScanflowError::Configuration(format!(
                "width_ratio must be in (0, 1], got {}",
                self.width_ratio
            )));
        }
        if !(self.line_spacing.is_finite() && self.line_spacing > 0.0) {
            return Err(ScanflowError::Configuration(format!(
                "line_spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ScanflowError::Configuration(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        let (page_w, page_h) = self.paper_size.dimensions_pt();
        if !(page_w > 0.0 && page_h > 0.0) {
            return Err(ScanflowError::Configuration(format!(
                "page dimensions must be positive, got {page_w}x{page_h}"
            )));
        }
        for (name, secs) in [
            ("ocr_timeout_secs", self.ocr_timeout_secs),
            ("spell_timeout_secs", self.spell_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ScanflowError::Configuration(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        if self.top_margin >= page_h {
            return Err(ScanflowError::Configuration(format!(
                "top_margin {} leaves no room on a {page_h}pt page",
                self.top_margin
            )));
        }
        Ok(())
    }

    /// Maximum rendered line width: `width_ratio` of the page width.
    pub fn max_line_width(&self) -> f32 {
        self.paper_size.dimensions_pt().0 * self.width_ratio
    }

    /// Baseline of the first line on a fresh page.
    pub fn start_y(&self) -> f32 {
        self.paper_size.dimensions_pt().1 - self.top_margin
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr_timeout_secs)
    }

    pub fn spell_timeout(&self) -> Duration {
        Duration::from_secs(self.spell_timeout_secs)
    }
}
