// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text layout — fits text into lines of a measured maximum width and pages
// through a `TextCanvas`.

use std::sync::Arc;

use scanflow_core::PipelineConfig;
use scanflow_core::error::{Result, ScanflowError};
use tracing::{debug, instrument};

use super::canvas::TextCanvas;
use crate::text::{LeadingWhitespace, LineClassifier, LineRole};

/// Write position during one layout call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub x: f32,
    pub y: f32,
    /// Zero-based page index relative to the page the layout started on.
    pub page: usize,
}

/// Width-fitting line layout.
///
/// Characters are added to a line one at a time; as soon as the measured
/// width of the line exceeds `max_width` the line is drawn and a new one
/// begins. Lines advance downwards by `line_spacing`, and a new page is started
/// when fewer than `line_spacing` points remain.
#[derive(Clone)]
pub struct TextLayout {
    line_spacing: f32,
    max_width: f32,
    /// Distance from the page top to the first baseline after a page break.
    page_top_margin: f32,
    classifier: Arc<dyn LineClassifier>,
}

impl TextLayout {
    pub fn new(line_spacing: f32, max_width: f32) -> Self {
        Self {
            line_spacing,
            max_width,
            page_top_margin: 100.0,
            classifier: Arc::new(LeadingWhitespace),
        }
    }

    pub fn from_config(config: &PipelineConfig, classifier: Arc<dyn LineClassifier>) -> Self {
        Self {
            line_spacing: config.line_spacing,
            max_width: config.max_line_width(),
            page_top_margin: config.top_margin,
            classifier,
        }
    }

    pub fn with_page_top_margin(mut self, margin: f32) -> Self {
        self.page_top_margin = margin;
        self
    }

    fn validate(&self, canvas: &(impl TextCanvas + ?Sized)) -> Result<()> {
        if !(self.max_width.is_finite() && self.max_width > 0.0) {
            return Err(ScanflowError::Configuration(format!(
                "maximum line width must be positive, got {}",
                self.max_width
            )));
        }
        if !(self.line_spacing.is_finite() && self.line_spacing > 0.0) {
            return Err(ScanflowError::Configuration(format!(
                "line spacing must be positive, got {}",
                self.line_spacing
            )));
        }
        if canvas.measure_width("").is_none() {
            return Err(ScanflowError::Configuration(
                "canvas cannot measure text width".into(),
            ));
        }
        Ok(())
    }

    /// Lay `text` out starting at `(x, y)` and return the final `y`.
    ///
    /// A line whose buffer still holds carried-over whitespace is merged into
    /// when it is a continuation line; a paragraph-start line begins a fresh
    /// visual line. Blank lines draw nothing.
    ///
    /// # Errors
    ///
    /// [`ScanflowError::Configuration`] when the width or spacing is not
    /// positive or the canvas cannot measure text.
    #[instrument(skip(self, canvas, text), fields(text_len = text.len(), max_width = self.max_width))]
    pub fn layout(
        &self,
        canvas: &mut (impl TextCanvas + ?Sized),
        text: &str,
        x: f32,
        y: f32,
    ) -> Result<f32> {
        self.validate(&*canvas)?;

        let mut cursor = LayoutCursor { x, y, page: 0 };
        let mut formatted = String::new();
        let mut drawn = 0usize;

        for line in text.split('\n') {
            if !formatted.is_empty() && self.classifier.classify(line) == LineRole::ParagraphStart {
                formatted.clear();
            }

            for ch in line.chars() {
                formatted.push(ch);
                if measure(&*canvas, &formatted)? > self.max_width {
                    drawn += self.emit(&mut *canvas, &mut cursor, &formatted);
                    formatted.clear();
                }
            }

            if !formatted.trim().is_empty() {
                drawn += self.emit(&mut *canvas, &mut cursor, &formatted);
                formatted.clear();
            }
        }

        debug!(
            lines_drawn = drawn,
            page_breaks = cursor.page,
            final_y = cursor.y,
            "Text laid out"
        );
        Ok(cursor.y)
    }

    /// Draw the trimmed buffer and advance the cursor. Returns the number of
    /// lines drawn (0 for a blank buffer).
    fn emit(
        &self,
        canvas: &mut (impl TextCanvas + ?Sized),
        cursor: &mut LayoutCursor,
        formatted: &str,
    ) -> usize {
        let line = formatted.trim();
        if line.is_empty() {
            return 0;
        }
        if cursor.y < self.line_spacing {
            canvas.new_page();
            cursor.page += 1;
            cursor.y = canvas.page_height() - self.page_top_margin;
        }
        canvas.draw_text(cursor.x, cursor.y, line);
        cursor.y -= self.line_spacing;
        1
    }
}

fn measure(canvas: &(impl TextCanvas + ?Sized), text: &str) -> Result<f32> {
    canvas.measure_width(text).ok_or_else(|| {
        ScanflowError::Configuration("canvas stopped measuring text mid-layout".into())
    })
}
