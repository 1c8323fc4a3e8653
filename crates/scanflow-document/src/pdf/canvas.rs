// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering collaborator — the drawing surface the text layout writes to, and
// its `printpdf` 0.8 implementation.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. `PdfCanvas` collects one op list per page and only
// builds the document in `finish`.

use std::path::Path;

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, TextItem,
};
use scanflow_core::error::{Result, ScanflowError};
use scanflow_core::{PaperSize, pt_to_mm};
use tracing::{debug, info, instrument};

use super::metrics::FontMetrics;

/// A page-oriented drawing surface using PDF coordinates (origin bottom-left,
/// units in points).
pub trait TextCanvas {
    /// Rendered width of `text` in points, or `None` when this canvas cannot
    /// measure text.
    fn measure_width(&self, text: &str) -> Option<f32>;

    /// Draw `text` with its baseline starting at `(x, y)` on the current page.
    fn draw_text(&mut self, x: f32, y: f32, text: &str);

    /// Finish the current page and start a new, empty one.
    fn new_page(&mut self);

    /// Height of a page in points.
    fn page_height(&self) -> f32;
}

/// `printpdf`-backed canvas drawing with the built-in Helvetica font.
///
/// The first page exists as soon as the canvas is created, so finishing an
/// untouched canvas yields a single blank page.
pub struct PdfCanvas {
    title: String,
    paper_size: PaperSize,
    metrics: FontMetrics,
    /// Drawing operations, one list per page.
    pages: Vec<Vec<Op>>,
}

impl PdfCanvas {
    pub fn new(paper_size: PaperSize, font_size_pt: f32, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            paper_size,
            metrics: FontMetrics::helvetica(font_size_pt),
            pages: vec![Vec::new()],
        }
    }

    /// US Letter, Helvetica 12pt.
    pub fn letter(title: impl Into<String>) -> Self {
        Self::new(PaperSize::Letter, 12.0, title)
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_width(&self) -> f32 {
        self.paper_size.dimensions_pt().0
    }

    /// Serialise the document and return the PDF bytes.
    #[instrument(skip(self), fields(pages = self.pages.len(), title = %self.title))]
    pub fn finish(self) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.paper_size.dimensions_pt();
        let (page_w, page_h) = (Mm(pt_to_mm(page_w)), Mm(pt_to_mm(page_h)));

        let mut doc = PdfDocument::new(&self.title);
        let pages: Vec<PdfPage> = self
            .pages
            .into_iter()
            .map(|ops| PdfPage::new(page_w, page_h, ops))
            .collect();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if output.is_empty() {
            return Err(ScanflowError::Pdf("serialiser produced no output".into()));
        }

        debug!(
            warnings = warnings.len(),
            bytes = output.len(),
            "PDF serialised"
        );
        Ok(output)
    }

    /// Serialise the document and write it to `path`.
    pub fn finish_to_file(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.finish()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }

    fn current_page(&mut self) -> &mut Vec<Op> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }
}

impl TextCanvas for PdfCanvas {
    fn measure_width(&self, text: &str) -> Option<f32> {
        Some(self.metrics.string_width(text))
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str) {
        let size = Pt(self.metrics.size_pt());
        let ops = self.current_page();
        ops.push(Op::StartTextSection);
        ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        ops.push(Op::SetFontSizeBuiltinFont {
            size,
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: BuiltinFont::Helvetica,
        });
        ops.push(Op::EndTextSection);
    }

    fn new_page(&mut self) {
        self.pages.push(Vec::new());
    }

    fn page_height(&self) -> f32 {
        self.paper_size.dimensions_pt().1
    }
}
