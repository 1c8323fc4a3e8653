// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// scanflow-document — Scan-to-PDF text processing for Scanflow.
//
// Provides the text reflow stages (line merging, break repair, paragraph
// normalization), OCR and spelling-correction collaborators, width-fitted PDF
// text layout, and the async pipeline that ties them together.

pub mod pdf;
pub mod pipeline;
pub mod retry;
pub mod scan;
pub mod spell;
pub mod text;

// Re-export the primary structs so callers can use `scanflow_document::Pipeline` etc.
pub use pdf::{PdfCanvas, TextCanvas, TextLayout};
pub use pipeline::{GeneratedDocument, Pipeline};
pub use scan::{TesseractEngine, TextExtractor};
pub use spell::{DictionaryCorrector, IdentityCorrector, SpellCorrector};
pub use text::Reflower;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
