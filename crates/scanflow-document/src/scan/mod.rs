// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning — input image validation and optical character recognition (OCR)
// backends.

pub mod input;
pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocr;

use std::path::Path;

use scanflow_core::error::Result;

pub use input::{ImageInfo, validate_image};
pub use tesseract::{TesseractConfig, TesseractEngine};

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;

/// An OCR engine: turns an image file into raw, line-broken text.
///
/// Implementations may be slow and are called from a blocking worker thread.
/// An empty string is a valid result (nothing legible on the page).
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, image_path: &Path) -> Result<String>;
}
