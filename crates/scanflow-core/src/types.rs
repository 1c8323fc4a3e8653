// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Scanflow pipeline.

use serde::{Deserialize, Serialize};

/// MIME type of every document the pipeline produces.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    #[default]
    Letter,
    Legal,
    /// Arbitrary page in PostScript points (1/72 inch).
    Custom { width_pt: f32, height_pt: f32 },
}

impl PaperSize {
    /// Dimensions in PostScript points (width, height).
    ///
    /// Letter is exactly 612 × 792; the ISO sizes are rounded to the nearest
    /// whole point the way most PDF producers do.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Custom {
                width_pt,
                height_pt,
            } => (*width_pt, *height_pt),
        }
    }

    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        let (w, h) = self.dimensions_pt();
        (pt_to_mm(w), pt_to_mm(h))
    }
}

/// Convert PostScript points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// How an error should be handled by retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Might succeed if tried again (timeouts, flaky collaborators).
    Transient,
    /// Will fail the same way every time.
    Permanent,
}
