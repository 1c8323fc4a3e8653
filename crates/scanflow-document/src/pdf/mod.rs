// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — drawing surface, font metrics, and width-fitted text layout.

pub mod canvas;
pub mod layout;
pub mod metrics;

pub use canvas::{PdfCanvas, TextCanvas};
pub use layout::{LayoutCursor, TextLayout};
pub use metrics::FontMetrics;
