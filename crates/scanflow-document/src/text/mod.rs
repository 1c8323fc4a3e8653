// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text reconstruction — turns raw line-broken OCR output into bounded,
// paragraph-separated text: merge continuation lines, repair line breaks,
// normalize whitespace.

pub mod line_role;
pub mod merge;
pub mod normalize;
pub mod repair;

use std::sync::Arc;

use scanflow_core::PipelineConfig;
use scanflow_core::error::Result;

pub use line_role::{LeadingWhitespace, LineClassifier, LineRole};
pub use merge::LineMerger;
pub use normalize::normalize;
pub use repair::{RepairOptions, repair};

/// The three pure reflow stages, configured once.
#[derive(Clone)]
pub struct Reflower {
    merger: LineMerger,
    repair: RepairOptions,
}

impl Reflower {
    pub fn new(config: &PipelineConfig, classifier: Arc<dyn LineClassifier>) -> Self {
        Self {
            merger: LineMerger::with_classifier(config.merge_width, classifier),
            repair: RepairOptions {
                max_line_length: config.max_line_length,
                reassemble_fragments: config.reassemble_fragments,
            },
        }
    }

    /// Merge, repair and normalize `raw`.
    pub fn reflow(&self, raw: &str) -> Result<String> {
        let merged = self.merger.merge(raw)?;
        let repaired = repair(&merged, &self.repair);
        Ok(normalize(&repaired))
    }
}

impl Default for Reflower {
    fn default() -> Self {
        Self::new(&PipelineConfig::default(), Arc::new(LeadingWhitespace))
    }
}
