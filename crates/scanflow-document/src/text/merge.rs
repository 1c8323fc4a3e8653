// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line merger — joins OCR continuation lines back onto the line they continue
// and re-wraps the result at a word-count-ish width.

use std::sync::Arc;

use scanflow_core::config::DEFAULT_MERGE_WIDTH;
use scanflow_core::error::{Result, ScanflowError};
use tracing::{debug, instrument};

use super::line_role::{LeadingWhitespace, LineClassifier, LineRole};
use super::repair::{Token, tokenize};

/// Merges continuation lines of raw OCR output.
///
/// The first line is taken verbatim (trimmed). Each later line is either a
/// paragraph start, which forces a line break, or a continuation, whose words
/// are appended one by one. A word goes onto a new line when the last word
/// already in the output, the pending word and the next word would together
/// exceed `width` characters.
#[derive(Clone)]
pub struct LineMerger {
    width: usize,
    classifier: Arc<dyn LineClassifier>,
}

impl Default for LineMerger {
    fn default() -> Self {
        Self::new(DEFAULT_MERGE_WIDTH)
    }
}

impl LineMerger {
    /// Merger using the leading-whitespace heuristic.
    pub fn new(width: usize) -> Self {
        Self::with_classifier(width, Arc::new(LeadingWhitespace))
    }

    pub fn with_classifier(width: usize, classifier: Arc<dyn LineClassifier>) -> Self {
        Self { width, classifier }
    }

    /// Merge `raw` OCR text.
    ///
    /// # Errors
    ///
    /// Returns [`ScanflowError::Input`] when a continuation line appears before
    /// any word has been emitted (for example, text that opens with a blank
    /// line followed by an unindented line).
    #[instrument(skip_all, fields(raw_len = raw.len(), width = self.width))]
    pub fn merge(&self, raw: &str) -> Result<String> {
        let mut merged = String::with_capacity(raw.len());
        let mut line_count = 0usize;

        for (index, line) in raw.split('\n').enumerate() {
            line_count += 1;
            if !merged.is_empty() {
                match self.classifier.classify(line) {
                    LineRole::Continuation => {
                        self.append_continuation(&mut merged, line, index)?;
                        continue;
                    }
                    LineRole::ParagraphStart => break_line(&mut merged),
                }
            }
            merged.push_str(line.trim());
            merged.push(' ');
        }

        let merged = merged.trim().to_string();
        debug!(line_count, merged_len = merged.len(), "Lines merged");
        Ok(merged)
    }

    fn append_continuation(&self, merged: &mut String, line: &str, index: usize) -> Result<()> {
        let mut tokens = tokenize(line, true).into_iter();
        // A custom classifier may call a blank line a continuation; there is
        // nothing to append then.
        let Some(mut current) = tokens.next() else {
            return Ok(());
        };

        for next in tokens {
            self.place(merged, &current, Some(next.word), index)?;
            current = next;
        }
        self.place(merged, &current, None, index)
    }

    /// Append one word, breaking the line first when the last word, this
    /// word and the following one would not fit in `width`.
    fn place(
        &self,
        merged: &mut String,
        token: &Token<'_>,
        next: Option<&str>,
        index: usize,
    ) -> Result<()> {
        if token.glued {
            // Keep the split-word marker for the repairer and never break
            // between the two fragments.
            let kept = merged.trim_end_matches(' ').len();
            merged.truncate(kept);
            merged.push_str("  ");
        } else {
            let mut budget = char_len(last_word(merged, index)?) + char_len(token.word) + 1;
            if let Some(next) = next {
                budget += char_len(next) + 1;
            }
            if budget > self.width {
                break_line(merged);
            } else {
                push_space(merged);
            }
        }
        merged.push_str(token.word);
        Ok(())
    }
}

/// Merge with the default width and classifier.
pub fn merge(raw: &str) -> Result<String> {
    LineMerger::default().merge(raw)
}

fn last_word(text: &str, index: usize) -> Result<&str> {
    text.split_whitespace().next_back().ok_or_else(|| {
        ScanflowError::Input(format!(
            "line {} continues a paragraph but no paragraph precedes it",
            index + 1
        ))
    })
}

/// Replace trailing spaces with a single line break.
fn break_line(text: &mut String) {
    let kept = text.trim_end_matches(' ').len();
    text.truncate(kept);
    text.push('\n');
}

fn push_space(text: &mut String) {
    if !text.ends_with(char::is_whitespace) {
        text.push(' ');
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
