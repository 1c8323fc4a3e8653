// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Line classification — decides whether an OCR line continues the previous
// one or opens a new paragraph.

/// The role a physical OCR line plays in the reconstructed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Logically joins the previous line.
    Continuation,
    /// Opens a new paragraph (or is blank).
    ParagraphStart,
}

/// Strategy for classifying OCR lines.
///
/// The heuristic depends on how a given OCR engine marks paragraph starts, so
/// the merger and the PDF layout take it as a parameter.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, line: &str) -> LineRole;
}

/// Tesseract-style heuristic: a line that starts with whitespace (or is
/// empty) opens a paragraph; anything else continues the previous line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeadingWhitespace;

impl LineClassifier for LeadingWhitespace {
    fn classify(&self, line: &str) -> LineRole {
        match line.chars().next() {
            Some(first) if !first.is_whitespace() => LineRole::Continuation,
            _ => LineRole::ParagraphStart,
        }
    }
}
