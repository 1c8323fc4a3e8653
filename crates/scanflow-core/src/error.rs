// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Scanflow.

use thiserror::Error;

/// Top-level error type for all Scanflow operations.
#[derive(Debug, Error)]
pub enum ScanflowError {
    // -- Input --
    /// Uploaded file missing, unreadable or not an image, or raw text that
    /// cannot be reflowed (a continuation line with no prior paragraph).
    #[error("invalid input: {0}")]
    Input(String),

    // -- Collaborators --
    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("spell correction failed: {0}")]
    SpellCorrection(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("{stage} did not finish within {seconds}s")]
    Timeout { stage: &'static str, seconds: u64 },

    // -- Configuration --
    #[error("invalid configuration: {0}")]
    Configuration(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanflowError>;
