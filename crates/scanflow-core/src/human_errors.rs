// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion,
// so the command-line front end can report a document-generation failure
// without dumping internals.

use crate::error::ScanflowError;
use crate::types::ErrorClass;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether trying again unchanged could help.
    pub retriable: bool,
}

/// Classify a `ScanflowError` for retry decisions.
pub fn classify_error(err: &ScanflowError) -> ErrorClass {
    match err {
        ScanflowError::SpellCorrection(_) | ScanflowError::Timeout { .. } => {
            ErrorClass::Transient
        }
        ScanflowError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::Interrupted => {
                ErrorClass::Transient
            }
            _ => ErrorClass::Permanent,
        },
        ScanflowError::Input(_)
        | ScanflowError::Ocr(_)
        | ScanflowError::Pdf(_)
        | ScanflowError::Configuration(_)
        | ScanflowError::Serialization(_) => ErrorClass::Permanent,
    }
}

/// Convert a `ScanflowError` into a `HumanError`.
pub fn humanize_error(err: &ScanflowError) -> HumanError {
    let retriable = classify_error(err) == ErrorClass::Transient;
    match err {
        ScanflowError::Input(detail) => HumanError {
            message: "That file can't be used.".into(),
            suggestion: format!("Check that the path points to a readable image. ({detail})"),
            retriable,
        },

        ScanflowError::Ocr(_) => HumanError {
            message: "Text recognition didn't work on this scan.".into(),
            suggestion: "Try scanning the document again with better lighting, making sure the text is clear and in focus.".into(),
            retriable,
        },

        ScanflowError::SpellCorrection(_) => HumanError {
            message: "Spelling correction failed.".into(),
            suggestion: "The document can still be produced without spelling fixes. Check the dictionary file if you supplied one.".into(),
            retriable,
        },

        ScanflowError::Pdf(_) => HumanError {
            message: "The PDF couldn't be written.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable,
        },

        ScanflowError::Timeout { stage, seconds } => HumanError {
            message: format!("{stage} took too long."),
            suggestion: format!(
                "It was stopped after {seconds} seconds. Try a smaller or clearer image, or raise the timeout in the config file."
            ),
            retriable,
        },

        ScanflowError::Configuration(detail) => HumanError {
            message: "The layout settings aren't valid.".into(),
            suggestion: format!("Fix the configuration and try again. ({detail})"),
            retriable,
        },

        ScanflowError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    retriable,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Scanflow doesn't have permission to use that file.".into(),
                    suggestion: "Check the file permissions, or copy the file somewhere else first.".into(),
                    retriable,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    retriable,
                }
            }
        }

        ScanflowError::Serialization(_) => HumanError {
            message: "The configuration file couldn't be read.".into(),
            suggestion: "Make sure it is valid JSON.".into(),
            retriable,
        },
    }
}
