// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spelling correction collaborators.

pub mod dictionary;

use scanflow_core::error::Result;

pub use dictionary::DictionaryCorrector;

/// A spelling corrector: text in, corrected text out.
///
/// Implementations may be slow and are called from a blocking worker thread.
/// They should change words only, leaving line breaks intact so the reflowed
/// layout survives correction.
pub trait SpellCorrector: Send + Sync {
    fn correct(&self, text: &str) -> Result<String>;
}

/// Returns the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCorrector;

impl SpellCorrector for IdentityCorrector {
    fn correct(&self, text: &str) -> Result<String> {
        Ok(text.to_string())
    }
}
