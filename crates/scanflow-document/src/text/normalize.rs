// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paragraph normalizer.

/// Trim every line, keeping line order and count, then trim the whole text.
pub fn normalize(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            normalized.push('\n');
        }
        normalized.push_str(line.trim());
    }
    normalized.trim().to_string()
}
