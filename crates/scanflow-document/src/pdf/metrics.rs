// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph advance widths for the built-in Helvetica font, taken from the
// standard Adobe AFM metrics (units of 1/1000 em).

/// Advance widths for ASCII 0x20..=0x7E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' .. '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0' .. '9'
    278, 278, 584, 584, 584, 556, 1015, // ':' .. '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' .. 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' .. 'Z'
    278, 278, 278, 469, 556, 333, // '[' .. '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' .. 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' .. 'z'
    334, 260, 334, 584, // '{' .. '~'
];

/// Width used for characters outside the table.
const FALLBACK_WIDTH: u16 = 556;

/// String width measurement for one font at one size.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    size_pt: f32,
}

impl FontMetrics {
    pub fn helvetica(size_pt: f32) -> Self {
        Self { size_pt }
    }

    pub fn size_pt(&self) -> f32 {
        self.size_pt
    }

    /// Rendered width of `text` in points.
    pub fn string_width(&self, text: &str) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
        units as f32 * self.size_pt / 1000.0
    }
}

fn glyph_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_ASCII[c as usize - 0x20],
        // Tabs and other control characters are never drawn.
        c if c.is_control() => 0,
        _ => FALLBACK_WIDTH,
    }
}
