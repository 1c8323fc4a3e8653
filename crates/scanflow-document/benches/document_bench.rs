// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the scanflow-document crate: the reflow stages on
// a synthetic multi-page OCR transcript, and PDF layout of the result.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use scanflow_document::{PdfCanvas, Reflower, TextLayout};

/// Roughly three pages of OCR-style text: short hard-wrapped lines, indented
/// paragraph starts and the odd split word.
fn synthetic_transcript() -> String {
    let mut raw = String::new();
    for paragraph in 0..40 {
        raw.push_str(&format!("  Paragraph {paragraph} opens with an indented line\n"));
        raw.push_str("that continues the sentence onto a second\n");
        raw.push_str("line where the scanner broke an inter  national\n");
        raw.push_str("word in two before the full stop.\n");
    }
    raw
}

fn bench_reflow(c: &mut Criterion) {
    let raw = synthetic_transcript();
    let reflower = Reflower::default();

    c.bench_function("reflow (40 paragraphs)", |b| {
        b.iter(|| black_box(reflower.reflow(black_box(&raw))));
    });
}

fn bench_layout(c: &mut Criterion) {
    let text = match Reflower::default().reflow(&synthetic_transcript()) {
        Ok(text) => text,
        Err(err) => panic!("transcript should reflow: {err}"),
    };
    let layout = TextLayout::new(15.0, 612.0 * 0.8);

    c.bench_function("layout (Letter, Helvetica 12pt)", |b| {
        b.iter(|| {
            let mut canvas = PdfCanvas::letter("bench");
            let _ = black_box(layout.layout(&mut canvas, black_box(&text), 100.0, 692.0));
            black_box(canvas.page_count());
        });
    });
}

criterion_group!(benches, bench_reflow, bench_layout);
criterion_main!(benches);
