// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan-to-PDF pipeline: validate → OCR → merge → repair → normalize →
// spell-correct → layout.
//
// The reflow stages and the layout are pure and run inline. OCR and spelling
// correction are external and possibly slow, so they run on tokio's blocking
// pool under a timeout. A spell-correction failure is retried when transient
// and otherwise falls back to the uncorrected text; every other failure
// aborts the run.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use scanflow_core::error::{Result, ScanflowError};
use scanflow_core::{PDF_MIME_TYPE, PipelineConfig};
use tracing::{Instrument, info, info_span, instrument, warn};
use uuid::Uuid;

use crate::pdf::{PdfCanvas, TextLayout};
use crate::retry::{RetryConfig, RetryDecision, should_retry};
use crate::scan::{TextExtractor, validate_image};
use crate::spell::SpellCorrector;
use crate::text::{LeadingWhitespace, LineClassifier, Reflower};

/// The result of one pipeline run.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// Serialised PDF.
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
    pub page_count: usize,
    /// False when spelling correction failed and the reflowed text was used
    /// as is.
    pub spell_corrected: bool,
    /// Text after reflow and before spelling correction.
    pub reflowed_text: String,
}

/// One configured scan-to-PDF pipeline.
///
/// Holds no per-run state: every call builds its own buffers and PDF canvas,
/// so a single `Pipeline` can serve concurrent requests.
#[derive(Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Arc<dyn TextExtractor>,
    corrector: Arc<dyn SpellCorrector>,
    classifier: Arc<dyn LineClassifier>,
    retry: RetryConfig,
    ocr_timeout: Duration,
    spell_timeout: Duration,
}

impl Pipeline {
    /// # Errors
    ///
    /// [`ScanflowError::Configuration`] when `config` fails validation.
    pub fn new(
        config: PipelineConfig,
        extractor: Arc<dyn TextExtractor>,
        corrector: Arc<dyn SpellCorrector>,
    ) -> Result<Self> {
        config.validate()?;
        let retry = RetryConfig {
            max_retries: config.spell_retries,
            ..Default::default()
        };
        Ok(Self {
            ocr_timeout: config.ocr_timeout(),
            spell_timeout: config.spell_timeout(),
            config,
            extractor,
            corrector,
            classifier: Arc::new(LeadingWhitespace),
            retry,
        })
    }

    /// Replace the line classifier used by the merger and the layout.
    pub fn with_classifier(mut self, classifier: Arc<dyn LineClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Override the collaborator deadlines from the config.
    pub fn with_timeouts(mut self, ocr: Duration, spell: Duration) -> Self {
        self.ocr_timeout = ocr;
        self.spell_timeout = spell;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline on an image file.
    ///
    /// # Errors
    ///
    /// [`ScanflowError::Input`] for a missing or undecodable image (checked
    /// before OCR runs), [`ScanflowError::Ocr`] or [`ScanflowError::Timeout`]
    /// from the OCR engine, and anything [`process_text`](Self::process_text)
    /// returns.
    pub async fn process_image(&self, image_path: &Path) -> Result<GeneratedDocument> {
        let span = info_span!("process_image", run_id = %Uuid::new_v4(), path = %image_path.display());
        async {
            validate_image(image_path)?;
            let raw = self.extract(image_path).await?;
            info!(raw_len = raw.len(), "OCR text received");
            self.render_document(&raw).await
        }
        .instrument(span)
        .await
    }

    /// Run the pipeline on raw OCR text (everything after OCR).
    pub async fn process_text(&self, raw: &str) -> Result<GeneratedDocument> {
        let span = info_span!("process_text", run_id = %Uuid::new_v4(), raw_len = raw.len());
        self.render_document(raw).instrument(span).await
    }

    async fn render_document(&self, raw: &str) -> Result<GeneratedDocument> {
        let reflowed_text = self.reflow(raw)?;
        let (corrected, spell_corrected) = self.correct_with_fallback(&reflowed_text).await;
        let (bytes, page_count) = self.render(&corrected)?;

        info!(page_count, bytes = bytes.len(), spell_corrected, "Document generated");
        Ok(GeneratedDocument {
            bytes,
            mime_type: PDF_MIME_TYPE,
            page_count,
            spell_corrected,
            reflowed_text,
        })
    }

    /// Merge, repair and normalize raw OCR text.
    pub fn reflow(&self, raw: &str) -> Result<String> {
        Reflower::new(&self.config, Arc::clone(&self.classifier)).reflow(raw)
    }

    /// Lay `text` out on a fresh PDF canvas. Returns the PDF bytes and the
    /// page count.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub fn render(&self, text: &str) -> Result<(Vec<u8>, usize)> {
        let mut canvas = PdfCanvas::new(
            self.config.paper_size,
            self.config.font_size,
            self.config.title.clone(),
        );
        TextLayout::from_config(&self.config, Arc::clone(&self.classifier)).layout(
            &mut canvas,
            text,
            self.config.origin_x,
            self.config.start_y(),
        )?;
        let page_count = canvas.page_count();
        Ok((canvas.finish()?, page_count))
    }

    async fn extract(&self, image_path: &Path) -> Result<String> {
        let extractor = Arc::clone(&self.extractor);
        let path = image_path.to_path_buf();
        run_blocking("OCR", self.ocr_timeout, ScanflowError::Ocr, move || {
            extractor.extract_text(&path)
        })
        .await
    }

    /// Spell-correct `text`; on failure return it unchanged with `false`.
    async fn correct_with_fallback(&self, text: &str) -> (String, bool) {
        let mut attempt = 0u32;
        loop {
            let corrector = Arc::clone(&self.corrector);
            let owned = text.to_string();
            let result = run_blocking(
                "spell correction",
                self.spell_timeout,
                ScanflowError::SpellCorrection,
                move || corrector.correct(&owned),
            )
            .await;

            let err = match result {
                Ok(corrected) => return (corrected, true),
                Err(err) => err,
            };
            match should_retry(&err, attempt, &self.retry) {
                RetryDecision::RetryAfter(delay) => {
                    warn!(error = %err, attempt, "spell correction failed — retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::GiveUp | RetryDecision::Exhausted => {
                    warn!(error = %err, "spell correction failed — using uncorrected text");
                    return (text.to_string(), false);
                }
            }
        }
    }
}

/// Run `job` on the blocking pool, giving up after `limit`.
///
/// A timed-out job is detached, not cancelled. A panicking job is reported
/// through `on_panic`.
async fn run_blocking<T, F>(
    stage: &'static str,
    limit: Duration,
    on_panic: fn(String) -> ScanflowError,
    job: F,
) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(job)).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(on_panic(format!("{stage} worker failed: {join_err}"))),
        Err(_) => Err(ScanflowError::Timeout {
            stage,
            seconds: limit.as_secs(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use image::{GrayImage, Luma};

    use super::*;
    use crate::spell::{DictionaryCorrector, IdentityCorrector};

    const SAMPLE: &str = "Dear Sir,\n\
                          \x20I am writting to inform you that the\n\
                          shipment has been delayed.\n\
                          \x20Yours faithfully,";

    /// OCR stand-in returning canned text and counting calls.
    struct CannedOcr {
        text: String,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl CannedOcr {
        fn new(text: &str) -> Self {
            Self {
                text: text.into(),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }
    }

    impl TextExtractor for CannedOcr {
        fn extract_text(&self, _image_path: &Path) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            Ok(self.text.clone())
        }
    }

    struct BrokenOcr;

    impl TextExtractor for BrokenOcr {
        fn extract_text(&self, _image_path: &Path) -> Result<String> {
            Err(ScanflowError::Ocr("unreadable".into()))
        }
    }

    /// Corrector that always fails, counting attempts.
    #[derive(Default)]
    struct FailingCorrector {
        calls: AtomicUsize,
    }

    impl SpellCorrector for FailingCorrector {
        fn correct(&self, _text: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ScanflowError::SpellCorrection("service down".into()))
        }
    }

    struct SlowCorrector;

    impl SpellCorrector for SlowCorrector {
        fn correct(&self, text: &str) -> Result<String> {
            std::thread::sleep(Duration::from_millis(500));
            Ok(text.to_uppercase())
        }
    }

    fn pipeline(extractor: Arc<dyn TextExtractor>, corrector: Arc<dyn SpellCorrector>) -> Pipeline {
        Pipeline::new(PipelineConfig::default(), extractor, corrector)
            .unwrap()
            .with_retry(RetryConfig {
                max_retries: 2,
                base_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(5),
            })
    }

    fn text_pipeline(corrector: Arc<dyn SpellCorrector>) -> Pipeline {
        pipeline(Arc::new(CannedOcr::new("")), corrector)
    }

    fn write_png(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("scan.png");
        GrayImage::from_pixel(16, 16, Luma([255u8])).save(&path).unwrap();
        path
    }

    fn pdf_pages(bytes: &[u8]) -> usize {
        lopdf::Document::load_mem(bytes).unwrap().get_pages().len()
    }

    #[tokio::test]
    async fn text_becomes_single_page_pdf() {
        let doc = text_pipeline(Arc::new(IdentityCorrector))
            .process_text(SAMPLE)
            .await
            .unwrap();
        assert_eq!(doc.mime_type, "application/pdf");
        assert_eq!(doc.page_count, 1);
        assert!(doc.spell_corrected);
        assert_eq!(
            doc.reflowed_text,
            "Dear Sir,\n\nI am writting to inform you that the shipment has been delayed.\n\nYours faithfully,"
        );
        assert_eq!(pdf_pages(&doc.bytes), 1);
    }

    #[tokio::test]
    async fn empty_text_gives_blank_single_page() {
        let doc = text_pipeline(Arc::new(IdentityCorrector))
            .process_text("")
            .await
            .unwrap();
        assert_eq!(doc.reflowed_text, "");
        assert_eq!(doc.page_count, 1);
        assert_eq!(pdf_pages(&doc.bytes), 1);
    }

    #[tokio::test]
    async fn dictionary_correction_applies() {
        let dict = DictionaryCorrector::from_word_list("writing 50").unwrap();
        let p = text_pipeline(Arc::new(dict));
        let doc = p.process_text(SAMPLE).await.unwrap();
        assert!(doc.spell_corrected);
        // The reflowed text is kept from before correction.
        assert!(doc.reflowed_text.contains("writting"));
    }

    #[tokio::test]
    async fn spell_failure_falls_back_after_retries() {
        let corrector = Arc::new(FailingCorrector::default());
        let p = text_pipeline(corrector.clone());
        let doc = p.process_text(SAMPLE).await.unwrap();
        assert!(!doc.spell_corrected);
        assert_eq!(doc.page_count, 1);
        // First try plus two retries.
        assert_eq!(corrector.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn slow_spell_correction_times_out_and_falls_back() {
        let p = text_pipeline(Arc::new(SlowCorrector))
            .with_retry(RetryConfig {
                max_retries: 0,
                ..Default::default()
            })
            .with_timeouts(Duration::from_secs(5), Duration::from_millis(20));
        let doc = p.process_text("short text").await.unwrap();
        assert!(!doc.spell_corrected);
        assert_eq!(doc.reflowed_text, "short text");
    }

    #[tokio::test]
    async fn continuation_first_is_input_error() {
        let err = text_pipeline(Arc::new(IdentityCorrector))
            .process_text("\norphan")
            .await
            .unwrap_err();
        assert!(matches!(err, ScanflowError::Input(_)));
    }

    #[tokio::test]
    async fn long_text_spans_pages() {
        let raw = (0..120)
            .map(|i| format!(" Paragraph number {i} of the scanned report."))
            .collect::<Vec<_>>()
            .join("\n");
        let doc = text_pipeline(Arc::new(IdentityCorrector))
            .process_text(&raw)
            .await
            .unwrap();
        assert!(doc.page_count > 1);
        assert_eq!(pdf_pages(&doc.bytes), doc.page_count);
    }

    #[tokio::test]
    async fn image_runs_ocr_then_reflow() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir);
        let ocr = Arc::new(CannedOcr::new(SAMPLE));
        let p = pipeline(ocr.clone(), Arc::new(IdentityCorrector));

        let doc = p.process_image(&path).await.unwrap();
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
        assert!(doc.reflowed_text.starts_with("Dear Sir,"));
    }

    #[tokio::test]
    async fn invalid_image_fails_before_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "not an image").unwrap();
        let ocr = Arc::new(CannedOcr::new(SAMPLE));
        let p = pipeline(ocr.clone(), Arc::new(IdentityCorrector));

        let err = p.process_image(&path).await.unwrap_err();
        assert!(matches!(err, ScanflowError::Input(_)));
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn ocr_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir);
        let p = pipeline(Arc::new(BrokenOcr), Arc::new(IdentityCorrector));
        let err = p.process_image(&path).await.unwrap_err();
        assert!(matches!(err, ScanflowError::Ocr(_)));
    }

    #[tokio::test]
    async fn slow_ocr_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir);
        let ocr = CannedOcr {
            delay: Duration::from_millis(500),
            ..CannedOcr::new(SAMPLE)
        };
        let p = pipeline(Arc::new(ocr), Arc::new(IdentityCorrector))
            .with_timeouts(Duration::from_millis(20), Duration::from_secs(5));
        let err = p.process_image(&path).await.unwrap_err();
        assert!(matches!(err, ScanflowError::Timeout { stage: "OCR", .. }));
    }

    #[tokio::test]
    async fn empty_ocr_output_is_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir);
        let p = pipeline(Arc::new(CannedOcr::new("")), Arc::new(IdentityCorrector));
        let doc = p.process_image(&path).await.unwrap();
        assert_eq!(doc.reflowed_text, "");
        assert_eq!(doc.page_count, 1);
    }

    #[tokio::test]
    async fn concurrent_runs_are_independent() {
        let p = text_pipeline(Arc::new(IdentityCorrector));
        let long = (0..100)
            .map(|i| format!(" Line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let (short_doc, long_doc) = tokio::join!(p.process_text("one line"), p.process_text(&long));
        assert_eq!(short_doc.unwrap().page_count, 1);
        assert!(long_doc.unwrap().page_count > 1);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = PipelineConfig {
            width_ratio: 2.0,
            ..Default::default()
        };
        let result = Pipeline::new(
            config,
            Arc::new(CannedOcr::new("")),
            Arc::new(IdentityCorrector),
        );
        assert!(matches!(result, Err(ScanflowError::Configuration(_))));
    }
}
