// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanflow — scanned image to reflowed, spell-corrected PDF.
//
// Entry point. Initialises logging, builds the OCR and spelling collaborators
// from the command line, and runs one pipeline.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use scanflow_core::PipelineConfig;
use scanflow_core::error::{Result, ScanflowError};
use scanflow_core::human_errors::humanize_error;
use scanflow_document::scan::TesseractConfig;
use scanflow_document::{
    DictionaryCorrector, IdentityCorrector, Pipeline, SpellCorrector, TesseractEngine,
    TextExtractor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OcrBackend {
    /// External `tesseract` command.
    Tesseract,
    /// In-process `ocrs` models (needs the `ocr` feature).
    Ocrs,
}

/// Turn a scanned page into a reflowed PDF
#[derive(Parser, Debug)]
#[command(name = "scanflow")]
#[command(version, about, long_about = None)]
struct Args {
    /// Scanned image, or raw OCR text with --text-input
    input: PathBuf,

    /// Output PDF path [default: input with a .pdf extension]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON pipeline configuration
    #[arg(long, env = "SCANFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Word list for spelling correction (`word` or `word count` per line)
    #[arg(long)]
    dictionary: Option<PathBuf>,

    /// Treat the input as raw OCR text and skip OCR
    #[arg(long)]
    text_input: bool,

    #[arg(long, value_enum, default_value_t = OcrBackend::Tesseract)]
    ocr_backend: OcrBackend,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract_path: PathBuf,

    /// OCR language code
    #[arg(long, default_value = "eng")]
    language: String,

    /// Also print the reflowed text to stdout
    #[arg(long)]
    print_text: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(input = %args.input.display(), "Scanflow starting");

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "Scanflow failed");
            let human = humanize_error(&err);
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    let corrector: Arc<dyn SpellCorrector> = match &args.dictionary {
        Some(path) => Arc::new(DictionaryCorrector::load(path)?),
        None => Arc::new(IdentityCorrector),
    };
    let extractor = build_extractor(&args)?;
    let pipeline = Pipeline::new(config, extractor, corrector)?;

    let document = if args.text_input {
        let raw = std::fs::read_to_string(&args.input).map_err(|err| {
            ScanflowError::Input(format!("cannot read {}: {err}", args.input.display()))
        })?;
        pipeline.process_text(&raw).await?
    } else {
        pipeline.process_image(&args.input).await?
    };

    if args.print_text {
        println!("{}", document.reflowed_text);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.input));
    std::fs::write(&output, &document.bytes)?;

    if !document.spell_corrected {
        tracing::warn!("Spelling correction was skipped; the PDF holds uncorrected text");
    }
    tracing::info!(
        output = %output.display(),
        pages = document.page_count,
        "PDF written"
    );
    Ok(())
}

fn build_extractor(args: &Args) -> Result<Arc<dyn TextExtractor>> {
    match args.ocr_backend {
        OcrBackend::Tesseract => Ok(Arc::new(TesseractEngine::new(TesseractConfig {
            binary: args.tesseract_path.clone(),
            language: args.language.clone(),
            ..Default::default()
        }))),
        OcrBackend::Ocrs => ocrs_extractor(args.text_input),
    }
}

#[cfg(feature = "ocr")]
fn ocrs_extractor(_text_input: bool) -> Result<Arc<dyn TextExtractor>> {
    Ok(Arc::new(scanflow_document::OcrEngine::new(
        scanflow_document::scan::ocr::OcrConfig::default(),
    )?))
}

#[cfg(not(feature = "ocr"))]
fn ocrs_extractor(text_input: bool) -> Result<Arc<dyn TextExtractor>> {
    if text_input {
        // OCR never runs for text input.
        return Ok(Arc::new(TesseractEngine::new(TesseractConfig::default())));
    }
    Err(ScanflowError::Configuration(
        "the ocrs backend needs scanflow built with the `ocr` feature".into(),
    ))
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}
