// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract backend — runs the `tesseract` command-line program and reads the
// recognised text from its standard output.
//
// The executable location is part of the engine's configuration, so several
// engines with different installs can coexist in one process.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use scanflow_core::error::{Result, ScanflowError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::TextExtractor;

/// How to invoke Tesseract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TesseractConfig {
    /// Executable name or absolute path.
    pub binary: PathBuf,
    /// Language pack(s), e.g. `eng` or `eng+deu`.
    pub language: String,
    /// `--oem`: 3 selects the default engine for the installed data.
    pub engine_mode: u8,
    /// `--psm`: 6 treats the image as a single uniform block of text.
    pub page_segmentation_mode: u8,
}

impl Default for TesseractConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            language: "eng".into(),
            engine_mode: 3,
            page_segmentation_mode: 6,
        }
    }
}

/// OCR through an external `tesseract` process.
#[derive(Debug, Clone, Default)]
pub struct TesseractEngine {
    config: TesseractConfig,
}

impl TesseractEngine {
    pub fn new(config: TesseractConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TesseractConfig {
        &self.config
    }

    /// Arguments after the executable name: `<image> stdout -l .. --oem .. --psm ..`.
    fn command_args(&self, image_path: &Path) -> Vec<OsString> {
        vec![
            image_path.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.config.language.clone().into(),
            "--oem".into(),
            self.config.engine_mode.to_string().into(),
            "--psm".into(),
            self.config.page_segmentation_mode.to_string().into(),
        ]
    }
}

impl TextExtractor for TesseractEngine {
    #[instrument(skip(self), fields(binary = %self.config.binary.display(), lang = %self.config.language))]
    fn extract_text(&self, image_path: &Path) -> Result<String> {
        info!("Running tesseract");
        let output = Command::new(&self.config.binary)
            .args(self.command_args(image_path))
            .output()
            .map_err(|err| {
                ScanflowError::Ocr(format!(
                    "failed to run {}: {}",
                    self.config.binary.display(),
                    err
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanflowError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|err| ScanflowError::Ocr(format!("tesseract output is not UTF-8: {err}")))?;
        // Tesseract ends each page with a form feed.
        let text = text.trim_end_matches(['\x0c', '\n']).to_string();

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }
}
