// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Input validation — make sure an uploaded file is a readable image before
// any pipeline stage runs.

use std::path::Path;

use image::{ImageFormat, ImageReader};
use scanflow_core::error::{Result, ScanflowError};
use tracing::{info, instrument};

/// Basic facts about a validated input image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub format: ImageFormat,
}

/// Check that `path` exists and holds a decodable image.
///
/// Only the header is decoded, so this is cheap even for large scans.
///
/// # Errors
///
/// Returns [`ScanflowError::Input`] when the file is missing, unreadable, not
/// an image, or has an invalid header.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn validate_image(path: &Path) -> Result<ImageInfo> {
    if !path.is_file() {
        return Err(ScanflowError::Input(format!(
            "{} does not exist or is not a file",
            path.display()
        )));
    }

    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|err| {
            ScanflowError::Input(format!("failed to read {}: {}", path.display(), err))
        })?;

    let format = reader.format().ok_or_else(|| {
        ScanflowError::Input(format!("{} is not a recognised image", path.display()))
    })?;

    let (width, height) = reader.into_dimensions().map_err(|err| {
        ScanflowError::Input(format!("failed to decode {}: {}", path.display(), err))
    })?;

    info!(width, height, ?format, "Input image accepted");
    Ok(ImageInfo {
        width,
        height,
        format,
    })
}
