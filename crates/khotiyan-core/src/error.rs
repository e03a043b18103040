// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Khotiyan.

use thiserror::Error;

/// Top-level error type for all Khotiyan operations.
#[derive(Debug, Error)]
pub enum KhotiyanError {
    // -- Input errors --
    #[error("not an image: {0}")]
    UnsupportedImage(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("nothing selected: {0}")]
    EmptySelection(String),

    // -- Processing errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("PDF renderer unavailable: {0}")]
    PdfRenderUnavailable(String),

    #[error("background removal failed: {0}")]
    BackgroundRemoval(String),

    #[error("matting model unavailable: {0}")]
    ModelUnavailable(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KhotiyanError>;
