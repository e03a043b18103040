// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every tool action ends in at most one message to the user. Each technical
// error maps to a plain English heading plus a suggestion, and a severity
// that drives how the UI presents it.

use crate::error::KhotiyanError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something odd happened; running the action again may work.
    Transient,
    /// User must change something (pick another file, fix a value).
    ActionRequired,
    /// The file or setup cannot be handled at all.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether trying the same action again is reasonable.
    pub retriable: bool,
    /// Severity level (drives colour in UI).
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: impl Into<String>, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }

    /// Single-line form for status bars.
    pub fn one_line(&self) -> String {
        format!("{} {}", self.message, self.suggestion)
    }
}

/// Convert a `KhotiyanError` into a `HumanError`.
pub fn humanize_error(err: &KhotiyanError) -> HumanError {
    match err {
        KhotiyanError::UnsupportedImage(_) => HumanError::new(
            "That file isn't an image we can open.",
            "Choose a PNG, JPEG, WEBP, BMP, GIF or TIFF file.",
            false,
            Severity::ActionRequired,
        ),

        KhotiyanError::UnsupportedFormat(detail) => HumanError::new(
            "That output format isn't available.",
            format!("Pick PNG, JPEG or WEBP instead. ({detail})"),
            false,
            Severity::ActionRequired,
        ),

        KhotiyanError::InvalidParameter(detail) => HumanError::new(
            "One of the settings is out of range.",
            format!("Check the numbers and try again. ({detail})"),
            false,
            Severity::ActionRequired,
        ),

        KhotiyanError::EmptySelection(detail) => HumanError::new(
            "Nothing to work on yet.",
            format!("Add a file first. ({detail})"),
            false,
            Severity::ActionRequired,
        ),

        KhotiyanError::ImageError(_) => HumanError::new(
            "Failed to process the image.",
            "The image may be damaged or in an unusual format. Please try again with a different image.",
            true,
            Severity::Transient,
        ),

        KhotiyanError::PdfError(_) => HumanError::new(
            "Failed to process the PDF.",
            "The file may be damaged or password protected. Please try again with a different PDF.",
            false,
            Severity::Permanent,
        ),

        KhotiyanError::PdfRenderUnavailable(_) => HumanError::new(
            "The PDF page renderer isn't installed.",
            "Install the pdfium library, or point Settings at libpdfium, then try again.",
            false,
            Severity::Permanent,
        ),

        KhotiyanError::BackgroundRemoval(_) => HumanError::new(
            "Failed to remove background.",
            "Please try again with a different image, or raise the tolerance in Settings.",
            true,
            Severity::Transient,
        ),

        KhotiyanError::ModelUnavailable(_) => HumanError::new(
            "The background model couldn't be loaded.",
            "Check the model path in Settings, or switch back to the built-in remover.",
            false,
            Severity::Permanent,
        ),

        KhotiyanError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError::new(
                "The file couldn't be found.",
                "It may have been moved or deleted. Try choosing the file again.",
                false,
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => HumanError::new(
                "The app doesn't have permission to use that file.",
                "Choose a different folder, or check the file permissions.",
                false,
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, your disk may be full.",
                true,
                Severity::Transient,
            ),
        },

        KhotiyanError::Serialization(_) => HumanError::new(
            "The settings file couldn't be read.",
            "Save your settings again to replace it.",
            true,
            Severity::Transient,
        ),
    }
}
