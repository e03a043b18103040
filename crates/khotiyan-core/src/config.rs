// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{OutputFormat, PdfPageLayout, Quality};

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings. Each tool page starts from these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Pre-selected target of the format converter.
    pub default_convert_format: OutputFormat,
    /// Pre-selected converter quality (JPEG only).
    pub default_quality: Quality,
    /// Compression target size in megabytes (0.1–5.0).
    pub compress_max_size_mb: f32,
    /// Longest side after compression, in pixels.
    pub compress_max_dimension: u32,
    /// Starting quality for compression.
    pub compress_initial_quality: Quality,
    /// Page render scale for PDF to image (1.0–4.0).
    pub pdf_render_scale: f32,
    /// Image format for rendered PDF pages (PNG or JPEG).
    pub pdf_render_format: OutputFormat,
    /// Page placement when building a PDF from images.
    pub pdf_page_layout: PdfPageLayout,
    /// Colour distance treated as background by the built-in remover.
    pub background_tolerance: f32,
    /// Edge softening applied to the background mask (0 disables).
    pub background_feather: f32,
    /// Explicit location of the pdfium shared library.
    pub pdfium_library_path: Option<PathBuf>,
    /// `.rten` matting model; when set and the `ml` feature is built the
    /// model replaces the built-in remover.
    pub matting_model_path: Option<PathBuf>,
    /// Record saved results on the home page.
    pub keep_history: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_convert_format: OutputFormat::Png,
            default_quality: Quality::default(),
            compress_max_size_mb: 1.0,
            compress_max_dimension: 1920,
            compress_initial_quality: Quality::new(0.8).unwrap_or_default(),
            pdf_render_scale: 2.0,
            pdf_render_format: OutputFormat::Png,
            pdf_page_layout: PdfPageLayout::default(),
            background_tolerance: 40.0,
            background_feather: 1.5,
            pdfium_library_path: None,
            matting_model_path: None,
            keep_history: true,
        }
    }
}

impl AppConfig {
    /// Load from `<dir>/config.json`. `Ok(None)` when there is no file yet;
    /// an unreadable or malformed file is an error.
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let data = match std::fs::read_to_string(dir.join(CONFIG_FILE)) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Write to `<dir>/config.json` as pretty JSON.
    pub fn persist(&self, dir: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(dir.join(CONFIG_FILE), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KhotiyanError;
    use crate::types::PaperSize;

    #[test]
    fn persist_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            default_convert_format: OutputFormat::Webp,
            pdf_page_layout: PdfPageLayout::Paper {
                size: PaperSize::Letter,
                margin_mm: 10.0,
            },
            keep_history: false,
            ..AppConfig::default()
        };
        config.persist(dir.path()).unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), Some(config));
    }

    #[test]
    fn missing_file_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), None);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "compress_max_size_mb": 2.5 }"#).unwrap();
        let config = AppConfig::load(dir.path()).unwrap().unwrap();
        assert_eq!(config.compress_max_size_mb, 2.5);
        assert_eq!(config.compress_max_dimension, 1920);
    }

    #[test]
    fn out_of_range_quality_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{ "default_quality": 4.0 }"#).unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, KhotiyanError::Serialization(_)));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let err = AppConfig::load(dir.path()).unwrap_err();
        assert!(matches!(err, KhotiyanError::Serialization(_)));
    }
}
