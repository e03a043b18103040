// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF rasteriser — render every page to an image with pdfium.
//
// pdfium is bound at runtime. Lookup order: an explicitly configured path
// (file or directory), the directory holding the executable, then the system
// library search path.

use std::path::Path;

use image::{DynamicImage, RgbaImage};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::naming;
use khotiyan_core::{OutputFormat, Quality};
use pdfium_render::prelude::{PdfRenderConfig, Pdfium, PdfiumLibraryBindings};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::encode_image;
use crate::pdf::reader::is_pdf;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 4.0;
/// Slider granularity on the PDF page.
pub const SCALE_STEP: f32 = 0.5;

/// How pages are rendered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    /// Multiplier on the page's size in points.
    pub scale: f32,
    /// PNG or JPEG.
    pub format: OutputFormat,
    /// JPEG quality; ignored for PNG.
    pub quality: Quality,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 2.0,
            format: OutputFormat::Png,
            quality: Quality::default(),
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<()> {
        if !(MIN_SCALE..=MAX_SCALE).contains(&self.scale) {
            return Err(KhotiyanError::InvalidParameter(format!(
                "render scale must be between {MIN_SCALE} and {MAX_SCALE}, got {}",
                self.scale
            )));
        }
        if !matches!(self.format, OutputFormat::Png | OutputFormat::Jpeg) {
            return Err(KhotiyanError::InvalidParameter(format!(
                "pages render to PNG or JPEG, not {}",
                self.format.label()
            )));
        }
        Ok(())
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// 1-based.
    pub page_number: u32,
    pub width: u32,
    pub height: u32,
    pub format: OutputFormat,
    pub bytes: Vec<u8>,
}

impl RenderedPage {
    /// Default download name, e.g. `page-3.png`.
    pub fn file_name(&self) -> String {
        naming::page_name(self.page_number, self.format)
    }
}

/// A bound pdfium instance.
pub struct PdfRasterizer {
    pdfium: Pdfium,
}

impl PdfRasterizer {
    /// Bind pdfium, trying `library` first when given.
    #[instrument]
    pub fn load(library: Option<&Path>) -> Result<Self> {
        let bindings = bind(library)?;
        info!("pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Render every page of `pdf` in order.
    #[instrument(skip(self, pdf), fields(bytes_len = pdf.len()))]
    pub fn render(&self, pdf: &[u8], settings: &RenderSettings) -> Result<Vec<RenderedPage>> {
        settings.validate()?;
        ensure_pdf(pdf)?;

        let document = self
            .pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|err| KhotiyanError::PdfError(format!("failed to open PDF: {err:?}")))?;
        let config = PdfRenderConfig::new().scale_page_by_factor(settings.scale);

        let mut rendered = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let page_number = index as u32 + 1;
            let bitmap = page.render_with_config(&config).map_err(|err| {
                KhotiyanError::PdfError(format!("failed to render page {page_number}: {err:?}"))
            })?;
            let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
            let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
                KhotiyanError::PdfError(format!("page {page_number} bitmap has the wrong size"))
            })?;
            let bytes = encode_image(&DynamicImage::ImageRgba8(rgba), settings.format, settings.quality)?;
            debug!(page_number, width, height, len = bytes.len(), "Page rendered");
            rendered.push(RenderedPage {
                page_number,
                width,
                height,
                format: settings.format,
                bytes,
            });
        }

        info!(pages = rendered.len(), scale = settings.scale, "PDF rendered");
        Ok(rendered)
    }
}

fn ensure_pdf(bytes: &[u8]) -> Result<()> {
    if is_pdf(bytes) {
        Ok(())
    } else {
        Err(KhotiyanError::PdfError("not a PDF file".into()))
    }
}

fn bind(library: Option<&Path>) -> Result<Box<dyn PdfiumLibraryBindings>> {
    if let Some(path) = library {
        let candidate = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(path)
        } else {
            path.to_path_buf()
        };
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => return Ok(bindings),
            Err(err) => warn!(path = %candidate.display(), "configured pdfium failed: {err:?}"),
        }
    }

    if let Some(dir) = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
        && let Ok(bindings) =
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
    {
        return Ok(bindings);
    }

    Pdfium::bind_to_system_library().map_err(|err| {
        KhotiyanError::PdfRenderUnavailable(format!(
            "pdfium library not found; set its location in Settings ({err:?})"
        ))
    })
}
