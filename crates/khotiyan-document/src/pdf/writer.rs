// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — build a PDF with one page per image using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{PdfPageLayout, mm_to_pt, pt_to_mm};
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::image::processor::{ImageProcessor, WHITE, flatten};
use crate::pdf::sequence::ImageSequence;

/// At 72 DPI one image pixel is one PDF point.
const PIXELS_PER_INCH: f32 = 72.0;

/// Title metadata embedded in the PDF /Info dictionary.
const TITLE: &str = "Images to PDF";

/// Where an image lands on its page, in PDF points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub x_pt: f32,
    pub y_pt: f32,
    /// Uniform scale applied to the image's native 1px = 1pt size.
    pub scale: f32,
}

/// Compute the page and image placement for a `width` x `height` image.
pub fn place_image(layout: &PdfPageLayout, width: u32, height: u32) -> Placement {
    let (w, h) = (width.max(1) as f32, height.max(1) as f32);
    match layout {
        PdfPageLayout::FitImage { max } => {
            let (max_w, max_h) = max.dimensions_pt();
            let scale = (max_w / w).min(max_h / h).min(1.0);
            Placement {
                page_width_pt: w * scale,
                page_height_pt: h * scale,
                x_pt: 0.0,
                y_pt: 0.0,
                scale,
            }
        }
        PdfPageLayout::Paper { size, margin_mm } => {
            let (page_w, page_h) = size.dimensions_pt();
            let margin = mm_to_pt((*margin_mm).max(0.0));
            let usable_w = (page_w - 2.0 * margin).max(1.0);
            let usable_h = (page_h - 2.0 * margin).max(1.0);
            let scale = (usable_w / w).min(usable_h / h).min(1.0);
            Placement {
                page_width_pt: page_w,
                page_height_pt: page_h,
                x_pt: (page_w - w * scale) / 2.0,
                y_pt: (page_h - h * scale) / 2.0,
                scale,
            }
        }
    }
}

/// Creates PDF documents from raster images.
pub struct PdfWriter {
    layout: PdfPageLayout,
}

impl PdfWriter {
    pub fn new(layout: PdfPageLayout) -> Self {
        Self { layout }
    }

    /// One page per image, in sequence order.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &ImageSequence) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(KhotiyanError::EmptySelection(
                "add at least one image to build a PDF".into(),
            ));
        }
        info!(layout = ?self.layout, "Creating image PDF");

        let mut doc = PdfDocument::new(TITLE);
        let mut pages: Vec<PdfPage> = Vec::new();

        for (index, image) in images.iter().enumerate() {
            // Transparency is composited onto white; PDF pages are opaque.
            let decoded = ImageProcessor::from_bytes(&image.bytes)?.into_dynamic();
            let rgb = flatten(&decoded, WHITE);
            let (width, height) = rgb.dimensions();

            let raw = RawImage {
                pixels: RawImageData::U8(rgb.into_raw()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = place_image(&self.layout, width, height);
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.x_pt)),
                    translate_y: Some(Pt(placement.y_pt)),
                    scale_x: Some(placement.scale),
                    scale_y: Some(placement.scale),
                    dpi: Some(PIXELS_PER_INCH),
                    rotate: None,
                },
            }];

            debug!(
                page = index + 1,
                width,
                height,
                scale = placement.scale,
                "Image placed on page"
            );
            pages.push(PdfPage::new(
                Mm(pt_to_mm(placement.page_width_pt)),
                Mm(pt_to_mm(placement.page_height_pt)),
                ops,
            ));
        }

        let page_count = pages.len();
        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }

        info!(pages = page_count, bytes = output.len(), "PDF created");
        Ok(output)
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new(PdfPageLayout::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use image::{DynamicImage, Rgba, RgbaImage};
    use khotiyan_core::PaperSize;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([30, 60, 90, 255]));
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .to_png_bytes()
            .unwrap()
    }

    fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
        assert!(
            (actual.0 - expected.0).abs() < 0.5 && (actual.1 - expected.1).abs() < 0.5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn small_image_page_matches_pixels() {
        let placement = place_image(&PdfPageLayout::default(), 300, 200);
        assert_eq!(placement.scale, 1.0);
        assert_eq!((placement.page_width_pt, placement.page_height_pt), (300.0, 200.0));
    }

    #[test]
    fn large_image_scaled_to_a4() {
        let placement = place_image(&PdfPageLayout::default(), 1190, 1684);
        assert!((placement.scale - 0.5).abs() < 0.001);
        assert_close(
            (placement.page_width_pt, placement.page_height_pt),
            (595.0, 842.0),
        );
        assert_eq!((placement.x_pt, placement.y_pt), (0.0, 0.0));
    }

    #[test]
    fn paper_layout_centres_image() {
        let layout = PdfPageLayout::Paper {
            size: PaperSize::A4,
            margin_mm: 10.0,
        };
        let placement = place_image(&layout, 100, 100);
        assert_eq!(placement.scale, 1.0);
        assert_eq!((placement.x_pt, placement.y_pt), (247.5, 371.0));
    }

    #[test]
    fn one_page_per_image_in_order() {
        let mut images = ImageSequence::new();
        images.push("wide.png", png(300, 100));
        images.push("tall.png", png(100, 300));
        images.push("square.png", png(50, 50));

        let bytes = PdfWriter::default().create_from_images(&images).unwrap();
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);

        let sizes = reader.page_sizes().unwrap();
        assert_close(sizes[0], (300.0, 100.0));
        assert_close(sizes[1], (100.0, 300.0));
        assert_close(sizes[2], (50.0, 50.0));
    }

    #[test]
    fn paper_pages_have_paper_size() {
        let writer = PdfWriter::new(PdfPageLayout::Paper {
            size: PaperSize::Letter,
            margin_mm: 12.0,
        });
        let mut images = ImageSequence::new();
        images.push("scan.png", png(2000, 1000));
        let bytes = writer.create_from_images(&images).unwrap();
        let sizes = PdfReader::from_bytes(&bytes).unwrap().page_sizes().unwrap();
        assert_eq!(sizes.len(), 1);
        assert_close(sizes[0], (612.0, 792.0));
    }

    #[test]
    fn empty_sequence_is_an_error() {
        let err = PdfWriter::default()
            .create_from_images(&ImageSequence::new())
            .unwrap_err();
        assert!(matches!(err, KhotiyanError::EmptySelection(_)));
    }
}
