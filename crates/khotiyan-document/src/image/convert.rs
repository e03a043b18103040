// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Format conversion: decode any supported image and re-encode it.

use khotiyan_core::error::Result;
use khotiyan_core::{Dimensions, OutputFormat, Quality};
use tracing::{info, instrument};

use crate::image::processor::ImageProcessor;

/// A re-encoded image.
#[derive(Debug, Clone)]
pub struct Converted {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
}

impl Converted {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// Convert `bytes` to `format`. The pixel size is unchanged; JPEG and BMP
/// output is filled white where the source was transparent.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn convert_image(bytes: &[u8], format: OutputFormat, quality: Quality) -> Result<Converted> {
    let processor = ImageProcessor::from_bytes(bytes)?;
    let encoded = processor.encode(format, quality)?;
    info!(
        to = format.label(),
        in_len = bytes.len(),
        out_len = encoded.len(),
        "Image converted"
    );
    Ok(Converted {
        bytes: encoded,
        format,
        width: processor.width(),
        height: processor.height(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};
    use khotiyan_core::KhotiyanError;

    fn transparent_png() -> Vec<u8> {
        let img = RgbaImage::from_pixel(12, 8, Rgba([0, 0, 255, 0]));
        ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .to_png_bytes()
            .unwrap()
    }

    #[test]
    fn png_to_jpeg_fills_white() {
        let converted = convert_image(&transparent_png(), OutputFormat::Jpeg, Quality::MAX).unwrap();
        assert_eq!(converted.dimensions(), Dimensions::new(12, 8));
        let decoded = image::load_from_memory(&converted.bytes).unwrap().to_rgb8();
        let px = decoded.get_pixel(6, 4);
        assert!(px.0.iter().all(|&c| c > 240), "expected white, got {px:?}");
    }

    #[test]
    fn png_to_webp_keeps_transparency() {
        let converted = convert_image(&transparent_png(), OutputFormat::Webp, Quality::default()).unwrap();
        assert_eq!(
            image::guess_format(&converted.bytes).unwrap(),
            image::ImageFormat::WebP
        );
        let decoded = image::load_from_memory(&converted.bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn lower_quality_gives_smaller_jpeg() {
        let img = RgbaImage::from_fn(64, 64, |x, y| {
            Rgba([(x * 4) as u8, (y * 4) as u8, ((x ^ y) * 4) as u8, 255])
        });
        let png = ImageProcessor::from_dynamic(DynamicImage::ImageRgba8(img))
            .to_png_bytes()
            .unwrap();
        let high = convert_image(&png, OutputFormat::Jpeg, Quality::MAX).unwrap();
        let low = convert_image(&png, OutputFormat::Jpeg, Quality::new(0.1).unwrap()).unwrap();
        assert!(low.bytes.len() < high.bytes.len());
    }

    #[test]
    fn text_is_not_an_image() {
        let err = convert_image(b"hello", OutputFormat::Png, Quality::MAX).unwrap_err();
        assert!(matches!(err, KhotiyanError::UnsupportedImage(_)));
    }
}
