// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The resize tool: optional crop, then scale to the requested canvas, PNG out.

use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{CropRect, Dimensions};
use tracing::{info, instrument};

use crate::image::processor::ImageProcessor;

/// What the resize page asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    /// Region of the source to keep, in source pixels.
    pub crop: Option<CropRect>,
    /// Final canvas size. Aspect is not enforced here.
    pub dimensions: Dimensions,
}

impl ResizeRequest {
    pub fn new(dimensions: Dimensions) -> Self {
        Self {
            crop: None,
            dimensions,
        }
    }

    pub fn with_crop(mut self, crop: CropRect) -> Self {
        self.crop = Some(crop);
        self
    }
}

/// Crop (when requested) and resize `bytes`, returning PNG.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn resize_image(bytes: &[u8], request: ResizeRequest) -> Result<Vec<u8>> {
    let target = request.dimensions;
    target.check_output()?;

    let mut processor = ImageProcessor::from_bytes(bytes)?;
    if let Some(rect) = request.crop {
        processor = processor.crop(rect);
    }
    let processor = processor.resize_exact(target.width, target.height)?;
    let png = processor.to_png_bytes()?;

    info!(%target, out_len = png.len(), "Resize complete");
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    /// Left half red, right half blue.
    fn split_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        ImageProcessor::from_dynamic(DynamicImage::ImageRgb8(img))
            .to_png_bytes()
            .unwrap()
    }

    #[test]
    fn output_has_requested_size() {
        let out = resize_image(&split_png(200, 100), ResizeRequest::new(Dimensions::new(50, 80))).unwrap();
        assert_eq!(image::guess_format(&out).unwrap(), image::ImageFormat::Png);
        let decoded = image::load_from_memory(&out).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 80));
    }

    #[test]
    fn crop_happens_before_resize() {
        // Keep only the blue half, then blow it up.
        let request = ResizeRequest::new(Dimensions::new(40, 40))
            .with_crop(CropRect::new(100, 0, 100, 100));
        let out = resize_image(&split_png(200, 100), request).unwrap();
        let decoded = image::load_from_memory(&out).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p[2] > 200 && p[0] < 50));
    }

    #[test]
    fn huge_target_rejected_before_allocating() {
        let request = ResizeRequest::new(Dimensions::new(u32::MAX, u32::MAX));
        let err = resize_image(&split_png(4, 4), request).unwrap_err();
        assert!(matches!(err, KhotiyanError::InvalidParameter(_)));

        let tall = ResizeRequest::new(Dimensions::new(1, Dimensions::MAX_SIDE + 1));
        assert!(resize_image(&split_png(4, 4), tall).is_err());
    }

    #[test]
    fn zero_dimension_rejected() {
        let err = resize_image(&split_png(10, 10), ResizeRequest::new(Dimensions::new(0, 10)))
            .unwrap_err();
        assert!(matches!(err, KhotiyanError::InvalidParameter(_)));
    }
}
