// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Size-targeted compression.
//
// The image is first capped to a maximum side length, then re-encoded with
// progressively lower quality and smaller dimensions until it fits under the
// byte budget or the iteration budget runs out.

use image::{DynamicImage, ImageFormat, imageops::FilterType};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::naming;
use khotiyan_core::{Dimensions, OutputFormat, Quality};
use tracing::{debug, info, instrument};

use crate::image::processor::{ImageProcessor, encode_image, output_format};

/// Each retry multiplies quality and both sides by this factor.
const STEP: f32 = 0.9;
/// Quality never drops below this.
const QUALITY_FLOOR: f32 = 0.05;

const BYTES_PER_MB: f32 = 1024.0 * 1024.0;

/// Bounds for [`compress`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionSettings {
    pub max_size_bytes: u64,
    pub max_dimension: u32,
    pub initial_quality: Quality,
    pub max_iterations: u32,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            max_size_bytes: BYTES_PER_MB as u64,
            max_dimension: 1920,
            initial_quality: Quality::new(0.8).unwrap_or_default(),
            max_iterations: 10,
        }
    }
}

impl CompressionSettings {
    /// Settings with a size budget in megabytes, as chosen on the slider
    /// (0.1 to 5.0 MB).
    pub fn from_megabytes(mb: f32) -> Result<Self> {
        if !(0.1..=5.0).contains(&mb) {
            return Err(KhotiyanError::InvalidParameter(format!(
                "maximum size must be between 0.1 and 5 MB, got {mb}"
            )));
        }
        Ok(Self {
            max_size_bytes: (mb * BYTES_PER_MB).round() as u64,
            ..Self::default()
        })
    }

    fn validate(&self) -> Result<()> {
        if self.max_size_bytes == 0 {
            return Err(KhotiyanError::InvalidParameter(
                "maximum size must be positive".into(),
            ));
        }
        if self.max_dimension == 0 {
            return Err(KhotiyanError::InvalidParameter(
                "maximum dimension must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Result of [`compress`].
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub bytes: Vec<u8>,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    /// Quality of the last encode (the initial quality for lossless output).
    pub quality: Quality,
    /// Retries after the first encode.
    pub iterations: u32,
    pub original_len: u64,
}

impl CompressionOutcome {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn reduction_percent(&self) -> f64 {
        naming::reduction_percent(self.original_len, self.bytes.len() as u64)
    }

    /// Download name for a result compressed from `original_name`.
    pub fn file_name(&self, original_name: &str) -> String {
        naming::compressed_name(original_name, self.format)
    }
}

/// Compress `bytes` to fit `settings`. PNG input stays PNG; anything else
/// becomes JPEG.
#[instrument(skip(bytes), fields(bytes_len = bytes.len()))]
pub fn compress(bytes: &[u8], settings: &CompressionSettings) -> Result<CompressionOutcome> {
    settings.validate()?;

    let input_format = image::guess_format(bytes)
        .map_err(|err| KhotiyanError::UnsupportedImage(err.to_string()))?;
    let processor = ImageProcessor::from_bytes(bytes)?;
    let original_dims = processor.dimensions();
    let source = processor.into_dynamic();

    let format = if input_format == ImageFormat::Png {
        OutputFormat::Png
    } else {
        OutputFormat::Jpeg
    };

    let mut dims = original_dims.fit_within(settings.max_dimension);
    let mut quality = settings.initial_quality;
    let mut encoded = encode_at(&source, dims, format, quality)?;
    let mut iterations = 0;

    while encoded.len() as u64 > settings.max_size_bytes && iterations < settings.max_iterations {
        let next_dims = shrink(dims);
        let next_quality = if format.uses_quality() {
            quality.scaled(STEP, QUALITY_FLOOR)
        } else {
            quality
        };
        if next_dims == dims && next_quality == quality {
            break;
        }
        dims = next_dims;
        quality = next_quality;
        iterations += 1;
        encoded = encode_at(&source, dims, format, quality)?;
        debug!(
            iterations,
            %dims,
            quality = quality.value(),
            len = encoded.len(),
            "Compression retry"
        );
    }

    let original_len = bytes.len() as u64;
    let input_within_bounds = original_len <= settings.max_size_bytes
        && original_dims.width.max(original_dims.height) <= settings.max_dimension;
    if encoded.len() as u64 >= original_len && input_within_bounds {
        info!(original_len, "Re-encoding did not help, keeping original");
        return Ok(CompressionOutcome {
            bytes: bytes.to_vec(),
            format: output_format(input_format).unwrap_or(format),
            width: original_dims.width,
            height: original_dims.height,
            quality: settings.initial_quality,
            iterations,
            original_len,
        });
    }

    info!(
        original_len,
        compressed_len = encoded.len(),
        iterations,
        format = format.label(),
        "Compression complete"
    );
    Ok(CompressionOutcome {
        bytes: encoded,
        format,
        width: dims.width,
        height: dims.height,
        quality,
        iterations,
        original_len,
    })
}

fn encode_at(
    source: &DynamicImage,
    dims: Dimensions,
    format: OutputFormat,
    quality: Quality,
) -> Result<Vec<u8>> {
    if (dims.width, dims.height) == (source.width(), source.height()) {
        return encode_image(source, format, quality);
    }
    let resized = source.resize_exact(dims.width, dims.height, FilterType::Lanczos3);
    encode_image(&resized, format, quality)
}

fn shrink(dims: Dimensions) -> Dimensions {
    let scale = |side: u32| ((side as f32 * STEP).round() as u32).max(1);
    Dimensions::new(scale(dims.width), scale(dims.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Deterministic noise; incompressible enough to force retries.
    fn noise(width: u32, height: u32) -> DynamicImage {
        let mut state: u32 = 0x2545_f491;
        let img = RgbImage::from_fn(width, height, |_, _| {
            let mut next = || {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 24) as u8
            };
            Rgb([next(), next(), next()])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn settings(max_size_bytes: u64) -> CompressionSettings {
        CompressionSettings {
            max_size_bytes,
            max_iterations: 20,
            ..CompressionSettings::default()
        }
    }

    #[test]
    fn jpeg_shrinks_under_budget() {
        let input = encode_image(&noise(256, 256), OutputFormat::Jpeg, Quality::MAX).unwrap();
        let limit = input.len() as u64 / 8;
        let out = compress(&input, &settings(limit)).unwrap();
        assert_eq!(out.format, OutputFormat::Jpeg);
        assert!(out.bytes.len() as u64 <= limit, "{} > {limit}", out.bytes.len());
        assert!(out.iterations > 0);
        assert!(out.quality < Quality::new(0.8).unwrap());
        assert!(out.reduction_percent() >= 87.0);
    }

    #[test]
    fn png_stays_png_and_only_shrinks() {
        let input = encode_image(&noise(128, 128), OutputFormat::Png, Quality::MAX).unwrap();
        let limit = input.len() as u64 / 4;
        let out = compress(&input, &settings(limit)).unwrap();
        assert_eq!(out.format, OutputFormat::Png);
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Png);
        assert!(out.bytes.len() as u64 <= limit);
        assert!(out.width < 128);
        assert_eq!(out.quality, CompressionSettings::default().initial_quality);
    }

    #[test]
    fn small_input_is_returned_unchanged() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([9, 9, 9])));
        let input = encode_image(&img, OutputFormat::Png, Quality::MAX).unwrap();
        let out = compress(&input, &CompressionSettings::default()).unwrap();
        assert_eq!(out.bytes, input);
        assert_eq!(out.iterations, 0);
        assert_eq!(out.reduction_percent(), 0.0);
    }

    #[test]
    fn bmp_becomes_jpeg_and_is_named_so() {
        let input = encode_image(&noise(300, 300), OutputFormat::Bmp, Quality::MAX).unwrap();
        let out = compress(&input, &CompressionSettings::default()).unwrap();
        assert_eq!(out.format, OutputFormat::Jpeg);
        assert_eq!(image::guess_format(&out.bytes).unwrap(), ImageFormat::Jpeg);
        assert_eq!(out.file_name("cat.bmp"), "compressed-cat.jpeg");
    }

    #[test]
    fn unchanged_png_keeps_its_name() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([9, 9, 9])));
        let input = encode_image(&img, OutputFormat::Png, Quality::MAX).unwrap();
        let out = compress(&input, &CompressionSettings::default()).unwrap();
        assert_eq!(out.file_name("icon.png"), "compressed-icon.png");
    }

    #[test]
    fn chosen_quality_drives_first_encode() {
        let input = encode_image(&noise(200, 200), OutputFormat::Jpeg, Quality::MAX).unwrap();
        let at = |q: f32| {
            let settings = CompressionSettings {
                initial_quality: Quality::new(q).unwrap(),
                ..settings(10 * 1024 * 1024)
            };
            compress(&input, &settings).unwrap()
        };
        let low = at(0.3);
        let high = at(0.9);
        assert_eq!(low.iterations, 0);
        assert_eq!(low.quality.value(), 0.3);
        assert!(low.bytes.len() < high.bytes.len());
    }

    #[test]
    fn long_side_capped() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(4000, 10, Rgb([200, 10, 10])));
        let input = encode_image(&img, OutputFormat::Jpeg, Quality::MAX).unwrap();
        let out = compress(&input, &CompressionSettings::default()).unwrap();
        assert_eq!(out.width, 1920);
        assert_eq!(out.height, 5);
    }

    #[test]
    fn iteration_budget_is_respected() {
        let input = encode_image(&noise(64, 64), OutputFormat::Jpeg, Quality::MAX).unwrap();
        let out = compress(
            &input,
            &CompressionSettings {
                max_size_bytes: 1,
                max_iterations: 3,
                ..CompressionSettings::default()
            },
        )
        .unwrap();
        assert_eq!(out.iterations, 3);
        assert!(out.bytes.len() > 1);
    }

    #[test]
    fn invalid_settings_rejected() {
        assert!(CompressionSettings::from_megabytes(0.0).is_err());
        assert!(CompressionSettings::from_megabytes(6.0).is_err());
        assert_eq!(
            CompressionSettings::from_megabytes(0.5).unwrap().max_size_bytes,
            524_288
        );
        let err = compress(b"not an image", &CompressionSettings::default()).unwrap_err();
        assert!(matches!(err, KhotiyanError::UnsupportedImage(_)));
    }
}
