// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode, resize, crop, flatten, and re-encode. Operates on
// in-memory images using the `image` crate.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{CropRect, Dimensions, OutputFormat, Quality};
use tracing::{debug, info, instrument};

/// White, the canvas fill used before JPEG and BMP encoding.
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Image processing pipeline operating on a single in-memory image.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// let bytes = ImageProcessor::from_bytes(&data)?
///     .crop(CropRect::new(10, 10, 200, 100))
///     .resize_exact(400, 200)?
///     .encode(OutputFormat::Png, Quality::MAX)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (PNG, JPEG, WEBP, ...).
    ///
    /// Bytes whose format cannot be recognised at all are reported as
    /// [`KhotiyanError::UnsupportedImage`]; recognised but broken data as
    /// [`KhotiyanError::ImageError`].
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let format = image::guess_format(data)
            .map_err(|err| KhotiyanError::UnsupportedImage(err.to_string()))?;
        let img = image::load_from_memory_with_format(data, format).map_err(|err| {
            KhotiyanError::ImageError(format!("failed to decode {format:?} image: {err}"))
        })?;
        debug!(
            width = img.width(),
            height = img.height(),
            ?format,
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Resize to exactly `width` x `height`, ignoring aspect ratio. Aspect
    /// locking is the caller's job (see [`Dimensions::with_width`]).
    #[instrument(skip(self), fields(width, height))]
    pub fn resize_exact(self, width: u32, height: u32) -> Result<Self> {
        Dimensions::new(width, height).check_output()?;
        if (width, height) == (self.image.width(), self.image.height()) {
            return Ok(self);
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            width,
            height,
            "Resizing image"
        );
        let resized = self.image.resize_exact(width, height, FilterType::Lanczos3);
        Ok(Self { image: resized })
    }

    /// Crop a rectangular region. The rectangle is clamped to the image.
    #[instrument(skip(self))]
    pub fn crop(self, rect: CropRect) -> Self {
        let safe = rect.clamp_to(self.image.width(), self.image.height());
        if safe == CropRect::full(self.image.width(), self.image.height()) {
            return self;
        }
        info!(
            x = safe.x,
            y = safe.y,
            width = safe.width,
            height = safe.height,
            "Cropping image"
        );
        let cropped = self.image.crop_imm(safe.x, safe.y, safe.width, safe.height);
        Self { image: cropped }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image. `quality` applies to JPEG only; JPEG output
    /// is composited onto white first.
    pub fn encode(&self, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
        encode_image(&self.image, format, quality)
    }

    /// Encode as PNG.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_image(&self.image, OutputFormat::Png, Quality::MAX)
    }
}

/// Composite `image` over `background` using its alpha channel.
pub fn flatten(image: &DynamicImage, background: Rgb<u8>) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
        let alpha = a as u32;
        let blend = |fg: u8, bg: u8| -> u8 {
            ((fg as u32 * alpha + bg as u32 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([
            blend(r, background[0]),
            blend(g, background[1]),
            blend(b, background[2]),
        ])
    })
}

/// The `image` crate's identifier for an output format.
pub fn image_format(format: OutputFormat) -> ImageFormat {
    match format {
        OutputFormat::Png => ImageFormat::Png,
        OutputFormat::Jpeg => ImageFormat::Jpeg,
        OutputFormat::Webp => ImageFormat::WebP,
        OutputFormat::Bmp => ImageFormat::Bmp,
        OutputFormat::Gif => ImageFormat::Gif,
        OutputFormat::Tiff => ImageFormat::Tiff,
    }
}

/// Map a sniffed input format back to an output format, where one exists.
pub fn output_format(format: ImageFormat) -> Option<OutputFormat> {
    OutputFormat::ALL
        .into_iter()
        .find(|candidate| image_format(*candidate) == format)
}

/// Encode `image` in `format`, returning the raw bytes.
pub fn encode_image(image: &DynamicImage, format: OutputFormat, quality: Quality) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoded = match format {
        OutputFormat::Jpeg => {
            let rgb = flatten(image, WHITE);
            let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.to_percent());
            rgb.write_with_encoder(encoder)
        }
        OutputFormat::Png => {
            let encoder =
                PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, PngFilter::Adaptive);
            image.write_with_encoder(encoder)
        }
        OutputFormat::Webp => {
            let rgba = image.to_rgba8();
            rgba.write_with_encoder(WebPEncoder::new_lossless(&mut buffer))
        }
        OutputFormat::Bmp => {
            DynamicImage::ImageRgb8(flatten(image, WHITE))
                .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Bmp)
        }
        OutputFormat::Gif | OutputFormat::Tiff => {
            DynamicImage::ImageRgba8(image.to_rgba8())
                .write_to(&mut Cursor::new(&mut buffer), image_format(format))
        }
    };
    encoded.map_err(|err| {
        KhotiyanError::ImageError(format!("{} encoding failed: {err}", format.label()))
    })?;
    debug!(format = format.label(), bytes = buffer.len(), "Image encoded");
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn checker(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgba([200, 30, 30, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }

    #[test]
    fn rejects_non_image_bytes() {
        let err = ImageProcessor::from_bytes(b"just some text").err().unwrap();
        assert!(matches!(err, KhotiyanError::UnsupportedImage(_)));
    }

    #[test]
    fn resize_exact_ignores_aspect() {
        let out = ImageProcessor::from_dynamic(checker(40, 20))
            .resize_exact(10, 30)
            .unwrap();
        assert_eq!(out.dimensions(), Dimensions::new(10, 30));
    }

    #[test]
    fn resize_exact_rejects_zero() {
        let result = ImageProcessor::from_dynamic(checker(4, 4)).resize_exact(0, 3);
        assert!(matches!(result, Err(KhotiyanError::InvalidParameter(_))));
    }

    #[test]
    fn crop_clamps_to_bounds() {
        let out = ImageProcessor::from_dynamic(checker(50, 40)).crop(CropRect::new(30, 30, 100, 100));
        assert_eq!(out.dimensions(), Dimensions::new(20, 10));
    }

    #[test]
    fn jpeg_is_flattened_onto_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 0])));
        let bytes = encode_image(&transparent, OutputFormat::Jpeg, Quality::MAX).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert!(decoded.pixels().all(|p| p.0.iter().all(|&c| c > 245)));
    }

    #[test]
    fn bmp_is_flattened_onto_white() {
        let transparent = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        let bytes = encode_image(&transparent, OutputFormat::Bmp, Quality::default()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());
        assert!(decoded.to_rgb8().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn resize_exact_rejects_oversized_canvas() {
        let result = ImageProcessor::from_dynamic(checker(4, 4)).resize_exact(u32::MAX, u32::MAX);
        assert!(matches!(result, Err(KhotiyanError::InvalidParameter(_))));
    }

    #[test]
    fn every_format_encodes_and_sniffs_back() {
        let img = checker(16, 16);
        for format in OutputFormat::ALL {
            let bytes = encode_image(&img, format, Quality::default()).unwrap();
            let sniffed = image::guess_format(&bytes).unwrap();
            assert_eq!(output_format(sniffed), Some(format));
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (16, 16), "{format:?}");
        }
    }

    #[test]
    fn png_keeps_alpha() {
        let bytes = ImageProcessor::from_dynamic(checker(8, 8)).to_png_bytes().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
    }

    #[test]
    fn flatten_blends_half_alpha() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 128])));
        let flat = flatten(&img, WHITE);
        let value = flat.get_pixel(0, 0)[0];
        assert!((126..=128).contains(&value), "got {value}");
    }
}
