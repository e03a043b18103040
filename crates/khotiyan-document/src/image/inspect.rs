// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cheap header probing, without decoding pixel data.

use std::io::Cursor;

use image::{ImageDecoder, ImageFormat, ImageReader};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{Dimensions, OutputFormat};

use crate::image::processor::output_format;

/// What the preview labels show about an input file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub byte_len: u64,
    pub has_alpha: bool,
}

impl ImageInfo {
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// The matching output format, when this crate can write it back.
    pub fn output_format(&self) -> Option<OutputFormat> {
        output_format(self.format)
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.to_mime_type()
    }
}

/// Read format, size and alpha from the image header.
pub fn inspect_image(bytes: &[u8]) -> Result<ImageInfo> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let format = reader
        .format()
        .ok_or_else(|| KhotiyanError::UnsupportedImage("unrecognised image data".into()))?;
    let decoder = reader
        .into_decoder()
        .map_err(|err| KhotiyanError::ImageError(format!("cannot read {format:?} header: {err}")))?;
    let (width, height) = decoder.dimensions();
    Ok(ImageInfo {
        format,
        width,
        height,
        byte_len: bytes.len() as u64,
        has_alpha: decoder.color_type().has_alpha(),
    })
}

/// Whether `bytes` start with a recognised image signature.
pub fn is_image(bytes: &[u8]) -> bool {
    image::guess_format(bytes).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::ImageProcessor;
    use image::{DynamicImage, Rgb, RgbImage};
    use khotiyan_core::Quality;

    #[test]
    fn header_is_read_without_decoding() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(33, 21, Rgb([1, 2, 3])));
        let jpeg = ImageProcessor::from_dynamic(img)
            .encode(OutputFormat::Jpeg, Quality::default())
            .unwrap();
        let info = inspect_image(&jpeg).unwrap();
        assert_eq!(info.format, ImageFormat::Jpeg);
        assert_eq!(info.dimensions(), Dimensions::new(33, 21));
        assert_eq!(info.byte_len, jpeg.len() as u64);
        assert!(!info.has_alpha);
        assert_eq!(info.output_format(), Some(OutputFormat::Jpeg));
        assert_eq!(info.mime_type(), "image/jpeg");
    }

    #[test]
    fn rgba_png_reports_alpha() {
        let img = DynamicImage::new_rgba8(4, 4);
        let png = ImageProcessor::from_dynamic(img).to_png_bytes().unwrap();
        assert!(inspect_image(&png).unwrap().has_alpha);
    }

    #[test]
    fn pdf_is_not_an_image() {
        let pdf = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\n";
        assert!(!is_image(pdf));
        assert!(matches!(inspect_image(pdf), Err(KhotiyanError::UnsupportedImage(_))));
    }
}
