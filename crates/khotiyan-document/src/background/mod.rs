// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Background removal.
//
// A remover produces a foreground mask (255 = keep, 0 = drop); the mask
// becomes the alpha channel of the output. The built-in border-keyed remover
// needs no model. With the `ml` feature a salient-object matting model can
// be used instead.

pub mod border_key;
#[cfg(feature = "ml")]
pub mod matting;

use image::{DynamicImage, GrayImage, RgbaImage};
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{AppConfig, OutputFormat, Quality};
use tracing::{info, instrument};

use crate::image::processor::{ImageProcessor, encode_image};

pub use border_key::BorderKeyRemover;
#[cfg(feature = "ml")]
pub use matting::MattingModel;

/// Something that can separate foreground from background.
pub trait BackgroundRemover: Send + Sync {
    /// Short name for logs and the UI.
    fn name(&self) -> &str;

    /// Foreground mask with the same size as `image`.
    fn mask(&self, image: &DynamicImage) -> Result<GrayImage>;

    /// `image` with the background made transparent.
    fn remove(&self, image: &DynamicImage) -> Result<RgbaImage> {
        let mask = self.mask(image)?;
        apply_alpha_mask(image, &mask)
    }
}

/// Multiply the image's alpha by `mask`.
pub fn apply_alpha_mask(image: &DynamicImage, mask: &GrayImage) -> Result<RgbaImage> {
    if mask.dimensions() != (image.width(), image.height()) {
        return Err(KhotiyanError::BackgroundRemoval(format!(
            "mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            image.width(),
            image.height()
        )));
    }
    let mut rgba = image.to_rgba8();
    for (pixel, keep) in rgba.pixels_mut().zip(mask.pixels()) {
        pixel[3] = ((pixel[3] as u32 * keep[0] as u32 + 127) / 255) as u8;
    }
    Ok(rgba)
}

/// Decode `bytes`, remove the background and return a PNG.
#[instrument(skip(bytes, remover), fields(bytes_len = bytes.len(), remover = remover.name()))]
pub fn remove_background(bytes: &[u8], remover: &dyn BackgroundRemover) -> Result<Vec<u8>> {
    let image = ImageProcessor::from_bytes(bytes)?.into_dynamic();
    let cut_out = remover.remove(&image)?;
    let png = encode_image(&DynamicImage::ImageRgba8(cut_out), OutputFormat::Png, Quality::MAX)?;
    info!(out_len = png.len(), "Background removed");
    Ok(png)
}

/// The remover the settings ask for.
pub fn remover_from_config(config: &AppConfig) -> Result<Box<dyn BackgroundRemover>> {
    if let Some(path) = &config.matting_model_path {
        #[cfg(feature = "ml")]
        {
            return Ok(Box::new(MattingModel::load(path)?));
        }
        #[cfg(not(feature = "ml"))]
        tracing::warn!(
            path = %path.display(),
            "matting model configured but this build lacks the `ml` feature; using border keying"
        );
    }
    Ok(Box::new(BorderKeyRemover::new(
        config.background_tolerance,
        config.background_feather,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn mask_scales_alpha() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 1, Rgb([10, 20, 30])));
        let mut mask = GrayImage::new(2, 1);
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(1, 0, Luma([0]));
        let out = apply_alpha_mask(&image, &mask).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(out.get_pixel(1, 0)[3], 0);
    }

    #[test]
    fn mismatched_mask_rejected() {
        let image = DynamicImage::new_rgb8(4, 4);
        let err = apply_alpha_mask(&image, &GrayImage::new(2, 2)).unwrap_err();
        assert!(matches!(err, KhotiyanError::BackgroundRemoval(_)));
    }

    #[cfg(not(feature = "ml"))]
    #[test]
    fn config_without_model_uses_border_key() {
        let config = AppConfig {
            matting_model_path: Some("/nonexistent/u2net.rten".into()),
            ..AppConfig::default()
        };
        assert_eq!(remover_from_config(&config).unwrap().name(), "border-key");
    }

    #[test]
    fn bad_tolerance_in_config_rejected() {
        let config = AppConfig {
            background_tolerance: -1.0,
            ..AppConfig::default()
        };
        assert!(remover_from_config(&config).is_err());
    }
}
