// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Border-keyed background removal.
//
// Product shots, scans and portraits on plain backdrops share one property:
// the background touches the image border and is roughly one colour. The
// remover estimates that colour from the border, flood-fills inward through
// every pixel close to it, and feathers the resulting mask edge.

use std::collections::VecDeque;

use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;
use khotiyan_core::error::{KhotiyanError, Result};
use tracing::{debug, info, instrument};

use crate::background::BackgroundRemover;

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// Removes a roughly uniform background connected to the image border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderKeyRemover {
    /// Maximum Euclidean RGB distance from the backdrop colour.
    tolerance: f32,
    /// Gaussian sigma for edge softening; 0 leaves a hard edge.
    feather_sigma: f32,
}

impl Default for BorderKeyRemover {
    fn default() -> Self {
        Self {
            tolerance: 40.0,
            feather_sigma: 1.5,
        }
    }
}

impl BorderKeyRemover {
    pub fn new(tolerance: f32, feather_sigma: f32) -> Result<Self> {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(KhotiyanError::InvalidParameter(format!(
                "background tolerance must be zero or more, got {tolerance}"
            )));
        }
        if !feather_sigma.is_finite() || feather_sigma < 0.0 {
            return Err(KhotiyanError::InvalidParameter(format!(
                "feather must be zero or more, got {feather_sigma}"
            )));
        }
        Ok(Self {
            tolerance,
            feather_sigma,
        })
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    pub fn feather_sigma(&self) -> f32 {
        self.feather_sigma
    }

    fn is_backdrop(&self, pixel: &Rgba<u8>, backdrop: [u8; 3]) -> bool {
        pixel[3] == 0 || colour_distance(pixel, backdrop) <= self.tolerance
    }
}

impl BackgroundRemover for BorderKeyRemover {
    fn name(&self) -> &str {
        "border-key"
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn mask(&self, image: &DynamicImage) -> Result<GrayImage> {
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(KhotiyanError::BackgroundRemoval("image is empty".into()));
        }

        let backdrop = border_median(&rgba);
        debug!(?backdrop, "Estimated backdrop colour");

        let mut mask = GrayImage::from_pixel(width, height, Luma([FOREGROUND]));
        let mut queue: VecDeque<(u32, u32)> = VecDeque::new();
        for (x, y) in border_coords(width, height) {
            if mask.get_pixel(x, y)[0] == FOREGROUND
                && self.is_backdrop(rgba.get_pixel(x, y), backdrop)
            {
                mask.put_pixel(x, y, Luma([BACKGROUND]));
                queue.push_back((x, y));
            }
        }

        let mut removed = queue.len() as u64;
        while let Some((x, y)) = queue.pop_front() {
            for (nx, ny) in neighbours(x, y, width, height) {
                if mask.get_pixel(nx, ny)[0] == FOREGROUND
                    && self.is_backdrop(rgba.get_pixel(nx, ny), backdrop)
                {
                    mask.put_pixel(nx, ny, Luma([BACKGROUND]));
                    queue.push_back((nx, ny));
                    removed += 1;
                }
            }
        }

        let total = width as u64 * height as u64;
        if removed == total {
            return Err(KhotiyanError::BackgroundRemoval(
                "no foreground found; the whole image matches the background".into(),
            ));
        }
        info!(removed, total, "Backdrop flood fill complete");

        if self.feather_sigma > 0.0 {
            mask = gaussian_blur_f32(&mask, self.feather_sigma);
        }
        Ok(mask)
    }
}

fn colour_distance(pixel: &Rgba<u8>, backdrop: [u8; 3]) -> f32 {
    let squared: f32 = (0..3)
        .map(|c| {
            let d = pixel[c] as f32 - backdrop[c] as f32;
            d * d
        })
        .sum();
    squared.sqrt()
}

/// Every border pixel once, clockwise from the top-left.
fn border_coords(width: u32, height: u32) -> Vec<(u32, u32)> {
    let mut coords = Vec::with_capacity(2 * (width + height) as usize);
    coords.extend((0..width).map(|x| (x, 0)));
    if height > 1 {
        coords.extend((1..height).map(|y| (width - 1, y)));
        if width > 1 {
            coords.extend((0..width - 1).rev().map(|x| (x, height - 1)));
            coords.extend((1..height - 1).rev().map(|y| (0, y)));
        }
    }
    coords
}

/// Per-channel median of the border pixels.
fn border_median(rgba: &RgbaImage) -> [u8; 3] {
    let (width, height) = rgba.dimensions();
    let mut channels: [Vec<u8>; 3] = Default::default();
    for (x, y) in border_coords(width, height) {
        let pixel = rgba.get_pixel(x, y);
        for (c, values) in channels.iter_mut().enumerate() {
            values.push(pixel[c]);
        }
    }
    channels.map(|mut values| {
        values.sort_unstable();
        values.get(values.len() / 2).copied().unwrap_or(0)
    })
}

fn neighbours(x: u32, y: u32, width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let left = x.checked_sub(1).map(|nx| (nx, y));
    let up = y.checked_sub(1).map(|ny| (x, ny));
    let right = (x + 1 < width).then_some((x + 1, y));
    let down = (y + 1 < height).then_some((x, y + 1));
    [left, up, right, down].into_iter().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// 40x40 white with a 20x20 red square in the middle.
    fn product_shot() -> DynamicImage {
        let img = RgbImage::from_fn(40, 40, |x, y| {
            if (10..30).contains(&x) && (10..30).contains(&y) {
                Rgb([200, 20, 20])
            } else {
                Rgb([250, 250, 250])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn backdrop_becomes_transparent() {
        let remover = BorderKeyRemover::new(40.0, 0.0).unwrap();
        let out = remover.remove(&product_shot()).unwrap();
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(5, 35)[3], 0);
        assert_eq!(out.get_pixel(20, 20).0, [200, 20, 20, 255]);
    }

    #[test]
    fn enclosed_backdrop_colour_is_kept() {
        // A white hole inside the red square is not connected to the border.
        let mut img = product_shot().to_rgb8();
        img.put_pixel(20, 20, Rgb([250, 250, 250]));
        let remover = BorderKeyRemover::new(40.0, 0.0).unwrap();
        let mask = remover.mask(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(mask.get_pixel(20, 20)[0], FOREGROUND);
    }

    #[test]
    fn feather_softens_the_edge_only() {
        let mask = BorderKeyRemover::default().mask(&product_shot()).unwrap();
        let edge = mask.get_pixel(10, 20)[0];
        assert!(edge > 0 && edge < 255, "edge alpha {edge}");
        assert!(mask.get_pixel(20, 20)[0] >= 254);
        assert_eq!(mask.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn uniform_image_has_no_foreground() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([9, 9, 9])));
        let err = BorderKeyRemover::default().mask(&img).unwrap_err();
        assert!(matches!(err, KhotiyanError::BackgroundRemoval(_)));
    }

    #[test]
    fn border_walk_visits_each_pixel_once() {
        let coords = border_coords(4, 3);
        assert_eq!(coords.len(), 10);
        let mut unique = coords.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), 10);
        assert_eq!(border_coords(1, 3).len(), 3);
        assert_eq!(border_coords(3, 1).len(), 3);
    }

    #[test]
    fn negative_settings_rejected() {
        assert!(BorderKeyRemover::new(-1.0, 0.0).is_err());
        assert!(BorderKeyRemover::new(10.0, f32::NAN).is_err());
    }
}
