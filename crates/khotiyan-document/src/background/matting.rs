// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Salient-object matting with a neural network executed via `rten`.
//
// # Feature Gate
//
// Only available with the `ml` feature:
//
// ```toml
// khotiyan-document = { path = "crates/khotiyan-document", features = ["ml"] }
// ```
//
// # Model Setup
//
// Any single-input, single-output salient-object model with a 320x320 RGB
// input and a `[1, 1, H, W]` saliency map output works (the U²-Net family,
// for example). Convert the ONNX file once with `rten-convert model.onnx`
// and point `matting_model_path` in the settings at the `.rten` file.

use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use khotiyan_core::error::{KhotiyanError, Result};
use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::NdTensor;
use tracing::{debug, info, instrument};

use crate::background::BackgroundRemover;

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 320;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// A loaded matting model.
///
/// Model loading is the expensive step; keep the instance around for
/// repeated use.
pub struct MattingModel {
    model: Model,
    path: PathBuf,
}

impl MattingModel {
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(KhotiyanError::ModelUnavailable(format!(
                "matting model not found at {}",
                path.display()
            )));
        }
        info!("Loading matting model");
        let model = Model::load_file(path).map_err(|err| {
            KhotiyanError::ModelUnavailable(format!(
                "failed to load matting model from {}: {}",
                path.display(),
                err
            ))
        })?;
        Ok(Self {
            model,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BackgroundRemover for MattingModel {
    fn name(&self) -> &str {
        "matting-model"
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    fn mask(&self, image: &DynamicImage) -> Result<GrayImage> {
        let input = input_tensor(image);
        let output = self
            .model
            .run_one(input.view().into(), None)
            .map_err(|err| KhotiyanError::BackgroundRemoval(format!("model run failed: {err}")))?;
        let saliency: NdTensor<f32, 4> = output.try_into().map_err(|err| {
            KhotiyanError::BackgroundRemoval(format!("unexpected model output: {err:?}"))
        })?;

        let [_, _, out_h, out_w] = saliency.shape();
        debug!(out_w, out_h, "Saliency map produced");
        let values: Vec<f32> = saliency.iter().copied().collect();
        let small = normalise_mask(&values, out_w as u32, out_h as u32)?;
        Ok(imageops::resize(
            &small,
            image.width(),
            image.height(),
            FilterType::Triangle,
        ))
    }
}

/// `[1, 3, INPUT_SIZE, INPUT_SIZE]`, ImageNet-normalised, channels first.
fn input_tensor(image: &DynamicImage) -> NdTensor<f32, 4> {
    let side = INPUT_SIZE as usize;
    let rgb = image
        .resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
        .to_rgb8();
    let mut data = vec![0.0f32; 3 * side * side];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let offset = y as usize * side + x as usize;
        for c in 0..3 {
            let value = pixel[c] as f32 / 255.0;
            data[c * side * side + offset] = (value - IMAGENET_MEAN[c]) / IMAGENET_STD[c];
        }
    }
    NdTensor::from_data([1, 3, side, side], data)
}

/// Min-max normalise raw saliency values to a 0..=255 mask.
fn normalise_mask(values: &[f32], width: u32, height: u32) -> Result<GrayImage> {
    if values.len() != width as usize * height as usize || values.is_empty() {
        return Err(KhotiyanError::BackgroundRemoval(format!(
            "saliency map has {} values for {width}x{height}",
            values.len()
        )));
    }
    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = (max - min).max(f32::EPSILON);
    Ok(GrayImage::from_fn(width, height, |x, y| {
        let v = values[(y * width + x) as usize];
        Luma([(((v - min) / range) * 255.0).round().clamp(0.0, 255.0) as u8])
    }))
}
