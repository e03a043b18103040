// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// khotiyan-document — the image and PDF work behind every Khotiyan tool.
//
// Provides image processing (resize, crop, format conversion, probing),
// size-targeted compression, PDF building/inspection/rendering, and
// background removal.

pub mod background;
pub mod compress;
pub mod image;
pub mod pdf;

// Re-export the primary types so callers can use `khotiyan_document::PdfWriter` etc.
pub use crate::background::{BackgroundRemover, BorderKeyRemover, remove_background, remover_from_config};
pub use crate::compress::{CompressionOutcome, CompressionSettings, compress};
pub use crate::image::{Converted, ImageInfo, ImageProcessor, ResizeRequest, convert_image, inspect_image, resize_image};
pub use crate::pdf::{ImageSequence, PdfRasterizer, PdfReader, PdfWriter, RenderSettings, RenderedPage};

#[cfg(feature = "ml")]
pub use crate::background::MattingModel;
