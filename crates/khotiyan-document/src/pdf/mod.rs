// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — building PDFs from images, inspecting PDFs, and rendering
// pages back to images.

pub mod raster;
pub mod reader;
pub mod sequence;
pub mod writer;

pub use raster::{PdfRasterizer, RenderSettings, RenderedPage};
pub use reader::{PdfReader, is_pdf};
pub use sequence::{ImageSequence, SourceImage};
pub use writer::{PdfWriter, Placement, place_image};
