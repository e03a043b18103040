// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module — decoding, resize, crop, format conversion and probing.

pub mod convert;
pub mod inspect;
pub mod processor;
pub mod resize;

pub use convert::{Converted, convert_image};
pub use inspect::{ImageInfo, is_image, inspect_image};
pub use processor::ImageProcessor;
pub use resize::{ResizeRequest, resize_image};
