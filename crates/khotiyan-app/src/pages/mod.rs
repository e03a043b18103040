// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod background;
pub mod compress;
pub mod convert;
pub mod home;
pub mod image_to_pdf;
pub mod pdf_to_image;
pub mod resize;
pub mod settings;
