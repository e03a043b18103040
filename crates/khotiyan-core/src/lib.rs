// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Khotiyan — core types, errors, configuration and the crop editor shared by
// all crates.

pub mod config;
pub mod crop;
pub mod error;
pub mod human_errors;
pub mod naming;
pub mod types;

pub use config::AppConfig;
pub use crop::CropEditor;
pub use error::KhotiyanError;
pub use types::*;
