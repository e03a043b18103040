// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the Dioxus UI to the khotiyan backend crates.
//
// Pages never touch the filesystem or the document crate directly for slow
// work; they go through these helpers, which run it off the UI thread and
// return data the UI can display directly.

pub mod app_services;
pub mod data_dir;
pub mod files;
