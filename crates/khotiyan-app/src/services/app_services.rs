// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the configuration and provides the
// async-friendly entry points the Dioxus pages call.
//
// Every image and PDF operation is CPU-bound, so it runs on tokio's blocking
// pool and the page awaits the result.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_core::{AppConfig, OutputRecord, ToolKind};
use khotiyan_document::{BackgroundRemover, PdfRasterizer, remover_from_config};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::data_dir;
use super::files;

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise services. Call once at app startup.
    pub fn init() -> Self {
        Self::with_data_dir(data_dir::data_dir())
    }

    /// Services rooted at an explicit directory.
    pub fn with_data_dir(dir: PathBuf) -> Self {
        info!(path = %dir.display(), "initialising app services");
        let config = match AppConfig::load(&dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                info!("no config saved yet, using defaults");
                AppConfig::default()
            }
            Err(e) => {
                warn!(error = %e, "config file unusable, using defaults");
                AppConfig::default()
            }
        };
        Self {
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        config.persist(&self.data_dir)
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // -- Backends ------------------------------------------------------------

    /// Bind pdfium using the configured library location.
    pub fn rasterizer(&self) -> Result<PdfRasterizer> {
        PdfRasterizer::load(self.config().pdfium_library_path.as_deref())
    }

    /// The background remover the settings select.
    pub fn remover(&self) -> Result<Box<dyn BackgroundRemover>> {
        remover_from_config(&self.config())
    }

    // -- Output --------------------------------------------------------------

    /// Offer a save dialog for `bytes`. `Ok(None)` when the user cancelled.
    pub fn save_output(
        &self,
        tool: ToolKind,
        default_name: &str,
        bytes: &[u8],
    ) -> Result<Option<OutputRecord>> {
        let Some(path) = files::save_location(default_name) else {
            info!(tool = tool.id(), "save cancelled");
            return Ok(None);
        };
        write_output(tool, &path, bytes).map(Some)
    }

    /// Write several named outputs into a folder the user picks.
    pub fn save_all(&self, tool: ToolKind, outputs: &[(String, Vec<u8>)]) -> Result<Vec<OutputRecord>> {
        let Some(dir) = files::pick_folder() else {
            return Ok(Vec::new());
        };
        outputs
            .iter()
            .map(|(name, bytes)| write_output(tool, &dir.join(name), bytes))
            .collect()
    }
}

/// Run CPU-heavy work on the blocking pool.
pub async fn run_blocking<T, F>(work: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|err| {
        warn!(error = %err, "background task failed");
        KhotiyanError::Io(std::io::Error::other(err))
    })?
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Write `bytes` to `path` and describe what was written.
pub fn write_output(tool: ToolKind, path: &Path, bytes: &[u8]) -> Result<OutputRecord> {
    std::fs::write(path, bytes)?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    info!(tool = tool.id(), path = %path.display(), bytes = bytes.len(), "output saved");
    Ok(OutputRecord::new(
        tool,
        file_name,
        bytes.len() as u64,
        sha256_hex(bytes),
    ))
}
