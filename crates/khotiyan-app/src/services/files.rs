// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native file dialogs and preview helpers.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use khotiyan_core::error::{KhotiyanError, Result};
use khotiyan_document::image::inspect;

/// Extensions offered by the image pickers.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tif", "tiff"];
pub const PDF_EXTENSIONS: &[&str] = &["pdf"];

/// A file the user chose, read into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
    /// `data:` URL for image files, empty otherwise. Built once on read.
    pub preview: String,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let preview = if inspect::is_image(&bytes) {
            data_url(&bytes)
        } else {
            String::new()
        };
        Self {
            name: name.into(),
            bytes,
            preview,
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".into());
        Ok(Self::new(name, bytes))
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// What a pick area takes, whether chosen in the dialog or dropped on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accept {
    Image,
    Images,
    Pdf,
}

impl Accept {
    fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Image | Self::Images => IMAGE_EXTENSIONS,
            Self::Pdf => PDF_EXTENSIONS,
        }
    }

    fn filter_name(self) -> &'static str {
        match self {
            Self::Image | Self::Images => "Images",
            Self::Pdf => "PDF",
        }
    }

    fn multiple(self) -> bool {
        self == Self::Images
    }

    /// Whether the extension of `path` is one this takes, ignoring case.
    pub fn allows(self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions().iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Open the native dialog. Empty when it was dismissed.
    pub fn pick(self) -> Result<Vec<PickedFile>> {
        let dialog = rfd::FileDialog::new().add_filter(self.filter_name(), self.extensions());
        let paths = if self.multiple() {
            dialog.pick_files().unwrap_or_default()
        } else {
            dialog.pick_file().into_iter().collect()
        };
        paths.iter().map(|path| PickedFile::read(path)).collect()
    }

    /// Read the dropped files this takes, skipping the rest. Single-file
    /// areas keep the first match.
    pub fn read_dropped(self, paths: &[PathBuf]) -> Result<Vec<PickedFile>> {
        let mut allowed: Vec<&PathBuf> = paths.iter().filter(|path| self.allows(path)).collect();
        tracing::debug!(dropped = paths.len(), allowed = allowed.len(), "files dropped");
        if allowed.is_empty() {
            return Err(KhotiyanError::EmptySelection(format!(
                "none of the dropped files is {}",
                match self {
                    Self::Image | Self::Images => "an image",
                    Self::Pdf => "a PDF",
                }
            )));
        }
        if !self.multiple() {
            allowed.truncate(1);
        }
        allowed.into_iter().map(|path| PickedFile::read(path)).collect()
    }
}

/// Ask where to save, suggesting `default_name`.
pub fn save_location(default_name: &str) -> Option<PathBuf> {
    let mut dialog = rfd::FileDialog::new().set_file_name(default_name);
    if let Some(ext) = Path::new(default_name).extension().and_then(|e| e.to_str()) {
        dialog = dialog.add_filter(ext.to_ascii_uppercase(), &[ext]);
    }
    dialog.save_file()
}

/// Ask for a folder, e.g. to save every rendered page at once.
pub fn pick_folder() -> Option<PathBuf> {
    rfd::FileDialog::new().pick_folder()
}

/// Inline `data:` URL so the webview can show in-memory bytes.
pub fn data_url(bytes: &[u8]) -> String {
    let mime = inspect::inspect_image(bytes)
        .map(|info| info.mime_type())
        .unwrap_or("application/octet-stream");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use khotiyan_document::ImageProcessor;

    #[test]
    fn data_url_carries_mime() {
        let png = ImageProcessor::from_dynamic(DynamicImage::new_rgb8(1, 1))
            .to_png_bytes()
            .unwrap();
        let url = data_url(&png);
        assert!(url.starts_with("data:image/png;base64,iVBOR"));
        assert!(data_url(b"??").starts_with("data:application/octet-stream;base64,"));
    }

    #[test]
    fn read_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cat photo.jpg");
        std::fs::write(&path, b"abc").unwrap();
        let picked = PickedFile::read(&path).unwrap();
        assert_eq!(picked.name, "cat photo.jpg");
        assert_eq!(picked.byte_len(), 3);
        assert!(picked.preview.is_empty());
    }

    #[test]
    fn preview_built_on_read() {
        let png = ImageProcessor::from_dynamic(DynamicImage::new_rgb8(2, 2))
            .to_png_bytes()
            .unwrap();
        let picked = PickedFile::new("dot.png", png.clone());
        assert_eq!(picked.preview, data_url(&png));
        assert!(PickedFile::new("doc.pdf", b"%PDF-1.7".to_vec()).preview.is_empty());
    }

    #[test]
    fn accept_matches_extensions_ignoring_case() {
        assert!(Accept::Image.allows(Path::new("/tmp/Cat.JPG")));
        assert!(Accept::Images.allows(Path::new("scan.tif")));
        assert!(!Accept::Image.allows(Path::new("report.pdf")));
        assert!(Accept::Pdf.allows(Path::new("report.PDF")));
        assert!(!Accept::Pdf.allows(Path::new("notes")));
    }

    #[test]
    fn dropped_files_filtered_by_kind() {
        let dir = tempfile::tempdir().unwrap();
        let write = |name: &str| {
            let path = dir.path().join(name);
            std::fs::write(&path, name.as_bytes()).unwrap();
            path
        };
        let dropped = vec![write("notes.txt"), write("a.png"), write("b.jpg"), write("c.pdf")];

        let one = Accept::Image.read_dropped(&dropped).unwrap();
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].name, "a.png");

        let many = Accept::Images.read_dropped(&dropped).unwrap();
        let names: Vec<_> = many.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.png", "b.jpg"]);

        let pdf = Accept::Pdf.read_dropped(&dropped).unwrap();
        assert_eq!(pdf[0].name, "c.pdf");

        let err = Accept::Pdf.read_dropped(&dropped[..2]).unwrap_err();
        assert!(matches!(err, KhotiyanError::EmptySelection(_)));
    }
}
