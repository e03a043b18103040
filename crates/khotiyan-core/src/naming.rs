// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Default file names for saved results, and the size labels shown under
// previews.

use crate::types::{Dimensions, OutputFormat};

pub fn resized_name(dims: Dimensions) -> String {
    format!("resized-{}x{}.png", dims.width, dims.height)
}

pub fn converted_name(format: OutputFormat) -> String {
    format!("converted.{}", format.extension())
}

/// Keeps the original name unless the bytes changed format, in which case
/// the extension follows `format`.
pub fn compressed_name(original_name: &str, format: OutputFormat) -> String {
    let same_format = original_name
        .rsplit_once('.')
        .and_then(|(_, ext)| OutputFormat::from_extension(ext))
        == Some(format);
    if same_format {
        format!("compressed-{original_name}")
    } else {
        format!("compressed-{}.{}", file_stem(original_name), format.extension())
    }
}

/// `page_number` is 1-based.
pub fn page_name(page_number: u32, format: OutputFormat) -> String {
    format!("page-{page_number}.{}", format.extension())
}

pub const IMAGES_TO_PDF_NAME: &str = "images-to-pdf.pdf";

pub fn no_background_name(original_name: &str) -> String {
    format!("no-background-{}.png", file_stem(original_name))
}

/// Strip the last extension, keeping dotted names like `a.b.png` → `a.b`.
fn file_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Size in kilobytes with two decimals, e.g. `"12.50 KB"`.
pub fn format_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

/// Percentage saved going from `original` to `compressed` bytes, rounded to
/// one decimal. Negative when the output grew.
pub fn reduction_percent(original: u64, compressed: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    let ratio = (1.0 - compressed as f64 / original as f64) * 100.0;
    (ratio * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_names() {
        assert_eq!(resized_name(Dimensions::new(800, 600)), "resized-800x600.png");
        assert_eq!(converted_name(OutputFormat::Jpeg), "converted.jpeg");
        assert_eq!(compressed_name("cat.jpg", OutputFormat::Jpeg), "compressed-cat.jpg");
        assert_eq!(page_name(3, OutputFormat::Png), "page-3.png");
        assert_eq!(no_background_name("portrait.final.jpg"), "no-background-portrait.final.png");
        assert_eq!(no_background_name("README"), "no-background-README.png");
        assert_eq!(no_background_name(".hidden"), "no-background-.hidden.png");
    }

    #[test]
    fn compressed_name_follows_output_format() {
        assert_eq!(compressed_name("cat.bmp", OutputFormat::Jpeg), "compressed-cat.jpeg");
        assert_eq!(compressed_name("scan.TIFF", OutputFormat::Jpeg), "compressed-scan.jpeg");
        assert_eq!(compressed_name("logo.png", OutputFormat::Png), "compressed-logo.png");
        assert_eq!(compressed_name("photo", OutputFormat::Jpeg), "compressed-photo.jpeg");
    }

    #[test]
    fn size_labels() {
        assert_eq!(format_kb(1536), "1.50 KB");
        assert_eq!(reduction_percent(1000, 250), 75.0);
        assert_eq!(reduction_percent(3, 1), 66.7);
        assert_eq!(reduction_percent(0, 10), 0.0);
        assert!(reduction_percent(100, 150) < 0.0);
    }
}
