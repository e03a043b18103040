// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Khotiyan image toolkit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{KhotiyanError, Result};

/// The six independent tools, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    Resize,
    Convert,
    Compress,
    PdfToImage,
    ImageToPdf,
    RemoveBackground,
}

impl ToolKind {
    /// Every tool, in the order the header nav and home grid show them.
    pub const ALL: [ToolKind; 6] = [
        Self::Resize,
        Self::Convert,
        Self::Compress,
        Self::PdfToImage,
        Self::ImageToPdf,
        Self::RemoveBackground,
    ];

    /// Stable identifier used for routing.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Convert => "convert",
            Self::Compress => "compress",
            Self::PdfToImage => "pdf-to-image",
            Self::ImageToPdf => "image-to-pdf",
            Self::RemoveBackground => "background-remove",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Resize => "Photo Resize",
            Self::Convert => "Format Convert",
            Self::Compress => "Compress",
            Self::PdfToImage => "PDF to Image",
            Self::ImageToPdf => "Image to PDF",
            Self::RemoveBackground => "Remove Background",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Resize => "Resize and crop images to custom dimensions",
            Self::Convert => "Convert between PNG, JPEG, WEBP",
            Self::Compress => "Reduce file size while maintaining quality",
            Self::PdfToImage => "Convert PDF pages to JPEG/PNG",
            Self::ImageToPdf => "Convert JPEG/PNG to PDF",
            Self::RemoveBackground => "Automatically remove image background",
        }
    }

    /// Parse a routing identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.id() == id)
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Encodable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
    Bmp,
    Gif,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Webp,
        Self::Bmp,
        Self::Gif,
        Self::Tiff,
    ];

    /// File extension written for this format (`jpeg`, not `jpg`).
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
        }
    }

    /// Upper-case label for selectors and headings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Tiff => "TIFF",
        }
    }

    /// Whether the encoder honours a quality setting. The WEBP encoder in
    /// use is lossless, so only JPEG qualifies.
    pub fn uses_quality(&self) -> bool {
        matches!(self, Self::Jpeg)
    }

    /// Whether transparency survives encoding. JPEG and BMP output is
    /// flattened onto white.
    pub fn keeps_alpha(&self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }

    /// Infer the format from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tif" | "tiff" => Some(Self::Tiff),
            _ => None,
        }
    }
}

/// Encoder quality as a fraction in `(0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Quality(f32);

impl Quality {
    pub const MAX: Quality = Quality(1.0);

    pub fn new(value: f32) -> Result<Self> {
        if value.is_finite() && value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(KhotiyanError::InvalidParameter(format!(
                "quality must be in (0, 1], got {value}"
            )))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    /// Quality on the 1..=100 scale used by the JPEG encoder.
    pub fn to_percent(&self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }

    /// Multiply by `factor`, never dropping below `floor`.
    pub fn scaled(&self, factor: f32, floor: f32) -> Self {
        Self((self.0 * factor).max(floor).min(1.0))
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.9)
    }
}

impl TryFrom<f32> for Quality {
    type Error = KhotiyanError;

    fn try_from(value: f32) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Quality> for f32 {
    fn from(quality: Quality) -> f32 {
        quality.0
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Longest side any output may have.
    pub const MAX_SIDE: u32 = 16_384;
    /// Largest canvas any output may have (100 megapixels).
    pub const MAX_PIXELS: u64 = 100_000_000;

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both sides are at least one pixel.
    pub fn is_valid(&self) -> bool {
        self.width >= 1 && self.height >= 1
    }

    /// Width times height, `None` on overflow.
    pub fn pixel_count(&self) -> Option<u64> {
        (self.width as u64).checked_mul(self.height as u64)
    }

    /// Reject sizes that are empty or too large to allocate safely.
    pub fn check_output(&self) -> Result<()> {
        if !self.is_valid() {
            return Err(KhotiyanError::InvalidParameter(format!(
                "width and height must be at least 1, got {self}"
            )));
        }
        let too_many = self.pixel_count().is_none_or(|n| n > Self::MAX_PIXELS);
        if self.width > Self::MAX_SIDE || self.height > Self::MAX_SIDE || too_many {
            return Err(KhotiyanError::InvalidParameter(format!(
                "{self} is too large; sides are limited to {} px and the canvas to {} megapixels",
                Self::MAX_SIDE,
                Self::MAX_PIXELS / 1_000_000
            )));
        }
        Ok(())
    }

    /// Set the width. With `lock_aspect` the height follows the original
    /// image's aspect ratio.
    pub fn with_width(self, width: u32, original: Dimensions, lock_aspect: bool) -> Self {
        if lock_aspect && original.width > 0 {
            let ratio = original.height as f64 / original.width as f64;
            Self::new(width, (width as f64 * ratio).round() as u32)
        } else {
            Self::new(width, self.height)
        }
    }

    /// Set the height. With `lock_aspect` the width follows the original
    /// image's aspect ratio.
    pub fn with_height(self, height: u32, original: Dimensions, lock_aspect: bool) -> Self {
        if lock_aspect && original.height > 0 {
            let ratio = original.width as f64 / original.height as f64;
            Self::new((height as f64 * ratio).round() as u32, height)
        } else {
            Self::new(self.width, height)
        }
    }

    /// Scale uniformly so neither side exceeds `max_side`. Never upscales.
    pub fn fit_within(self, max_side: u32) -> Self {
        let longest = self.width.max(self.height);
        if longest <= max_side || longest == 0 {
            return self;
        }
        let ratio = max_side as f64 / longest as f64;
        Self::new(
            ((self.width as f64 * ratio).round() as u32).max(1),
            ((self.height as f64 * ratio).round() as u32).max(1),
        )
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} \u{00D7} {}", self.width, self.height)
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in PDF points (width, height), portrait.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            Self::A4 => (595.0, 842.0),
            Self::A3 => (842.0, 1191.0),
            Self::A5 => (420.0, 595.0),
            Self::Letter => (612.0, 792.0),
            Self::Legal => (612.0, 1008.0),
            Self::Custom {
                width_mm,
                height_mm,
            } => (mm_to_pt(*width_mm), mm_to_pt(*height_mm)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::A4 => "A4",
            Self::A3 => "A3",
            Self::A5 => "A5",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
            Self::Custom { .. } => "Custom",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "A4" => Some(Self::A4),
            "A3" => Some(Self::A3),
            "A5" => Some(Self::A5),
            "Letter" => Some(Self::Letter),
            "Legal" => Some(Self::Legal),
            _ => None,
        }
    }
}

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

/// Convert PDF points to millimetres.
pub fn pt_to_mm(pt: f32) -> f32 {
    pt * 25.4 / 72.0
}

/// How images are placed on PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PdfPageLayout {
    /// Page equals the image size (1px = 1pt), scaled down uniformly when
    /// the image is larger than `max`. The image fills the page.
    FitImage { max: PaperSize },
    /// Fixed paper; the image is centred inside the margins and scaled
    /// down to fit.
    Paper { size: PaperSize, margin_mm: f32 },
}

impl Default for PdfPageLayout {
    fn default() -> Self {
        Self::FitImage { max: PaperSize::A4 }
    }
}

/// Axis-aligned rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering a whole `width` x `height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Clamp into a `width` x `height` image, keeping at least one pixel.
    pub fn clamp_to(&self, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let x = self.x.min(width - 1);
        let y = self.y.min(height - 1);
        Self::new(
            x,
            y,
            self.width.clamp(1, width - x),
            self.height.clamp(1, height - y),
        )
    }
}

/// A result the user saved during this session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputRecord {
    pub id: Uuid,
    pub tool: ToolKind,
    pub file_name: String,
    pub byte_len: u64,
    /// SHA-256 of the saved bytes, lowercase hex.
    pub sha256: String,
    pub created_at: DateTime<Utc>,
}

impl OutputRecord {
    pub fn new(tool: ToolKind, file_name: String, byte_len: u64, sha256: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            tool,
            file_name,
            byte_len,
            sha256,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_ids_round_trip() {
        for tool in ToolKind::ALL {
            assert_eq!(ToolKind::from_id(tool.id()), Some(tool));
        }
        assert_eq!(ToolKind::from_id("ads"), None);
    }

    #[test]
    fn width_edit_follows_aspect() {
        let original = Dimensions::new(1600, 1200);
        let dims = original.with_width(800, original, true);
        assert_eq!(dims, Dimensions::new(800, 600));
    }

    #[test]
    fn height_edit_follows_aspect() {
        let original = Dimensions::new(1000, 300);
        let dims = original.with_height(100, original, true);
        assert_eq!(dims, Dimensions::new(333, 100));
    }

    #[test]
    fn unlocked_edit_changes_one_side() {
        let original = Dimensions::new(1600, 1200);
        let dims = original.with_width(10, original, false);
        assert_eq!(dims, Dimensions::new(10, 1200));
    }

    #[test]
    fn locked_edit_without_original_changes_one_side() {
        let dims = Dimensions::new(5, 7).with_width(10, Dimensions::default(), true);
        assert_eq!(dims, Dimensions::new(10, 7));
    }

    #[test]
    fn oversized_output_rejected() {
        assert!(Dimensions::new(1920, 1080).check_output().is_ok());
        assert!(Dimensions::new(10_000, 10_000).check_output().is_ok());
        for dims in [
            Dimensions::new(0, 10),
            Dimensions::new(u32::MAX, u32::MAX),
            Dimensions::new(Dimensions::MAX_SIDE + 1, 1),
            Dimensions::new(16_000, 16_000),
        ] {
            assert!(
                matches!(dims.check_output(), Err(KhotiyanError::InvalidParameter(_))),
                "{dims} accepted"
            );
        }
    }

    #[test]
    fn fit_within_never_upscales() {
        assert_eq!(Dimensions::new(100, 50).fit_within(1920), Dimensions::new(100, 50));
        assert_eq!(
            Dimensions::new(3840, 2160).fit_within(1920),
            Dimensions::new(1920, 1080)
        );
    }

    #[test]
    fn quality_bounds() {
        assert!(Quality::new(0.0).is_err());
        assert!(Quality::new(1.1).is_err());
        assert!(Quality::new(f32::NAN).is_err());
        assert_eq!(Quality::new(0.75).unwrap().to_percent(), 75);
        assert_eq!(Quality::new(0.001).unwrap().to_percent(), 1);
    }

    #[test]
    fn quality_scaling_respects_floor() {
        let q = Quality::new(0.1).unwrap().scaled(0.1, 0.05);
        assert!((q.value() - 0.05).abs() < f32::EPSILON);
    }

    #[test]
    fn only_jpeg_uses_quality_and_jpeg_bmp_drop_alpha() {
        for format in OutputFormat::ALL {
            assert_eq!(format.uses_quality(), format == OutputFormat::Jpeg);
            assert_eq!(
                format.keeps_alpha(),
                !matches!(format, OutputFormat::Jpeg | OutputFormat::Bmp)
            );
        }
        assert_eq!(OutputFormat::from_extension("JPG"), Some(OutputFormat::Jpeg));
    }

    #[test]
    fn crop_rect_clamps_into_image() {
        let rect = CropRect::new(90, 95, 50, 50).clamp_to(100, 100);
        assert_eq!(rect, CropRect::new(90, 95, 10, 5));
        let rect = CropRect::new(500, 500, 0, 0).clamp_to(100, 100);
        assert_eq!(rect, CropRect::new(99, 99, 1, 1));
    }

    #[test]
    fn a4_matches_pdf_points() {
        assert_eq!(PaperSize::A4.dimensions_pt(), (595.0, 842.0));
        let (w, _) = PaperSize::Custom {
            width_mm: 25.4,
            height_mm: 25.4,
        }
        .dimensions_pt();
        assert!((w - 72.0).abs() < 0.001);
    }
}
