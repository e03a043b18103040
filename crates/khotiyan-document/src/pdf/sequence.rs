// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Ordered list of images queued for the image-to-PDF tool.

use crate::image::inspect::is_image;

/// One queued image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
    pub byte_len: u64,
}

impl SourceImage {
    /// `None` when `bytes` is not a recognised image.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Option<Self> {
        if !is_image(&bytes) {
            return None;
        }
        Some(Self {
            name: name.into(),
            byte_len: bytes.len() as u64,
            bytes,
        })
    }
}

/// Images in page order. Only recognised images are ever stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSequence {
    images: Vec<SourceImage>,
}

impl ImageSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an image. Returns `false` (and stores nothing) for non-images.
    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) -> bool {
        match SourceImage::new(name, bytes) {
            Some(image) => {
                self.images.push(image);
                true
            }
            None => false,
        }
    }

    /// Append every image in `files`, skipping the rest. Returns how many
    /// were accepted.
    pub fn extend_filtered<I, S>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: Into<String>,
    {
        let mut accepted = 0;
        for (name, bytes) in files {
            if self.push(name, bytes) {
                accepted += 1;
            }
        }
        accepted
    }

    pub fn remove(&mut self, index: usize) -> Option<SourceImage> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    /// Swap with the previous entry. No-op for the first entry.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.images.len() {
            return false;
        }
        self.images.swap(index - 1, index);
        true
    }

    /// Swap with the next entry. No-op for the last entry.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index + 1 >= self.images.len() {
            return false;
        }
        self.images.swap(index, index + 1);
        true
    }

    pub fn get(&self, index: usize) -> Option<&SourceImage> {
        self.images.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourceImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn total_bytes(&self) -> u64 {
        self.images.iter().map(|image| image.byte_len).sum()
    }
}

impl<'a> IntoIterator for &'a ImageSequence {
    type Item = &'a SourceImage;
    type IntoIter = std::slice::Iter<'a, SourceImage>;

    fn into_iter(self) -> Self::IntoIter {
        self.images.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::processor::ImageProcessor;
    use image::DynamicImage;

    fn png() -> Vec<u8> {
        ImageProcessor::from_dynamic(DynamicImage::new_rgb8(2, 2))
            .to_png_bytes()
            .unwrap()
    }

    fn names(seq: &ImageSequence) -> Vec<&str> {
        seq.iter().map(|image| image.name.as_str()).collect()
    }

    fn abc() -> ImageSequence {
        let mut seq = ImageSequence::new();
        seq.extend_filtered([("a.png", png()), ("b.png", png()), ("c.png", png())]);
        seq
    }

    #[test]
    fn non_images_are_filtered() {
        let mut seq = ImageSequence::new();
        let accepted = seq.extend_filtered([
            ("a.png", png()),
            ("notes.txt", b"plain text".to_vec()),
            ("b.png", png()),
        ]);
        assert_eq!(accepted, 2);
        assert_eq!(names(&seq), ["a.png", "b.png"]);
        assert!(!seq.push("doc.pdf", b"%PDF-1.4".to_vec()));
        assert_eq!(seq.total_bytes(), 2 * png().len() as u64);
    }

    #[test]
    fn moves_swap_neighbours() {
        let mut seq = abc();
        assert!(seq.move_up(2));
        assert_eq!(names(&seq), ["a.png", "c.png", "b.png"]);
        assert!(seq.move_down(0));
        assert_eq!(names(&seq), ["c.png", "a.png", "b.png"]);
    }

    #[test]
    fn moves_at_the_ends_are_noops() {
        let mut seq = abc();
        assert!(!seq.move_up(0));
        assert!(!seq.move_down(2));
        assert!(!seq.move_down(7));
        assert_eq!(names(&seq), ["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut seq = abc();
        assert_eq!(seq.remove(1).map(|image| image.name), Some("b.png".to_string()));
        assert!(seq.remove(5).is_none());
        assert_eq!(seq.len(), 2);
        seq.clear();
        assert!(seq.is_empty());
    }
}
