// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open and inspect existing PDF documents using the `lopdf`
// crate. Used to validate uploads before rendering and to check generated
// output.

use khotiyan_core::error::{KhotiyanError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, instrument};

/// Page trees deeper than this are treated as malformed.
const MAX_TREE_DEPTH: usize = 32;

/// Whether `bytes` carry a PDF header. Leading whitespace is tolerated.
pub fn is_pdf(bytes: &[u8]) -> bool {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    bytes[start..].starts_with(b"%PDF-")
}

/// Read-only view of an existing PDF.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !is_pdf(data) {
            return Err(KhotiyanError::PdfError("not a PDF file".into()));
        }
        let document = Document::load_mem(data).map_err(|err| {
            KhotiyanError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of every page in points, from each page's MediaBox
    /// (inherited from the page tree when the page has none).
    pub fn page_sizes(&self) -> Result<Vec<(f32, f32)>> {
        self.document
            .get_pages()
            .into_iter()
            .map(|(number, id)| {
                self.media_box(id).map_err(|err| {
                    KhotiyanError::PdfError(format!("page {number}: {err}"))
                })
            })
            .collect()
    }

    fn media_box(&self, page_id: ObjectId) -> std::result::Result<(f32, f32), String> {
        let mut dict: &Dictionary = self
            .document
            .get_dictionary(page_id)
            .map_err(|err| err.to_string())?;

        for _ in 0..MAX_TREE_DEPTH {
            if let Ok(value) = dict.get(b"MediaBox") {
                let (_, value) = self
                    .document
                    .dereference(value)
                    .map_err(|err| err.to_string())?;
                return box_size(value);
            }
            let parent = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| "no MediaBox in page tree".to_string())?;
            dict = self
                .document
                .get_dictionary(parent)
                .map_err(|err| err.to_string())?;
        }
        Err("page tree too deep".into())
    }
}

fn box_size(value: &Object) -> std::result::Result<(f32, f32), String> {
    let corners = value
        .as_array()
        .map_err(|_| "MediaBox is not an array".to_string())?
        .iter()
        .map(Object::as_float)
        .collect::<std::result::Result<Vec<f32>, _>>()
        .map_err(|_| "MediaBox holds a non-number".to_string())?;
    match corners.as_slice() {
        [x0, y0, x1, y1] => Ok(((x1 - x0).abs(), (y1 - y0).abs())),
        _ => Err(format!("MediaBox has {} entries", corners.len())),
    }
}
