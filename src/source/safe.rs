//! Thread-safe source-document wrapper for MuPDF
//!
//! MuPDF documents are not thread-safe. This wrapper stores the document
//! data (bytes or path), opens a fresh document for each operation, and
//! serializes access with a `parking_lot::Mutex`. Operations never hold a
//! long-lived `mupdf::Document`, so each one sees clean parser state and
//! the source is never mutated across a job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use mupdf::Document;
use parking_lot::Mutex;

use crate::document::ExtractionError;

const PDF_MIME: &str = "application/pdf";

/// Where the source bytes live.
#[derive(Clone)]
pub enum PdfSource {
    /// Document loaded from owned bytes
    Bytes(Arc<Vec<u8>>),
    /// Document loaded from a file path
    Path(PathBuf),
}

/// Immutable, thread-safe handle to one source PDF.
///
/// Created fresh per reconstruction job and discarded with it; holds no
/// cross-job state.
pub struct SourcePdf {
    source: PdfSource,
    /// Cached page count, validated at construction
    page_count: usize,
    /// Serializes all MuPDF access
    _lock: Mutex<()>,
}

// SAFETY: all fields except _lock are immutable after construction
// (Arc<Vec<u8>>, PathBuf, usize — all Send + Sync themselves). Every
// MuPDF operation goes through with_doc, which acquires _lock, opens a
// fresh Document inside the closure scope, and drops it before
// returning; no document reference escapes.
unsafe impl Send for SourcePdf {}
unsafe impl Sync for SourcePdf {}

impl SourcePdf {
    /// Open a source document from raw bytes.
    ///
    /// Validates the PDF magic and that MuPDF can open the document;
    /// failures here are fatal for the whole job.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, ExtractionError> {
        if !data.starts_with(b"%PDF") {
            return Err(ExtractionError::UnsupportedFormat(
                "missing %PDF header".to_string(),
            ));
        }

        let doc = Document::from_bytes(&data, PDF_MIME)
            .map_err(|e| ExtractionError::Open(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| ExtractionError::Open(e.to_string()))? as usize;

        Ok(Self {
            source: PdfSource::Bytes(Arc::new(data)),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Open a source document from a file path.
    ///
    /// The file is validated once here but re-read lazily per operation,
    /// so the handle stays cheap for large documents.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExtractionError> {
        let path = path.as_ref().to_path_buf();
        let path_str = path.to_string_lossy();
        let doc =
            Document::open(&*path_str).map_err(|e| ExtractionError::Open(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| ExtractionError::Open(e.to_string()))? as usize;

        Ok(Self {
            source: PdfSource::Path(path),
            page_count,
            _lock: Mutex::new(()),
        })
    }

    /// Number of pages, cached at construction.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// The raw source bytes (shared, read-only).
    pub fn bytes(&self) -> Result<Arc<Vec<u8>>, ExtractionError> {
        match &self.source {
            PdfSource::Bytes(data) => Ok(Arc::clone(data)),
            PdfSource::Path(path) => {
                let data = std::fs::read(path)
                    .map_err(|e| ExtractionError::Open(e.to_string()))?;
                Ok(Arc::new(data))
            }
        }
    }

    fn open_document(&self) -> Result<Document, ExtractionError> {
        match &self.source {
            PdfSource::Bytes(data) => {
                Document::from_bytes(data, PDF_MIME).map_err(Into::into)
            }
            PdfSource::Path(path) => {
                let path_str = path.to_string_lossy();
                Document::open(&*path_str).map_err(Into::into)
            }
        }
    }

    /// Execute a closure with a fresh document, serialized via mutex.
    pub fn with_doc<F, R>(&self, f: F) -> Result<R, ExtractionError>
    where
        F: FnOnce(&Document) -> Result<R, ExtractionError>,
    {
        let _guard = self._lock.lock();
        let doc = self.open_document()?;
        f(&doc)
    }
}
