//! Page Model Extractor
//!
//! Reads one source page into the in-memory model: positioned text spans
//! via MuPDF structured text, raster images via the page's content
//! stream. The source document is never mutated.

mod images;
mod text;

pub use images::extract_page_images;
pub use text::{extract_page_text, PageText};

use crate::document::{ExtractionError, PageModel};
use crate::source::SourcePdf;

/// Extract exactly one page into a [`PageModel`].
///
/// `object_doc` is the same document opened through lopdf; it supplies
/// image XObjects and their placement, which MuPDF's structured-text API
/// does not expose.
pub fn page_model(
    source: &SourcePdf,
    object_doc: &lopdf::Document,
    index: usize,
) -> Result<PageModel, ExtractionError> {
    if index >= source.page_count() {
        return Err(ExtractionError::PageOutOfRange(index));
    }

    let text = source.with_doc(|doc| extract_page_text(doc, index))?;
    let images = extract_page_images(object_doc, index, text.height)?;

    Ok(PageModel {
        index,
        width: text.width,
        height: text.height,
        spans: text.spans,
        images,
    })
}
