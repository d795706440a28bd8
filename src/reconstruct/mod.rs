//! Output reconstruction backends
//!
//! Both backends consume the same [`TranslatedDocument`]: markup writes
//! an HTML file plus an image asset directory to disk, fixed-page
//! serializes a new PDF in memory.
//!
//! [`TranslatedDocument`]: crate::document::TranslatedDocument

mod html;
mod pdf;

pub use html::write_document;
pub use pdf::render;
