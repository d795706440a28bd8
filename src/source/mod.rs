//! Source-document access
//!
//! Wraps MuPDF's non-thread-safe documents behind [`SourcePdf`], which
//! opens a fresh document per operation under a mutex.

mod safe;

pub use safe::{PdfSource, SourcePdf};
