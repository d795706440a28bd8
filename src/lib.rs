//! Layout-preserving PDF translation engine.
//!
//! Extracts each page of a source PDF into positioned text spans and
//! raster images, translates the span text through a pluggable backend,
//! and re-emits the document with its original geometry intact — either
//! as absolutely-positioned HTML plus an image asset directory, or as a
//! freshly generated PDF.
//!
//! ```no_run
//! use std::sync::Arc;
//! use translayer::{Engine, IdentityTranslator, JobRequest};
//!
//! # async fn run() -> translayer::Result<()> {
//! let data = std::fs::read("input.pdf").expect("readable source");
//! let engine = Engine::new(Arc::new(IdentityTranslator));
//! let artifact = engine
//!     .translate_document(JobRequest::fixed_page(data, "id"))
//!     .await?;
//! # let _ = artifact;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod engine;
pub mod extract;
pub mod reconstruct;
pub mod source;
pub mod translate;

pub use document::{
    Artifact, BoundingBox, EngineError, ExtractionError, JobRequest, OutputFormat, PageImage,
    PageModel, ReconstructionError, Result, TextSpan, TranslatedDocument, TranslatedPage,
    TranslatedSpan, TranslationError,
};
pub use engine::Engine;
pub use source::SourcePdf;
pub use translate::{HttpTranslator, IdentityTranslator, Translator};

#[cfg(test)]
pub mod test_fixtures;
