//! Shared data model and error taxonomy
//!
//! The translated-page model is representation-agnostic: both output
//! backends (markup and fixed-page) consume the identical
//! [`TranslatedDocument`], which is what lets one extraction/translation
//! pipeline serve two output formats.

mod error;
mod types;

pub use error::{
    EngineError, ExtractionError, ReconstructionError, Result, TranslationError,
};
pub use types::{
    Artifact, BoundingBox, JobRequest, OutputFormat, PageImage, PageModel, TextSpan,
    TranslatedDocument, TranslatedPage, TranslatedSpan, FALLBACK_FONT_FAMILY,
};
