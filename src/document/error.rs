//! Engine error types
//!
//! Three-way taxonomy: extraction and reconstruction failures abort the
//! whole job, translation failures are recovered span-by-span.

use thiserror::Error;

/// Source document could not be opened or a page could not be parsed.
///
/// Always fatal for the job; nothing is salvageable from a document the
/// parser cannot read.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Document could not be opened (bad format, encryption, truncation)
    #[error("failed to open document: {0}")]
    Open(String),

    /// Input bytes are not a PDF
    #[error("unsupported source format: {0}")]
    UnsupportedFormat(String),

    /// Page index outside the document
    #[error("page index {0} out of range")]
    PageOutOfRange(usize),

    /// Page structure could not be parsed
    #[error("page parse error: {0}")]
    Parse(String),
}

impl From<mupdf::Error> for ExtractionError {
    fn from(err: mupdf::Error) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

impl From<lopdf::Error> for ExtractionError {
    fn from(err: lopdf::Error) -> Self {
        ExtractionError::Parse(err.to_string())
    }
}

/// A single span's translation call failed or returned unusable output.
///
/// Recovered locally: the span is dropped and the job continues.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Backend reachable but returned an error
    #[error("translation backend error: {0}")]
    Backend(String),

    /// Target language not supported by the backend
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),

    /// Transport-level failure
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend response did not contain a translation
    #[error("malformed backend response: {0}")]
    MalformedResponse(String),
}

/// Output artifact could not be serialized. Fatal for the job.
#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output document could not be encoded
    #[error("failed to serialize output document: {0}")]
    Serialize(String),

    /// Markup mode was requested without an output path
    #[error("markup output requires an output path")]
    MissingOutputPath,
}

impl From<lopdf::Error> for ReconstructionError {
    fn from(err: lopdf::Error) -> Self {
        ReconstructionError::Serialize(err.to_string())
    }
}

/// Top-level job error
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Translation(#[from] TranslationError),

    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    /// Job abandoned between page iterations
    #[error("job cancelled")]
    Cancelled,
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
