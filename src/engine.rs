//! Job orchestration
//!
//! Drives one reconstruction job end to end: open the source, extract
//! page models one at a time, translate each page's spans, and hand the
//! assembled document to the requested output backend. Extraction runs
//! on the blocking pool since the PDF parsers are CPU-bound; the
//! cancellation flag is checked once per page, never mid-span.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::document::{
    Artifact, EngineError, ExtractionError, JobRequest, OutputFormat, ReconstructionError, Result,
    TranslatedDocument, TranslatedPage,
};
use crate::extract;
use crate::reconstruct;
use crate::source::SourcePdf;
use crate::translate::{translate_spans, Translator};

/// Layout-preserving translation engine.
///
/// Holds the translation backend and nothing else; every job's document
/// state is created and dropped within [`translate_document`].
///
/// [`translate_document`]: Engine::translate_document
pub struct Engine {
    translator: Arc<dyn Translator>,
}

impl Engine {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }

    /// Run one job to completion.
    ///
    /// Extraction and reconstruction failures abort the job; translation
    /// failures drop the affected span and continue. Page order in the
    /// artifact always matches the source.
    pub async fn translate_document(&self, request: JobRequest) -> Result<Artifact> {
        let source = Arc::new(SourcePdf::from_bytes(request.data)?);
        let bytes = source.bytes()?;
        let object_doc =
            Arc::new(lopdf::Document::load_mem(&bytes).map_err(ExtractionError::from)?);

        info!(
            pages = source.page_count(),
            target = %request.target_lang,
            format = ?request.format,
            translator = self.translator.name(),
            "starting translation job"
        );

        let mut pages = Vec::with_capacity(source.page_count());

        for index in 0..source.page_count() {
            if let Some(cancel) = &request.cancel {
                if cancel.load(Ordering::Relaxed) {
                    info!(page = index, "job cancelled");
                    return Err(EngineError::Cancelled);
                }
            }

            let source_ref = Arc::clone(&source);
            let doc_ref = Arc::clone(&object_doc);
            let page =
                task::spawn_blocking(move || extract::page_model(&source_ref, &doc_ref, index))
                    .await
                    .map_err(|e| ExtractionError::Parse(format!("extraction task failed: {e}")))??;

            debug!(
                page = index,
                spans = page.spans.len(),
                images = page.images.len(),
                "page extracted"
            );

            let spans =
                translate_spans(&page, self.translator.as_ref(), &request.target_lang).await;

            pages.push(TranslatedPage {
                index: page.index,
                width: page.width,
                height: page.height,
                spans,
                images: page.images,
            });
        }

        let document = TranslatedDocument { pages };

        match request.format {
            OutputFormat::Markup => {
                let output_path = request
                    .output_path
                    .as_deref()
                    .ok_or(ReconstructionError::MissingOutputPath)?;
                Ok(reconstruct::write_document(&document, output_path)?)
            }
            OutputFormat::FixedPage => {
                let bytes = reconstruct::render(&document)?;
                Ok(Artifact::FixedPage(bytes))
            }
        }
    }
}
