//! Span Translator
//!
//! Drives one page's spans through the translation adapter. Blank source
//! spans are skipped without a backend call; failed or blank translations
//! drop the span with a log line and the page continues — one bad span
//! never aborts a job.

use tracing::{debug, warn};

use super::provider::Translator;
use crate::document::{PageModel, TranslatedSpan};

/// Produce the ordered translated spans for one page.
///
/// At most one [`TranslatedSpan`] per non-blank source span, in source
/// order, each copying its source's geometry and typography exactly.
pub async fn translate_spans(
    page: &PageModel,
    translator: &dyn Translator,
    target_lang: &str,
) -> Vec<TranslatedSpan> {
    let mut translated = Vec::with_capacity(page.spans.len());
    let mut dropped = 0usize;

    for span in &page.spans {
        if span.text.trim().is_empty() {
            continue;
        }

        let result = translator.translate(&span.text, target_lang).await;
        match result {
            Ok(text) if text.trim().is_empty() => {
                debug!(page = page.index, "dropping span: blank translation");
                dropped += 1;
            }
            Ok(text) => translated.push(TranslatedSpan::from_span(span, text)),
            Err(error) => {
                warn!(
                    page = page.index,
                    %error,
                    "dropping span: translation failed"
                );
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        debug!(
            page = page.index,
            dropped,
            kept = translated.len(),
            "page translated with dropped spans"
        );
    }

    translated
}
