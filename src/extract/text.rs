//! Structured text extraction
//!
//! Walks MuPDF's block → line → char hierarchy and folds consecutive
//! characters of a line into positioned spans. A new span starts whenever
//! the font size changes; MuPDF's structured-text coordinates are already
//! top-left origin, y down, so quads map straight into the page model.

use mupdf::{Document, TextPageOptions};

use crate::document::{BoundingBox, ExtractionError, TextSpan, FALLBACK_FONT_FAMILY};

/// Font-size changes below this are treated as the same run.
const FONT_SIZE_EPSILON: f32 = 0.05;

/// Text content of one extracted page.
#[derive(Debug, Clone)]
pub struct PageText {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
}

/// Extract positioned spans from one page.
///
/// Spans come out in reading order (block, then line, then run) and may
/// include whitespace-only runs; dropping those is the span translator's
/// job, not the extractor's.
pub fn extract_page_text(doc: &Document, index: usize) -> Result<PageText, ExtractionError> {
    let page = doc.load_page(index as i32).map_err(|e| page_error(index, &e))?;
    let bounds = page.bounds().map_err(|e| page_error(index, &e))?;
    let width = bounds.x1 - bounds.x0;
    let height = bounds.y1 - bounds.y0;

    let text_page = page
        .to_text_page(TextPageOptions::PRESERVE_WHITESPACE)
        .map_err(|e| page_error(index, &e))?;

    let mut spans = Vec::new();

    for block in text_page.blocks() {
        for line in block.lines() {
            let mut current: Option<RunAccumulator> = None;

            for ch in line.chars() {
                let Some(c) = ch.char() else { continue };

                let quad = ch.quad();
                let char_x0 = quad.ul.x.min(quad.ll.x);
                let char_y0 = quad.ul.y.min(quad.ur.y);
                let char_x1 = quad.ur.x.max(quad.lr.x);
                let char_y1 = quad.ll.y.max(quad.lr.y);
                let size = ch.size();

                match current.as_mut() {
                    Some(run) if (run.font_size - size).abs() <= FONT_SIZE_EPSILON => {
                        run.push(c, char_x0, char_y0, char_x1, char_y1);
                    }
                    _ => {
                        if let Some(run) = current.take() {
                            spans.push(run.into_span());
                        }
                        current = Some(RunAccumulator::start(
                            c, size, char_x0, char_y0, char_x1, char_y1,
                        ));
                    }
                }
            }

            if let Some(run) = current.take() {
                spans.push(run.into_span());
            }
        }
    }

    Ok(PageText {
        width,
        height,
        spans,
    })
}

fn page_error(index: usize, err: &mupdf::Error) -> ExtractionError {
    ExtractionError::Parse(format!("page {index} text: {err}"))
}

/// Accumulates one same-size run of characters within a line.
struct RunAccumulator {
    text: String,
    font_size: f32,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl RunAccumulator {
    fn start(c: char, font_size: f32, x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        let mut text = String::new();
        text.push(c);
        Self {
            text,
            font_size,
            x0,
            y0,
            x1,
            y1,
        }
    }

    fn push(&mut self, c: char, x0: f32, y0: f32, x1: f32, y1: f32) {
        self.text.push(c);
        self.x0 = self.x0.min(x0);
        self.y0 = self.y0.min(y0);
        self.x1 = self.x1.max(x1);
        self.y1 = self.y1.max(y1);
    }

    fn into_span(self) -> TextSpan {
        TextSpan {
            text: self.text,
            bbox: BoundingBox::new(self.x0, self.y0, self.x1, self.y1),
            font_size: self.font_size,
            // Font name is not exposed by the TextChar API in mupdf 0.5
            font_family: FALLBACK_FONT_FAMILY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::single_text_pdf;

    #[test]
    fn test_extracts_positioned_span() {
        let bytes = single_text_pdf("Hello", 24.0, 100.0, 700.0);
        let doc = Document::from_bytes(&bytes, "application/pdf").unwrap();

        let page = extract_page_text(&doc, 0).unwrap();
        assert_eq!(page.width, 612.0);
        assert_eq!(page.height, 792.0);

        let joined: String = page.spans.iter().map(|s| s.text.as_str()).collect();
        assert!(joined.contains("Hello"), "got spans: {:?}", page.spans);

        let span = page
            .spans
            .iter()
            .find(|s| s.text.contains("Hello"))
            .unwrap();
        // Anchor is top-left in a y-down frame: x matches the Td x, y is
        // page_height - baseline minus the ascent above it
        assert!((span.bbox.x0 - 100.0).abs() < 2.0, "x0 = {}", span.bbox.x0);
        assert!(span.bbox.y0 > 60.0 && span.bbox.y0 < 92.0, "y0 = {}", span.bbox.y0);
        assert!((span.font_size - 24.0).abs() < 1.0);
        assert_eq!(span.font_family, FALLBACK_FONT_FAMILY);
    }

    #[test]
    fn test_errors_name_the_failing_page() {
        let bytes = single_text_pdf("Hello", 12.0, 72.0, 700.0);
        let doc = Document::from_bytes(&bytes, "application/pdf").unwrap();

        let err = extract_page_text(&doc, 7).unwrap_err();
        assert!(err.to_string().contains("page 7"), "got: {err}");
    }

    #[test]
    fn test_preserves_whitespace_runs() {
        let bytes = single_text_pdf("   ", 12.0, 72.0, 700.0);
        let doc = Document::from_bytes(&bytes, "application/pdf").unwrap();

        let page = extract_page_text(&doc, 0).unwrap();
        // Whitespace-only runs stay in the model; the span translator
        // filters them, not the extractor
        assert!(page.spans.iter().all(|s| s.text.trim().is_empty()));
    }
}
