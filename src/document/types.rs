//! Core page-model types
//!
//! Format-agnostic model shared by the extraction phase and both
//! reconstruction backends. Coordinates use the source document's native
//! unit (points), origin top-left, y down — the frame MuPDF structured
//! text reports in.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Font family used when the source does not expose one.
pub const FALLBACK_FONT_FAMILY: &str = "sans-serif";

/// Axis-aligned bounding box in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BoundingBox {
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// A contiguous run of text sharing one font size and position origin.
///
/// Spans are enumerated in the source's block → line → span reading
/// order; that order is preserved through translation and into both
/// output backends. Only the (x0, y0) top-left anchor is used for
/// re-placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSpan {
    /// Raw source text; may contain markup-unsafe characters
    pub text: String,
    pub bbox: BoundingBox,
    /// Font size in page units (points)
    pub font_size: f32,
    /// Best-effort font family, [`FALLBACK_FONT_FAMILY`] when absent
    pub font_family: String,
}

/// A raster image extracted from a page, in its original encoding.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Encoded image bytes exactly as stored in the source (no re-encoding
    /// for natively encoded streams; raw sample streams are recovered as PNG)
    pub data: Vec<u8>,
    /// File extension matching the encoding ("png", "jpeg", ...)
    pub extension: String,
    /// Placement rectangle in the page coordinate frame
    pub bbox: BoundingBox,
}

/// One extracted page: geometry plus ordered spans and images.
#[derive(Debug, Clone)]
pub struct PageModel {
    /// 0-based page index
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
    pub images: Vec<PageImage>,
}

/// A source span paired with its translated text.
///
/// Geometry and typography are copied verbatim from the source span;
/// reconstruction never perturbs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedSpan {
    /// Original text, kept for debugging and diffing
    pub source_text: String,
    /// Translated text to render
    pub text: String,
    pub bbox: BoundingBox,
    pub font_size: f32,
    pub font_family: String,
}

impl TranslatedSpan {
    /// Pair a source span with its translation, copying geometry.
    pub fn from_span(span: &TextSpan, translated: String) -> Self {
        Self {
            source_text: span.text.clone(),
            text: translated,
            bbox: span.bbox,
            font_size: span.font_size,
            font_family: span.font_family.clone(),
        }
    }
}

/// A fully translated page, ready for reconstruction.
#[derive(Debug, Clone)]
pub struct TranslatedPage {
    pub index: usize,
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TranslatedSpan>,
    pub images: Vec<PageImage>,
}

/// All translated pages of one job, in document order.
#[derive(Debug, Clone, Default)]
pub struct TranslatedDocument {
    pub pages: Vec<TranslatedPage>,
}

/// Output backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Absolutely-positioned HTML plus an image asset directory
    #[serde(rename = "markup")]
    Markup,
    /// Freshly generated PDF (text only, images out of scope)
    #[serde(rename = "fixed-page")]
    FixedPage,
}

/// Finished artifact of one reconstruction job.
#[derive(Debug)]
pub enum Artifact {
    /// HTML written to disk alongside its asset directory
    Markup {
        html_path: PathBuf,
        asset_dir: PathBuf,
    },
    /// Serialized PDF bytes
    FixedPage(Vec<u8>),
}

/// One reconstruction job.
#[derive(Debug, Clone)]
pub struct JobRequest {
    /// Raw source PDF bytes
    pub data: Vec<u8>,
    /// Target language code (ISO-639-1-like, e.g. "id")
    pub target_lang: String,
    pub format: OutputFormat,
    /// Where to write the HTML artifact; required in markup mode,
    /// ignored in fixed-page mode
    pub output_path: Option<PathBuf>,
    /// Checked once per page between iterations; a set flag abandons
    /// the job, never mid-span
    pub cancel: Option<Arc<AtomicBool>>,
}

impl JobRequest {
    /// Markup-mode job writing HTML (and assets) to `output_path`.
    pub fn markup(data: Vec<u8>, target_lang: impl Into<String>, output_path: PathBuf) -> Self {
        Self {
            data,
            target_lang: target_lang.into(),
            format: OutputFormat::Markup,
            output_path: Some(output_path),
            cancel: None,
        }
    }

    /// Fixed-page-mode job returning PDF bytes in memory.
    pub fn fixed_page(data: Vec<u8>, target_lang: impl Into<String>) -> Self {
        Self {
            data,
            target_lang: target_lang.into(),
            format: OutputFormat::FixedPage,
            output_path: None,
            cancel: None,
        }
    }

    /// Attach a cancellation flag checked at page boundaries.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BoundingBox::new(10.0, 20.0, 110.0, 50.0);
        assert_eq!(bbox.width(), 100.0);
        assert_eq!(bbox.height(), 30.0);
    }

    #[test]
    fn test_translated_span_copies_geometry() {
        let span = TextSpan {
            text: "Hello".to_string(),
            bbox: BoundingBox::new(72.0, 90.0, 130.0, 104.0),
            font_size: 12.0,
            font_family: FALLBACK_FONT_FAMILY.to_string(),
        };
        let translated = TranslatedSpan::from_span(&span, "Halo".to_string());

        assert_eq!(translated.source_text, "Hello");
        assert_eq!(translated.text, "Halo");
        assert_eq!(translated.bbox, span.bbox);
        assert_eq!(translated.font_size, span.font_size);
        assert_eq!(translated.font_family, span.font_family);
    }

    #[test]
    fn test_output_format_serde_names() {
        assert_eq!(
            serde_json::to_string(&OutputFormat::Markup).unwrap(),
            "\"markup\""
        );
        assert_eq!(
            serde_json::to_string(&OutputFormat::FixedPage).unwrap(),
            "\"fixed-page\""
        );
    }
}
