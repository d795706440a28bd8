//! Fixed-page reconstruction backend
//!
//! Generates a fresh PDF with one output page per source page at matching
//! dimensions, inserting each translated span at its anchor with the
//! stored font size. A single unembedded Helvetica stands in for every
//! source typeface: the original families are not available as embeddable
//! resources, so placement fidelity wins over typography fidelity.
//! Images are not re-embedded by this backend.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use tracing::info;

use crate::document::{ReconstructionError, TranslatedDocument, TranslatedPage};

/// Base-14 typeface used for all inserted text.
const FALLBACK_BASE_FONT: &str = "Helvetica";

/// Resource name the content streams select the font by.
const FONT_RESOURCE: &str = "FT";

/// Serialize the translated document as a new PDF.
pub fn render(document: &TranslatedDocument) -> Result<Vec<u8>, ReconstructionError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => FALLBACK_BASE_FONT,
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => Object::Dictionary(dictionary! {
            FONT_RESOURCE => Object::Reference(font_id),
        }),
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.pages.len());

    for page in &document.pages {
        let content = page_content(page);
        let encoded = content
            .encode()
            .map_err(|e| ReconstructionError::Serialize(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
            "MediaBox" => Object::Array(vec![
                0.into(),
                0.into(),
                page.width.into(),
                page.height.into(),
            ]),
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => Object::Array(kids),
            "Count" => Object::Integer(page_count),
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| ReconstructionError::Serialize(e.to_string()))?;

    info!(
        pages = document.pages.len(),
        bytes = output.len(),
        "fixed-page artifact serialized"
    );

    Ok(output)
}

/// Content stream for one page: BT/Tf/Td/Tj per span.
///
/// The model's anchors are top-left origin, y down; PDF text is placed
/// by baseline in a bottom-left frame, so the baseline lands at
/// `page_height - y0 - font_size`.
fn page_content(page: &TranslatedPage) -> Content {
    let mut operations = Vec::with_capacity(page.spans.len() * 5);

    for span in &page.spans {
        if span.text.trim().is_empty() {
            continue;
        }
        let baseline_y = page.height - span.bbox.y0 - span.font_size;

        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![FONT_RESOURCE.into(), span.font_size.into()],
        ));
        operations.push(Operation::new(
            "Td",
            vec![span.bbox.x0.into(), baseline_y.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(span.text.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }

    Content { operations }
}
