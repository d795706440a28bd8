//! Raster image extraction
//!
//! Text comes out of MuPDF, but image placement needs the page's content
//! stream: each `Do` of an image XObject paints the unit square through
//! the current transformation matrix, so the walk below tracks `q`/`Q`/`cm`
//! to recover every image's bounding box. Stream bytes are passed through
//! in their native encoding (JPEG, JPEG2000); raw Flate-compressed sample
//! streams are recovered losslessly as PNG.

use std::io::Cursor;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

use crate::document::{BoundingBox, ExtractionError, PageImage};

/// Parent-chain walk limit for inherited page attributes.
const INHERIT_DEPTH_LIMIT: usize = 10;

/// 2D affine transform in PDF's row-vector convention: p' = p × M.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// self × other, the CTM update for a `cm` operator with `self`.
    fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() != 6 {
            return None;
        }
        Some(Matrix {
            a: number(&operands[0])?,
            b: number(&operands[1])?,
            c: number(&operands[2])?,
            d: number(&operands[3])?,
            e: number(&operands[4])?,
            f: number(&operands[5])?,
        })
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Extract every image painted by the page's own content stream.
///
/// Images referenced through Form XObjects are not traversed. Placement
/// rectangles are converted from PDF's bottom-left frame to the model's
/// top-left frame using `page_height`.
pub fn extract_page_images(
    doc: &Document,
    page_index: usize,
    page_height: f32,
) -> Result<Vec<PageImage>, ExtractionError> {
    let pages = doc.get_pages();
    let Some(&page_id) = pages.get(&(page_index as u32 + 1)) else {
        return Err(ExtractionError::PageOutOfRange(page_index));
    };

    let xobjects = page_xobjects(doc, page_id);

    let content_data = doc
        .get_page_content(page_id)
        .map_err(|e| ExtractionError::Parse(format!("page {page_index} content: {e}")))?;
    let content = Content::decode(&content_data)
        .map_err(|e| ExtractionError::Parse(format!("page {page_index} content: {e}")))?;

    let mut images = Vec::new();
    let mut ctm = Matrix::IDENTITY;
    let mut stack: Vec<Matrix> = Vec::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => stack.push(ctm),
            "Q" => {
                if let Some(previous) = stack.pop() {
                    ctm = previous;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    ctm = m.concat(&ctm);
                }
            }
            "Do" => {
                let Some(Object::Name(name)) = op.operands.first() else {
                    continue;
                };
                let Some(xobjects) = xobjects.as_ref() else {
                    continue;
                };
                let Ok(obj) = xobjects.get(name) else {
                    continue;
                };
                let Ok(stream) = resolve(doc, obj).as_stream() else {
                    continue;
                };

                match stream.dict.get(b"Subtype").and_then(|s| s.as_name()) {
                    Ok(b"Image") => {
                        if let Some((data, extension)) = decode_image_stream(doc, stream) {
                            images.push(PageImage {
                                data,
                                extension,
                                bbox: placement_bbox(&ctm, page_height),
                            });
                        }
                    }
                    Ok(b"Form") => {
                        debug!(page = page_index, "skipping Form XObject during image scan");
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    Ok(images)
}

/// Unit square through the CTM, converted to the top-left frame.
fn placement_bbox(ctm: &Matrix, page_height: f32) -> BoundingBox {
    let corners = [
        ctm.apply(0.0, 0.0),
        ctm.apply(1.0, 0.0),
        ctm.apply(0.0, 1.0),
        ctm.apply(1.0, 1.0),
    ];

    let min_x = corners.iter().map(|c| c.0).fold(f32::MAX, f32::min);
    let max_x = corners.iter().map(|c| c.0).fold(f32::MIN, f32::max);
    let min_y = corners.iter().map(|c| c.1).fold(f32::MAX, f32::min);
    let max_y = corners.iter().map(|c| c.1).fold(f32::MIN, f32::max);

    BoundingBox::new(min_x, page_height - max_y, max_x, page_height - min_y)
}

/// Find the page's XObject dictionary, walking inherited Resources.
fn page_xobjects(doc: &Document, page_id: lopdf::ObjectId) -> Option<Dictionary> {
    let page_obj = doc.get_object(page_id).ok()?;
    let resources = inherited_resources(doc, page_obj, INHERIT_DEPTH_LIMIT)?;
    let xobjects = resolve(doc, resources.get(b"XObject").ok()?)
        .as_dict()
        .ok()?;
    Some(xobjects.clone())
}

fn inherited_resources<'a>(
    doc: &'a Document,
    page_obj: &'a Object,
    depth: usize,
) -> Option<&'a Dictionary> {
    if depth == 0 {
        return None;
    }
    let dict = page_obj.as_dict().ok()?;
    if let Ok(resources) = dict.get(b"Resources") {
        return resolve(doc, resources).as_dict().ok();
    }
    let parent = dict.get(b"Parent").ok()?;
    inherited_resources(doc, resolve(doc, parent), depth - 1)
}

/// Turn an image XObject stream into (bytes, extension).
///
/// Natively encoded streams pass through untouched; raw sample streams
/// are converted to PNG. Returns `None` (with a log) for encodings the
/// engine does not recover — image loss is best-effort, never fatal.
fn decode_image_stream(doc: &Document, stream: &lopdf::Stream) -> Option<(Vec<u8>, String)> {
    let filters = image_filters(doc, &stream.dict);
    match filters.as_slice() {
        [f] if f == "DCTDecode" => Some((stream.content.clone(), "jpeg".to_string())),
        [f] if f == "JPXDecode" => Some((stream.content.clone(), "jpx".to_string())),
        [] => recover_raw_samples(doc, stream),
        [f] if f == "FlateDecode" => recover_raw_samples(doc, stream),
        chain => {
            // Chained filters would need every leading filter applied
            // before the bytes are usable
            warn!(filters = ?chain, "skipping image with unsupported filters");
            None
        }
    }
}

fn recover_raw_samples(doc: &Document, stream: &lopdf::Stream) -> Option<(Vec<u8>, String)> {
    let samples = match stream.decompressed_content() {
        Ok(samples) => samples,
        Err(_) => stream.content.clone(),
    };
    match raw_samples_to_png(doc, &stream.dict, &samples) {
        Some(png) => Some((png, "png".to_string())),
        None => {
            warn!("skipping image with unsupported raw sample layout");
            None
        }
    }
}

/// Applied filter names in order (`Filter` may be a name or an array).
fn image_filters(doc: &Document, dict: &Dictionary) -> Vec<String> {
    let Ok(filter) = dict.get(b"Filter") else {
        return Vec::new();
    };
    match resolve(doc, filter) {
        Object::Name(name) => vec![String::from_utf8_lossy(name).into_owned()],
        Object::Array(array) => array
            .iter()
            .filter_map(|o| o.as_name().ok())
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect(),
        _ => Vec::new(),
    }
}

/// Re-encode decoded 8-bit DeviceGray/DeviceRGB samples as PNG.
fn raw_samples_to_png(doc: &Document, dict: &Dictionary, samples: &[u8]) -> Option<Vec<u8>> {
    let width = resolve(doc, dict.get(b"Width").ok()?).as_i64().ok()? as u32;
    let height = resolve(doc, dict.get(b"Height").ok()?).as_i64().ok()? as u32;
    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| resolve(doc, o).as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return None;
    }

    let color_space = resolve(doc, dict.get(b"ColorSpace").ok()?).as_name().ok()?;
    let img = match color_space {
        b"DeviceRGB" => {
            let expected = (width * height * 3) as usize;
            let buffer = samples.get(..expected)?.to_vec();
            image::DynamicImage::ImageRgb8(image::RgbImage::from_raw(width, height, buffer)?)
        }
        b"DeviceGray" => {
            let expected = (width * height) as usize;
            let buffer = samples.get(..expected)?.to_vec();
            image::DynamicImage::ImageLuma8(image::GrayImage::from_raw(width, height, buffer)?)
        }
        _ => return None,
    };

    let mut png = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .ok()?;
    Some(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{image_pdf, FAKE_JPEG};
    use lopdf::dictionary;

    #[test]
    fn test_matrix_identity_apply() {
        let m = Matrix::IDENTITY;
        assert_eq!(m.apply(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn test_matrix_scale_translate() {
        // 200 0 0 150 100 300 cm maps the unit square to (100,300)-(300,450)
        let m = Matrix {
            a: 200.0,
            b: 0.0,
            c: 0.0,
            d: 150.0,
            e: 100.0,
            f: 300.0,
        };
        assert_eq!(m.apply(0.0, 0.0), (100.0, 300.0));
        assert_eq!(m.apply(1.0, 1.0), (300.0, 450.0));
    }

    #[test]
    fn test_matrix_concat_translation_order() {
        let scale = Matrix {
            a: 2.0,
            b: 0.0,
            c: 0.0,
            d: 2.0,
            e: 0.0,
            f: 0.0,
        };
        let translate = Matrix {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 10.0,
            f: 20.0,
        };
        // translate applied in a coordinate system already scaled by 2
        let ctm = translate.concat(&scale);
        assert_eq!(ctm.apply(0.0, 0.0), (20.0, 40.0));
    }

    #[test]
    fn test_placement_bbox_converts_to_top_left_frame() {
        let ctm = Matrix {
            a: 200.0,
            b: 0.0,
            c: 0.0,
            d: 150.0,
            e: 100.0,
            f: 300.0,
        };
        let bbox = placement_bbox(&ctm, 792.0);
        assert_eq!(bbox.x0, 100.0);
        assert_eq!(bbox.x1, 300.0);
        assert_eq!(bbox.y0, 792.0 - 450.0);
        assert_eq!(bbox.y1, 792.0 - 300.0);
    }

    #[test]
    fn test_extracts_jpeg_image_with_bbox() {
        let bytes = image_pdf();
        let doc = Document::load_mem(&bytes).unwrap();

        let images = extract_page_images(&doc, 0, 792.0).unwrap();
        assert_eq!(images.len(), 1);

        let img = &images[0];
        assert_eq!(img.extension, "jpeg");
        assert_eq!(img.data, FAKE_JPEG);
        assert_eq!(img.bbox.x0, 100.0);
        assert_eq!(img.bbox.y0, 792.0 - 450.0);
        assert_eq!(img.bbox.width(), 200.0);
        assert_eq!(img.bbox.height(), 150.0);
    }

    #[test]
    fn test_raw_rgb_samples_become_png() {
        let doc = Document::with_version("1.5");
        let dict = lopdf::dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
        };
        // 4 RGB pixels
        let samples = vec![
            255, 0, 0, 0, 255, 0, //
            0, 0, 255, 255, 255, 255,
        ];
        let stream = lopdf::Stream::new(dict, samples);
        let converted = decode_image_stream(&doc, &stream);

        let (png, ext) = converted.unwrap();
        assert_eq!(ext, "png");
        assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_chained_filters_are_skipped() {
        let doc = Document::with_version("1.5");
        let dict = lopdf::dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => 2,
            "Height" => 2,
            "BitsPerComponent" => 8,
            "ColorSpace" => "DeviceRGB",
            "Filter" => Object::Array(vec!["ASCII85Decode".into(), "DCTDecode".into()]),
        };
        // Bytes are still ASCII85-encoded; passing them through as JPEG
        // would produce a broken asset
        let stream = lopdf::Stream::new(dict, b"<~ascii85 payload~>".to_vec());
        assert!(decode_image_stream(&doc, &stream).is_none());
    }

    #[test]
    fn test_page_out_of_range() {
        let bytes = image_pdf();
        let doc = Document::load_mem(&bytes).unwrap();
        assert!(matches!(
            extract_page_images(&doc, 5, 792.0),
            Err(ExtractionError::PageOutOfRange(5))
        ));
    }
}
