//! Markup reconstruction backend
//!
//! Renders the translated document as one HTML file: a fixed-size
//! container per page (1 pt = 1 px), absolutely positioned text spans,
//! and absolutely positioned images backed by asset files in a sibling
//! `<stem>_images/` directory. Asset names are deterministic per page
//! index and image ordinal, and `src` paths are relative to the HTML
//! file's directory, so artifact and assets relocate together.
//!
//! This is the one place where `&`, `<`, `>` are escaped.

use std::fmt::Write as _;
use std::path::Path;

use tracing::info;

use crate::document::{Artifact, ReconstructionError, TranslatedDocument};

const HTML_HEADER: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<style>\n\
body { margin: 0; padding: 0; font-family: sans-serif; }\n\
.page { position: relative; margin-bottom: 20px; border: 1px solid #ccc; }\n\
.text-span { position: absolute; white-space: pre; }\n\
.img { position: absolute; }\n\
</style>\n\
</head>\n\
<body>\n";

const HTML_FOOTER: &str = "</body></html>\n";

/// Write the document as HTML plus its image asset directory.
pub fn write_document(
    document: &TranslatedDocument,
    output_path: &Path,
) -> Result<Artifact, ReconstructionError> {
    let stem = output_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(ReconstructionError::MissingOutputPath)?;
    let asset_dir_name = format!("{stem}_images");
    let asset_dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(&asset_dir_name),
        _ => Path::new(&asset_dir_name).to_path_buf(),
    };
    std::fs::create_dir_all(&asset_dir)?;

    let mut html = String::from(HTML_HEADER);

    for page in &document.pages {
        let _ = writeln!(
            html,
            "<div class=\"page\" style=\"width:{}px; height:{}px;\">",
            page.width, page.height
        );

        for span in &page.spans {
            if span.text.trim().is_empty() {
                continue;
            }
            let _ = writeln!(
                html,
                "<span class=\"text-span\" style=\"left:{}px; top:{}px; font-size:{}px; font-family:'{}'\">{}</span>",
                span.bbox.x0,
                span.bbox.y0,
                span.font_size,
                // Lands inside a quoted attribute value, so quotes must
                // be escaped too, not just &/</>
                html_escape::encode_quoted_attribute(&span.font_family),
                html_escape::encode_text(&span.text),
            );
        }

        for (ordinal, image) in page.images.iter().enumerate() {
            let file_name = format!("page{}_img{}.{}", page.index, ordinal, image.extension);
            std::fs::write(asset_dir.join(&file_name), &image.data)?;

            let _ = writeln!(
                html,
                "<img src=\"{}/{}\" class=\"img\" style=\"left:{}px; top:{}px; width:{}px; height:{}px;\" />",
                asset_dir_name,
                file_name,
                image.bbox.x0,
                image.bbox.y0,
                image.bbox.width(),
                image.bbox.height(),
            );
        }

        html.push_str("</div>\n");
    }

    html.push_str(HTML_FOOTER);
    std::fs::write(output_path, &html)?;

    info!(
        path = %output_path.display(),
        pages = document.pages.len(),
        "markup artifact written"
    );

    Ok(Artifact::Markup {
        html_path: output_path.to_path_buf(),
        asset_dir,
    })
}
