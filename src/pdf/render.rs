//! Page rasterization through hayro.
//!
//! hayro draws the page; lopdf supplies the page box so the bitmap size
//! stays `floor(edge * scale)` on both axes.

use super::import::inherited;
use super::scaled_dimensions;
use crate::error::RenderError;
use hayro::{render, InterpreterSettings, Pdf, RenderSettings};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId};
use std::sync::Arc;
use tracing::{debug, trace};

/// US Letter, used when a page has neither a CropBox nor a MediaBox.
const LETTER: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

fn page_box(doc: &Document, page_id: ObjectId) -> [f64; 4] {
    let read = |key: &[u8]| -> Option<[f64; 4]> {
        let object = inherited(doc, page_id, key)?;
        let object = match object {
            Object::Reference(id) => doc.get_object(*id).ok()?,
            other => other,
        };
        let values: Vec<f64> = object
            .as_array()
            .ok()?
            .iter()
            .filter_map(|v| v.as_float().ok().map(f64::from))
            .collect();
        let [x0, y0, x1, y1] = <[f64; 4]>::try_from(values).ok()?;
        Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
    };
    read(b"CropBox").or_else(|| read(b"MediaBox")).unwrap_or(LETTER)
}

fn rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited(doc, page_id, b"Rotate")
        .and_then(|object| object.as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360)
}

/// Output size of a page in pixels, after `/Rotate`.
pub(crate) fn page_dimensions(
    doc: &Document,
    page_id: ObjectId,
    scale: f32,
) -> Result<(u32, u32), RenderError> {
    let [llx, lly, urx, ury] = page_box(doc, page_id);
    let (width, height) = ((urx - llx) as f32, (ury - lly) as f32);
    match rotation(doc, page_id) {
        90 | 270 => scaled_dimensions(height, width, scale),
        _ => scaled_dimensions(width, height, scale),
    }
}

/// Composite onto white; JPEG has no alpha and transparent PNGs read as
/// blank pages in most viewers.
fn flatten(image: &mut RgbaImage) {
    for Rgba([r, g, b, a]) in image.pixels_mut() {
        let alpha = u16::from(*a);
        let over = |c: u8| ((u16::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *r = over(*r);
        *g = over(*g);
        *b = over(*b);
        *a = 255;
    }
}

/// Render page `index` of the serialized document `data`.
///
/// `doc` must be the lopdf view of the same bytes; it is only used to size
/// the output.
pub(crate) fn render_page(
    data: Arc<Vec<u8>>,
    doc: &Document,
    page_id: ObjectId,
    index: u32,
    scale: f32,
) -> Result<RgbaImage, RenderError> {
    let (width, height) = page_dimensions(doc, page_id, scale)?;

    let data: Arc<dyn AsRef<[u8]> + Send + Sync> = data;
    let pdf = Pdf::new(data)
        .map_err(|e| RenderError::Corrupt(format!("renderer rejected document: {e:?}")))?;
    let page = pdf
        .pages()
        .get(index as usize)
        .ok_or(RenderError::MissingPage(index + 1))?;

    let settings = RenderSettings {
        x_scale: scale,
        y_scale: scale,
        ..Default::default()
    };
    let png = render(page, &InterpreterSettings::default(), &settings).take_png();
    let mut image = image::load_from_memory_with_format(&png, ImageFormat::Png)
        .map_err(|e| RenderError::Corrupt(format!("renderer output: {e}")))?
        .to_rgba8();
    trace!(
        page = index + 1,
        width = image.width(),
        height = image.height(),
        "renderer output"
    );

    if image.dimensions() != (width, height) {
        debug!(
            page = index + 1,
            from = ?image.dimensions(),
            to = ?(width, height),
            "resizing rendered page"
        );
        image = imageops::resize(&image, width, height, FilterType::Triangle);
    }
    flatten(&mut image);
    Ok(image)
}
