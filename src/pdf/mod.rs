pub mod document;
mod import;
mod render;

#[cfg(test)]
pub mod fake;
#[cfg(test)]
pub mod fixtures;

pub use document::PdfDocument;

use crate::error::{CodecError, RenderError};
use image::RgbaImage;

/// Largest bitmap edge we are willing to allocate, in pixels.
pub const MAX_DIMENSION: u32 = 30_000;

/// The capabilities the pipeline needs from a paginated document.
///
/// Page indices are 0-based here; user-facing page numbers are converted at
/// the call site.
pub trait PageContainer: Sized {
    /// Parse a document from raw bytes.
    fn load(bytes: &[u8]) -> Result<Self, CodecError>;

    /// An empty document to copy pages into.
    fn create() -> Self;

    fn page_count(&self) -> u32;

    /// Append a copy of `source`'s page `index` to the end of this document.
    fn copy_page(&mut self, source: &Self, index: u32) -> Result<(), CodecError>;

    /// Render page `index` at `scale` pixels per point.
    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage, RenderError>;

    fn to_bytes(&mut self) -> Result<Vec<u8>, CodecError>;

    fn page(&self, index: u32) -> Option<PageHandle<'_, Self>> {
        (index < self.page_count()).then_some(PageHandle {
            document: self,
            index,
        })
    }
}

/// A borrowed page of a loaded document.
#[derive(Debug)]
pub struct PageHandle<'a, C> {
    pub document: &'a C,
    pub index: u32,
}

impl<C> Clone for PageHandle<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for PageHandle<'_, C> {}

impl<C: PageContainer> PageHandle<'_, C> {
    /// 1-based page number.
    pub fn number(&self) -> u32 {
        self.index + 1
    }

    pub fn render(&self, scale: f32) -> Result<RgbaImage, RenderError> {
        self.document.render_page(self.index, scale)
    }
}

/// Pixel size of a page of `width` x `height` points at `scale`.
///
/// Both edges are `floor(edge * scale)`; an edge that floors to zero or
/// exceeds [`MAX_DIMENSION`] is an error.
pub fn scaled_dimensions(width: f32, height: f32, scale: f32) -> Result<(u32, u32), RenderError> {
    let scale_edge = |edge: f32| -> Result<u32, RenderError> {
        let pixels = (f64::from(edge) * f64::from(scale)).floor();
        if !pixels.is_finite() || pixels < 1.0 {
            return Err(RenderError::Geometry(format!(
                "{edge}pt at scale {scale} is smaller than one pixel"
            )));
        }
        if pixels > f64::from(MAX_DIMENSION) {
            return Err(RenderError::Geometry(format!(
                "{edge}pt at scale {scale} exceeds {MAX_DIMENSION} pixels"
            )));
        }
        Ok(pixels as u32)
    };
    Ok((scale_edge(width)?, scale_edge(height)?))
}
