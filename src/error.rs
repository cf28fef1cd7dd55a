//! Error types for the extraction pipeline.

use crate::page_range::PageRange;
use thiserror::Error;

/// A selection that cannot be honored against the loaded document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No document has been loaded.
    #[error("no document loaded")]
    EmptyInput,

    /// The selection string produced no usable ranges.
    #[error("no valid page ranges; use a format like: 1-3, 4, 6-8")]
    EmptySelection,

    /// A range ends past the last page of the document.
    #[error("range {range} exceeds total pages ({total_pages})")]
    RangeOutOfBounds { range: PageRange, total_pages: u32 },
}

/// Rejected raster parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RasterOptionsError {
    #[error("scale must be a finite number greater than 0, got {0}")]
    Scale(f32),

    #[error("quality must be between 0 and 1, got {0}")]
    Quality(f32),
}

/// Failures of the document container itself. These end the run.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The source bytes are not a readable document.
    #[error("failed to load document: {0}")]
    Load(String),

    /// A page index outside the source document was requested.
    #[error("page {0} does not exist in the source document")]
    MissingPage(u32),

    /// The page could not be carried over into the output document.
    #[error("failed to copy page {page}: {reason}")]
    CopyPage { page: u32, reason: String },

    /// The output document could not be written.
    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

/// Failure to render a single page. Never aborts the sibling pages.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("page {0} does not exist")]
    MissingPage(u32),

    #[error("invalid page geometry: {0}")]
    Geometry(String),

    #[error("corrupt page content: {0}")]
    Corrupt(String),

    #[error("invalid raster options: {0}")]
    Options(#[from] RasterOptionsError),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Terminal failure of a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Options(#[from] RasterOptionsError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
