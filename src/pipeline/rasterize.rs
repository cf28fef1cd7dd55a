use crate::error::{RasterOptionsError, RenderError};
use crate::pdf::{PageContainer, PageHandle};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RasterFormat {
    #[default]
    Jpeg,
    Png,
}

impl RasterFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "image/jpeg",
            RasterFormat::Png => "image/png",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Png => "png",
        }
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterFormat::Jpeg => f.write_str("jpeg"),
            RasterFormat::Png => f.write_str("png"),
        }
    }
}

impl FromStr for RasterFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(RasterFormat::Jpeg),
            "png" => Ok(RasterFormat::Png),
            other => Err(format!("unknown image format '{}' (expected jpeg or png)", other)),
        }
    }
}

/// How to turn a page into a bitmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Pixels per point, applied to both axes.
    pub scale: f32,
    /// 0.0 to 1.0. Only used by lossy formats but always validated.
    pub quality: f32,
    pub format: RasterFormat,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            scale: 2.0,
            quality: 0.8,
            format: RasterFormat::Jpeg,
        }
    }
}

impl RasterOptions {
    pub fn validate(&self) -> Result<(), RasterOptionsError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(RasterOptionsError::Scale(self.scale));
        }
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(RasterOptionsError::Quality(self.quality));
        }
        Ok(())
    }

    /// JPEG encoder quality in 1..=100.
    pub fn jpeg_quality(&self) -> u8 {
        (self.quality * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

/// The encoded bitmap of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageArtifact {
    /// 1-based position in the extracted document.
    pub page_number: u32,
    /// Page number in the source document.
    pub source_page: u32,
    /// How many times `source_page` has been emitted so far in this run,
    /// this artifact included.
    pub occurrence: u32,
    pub width: u32,
    pub height: u32,
    pub format: RasterFormat,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl PageArtifact {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    /// `page_<source>.<ext>`; repeats of a page get `_<occurrence>` so they
    /// do not overwrite each other.
    pub fn file_name(&self) -> String {
        match self.occurrence {
            0 | 1 => format!("page_{}.{}", self.source_page, self.format.extension()),
            n => format!(
                "page_{}_{}.{}",
                self.source_page,
                n,
                self.format.extension()
            ),
        }
    }
}

/// A page that could not be rasterized. The rest of the run carries on.
#[derive(Debug)]
pub struct PageFailure {
    pub page_number: u32,
    pub source_page: u32,
    pub error: RenderError,
}

fn encode(image: RgbaImage, options: &RasterOptions) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    match options.format {
        RasterFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(
                &mut bytes,
                options.jpeg_quality(),
            ))?;
        }
        RasterFormat::Png => image.write_with_encoder(PngEncoder::new(&mut bytes))?,
    }
    Ok(bytes)
}

/// Render and encode a single page.
///
/// Touches nothing but the page itself, so a failure here says nothing about
/// any other page. `source_page` of the result equals `page_number`; callers
/// that know the source mapping overwrite it.
pub fn rasterize<C: PageContainer>(
    page: PageHandle<'_, C>,
    options: &RasterOptions,
) -> Result<PageArtifact, RenderError> {
    options.validate()?;

    let image = page.render(options.scale)?;
    let (width, height) = image.dimensions();
    trace!(page = page.number(), width, height, "rendered page");

    Ok(PageArtifact {
        page_number: page.number(),
        source_page: page.number(),
        occurrence: 1,
        width,
        height,
        format: options.format,
        bytes: encode(image, options)?,
    })
}
