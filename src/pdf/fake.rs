//! An in-memory [`PageContainer`] for pipeline tests.

use super::{scaled_dimensions, PageContainer};
use crate::error::{CodecError, RenderError};
use image::{Rgba, RgbaImage};

#[derive(Debug, Clone, PartialEq)]
pub struct FakePage {
    /// Page number in the document the page was first loaded from.
    pub label: u32,
    pub width: f32,
    pub height: f32,
    pub corrupt: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeDocument {
    pub pages: Vec<FakePage>,
    pub fail_serialize: bool,
}

impl FakeDocument {
    /// `count` Letter-sized pages labelled 1..=count.
    pub fn with_pages(count: u32) -> Self {
        FakeDocument {
            pages: (1..=count)
                .map(|label| FakePage {
                    label,
                    width: 612.0,
                    height: 792.0,
                    corrupt: false,
                })
                .collect(),
            fail_serialize: false,
        }
    }

    pub fn corrupt(mut self, number: u32) -> Self {
        self.pages[number as usize - 1].corrupt = true;
        self
    }

    pub fn labels(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.label).collect()
    }
}

impl PageContainer for FakeDocument {
    /// Accepts `FAKE:<page count>`.
    fn load(bytes: &[u8]) -> Result<Self, CodecError> {
        std::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.strip_prefix("FAKE:"))
            .and_then(|n| n.parse().ok())
            .map(FakeDocument::with_pages)
            .ok_or_else(|| CodecError::Load("not a fake document".to_string()))
    }

    fn create() -> Self {
        FakeDocument::default()
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn copy_page(&mut self, source: &Self, index: u32) -> Result<(), CodecError> {
        let page = source
            .pages
            .get(index as usize)
            .ok_or(CodecError::MissingPage(index + 1))?;
        self.pages.push(page.clone());
        Ok(())
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage, RenderError> {
        let page = self
            .pages
            .get(index as usize)
            .ok_or(RenderError::MissingPage(index + 1))?;
        if page.corrupt {
            return Err(RenderError::Corrupt(format!("page {} is corrupt", page.label)));
        }
        let (width, height) = scaled_dimensions(page.width, page.height, scale)?;
        let shade = (page.label % 256) as u8;
        Ok(RgbaImage::from_pixel(width, height, Rgba([shade, shade, shade, 255])))
    }

    /// `FAKE:<labels>`, e.g. `FAKE:3,1,2,3`.
    fn to_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        if self.fail_serialize {
            return Err(CodecError::Serialize("serialization disabled".to_string()));
        }
        let labels: Vec<String> = self.labels().iter().map(u32::to_string).collect();
        Ok(format!("FAKE:{}", labels.join(",")).into_bytes())
    }
}
