use super::import::Importer;
use super::{render, PageContainer};
use crate::error::{CodecError, RenderError};
use anyhow::{Context, Result};
use image::RgbaImage;
use lopdf::{dictionary, Document, Object, ObjectId};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

static NEXT_DOCUMENT_ID: AtomicU64 = AtomicU64::new(1);

/// A PDF held in memory by lopdf.
pub struct PdfDocument {
    pub doc: Document,
    /// Page object ids in page order.
    pages: Vec<ObjectId>,
    /// Distinguishes sources when pages are copied in from several documents.
    id: u64,
    /// Per source document: source object id -> id in `doc`.
    imported: HashMap<u64, HashMap<ObjectId, ObjectId>>,
    /// Serialized form handed to the renderer. Reset whenever pages change.
    serialized: OnceLock<Arc<Vec<u8>>>,
}

impl PdfDocument {
    fn from_lopdf(doc: Document) -> Self {
        let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        PdfDocument {
            doc,
            pages: pages.into_iter().map(|(_, id)| id).collect(),
            id: NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed),
            imported: HashMap::new(),
            serialized: OnceLock::new(),
        }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read PDF: {}", path.display()))?;
        Self::load(&bytes).with_context(|| format!("Failed to open PDF: {}", path.display()))
    }

    /// Object id of the 0-based page `index`.
    pub fn page_id(&self, index: u32) -> Option<ObjectId> {
        self.pages.get(index as usize).copied()
    }

    fn page_tree_root(&self) -> lopdf::Result<ObjectId> {
        self.doc.catalog()?.get(b"Pages")?.as_reference()
    }

    fn serialized(&self) -> Result<Arc<Vec<u8>>, RenderError> {
        if let Some(bytes) = self.serialized.get() {
            return Ok(bytes.clone());
        }
        let mut doc = self.doc.clone();
        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| RenderError::Corrupt(format!("failed to serialize for rendering: {e}")))?;
        Ok(self.serialized.get_or_init(|| Arc::new(bytes)).clone())
    }
}

impl PageContainer for PdfDocument {
    fn load(bytes: &[u8]) -> Result<Self, CodecError> {
        let doc = Document::load_mem(bytes).map_err(|e| CodecError::Load(e.to_string()))?;
        let loaded = Self::from_lopdf(doc);
        let _ = loaded.serialized.set(Arc::new(bytes.to_vec()));
        Ok(loaded)
    }

    fn create() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        Self::from_lopdf(doc)
    }

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn copy_page(&mut self, source: &Self, index: u32) -> Result<(), CodecError> {
        let number = index + 1;
        let page_id = source
            .page_id(index)
            .ok_or(CodecError::MissingPage(number))?;
        let copy_error = |e: lopdf::Error| CodecError::CopyPage {
            page: number,
            reason: e.to_string(),
        };
        let pages_id = self.page_tree_root().map_err(copy_error)?;

        let mut importer = Importer {
            source: &source.doc,
            target: &mut self.doc,
            remap: self.imported.entry(source.id).or_default(),
        };
        let mut page = importer.import_page(page_id, number)?;
        page.set("Parent", pages_id);
        let new_page_id = self.doc.add_object(page);

        let tree = self.doc.get_dictionary_mut(pages_id).map_err(copy_error)?;
        let count = tree.get(b"Count").and_then(Object::as_i64).unwrap_or(0) + 1;
        tree.get_mut(b"Kids")
            .and_then(Object::as_array_mut)
            .map_err(copy_error)?
            .push(Object::Reference(new_page_id));
        tree.set("Count", count);

        self.pages.push(new_page_id);
        self.serialized = OnceLock::new();
        Ok(())
    }

    fn render_page(&self, index: u32, scale: f32) -> Result<RgbaImage, RenderError> {
        let page_id = self
            .page_id(index)
            .ok_or(RenderError::MissingPage(index + 1))?;
        render::render_page(self.serialized()?, &self.doc, page_id, index, scale)
    }

    fn to_bytes(&mut self) -> Result<Vec<u8>, CodecError> {
        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| CodecError::Serialize(e.to_string()))?;
        Ok(bytes)
    }
}
