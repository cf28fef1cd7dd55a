use crate::error::CodecError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashMap;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Walk the page tree from `page_id` upwards looking for `key`.
pub(crate) fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(page_id).ok()?;
    // Page trees are shallow; the bound only guards against Parent cycles.
    for _ in 0..64 {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent = current.get(b"Parent").ok()?.as_reference().ok()?;
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

fn is_page_tree_node(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    matches!(
        dict.get(b"Type").and_then(Object::as_name),
        Ok(b"Page") | Ok(b"Pages")
    )
}

/// Copies objects from one document into another, renumbering references.
///
/// `remap` is shared between calls for the same source so objects used by
/// several copied pages are imported only once.
pub(crate) struct Importer<'a> {
    pub source: &'a Document,
    pub target: &'a mut Document,
    pub remap: &'a mut HashMap<ObjectId, ObjectId>,
}

impl Importer<'_> {
    /// Build a standalone copy of a source page dictionary. The result has no
    /// `Parent`; the caller links it into the target's page tree.
    pub fn import_page(&mut self, page_id: ObjectId, number: u32) -> Result<Dictionary, CodecError> {
        let mut page = self
            .source
            .get_dictionary(page_id)
            .map_err(|e| CodecError::CopyPage {
                page: number,
                reason: e.to_string(),
            })?
            .clone();

        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(self.source, page_id, key) {
                page.set(key.to_vec(), value.clone());
            }
        }
        page.remove(b"Parent");

        Ok(self.import_dictionary(&page))
    }

    fn import_reference(&mut self, id: ObjectId) -> Object {
        if let Some(&new_id) = self.remap.get(&id) {
            return Object::Reference(new_id);
        }

        let object = match self.source.get_object(id) {
            Ok(object) => object,
            // Dangling references are legal and read as null.
            Err(_) => return Object::Null,
        };
        if is_page_tree_node(object) {
            return Object::Null;
        }

        // Reserve the id before recursing so cycles terminate.
        let new_id = self.target.new_object_id();
        self.remap.insert(id, new_id);
        let imported = self.import_object(object);
        self.target.objects.insert(new_id, imported);
        Object::Reference(new_id)
    }

    fn import_object(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.import_reference(*id),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.import_object(item)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.import_dictionary(dict)),
            Object::Stream(stream) => {
                let mut stream = stream.clone();
                stream.dict = self.import_dictionary(&stream.dict);
                Object::Stream(stream)
            }
            other => other.clone(),
        }
    }

    fn import_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut imported = Dictionary::new();
        for (key, value) in dict.iter() {
            imported.set(key.clone(), self.import_object(value));
        }
        imported
    }
}
