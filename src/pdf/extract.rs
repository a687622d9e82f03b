/// Single-page extraction.
///
/// A page is copied into a new document by keeping the source document,
/// hanging the chosen page directly under the root `Pages` node, and pruning
/// everything that is no longer reachable.
use crate::error::{PdfError, Result};
use lopdf::{Document, Object, ObjectId};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Catalog entries that point into pages which no longer exist after extraction
const DROPPED_CATALOG_KEYS: [&[u8]; 4] = [b"Outlines", b"Dests", b"PageLabels", b"StructTreeRoot"];

/// Guard against cyclic `/Parent` chains in broken files
const MAX_TREE_DEPTH: usize = 64;

/// Load a document, mapping lopdf failures onto the file path
pub fn load(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|e| PdfError::parse(path, e))
}

/// Number of pages in the PDF at `path`
pub fn page_count(path: &Path) -> Result<usize> {
    Ok(load(path)?.get_pages().len())
}

/// Copy page `index` (zero-based) of `source` into a new single-page PDF
/// at `destination`
pub fn extract_page(source: &Path, index: usize, destination: &Path) -> Result<()> {
    let doc = load(source)?;
    let mut single = single_page(doc, source, index)?;
    save(&mut single, destination)
}

/// Reduce `doc` to page `index`. `source` is only used for error messages.
pub fn single_page(mut doc: Document, source: &Path, index: usize) -> Result<Document> {
    let pages = doc.get_pages();
    let count = pages.len();
    let page_id = u32::try_from(index + 1)
        .ok()
        .and_then(|number| pages.get(&number).copied())
        .ok_or_else(|| PdfError::PageOutOfRange {
            path: source.to_path_buf(),
            index,
            count,
        })?;

    let root_pages_id = doc
        .catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::structure(source, "catalog has no /Pages reference"))?;

    inline_inherited(&mut doc, page_id);
    let page = doc
        .get_dictionary_mut(page_id)
        .map_err(|_| PdfError::structure(source, "page object is not a dictionary"))?;
    page.set("Parent", root_pages_id);

    let root = doc
        .get_dictionary_mut(root_pages_id)
        .map_err(|_| PdfError::structure(source, "/Pages is not a dictionary"))?;
    root.set("Kids", vec![Object::Reference(page_id)]);
    root.set("Count", Object::Integer(1));

    if let Ok(catalog) = doc.catalog_mut() {
        for key in DROPPED_CATALOG_KEYS {
            catalog.remove(key);
        }
    }

    doc.prune_objects();
    doc.renumber_objects();
    Ok(doc)
}

/// Look up `key` on the page or the nearest ancestor that defines it.
/// Indirect values are resolved.
pub fn inherited_attribute<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = node.get(key) {
            return doc.dereference(value).ok().map(|(_, object)| object);
        }
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Copy inheritable attributes from the page's ancestors onto the page itself,
/// so it can be re-parented without changing how it renders
pub fn inline_inherited(doc: &mut Document, page_id: ObjectId) {
    let source: &Document = doc;
    let inherited: Vec<(&[u8], Object)> = INHERITABLE
        .iter()
        .filter(|key| {
            source
                .get_dictionary(page_id)
                .map(|page| !page.has(key))
                .unwrap_or(false)
        })
        .filter_map(|key| inherited_attribute(source, page_id, key).map(|value| (*key, value.clone())))
        .collect();

    if let Ok(page) = doc.get_dictionary_mut(page_id) {
        for (key, value) in inherited {
            page.set(key, value);
        }
    }
}

/// Write `doc` to `path`, replacing any existing file
pub fn save(doc: &mut Document, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| PdfError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    doc.save_to(&mut writer).map_err(|e| PdfError::Write {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    writer.flush().map_err(|e| PdfError::io(path, e))
}
