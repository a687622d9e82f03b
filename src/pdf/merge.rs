/// Concatenation of PDF files into one document.
use crate::error::{PdfError, Result};
use crate::pdf::extract;
use lopdf::{Document, Object, ObjectId};
use std::path::{Path, PathBuf};

/// Concatenate `parts` in order into a new PDF at `output`.
///
/// Returns the number of pages in the written document.
pub fn concatenate(parts: &[PathBuf], output: &Path) -> Result<usize> {
    let (first, rest) = parts.split_first().ok_or(PdfError::NothingToExport)?;

    let mut merged = extract::load(first)?;
    let root_pages_id = root_pages(&merged, first)?;
    let mut max_id = merged.max_id;

    for part in rest {
        let mut doc = extract::load(part)?;

        // Renumber objects to avoid ID conflicts
        doc.renumber_objects_with(max_id + 1);
        max_id = doc.max_id;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            extract::inline_inherited(&mut doc, page_id);
            if let Ok(page) = doc.get_dictionary_mut(page_id) {
                page.set("Parent", root_pages_id);
            }
        }

        merged.objects.extend(doc.objects);
        append_kids(&mut merged, root_pages_id, &page_ids, part)?;
    }

    merged.max_id = max_id;
    // Catalogs and page trees of the appended parts are now unreachable
    merged.prune_objects();
    merged.renumber_objects();

    let pages = merged.get_pages().len();
    extract::save(&mut merged, output)?;
    Ok(pages)
}

fn root_pages(doc: &Document, path: &Path) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|_| PdfError::structure(path, "catalog has no /Pages reference"))
}

/// Add page references to the end of the root page tree node
fn append_kids(doc: &mut Document, pages_id: ObjectId, page_ids: &[ObjectId], part: &Path) -> Result<()> {
    let pages = doc
        .get_dictionary_mut(pages_id)
        .map_err(|_| PdfError::structure(part, "/Pages is not a dictionary"))?;

    match pages.get_mut(b"Kids") {
        Ok(Object::Array(kids)) => kids.extend(page_ids.iter().map(|&id| Object::Reference(id))),
        _ => return Err(PdfError::structure(part, "/Pages has no /Kids array")),
    }

    let count = pages.get(b"Count").and_then(Object::as_i64).unwrap_or(0);
    pages.set("Count", Object::Integer(count + page_ids.len() as i64));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_concatenate_keeps_part_order() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 2);
        let b = fixtures::write_pdf(dir.path(), "b.pdf", 1);
        let output = dir.path().join("merged.pdf");

        let pages = concatenate(&[b.clone(), a.clone(), b], &output).unwrap();

        assert_eq!(pages, 4);
        assert_eq!(
            fixtures::page_tags(&output),
            vec!["b:0", "a:0", "a:1", "b:0"]
        );
    }

    #[test]
    fn test_concatenate_single_part() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 3);
        let output = dir.path().join("copy.pdf");

        assert_eq!(concatenate(&[a], &output).unwrap(), 3);
        assert_eq!(extract::page_count(&output).unwrap(), 3);
    }

    #[test]
    fn test_concatenate_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("empty.pdf");

        assert!(matches!(concatenate(&[], &output), Err(PdfError::NothingToExport)));
        assert!(!output.exists());
    }

    #[test]
    fn test_concatenate_missing_part_fails() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 1);
        let missing = dir.path().join("missing.pdf");

        let result = concatenate(&[a, missing], &dir.path().join("out.pdf"));
        assert!(matches!(result, Err(PdfError::Parse { .. })));
    }
}
