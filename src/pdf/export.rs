/// Merged and split export
///
/// Both flows work on a snapshot of page references so they can run on a
/// blocking worker while the grid stays interactive.
use std::path::{Path, PathBuf};

use tokio::task;

use crate::error::{PdfError, Result};
use crate::pdf::{extract, merge};
use crate::state::data::PageRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Merged,
    Split,
}

/// What an export wrote
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSummary {
    pub kind: ExportKind,
    /// Pages written in total
    pub pages: usize,
    /// Files written
    pub files: usize,
    /// The merged file, or the directory holding the split files
    pub destination: PathBuf,
}

impl ExportSummary {
    /// Directory containing the exported file(s)
    pub fn folder(&self) -> PathBuf {
        match self.kind {
            ExportKind::Merged => self
                .destination
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            ExportKind::Split => self.destination.clone(),
        }
    }
}

/// An export request, detached from the grid
#[derive(Debug, Clone)]
pub enum ExportJob {
    Merged {
        pages: Vec<PageRef>,
        output: PathBuf,
    },
    Split {
        pages: Vec<PageRef>,
        dir: PathBuf,
        prefix: String,
    },
}

impl ExportJob {
    pub fn run(&self) -> Result<ExportSummary> {
        match self {
            ExportJob::Merged { pages, output } => export_merged(pages, output),
            ExportJob::Split { pages, dir, prefix } => export_split(pages, dir, prefix),
        }
    }
}

/// Run an export on a blocking worker thread
pub async fn run_export(job: ExportJob) -> std::result::Result<ExportSummary, String> {
    task::spawn_blocking(move || job.run().map_err(|e| e.to_string()))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
}

/// Write every page, in order, into one PDF at `output`.
///
/// Pages are extracted into a private temp directory first and then
/// concatenated. The temp directory is removed afterwards.
pub fn export_merged(pages: &[PageRef], output: &Path) -> Result<ExportSummary> {
    if pages.is_empty() {
        return Err(PdfError::NothingToExport);
    }
    log::info!("📄 Merging {} pages into {}", pages.len(), output.display());

    let scratch = tempfile::Builder::new()
        .prefix("pdf-arrange-")
        .tempdir()
        .map_err(|e| PdfError::io(std::env::temp_dir(), e))?;

    let mut parts = Vec::with_capacity(pages.len());
    for (position, page) in pages.iter().enumerate() {
        let part = scratch.path().join(format!("page_{:05}.pdf", position));
        extract::extract_page(&page.path, page.index, &part)?;
        parts.push(part);
    }

    let written = merge::concatenate(&parts, output)?;

    let scratch_path = scratch.path().to_path_buf();
    if let Err(e) = scratch.close() {
        log::debug!("Could not remove {}: {}", scratch_path.display(), e);
    }

    log::info!("✅ Merged {} pages", written);
    Ok(ExportSummary {
        kind: ExportKind::Merged,
        pages: written,
        files: 1,
        destination: output.to_path_buf(),
    })
}

/// Write one single-page PDF per page into `dir`, named
/// `<prefix>_p<N>.pdf` with N one-based and zero-padded to the width of
/// the page count
pub fn export_split(pages: &[PageRef], dir: &Path, prefix: &str) -> Result<ExportSummary> {
    if pages.is_empty() {
        return Err(PdfError::NothingToExport);
    }
    log::info!("✂️ Splitting {} pages into {}", pages.len(), dir.display());

    for (position, page) in pages.iter().enumerate() {
        let file = dir.join(split_file_name(prefix, position + 1, pages.len()));
        extract::extract_page(&page.path, page.index, &file)?;
    }

    log::info!("✅ Wrote {} files", pages.len());
    Ok(ExportSummary {
        kind: ExportKind::Split,
        pages: pages.len(),
        files: pages.len(),
        destination: dir.to_path_buf(),
    })
}

/// `<prefix>_p<number>.pdf`, padded to the digit count of `total`
pub fn split_file_name(prefix: &str, number: usize, total: usize) -> String {
    let width = total.to_string().len();
    format!("{}_p{:0width$}.pdf", prefix, number, width = width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;
    use rstest::rstest;
    use tempfile::TempDir;

    fn refs(path: &Path, indices: &[usize]) -> Vec<PageRef> {
        indices.iter().map(|&i| PageRef::new(path, i)).collect()
    }

    #[rstest]
    #[case(1, 4, "x_p1.pdf")]
    #[case(4, 4, "x_p4.pdf")]
    #[case(3, 12, "x_p03.pdf")]
    #[case(100, 100, "x_p100.pdf")]
    #[case(7, 100, "x_p007.pdf")]
    fn test_split_file_name(#[case] number: usize, #[case] total: usize, #[case] expected: &str) {
        assert_eq!(split_file_name("x", number, total), expected);
    }

    #[test]
    fn test_merged_follows_given_order() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 3);
        let b = fixtures::write_pdf(dir.path(), "b.pdf", 2);
        let output = dir.path().join("output.pdf");

        let mut pages = refs(&b, &[1]);
        pages.extend(refs(&a, &[2, 0]));
        pages.extend(refs(&b, &[0]));

        let summary = export_merged(&pages, &output).unwrap();
        assert_eq!(summary.pages, 4);
        assert_eq!(summary.files, 1);
        assert_eq!(summary.folder(), dir.path());
        assert_eq!(fixtures::page_tags(&output), vec!["b:1", "a:2", "a:0", "b:0"]);
    }

    #[test]
    fn test_merged_can_repeat_a_page() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 1);
        let output = dir.path().join("twice.pdf");

        export_merged(&refs(&a, &[0, 0]), &output).unwrap();
        assert_eq!(fixtures::page_tags(&output), vec!["a:0", "a:0"]);
    }

    #[test]
    fn test_split_after_delete() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 3);
        let b = fixtures::write_pdf(dir.path(), "b.pdf", 2);
        let out_dir = dir.path().join("out");
        std::fs::create_dir(&out_dir).unwrap();

        let mut pages = refs(&a, &[0, 2]);
        pages.extend(refs(&b, &[0, 1]));

        let summary = export_split(&pages, &out_dir, "x").unwrap();
        assert_eq!(summary.files, 4);
        assert_eq!(summary.folder(), out_dir);

        let expected = ["a:0", "a:2", "b:0", "b:1"];
        for (n, tag) in expected.iter().enumerate() {
            let file = out_dir.join(format!("x_p{}.pdf", n + 1));
            assert_eq!(fixtures::page_tags(&file), vec![tag.to_string()]);
        }
        assert_eq!(std::fs::read_dir(&out_dir).unwrap().count(), 4);
    }

    #[test]
    fn test_empty_exports_write_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("output.pdf");

        assert!(matches!(export_merged(&[], &output), Err(PdfError::NothingToExport)));
        assert!(matches!(export_split(&[], dir.path(), "x"), Err(PdfError::NothingToExport)));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_merged_reports_missing_source() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("gone.pdf");

        let result = export_merged(&refs(&gone, &[0]), &dir.path().join("out.pdf"));
        assert!(matches!(result, Err(PdfError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_run_export_in_background() {
        let dir = TempDir::new().unwrap();
        let a = fixtures::write_pdf(dir.path(), "a.pdf", 2);

        let job = ExportJob::Split {
            pages: refs(&a, &[1, 0]),
            dir: dir.path().to_path_buf(),
            prefix: "part".to_string(),
        };
        let summary = run_export(job).await.unwrap();
        assert_eq!(summary.kind, ExportKind::Split);
        assert_eq!(fixtures::page_tags(&dir.path().join("part_p1.pdf")), vec!["a:1"]);

        let empty = ExportJob::Merged {
            pages: Vec::new(),
            output: dir.path().join("none.pdf"),
        };
        assert_eq!(run_export(empty).await.unwrap_err(), "no pages to export");
    }
}
