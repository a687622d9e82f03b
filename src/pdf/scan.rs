use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True when the path has a `.pdf` extension, in any letter case
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Expand a list of dropped or picked paths into PDF files.
///
/// Files are kept when they have a PDF extension. Directories are walked
/// recursively (following links) in file-name order. Input order is kept.
pub fn collect_pdfs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for path in paths {
        if path.is_dir() {
            found.extend(pdfs_in_dir(path));
        } else if is_pdf(path) {
            found.push(path.clone());
        } else {
            log::debug!("Skipping non-PDF path {}", path.display());
        }
    }

    found
}

/// All PDF files below `dir`
pub fn pdfs_in_dir(dir: &Path) -> Vec<PathBuf> {
    log::info!("🔍 Scanning folder: {}", dir.display());

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && is_pdf(entry.path()))
        .map(|entry| entry.into_path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("a.pdf", true)]
    #[case("B.PDF", true)]
    #[case("mixed.PdF", true)]
    #[case("notes.txt", false)]
    #[case("pdf", false)]
    #[case("archive.pdf.zip", false)]
    fn test_is_pdf(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_pdf(Path::new(name)), expected);
    }

    #[test]
    fn test_collect_walks_directories_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("sub").join("deeper");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join("b.pdf"), b"").unwrap();
        std::fs::write(dir.path().join("a.PDF"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();
        std::fs::write(nested.join("c.pdf"), b"").unwrap();

        let found = collect_pdfs(&[dir.path().to_path_buf()]);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.PDF", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_collect_keeps_input_order_and_drops_other_files() {
        let dir = TempDir::new().unwrap();
        let z = dir.path().join("z.pdf");
        let a = dir.path().join("a.pdf");
        let txt = dir.path().join("x.txt");
        for path in [&z, &a, &txt] {
            std::fs::write(path, b"").unwrap();
        }

        let found = collect_pdfs(&[z.clone(), txt, a.clone()]);
        assert_eq!(found, vec![z, a]);
    }
}
