/// Error types for PDF import, extraction and export
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the `pdf` and `state` modules
pub type Result<T> = std::result::Result<T, PdfError>;

/// Everything that can go wrong while reading, rendering or writing PDFs
#[derive(Debug, Error)]
pub enum PdfError {
    /// Filesystem failure (open, create, read, write)
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not a PDF lopdf can read
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Writing a document back to disk failed
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// PDFium refused to load or rasterize a page
    #[error("failed to render page {} of {}: {message}", index + 1, path.display())]
    Render {
        path: PathBuf,
        index: usize,
        message: String,
    },

    /// The PDFium shared library could not be bound
    #[error("PDFium is not available: {0}")]
    RendererUnavailable(String),

    /// Page index past the end of the document
    #[error("page {} does not exist in {} ({count} pages)", index + 1, path.display())]
    PageOutOfRange {
        path: PathBuf,
        index: usize,
        count: usize,
    },

    /// The page tree is missing a required entry
    #[error("malformed page tree in {}: {reason}", path.display())]
    Structure { path: PathBuf, reason: String },

    /// Export was requested with no pages
    #[error("no pages to export")]
    NothingToExport,
}

impl PdfError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, source: lopdf::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }

    pub fn structure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Structure {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_numbers_are_one_based_in_messages() {
        let err = PdfError::PageOutOfRange {
            path: PathBuf::from("a.pdf"),
            index: 4,
            count: 3,
        };
        assert_eq!(err.to_string(), "page 5 does not exist in a.pdf (3 pages)");
    }

    #[test]
    fn test_nothing_to_export_message() {
        assert_eq!(PdfError::NothingToExport.to_string(), "no pages to export");
    }
}
