/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the PDF layer and the UI layer.
use iced::widget::image::Handle;
use iced::Size;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Identity of one grid cell: a source file and a zero-based page index
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageRef {
    pub path: PathBuf,
    pub index: usize,
}

impl PageRef {
    pub fn new(path: impl Into<PathBuf>, index: usize) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }

    /// File name only (e.g., "report.pdf")
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

pub fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// A rendered page kept at import resolution and scaled by the view
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

impl Thumbnail {
    pub fn from_rgba(bitmap: RgbaImage) -> Self {
        let (width, height) = bitmap.dimensions();
        Self {
            handle: Handle::from_rgba(width, height, bitmap.into_raw()),
            width,
            height,
        }
    }

    /// Largest size with the thumbnail's aspect ratio that fits in `bounds`
    pub fn fit(&self, bounds: Size) -> Size {
        if self.width == 0 || self.height == 0 {
            return bounds;
        }
        let scale = (bounds.width / self.width as f32).min(bounds.height / self.height as f32);
        Size::new(self.width as f32 * scale, self.height as f32 * scale)
    }
}

/// One page on the grid
#[derive(Debug, Clone)]
pub struct GridCell {
    pub page: PageRef,
    pub thumbnail: Thumbnail,
    /// Wrapped "<file name> - p<N>" shown under the thumbnail
    pub label: String,
    /// Unwrapped label shown on hover
    pub tooltip: String,
    pub selected: bool,
}

/// Outcome of importing one or more files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Cells appended to the grid
    pub added: usize,
    /// Pages skipped because the same (path, index) is already on the grid
    pub duplicates: usize,
    /// Files that could not be read or rendered, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl ImportReport {
    pub fn merge(&mut self, other: ImportReport) {
        self.added += other.added;
        self.duplicates += other.duplicates;
        self.failures.extend(other.failures);
    }

    /// One-line summary for the status bar
    pub fn summary(&self) -> String {
        let mut summary = format!("Added {} pages", self.added);
        if self.duplicates > 0 {
            summary.push_str(&format!(", skipped {} duplicates", self.duplicates));
        }
        match self.failures.as_slice() {
            [] => {}
            [(path, _)] => summary.push_str(&format!(", could not open {}", file_name(path))),
            many => summary.push_str(&format!(", could not open {} files", many.len())),
        }
        summary
    }
}
