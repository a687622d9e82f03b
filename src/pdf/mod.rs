/// PDF access module
///
/// This module handles:
/// - Rasterizing pages into RGBA thumbnails (render.rs)
/// - Copying a single page into its own PDF file (extract.rs)
/// - Concatenating single-page files into one document (merge.rs)
/// - Merged and split export of an ordered page list (export.rs)
/// - Finding PDF files among dropped paths and folders (scan.rs)

pub mod export;
pub mod extract;
pub mod merge;
pub mod render;
pub mod scan;

pub use render::{PageRenderer, PdfiumRenderer, PlaceholderRenderer};
