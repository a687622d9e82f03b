use image::{Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::{PdfError, Result};
use crate::pdf::extract;

/// US Letter in points, used when a page declares no MediaBox
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Largest page side PDF allows (200 inches)
const MAX_PAGE_POINTS: f32 = 14_400.0;

/// Thumbnails are scaled down until both sides fit in this many pixels
const MAX_BITMAP_SIDE: u16 = 4096;

const PAPER: Rgba<u8> = Rgba([255, 255, 255, 255]);
const EDGE: Rgba<u8> = Rgba([160, 160, 160, 255]);

/// Rasterizes PDF pages into RGBA bitmaps.
///
/// Bitmaps honor the page's own `/Rotate`. Errors carry the file path so
/// the caller can report which import failed.
pub trait PageRenderer {
    fn page_count(&self, path: &Path) -> Result<usize>;

    fn render_page(&self, path: &Path, index: usize, scale: f32) -> Result<RgbaImage>;

    /// Render every page of one file in order
    fn render_document(&self, path: &Path, scale: f32) -> Result<Vec<RgbaImage>> {
        (0..self.page_count(path)?)
            .map(|index| self.render_page(path, index, scale))
            .collect()
    }
}

/// Renders through the PDFium shared library
pub struct PdfiumRenderer {
    pdfium: Pdfium,
}

impl PdfiumRenderer {
    /// Bind PDFium, searching `preferred_dir`, then the executable's
    /// directory, then the working directory, then the system library path
    pub fn bind(preferred_dir: Option<&Path>) -> Result<Self> {
        let mut candidates: Vec<PathBuf> = preferred_dir.map(Path::to_path_buf).into_iter().collect();
        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir);
        }
        candidates.push(PathBuf::from("./"));

        for dir in &candidates {
            let dir = dir.to_string_lossy().into_owned();
            if let Ok(bindings) = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir)) {
                log::info!("📚 PDFium bound from {}", dir);
                return Ok(Self {
                    pdfium: Pdfium::new(bindings),
                });
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| PdfError::RendererUnavailable(e.to_string()))?;
        log::info!("📚 PDFium bound from system library");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    fn open(&self, path: &Path) -> Result<PdfDocument<'_>> {
        self.pdfium
            .load_pdf_from_file(&path, None)
            .map_err(|e| render_error(path, 0, e))
    }

    fn rasterize(page: &PdfPage, path: &Path, index: usize, scale: f32) -> Result<RgbaImage> {
        let config = PdfRenderConfig::new()
            .scale_page_by_factor(scale)
            .set_maximum_width(MAX_BITMAP_SIDE.into())
            .set_maximum_height(MAX_BITMAP_SIDE.into());
        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| render_error(path, index, e))?;

        RgbaImage::from_raw(bitmap.width() as u32, bitmap.height() as u32, bitmap.as_rgba_bytes())
            .ok_or_else(|| PdfError::Render {
                path: path.to_path_buf(),
                index,
                message: "bitmap size does not match its pixel buffer".to_string(),
            })
    }
}

impl PageRenderer for PdfiumRenderer {
    fn page_count(&self, path: &Path) -> Result<usize> {
        Ok(self.open(path)?.pages().len() as usize)
    }

    fn render_page(&self, path: &Path, index: usize, scale: f32) -> Result<RgbaImage> {
        let document = self.open(path)?;
        let count = document.pages().len() as usize;
        let page = u16::try_from(index)
            .ok()
            .and_then(|i| document.pages().get(i).ok())
            .ok_or_else(|| PdfError::PageOutOfRange {
                path: path.to_path_buf(),
                index,
                count,
            })?;
        Self::rasterize(&page, path, index, scale)
    }

    fn render_document(&self, path: &Path, scale: f32) -> Result<Vec<RgbaImage>> {
        let document = self.open(path)?;
        document
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| Self::rasterize(&page, path, index, scale))
            .collect()
    }
}

fn render_error(path: &Path, index: usize, error: PdfiumError) -> PdfError {
    PdfError::Render {
        path: path.to_path_buf(),
        index,
        message: error.to_string(),
    }
}

/// Blank page-shaped thumbnails, used when PDFium is not installed.
///
/// The document is still parsed with lopdf, so page counts, page sizes and
/// rotation are real and broken files are still reported.
#[derive(Debug, Default)]
pub struct PlaceholderRenderer;

impl PlaceholderRenderer {
    fn placeholder(doc: &Document, path: &Path, index: usize, scale: f32) -> Result<RgbaImage> {
        let pages = doc.get_pages();
        let page_id = u32::try_from(index + 1)
            .ok()
            .and_then(|number| pages.get(&number).copied())
            .ok_or_else(|| PdfError::PageOutOfRange {
                path: path.to_path_buf(),
                index,
                count: pages.len(),
            })?;

        let (width, height) = page_size(doc, page_id);
        let sane = |side: f32| side.is_finite() && side > 0.0 && side <= MAX_PAGE_POINTS;
        if !sane(width) || !sane(height) {
            return Err(PdfError::Render {
                path: path.to_path_buf(),
                index,
                message: format!("page size {} x {} pt is outside the PDF limits", width, height),
            });
        }

        let (pixels_wide, pixels_high) = bitmap_size(width, height, scale);
        Ok(blank_page(pixels_wide, pixels_high))
    }
}

impl PageRenderer for PlaceholderRenderer {
    fn page_count(&self, path: &Path) -> Result<usize> {
        extract::page_count(path)
    }

    fn render_page(&self, path: &Path, index: usize, scale: f32) -> Result<RgbaImage> {
        let doc = extract::load(path)?;
        Self::placeholder(&doc, path, index, scale)
    }

    fn render_document(&self, path: &Path, scale: f32) -> Result<Vec<RgbaImage>> {
        let doc = extract::load(path)?;
        (0..doc.get_pages().len())
            .map(|index| Self::placeholder(&doc, path, index, scale))
            .collect()
    }
}

/// Displayed page size in points, after applying `/Rotate`
pub fn page_size(doc: &Document, page_id: ObjectId) -> (f32, f32) {
    let (width, height) = extract::inherited_attribute(doc, page_id, b"MediaBox")
        .and_then(|media_box| media_box.as_array().ok())
        .and_then(|values| {
            let numbers: Vec<f32> = values.iter().filter_map(number).collect();
            match numbers.as_slice() {
                [x1, y1, x2, y2] => Some(((x2 - x1).abs(), (y2 - y1).abs())),
                _ => None,
            }
        })
        .unwrap_or(DEFAULT_PAGE_SIZE);

    let rotation = extract::inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|rotate| rotate.as_i64().ok())
        .unwrap_or(0)
        .rem_euclid(360);

    if rotation == 90 || rotation == 270 {
        (height, width)
    } else {
        (width, height)
    }
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Pixel size of a `width` x `height` pt page at `scale`, shrunk to fit
/// `MAX_BITMAP_SIDE`
fn bitmap_size(width: f32, height: f32, scale: f32) -> (u32, u32) {
    let scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    let longest = width.max(height) * scale;
    let scale = scale * (f32::from(MAX_BITMAP_SIDE) / longest).min(1.0);
    (
        (width * scale).round().max(1.0) as u32,
        (height * scale).round().max(1.0) as u32,
    )
}

/// White sheet with a thin grey edge
fn blank_page(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if x == 0 || y == 0 || x + 1 == width || y + 1 == height {
            EDGE
        } else {
            PAPER
        }
    })
}
