/// Grid view-model
///
/// Owns the ordered list of page cells. Cell order is the export order and
/// is only changed by import, reorder, delete and clear. The view and the
/// pointer gestures read geometry from here so drawing and hit-testing
/// always agree.
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use iced::{Rectangle, Size};

use crate::error::Result;
use crate::pdf::export::ExportJob;
use crate::pdf::{scan, PageRenderer};
use crate::state::data::{GridCell, ImportReport, PageRef, Thumbnail};
use crate::state::layout::{self, GridLayout};
use crate::state::settings::Settings;

pub struct GridView {
    cells: Vec<GridCell>,
    zoom: f32,
    /// Last clicked cell, start of shift-click ranges
    anchor: Option<usize>,
    settings: Settings,
}

impl GridView {
    pub fn new(settings: Settings) -> Self {
        Self {
            cells: Vec::new(),
            zoom: 1.0,
            anchor: None,
            settings,
        }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Snapshot of the current order, for export
    pub fn page_refs(&self) -> Vec<PageRef> {
        self.cells.iter().map(|cell| cell.page.clone()).collect()
    }

    pub fn contains(&self, page: &PageRef) -> bool {
        self.cells.iter().any(|cell| &cell.page == page)
    }

    // --- Geometry ---

    /// Cell footprint at the current zoom
    pub fn cell_size(&self) -> Size {
        Size::new(
            layout::scaled(self.settings.cell_width, self.zoom),
            layout::scaled(self.settings.cell_height, self.zoom),
        )
    }

    /// Box the thumbnail is fitted into at the current zoom
    pub fn thumbnail_box(&self) -> Size {
        let base = Size::new(self.settings.thumbnail_width, self.settings.thumbnail_height);
        layout::thumbnail_box(base, self.zoom)
    }

    pub fn label_size(&self) -> f32 {
        self.settings.label_size
    }

    /// Label characters per line at the current zoom
    pub fn label_chars(&self) -> usize {
        layout::max_label_chars(
            self.cell_size().width,
            self.settings.label_margin,
            self.settings.label_glyph_width,
        )
    }

    pub fn layout(&self, viewport_width: f32) -> GridLayout {
        GridLayout::new(
            self.cell_size(),
            self.settings.cell_spacing,
            self.settings.grid_padding,
            viewport_width,
        )
    }

    // --- Import ---

    /// Append every page of the PDF at `path` that is not already on the
    /// grid. Nothing is appended if any needed page fails to render.
    pub fn import(&mut self, path: &Path, renderer: &dyn PageRenderer) -> Result<ImportReport> {
        let path = canonical(path);
        let count = renderer.page_count(&path)?;

        let present: HashSet<&PageRef> = self.cells.iter().map(|cell| &cell.page).collect();
        let fresh: Vec<usize> = (0..count)
            .filter(|&index| !present.contains(&PageRef::new(path.clone(), index)))
            .collect();
        let duplicates = count - fresh.len();

        let scale = self.settings.render_scale;
        let bitmaps = if fresh.is_empty() {
            Vec::new()
        } else if fresh.len() == count {
            renderer.render_document(&path, scale)?
        } else {
            fresh
                .iter()
                .map(|&index| renderer.render_page(&path, index, scale))
                .collect::<Result<Vec<_>>>()?
        };

        let pages = fresh
            .into_iter()
            .zip(bitmaps)
            .map(|(index, bitmap)| (PageRef::new(path.clone(), index), Thumbnail::from_rgba(bitmap)));
        let added = self.append_pages(pages);

        log::info!(
            "📄 Imported {} ({} pages, {} already present)",
            path.display(),
            added,
            duplicates
        );
        Ok(ImportReport {
            added,
            duplicates,
            failures: Vec::new(),
        })
    }

    /// Import every PDF below `dir`, in sorted walk order
    pub fn import_directory(&mut self, dir: &Path, renderer: &dyn PageRenderer) -> ImportReport {
        self.import_paths(&[dir.to_path_buf()], renderer)
    }

    /// Import a mix of files and folders. Files that fail are recorded in
    /// the report and skipped.
    pub fn import_paths(&mut self, paths: &[PathBuf], renderer: &dyn PageRenderer) -> ImportReport {
        let mut report = ImportReport::default();

        for path in scan::collect_pdfs(paths) {
            match self.import(&path, renderer) {
                Ok(file_report) => report.merge(file_report),
                Err(e) => {
                    log::warn!("⚠️  Could not import {}: {}", path.display(), e);
                    report.failures.push((path, e.to_string()));
                }
            }
        }

        report
    }

    /// Append rendered pages, skipping any already on the grid
    pub fn append_pages(&mut self, pages: impl IntoIterator<Item = (PageRef, Thumbnail)>) -> usize {
        let max_chars = self.label_chars();
        let before = self.cells.len();

        for (page, thumbnail) in pages {
            if self.contains(&page) {
                continue;
            }
            let (label, tooltip) = labels(&page, max_chars);
            self.cells.push(GridCell {
                page,
                thumbnail,
                label,
                tooltip,
                selected: false,
            });
        }

        self.cells.len() - before
    }

    // --- Selection ---

    pub fn is_selected(&self, index: usize) -> bool {
        self.cells.get(index).map(|cell| cell.selected).unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.selected).count()
    }

    pub fn selected_indices(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.selected)
            .map(|(index, _)| index)
            .collect()
    }

    /// Plain click
    pub fn select_only(&mut self, index: usize) {
        if index >= self.cells.len() {
            return;
        }
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.selected = i == index;
        }
        self.anchor = Some(index);
    }

    /// Command-click
    pub fn toggle(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            cell.selected = !cell.selected;
            self.anchor = Some(index);
        }
    }

    /// Shift-click: select from the anchor to `index`, inclusive
    pub fn select_range(&mut self, index: usize) {
        if index >= self.cells.len() {
            return;
        }
        let anchor = self.anchor.filter(|&a| a < self.cells.len()).unwrap_or(index);
        let (start, end) = (anchor.min(index), anchor.max(index));
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.selected = (start..=end).contains(&i);
        }
        self.anchor = Some(anchor);
    }

    pub fn select_all(&mut self) {
        for cell in &mut self.cells {
            cell.selected = true;
        }
    }

    pub fn clear_selection(&mut self) {
        for cell in &mut self.cells {
            cell.selected = false;
        }
        self.anchor = None;
    }

    /// Rubber-band selection: cells intersecting `area` are selected, cells
    /// listed in `keep` stay selected, every other cell is deselected.
    /// `keep` must be sorted.
    pub fn select_in_rect(&mut self, area: Rectangle, layout: &GridLayout, keep: &[usize]) {
        let hit: HashSet<usize> = layout.intersecting(area, self.cells.len()).collect();
        for (i, cell) in self.cells.iter_mut().enumerate() {
            cell.selected = hit.contains(&i) || keep.binary_search(&i).is_ok();
        }
    }

    // --- Editing ---

    /// Remove every selected cell. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let before = self.cells.len();
        self.cells.retain(|cell| !cell.selected);
        self.anchor = None;

        let removed = before - self.cells.len();
        if removed > 0 {
            log::info!("🗑️ Deleted {} pages", removed);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.anchor = None;
    }

    /// Move the selection as one block so it lands at `insertion`, an index
    /// into the list as it was before the move. The relative order of the
    /// moved cells is kept. Returns false when nothing is selected.
    pub fn move_selected_to(&mut self, insertion: usize) -> bool {
        let insertion = insertion.min(self.cells.len());
        let selected_before = self.cells[..insertion].iter().filter(|cell| cell.selected).count();

        let (moving, mut rest): (Vec<GridCell>, Vec<GridCell>) =
            std::mem::take(&mut self.cells).into_iter().partition(|cell| cell.selected);
        if moving.is_empty() {
            self.cells = rest;
            return false;
        }

        let at = insertion - selected_before;
        let moved = moving.len();
        rest.splice(at..at, moving);
        self.cells = rest;
        self.anchor = Some(at);

        log::debug!("Moved {} pages to position {}", moved, at);
        true
    }

    // --- Zoom ---

    /// Set the zoom, clamped to the allowed range, and return the value
    /// actually applied. Non-finite input leaves the zoom unchanged.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        if !zoom.is_finite() {
            return self.zoom;
        }
        let zoom = layout::clamp_zoom(zoom);
        if zoom != self.zoom {
            self.zoom = zoom;
            self.refresh_labels();
        }
        self.zoom
    }

    /// Step the zoom by `notches` wheel notches
    pub fn zoom_by(&mut self, notches: f32) -> f32 {
        let target = self.zoom + notches * self.settings.zoom_step;
        // Keep repeated steps on round percentages
        self.set_zoom((target * 100.0).round() / 100.0)
    }

    /// Re-wrap every label for the current cell width
    pub fn refresh_labels(&mut self) {
        let max_chars = self.label_chars();
        for cell in &mut self.cells {
            let (label, tooltip) = labels(&cell.page, max_chars);
            cell.label = label;
            cell.tooltip = tooltip;
        }
    }

    // --- Export ---

    pub fn merged_job(&self, output: PathBuf) -> ExportJob {
        ExportJob::Merged {
            pages: self.page_refs(),
            output,
        }
    }

    pub fn split_job(&self, dir: PathBuf, prefix: String) -> ExportJob {
        ExportJob::Split {
            pages: self.page_refs(),
            dir,
            prefix,
        }
    }
}

/// Absolute path with symlinks resolved, or the path as given when the
/// file cannot be resolved (the renderer reports that error)
fn canonical(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Wrapped cell label and full tooltip
fn labels(page: &PageRef, max_chars: usize) -> (String, String) {
    let number = page.index + 1;
    let label = format!("{} - p{}", layout::soft_wrap(&page.file_name(), max_chars), number);
    let tooltip = format!("{}\nPage {}", page.path.display(), number);
    (label, tooltip)
}
