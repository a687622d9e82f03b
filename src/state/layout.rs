/// Grid geometry and label wrapping
///
/// The view draws cells with exactly this geometry, so drop targeting and
/// rubber-band hit-testing agree with what is on screen.
use iced::{Point, Rectangle, Size};

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 5.0;

/// Smallest thumbnail box, whatever the zoom
const MIN_THUMBNAIL: Size = Size::new(32.0, 45.0);

/// Fewest label characters per line
const MIN_LABEL_CHARS: usize = 4;

/// Room kept free on the right for the vertical scrollbar
pub const SCROLLBAR_GUTTER: f32 = 12.0;

/// Break opportunity inserted into long file names
pub const SOFT_BREAK: char = '\u{200B}';

/// Clamp a requested zoom into `[MIN_ZOOM, MAX_ZOOM]`
pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Scale a base dimension by zoom, truncating to whole pixels
pub fn scaled(base: f32, zoom: f32) -> f32 {
    (base * zoom).trunc()
}

/// Thumbnail bounding box for a zoom level
pub fn thumbnail_box(base: Size, zoom: f32) -> Size {
    Size::new(
        scaled(base.width, zoom).max(MIN_THUMBNAIL.width),
        scaled(base.height, zoom).max(MIN_THUMBNAIL.height),
    )
}

/// How many label characters fit on one line of a cell
pub fn max_label_chars(cell_width: f32, margin: f32, glyph_width: f32) -> usize {
    let glyph_width = glyph_width.max(1.0);
    let chars = ((cell_width - margin) / glyph_width).floor();
    if chars.is_finite() && chars > 0.0 {
        (chars as usize).max(MIN_LABEL_CHARS)
    } else {
        MIN_LABEL_CHARS
    }
}

/// Split "name.ext" into ("name", ".ext"). A leading dot is part of the stem.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(dot) if dot > 0 && !file_name[..dot].chars().all(|c| c == '.') => {
            file_name.split_at(dot)
        }
        _ => (file_name, ""),
    }
}

/// Insert a zero-width space after every `max_chars` characters of the
/// stem so the text layout can wrap names without spaces. The extension is
/// left alone.
pub fn soft_wrap(file_name: &str, max_chars: usize) -> String {
    let (stem, extension) = split_extension(file_name);
    let max_chars = max_chars.max(1);
    let total = stem.chars().count();

    let mut wrapped = String::with_capacity(file_name.len() + total / max_chars * 3);
    for (i, c) in stem.chars().enumerate() {
        wrapped.push(c);
        let written = i + 1;
        if written % max_chars == 0 && written < total {
            wrapped.push(SOFT_BREAK);
        }
    }
    wrapped.push_str(extension);
    wrapped
}

/// Normalized rectangle spanned by two corners
pub fn band(origin: Point, corner: Point) -> Rectangle {
    Rectangle {
        x: origin.x.min(corner.x),
        y: origin.y.min(corner.y),
        width: (origin.x - corner.x).abs(),
        height: (origin.y - corner.y).abs(),
    }
}

/// True when the rectangles share some area
pub fn overlaps(a: &Rectangle, b: &Rectangle) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}

/// Row-major placement of fixed-size cells, in content coordinates
/// (origin at the top-left of the scrollable content)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub cell: Size,
    pub spacing: f32,
    pub padding: f32,
    pub columns: usize,
}

impl GridLayout {
    pub fn new(cell: Size, spacing: f32, padding: f32, viewport_width: f32) -> Self {
        let usable = viewport_width - 2.0 * padding - SCROLLBAR_GUTTER + spacing;
        let columns = (usable / (cell.width + spacing)).floor();
        let columns = if columns.is_finite() && columns >= 1.0 {
            columns as usize
        } else {
            1
        };

        Self {
            cell,
            spacing,
            padding,
            columns,
        }
    }

    fn pitch(&self) -> (f32, f32) {
        (self.cell.width + self.spacing, self.cell.height + self.spacing)
    }

    pub fn rows(&self, count: usize) -> usize {
        count.div_ceil(self.columns)
    }

    pub fn cell_bounds(&self, index: usize) -> Rectangle {
        let (pitch_x, pitch_y) = self.pitch();
        let column = index % self.columns;
        let row = index / self.columns;
        Rectangle {
            x: self.padding + column as f32 * pitch_x,
            y: self.padding + row as f32 * pitch_y,
            width: self.cell.width,
            height: self.cell.height,
        }
    }

    /// Insertion index (0..=count) for a drop at `point`.
    ///
    /// Dropping on the left half of a cell inserts before it, on the right
    /// half after it. Below the last row means the end of the list.
    pub fn insertion_index(&self, point: Point, count: usize) -> usize {
        if count == 0 {
            return 0;
        }
        let (pitch_x, pitch_y) = self.pitch();

        let row = ((point.y - self.padding) / pitch_y).floor();
        if row >= self.rows(count) as f32 {
            return count;
        }
        let row = row.max(0.0) as usize;

        let x = (point.x - self.padding).max(0.0);
        let column = (x / pitch_x).floor() as usize;
        let slot = if column >= self.columns {
            self.columns
        } else if x - column as f32 * pitch_x > self.cell.width / 2.0 {
            column + 1
        } else {
            column
        };

        (row * self.columns + slot).min(count)
    }

    /// Vertical drop marker for an insertion index: top point and height
    pub fn drop_marker(&self, insertion: usize, count: usize) -> Option<(Point, f32)> {
        if count == 0 {
            return None;
        }
        let half_gap = self.spacing / 2.0;

        // Inserting after the last cell of a row is drawn at that row's end
        let marker = if insertion > 0 && (insertion % self.columns == 0 || insertion == count) {
            let bounds = self.cell_bounds(insertion - 1);
            Point::new(bounds.x + bounds.width + half_gap, bounds.y)
        } else {
            let bounds = self.cell_bounds(insertion.min(count - 1));
            Point::new(bounds.x - half_gap, bounds.y)
        };
        Some((marker, self.cell.height))
    }

    /// Indices of cells whose bounds overlap `area`
    pub fn intersecting(&self, area: Rectangle, count: usize) -> impl Iterator<Item = usize> + '_ {
        (0..count).filter(move |&index| overlaps(&self.cell_bounds(index), &area))
    }
}
