/// Pointer gestures on the page grid
///
/// A press on a cell may turn into a drag (reorder), a press on empty space
/// turns into a rubber band. Points are in grid content coordinates, i.e.
/// already adjusted for the scroll offset.
use iced::keyboard::Modifiers;
use iced::{Point, Rectangle};

use crate::state::grid::GridView;
use crate::state::layout::{self, GridLayout};

/// Pointer travel before a press on a cell becomes a drag
pub const DRAG_THRESHOLD: f32 = 4.0;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    /// Button down on a cell, not yet moved far enough to drag.
    /// `reselect` is set when the cell was already part of a selection:
    /// a release without dragging then narrows the selection to it.
    Pressed {
        index: usize,
        origin: Point,
        reselect: bool,
    },
    /// Moving the selection; `insertion` is where it would land
    Dragging { insertion: usize },
    /// Selecting with a rectangle. `keep` lists the cells that stay
    /// selected regardless of the rectangle (sorted).
    RubberBand {
        origin: Point,
        current: Point,
        keep: Vec<usize>,
    },
}

impl Gesture {
    /// Button pressed on cell `index`
    pub fn press_cell(grid: &mut GridView, index: usize, modifiers: Modifiers, at: Point) -> Self {
        let mut reselect = false;

        if modifiers.command() {
            grid.toggle(index);
        } else if modifiers.shift() {
            grid.select_range(index);
        } else if grid.is_selected(index) {
            reselect = true;
        } else {
            grid.select_only(index);
        }

        Gesture::Pressed {
            index,
            origin: at,
            reselect,
        }
    }

    /// Button pressed on empty grid space
    pub fn press_empty(grid: &mut GridView, modifiers: Modifiers, at: Point) -> Self {
        let keep = if modifiers.command() {
            grid.selected_indices()
        } else {
            grid.clear_selection();
            Vec::new()
        };

        Gesture::RubberBand {
            origin: at,
            current: at,
            keep,
        }
    }

    pub fn pointer_moved(&mut self, grid: &mut GridView, layout: &GridLayout, at: Point) {
        match self {
            Gesture::Idle => {}
            Gesture::Pressed { origin, .. } => {
                if origin.distance(at) > DRAG_THRESHOLD && grid.selected_count() > 0 {
                    *self = Gesture::Dragging {
                        insertion: layout.insertion_index(at, grid.len()),
                    };
                }
            }
            Gesture::Dragging { insertion } => {
                *insertion = layout.insertion_index(at, grid.len());
            }
            Gesture::RubberBand { origin, current, keep } => {
                *current = at;
                grid.select_in_rect(layout::band(*origin, at), layout, keep);
            }
        }
    }

    /// Button released. Returns true when the page order changed.
    pub fn release(&mut self, grid: &mut GridView) -> bool {
        match std::mem::take(self) {
            Gesture::Dragging { insertion } => grid.move_selected_to(insertion),
            Gesture::Pressed {
                index,
                reselect: true,
                ..
            } => {
                grid.select_only(index);
                false
            }
            _ => false,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Gesture::Dragging { .. } | Gesture::RubberBand { .. })
    }

    /// Rubber band rectangle, while selecting
    pub fn band(&self) -> Option<Rectangle> {
        match self {
            Gesture::RubberBand { origin, current, .. } => Some(layout::band(*origin, *current)),
            _ => None,
        }
    }

    /// Drop position, while dragging
    pub fn insertion(&self) -> Option<usize> {
        match self {
            Gesture::Dragging { insertion } => Some(*insertion),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::{PageRef, Thumbnail};
    use crate::state::settings::Settings;
    use image::RgbaImage;

    /// Six one-page cells "p0".."p5", no files needed
    fn grid() -> GridView {
        let mut grid = GridView::new(Settings::default());
        grid.append_pages((0..6).map(|i| {
            (
                PageRef::new(format!("/docs/p{}.pdf", i), 0),
                Thumbnail::from_rgba(RgbaImage::new(4, 4)),
            )
        }));
        grid
    }

    fn order(grid: &GridView) -> Vec<String> {
        grid.cells().iter().map(|cell| cell.page.file_name()).collect()
    }

    /// 3 columns at 512px wide
    fn layout(grid: &GridView) -> GridLayout {
        grid.layout(512.0)
    }

    /// Centre of cell `index`
    fn centre(layout: &GridLayout, index: usize) -> Point {
        layout.cell_bounds(index).center()
    }

    #[test]
    fn test_click_selects_single_cell() {
        let mut grid = grid();
        let layout = layout(&grid);

        let mut gesture = Gesture::press_cell(&mut grid, 2, Modifiers::empty(), centre(&layout, 2));
        assert!(!gesture.release(&mut grid));
        assert_eq!(grid.selected_indices(), vec![2]);
        assert_eq!(gesture, Gesture::Idle);
    }

    #[test]
    fn test_small_jitter_is_not_a_drag() {
        let mut grid = grid();
        let layout = layout(&grid);
        let start = centre(&layout, 0);

        let mut gesture = Gesture::press_cell(&mut grid, 0, Modifiers::empty(), start);
        gesture.pointer_moved(&mut grid, &layout, Point::new(start.x + 2.0, start.y + 2.0));
        assert!(matches!(gesture, Gesture::Pressed { .. }));
        assert!(!gesture.release(&mut grid));
    }

    #[test]
    fn test_modifier_clicks() {
        let mut grid = grid();
        let layout = layout(&grid);

        Gesture::press_cell(&mut grid, 1, Modifiers::empty(), centre(&layout, 1)).release(&mut grid);
        Gesture::press_cell(&mut grid, 3, Modifiers::SHIFT, centre(&layout, 3)).release(&mut grid);
        assert_eq!(grid.selected_indices(), vec![1, 2, 3]);

        Gesture::press_cell(&mut grid, 2, Modifiers::COMMAND, centre(&layout, 2)).release(&mut grid);
        assert_eq!(grid.selected_indices(), vec![1, 3]);
    }

    #[test]
    fn test_drag_moves_selection() {
        let mut grid = grid();
        let layout = layout(&grid);

        let mut gesture = Gesture::press_cell(&mut grid, 0, Modifiers::empty(), centre(&layout, 0));
        // Right half of cell 4 means "after p4"
        let target = layout.cell_bounds(4);
        let drop = Point::new(target.x + target.width * 0.75, target.center_y());
        gesture.pointer_moved(&mut grid, &layout, drop);
        assert_eq!(gesture.insertion(), Some(5));

        assert!(gesture.release(&mut grid));
        assert_eq!(order(&grid), vec!["p1.pdf", "p2.pdf", "p3.pdf", "p4.pdf", "p0.pdf", "p5.pdf"]);
        assert_eq!(grid.selected_indices(), vec![4]);
    }

    #[test]
    fn test_drag_keeps_multi_selection() {
        let mut grid = grid();
        let layout = layout(&grid);
        grid.select_only(4);
        grid.toggle(5);

        // Pressing an already selected cell must not drop the other one
        let mut gesture = Gesture::press_cell(&mut grid, 5, Modifiers::empty(), centre(&layout, 5));
        assert_eq!(grid.selected_count(), 2);

        let first = layout.cell_bounds(0);
        gesture.pointer_moved(&mut grid, &layout, Point::new(first.x + 5.0, first.center_y()));
        assert!(gesture.release(&mut grid));
        assert_eq!(order(&grid), vec!["p4.pdf", "p5.pdf", "p0.pdf", "p1.pdf", "p2.pdf", "p3.pdf"]);
    }

    #[test]
    fn test_click_inside_selection_narrows_it() {
        let mut grid = grid();
        let layout = layout(&grid);
        grid.select_all();

        let mut gesture = Gesture::press_cell(&mut grid, 3, Modifiers::empty(), centre(&layout, 3));
        assert_eq!(grid.selected_count(), 6);
        gesture.release(&mut grid);
        assert_eq!(grid.selected_indices(), vec![3]);
    }

    #[test]
    fn test_rubber_band_selects_touched_cells() {
        let mut grid = grid();
        let layout = layout(&grid);
        grid.select_only(5);

        let start = Point::new(5.0, 5.0);
        let mut gesture = Gesture::press_empty(&mut grid, Modifiers::empty(), start);
        assert_eq!(grid.selected_count(), 0);

        // Covers the first two columns of the first row
        gesture.pointer_moved(&mut grid, &layout, Point::new(200.0, 100.0));
        assert_eq!(gesture.band(), Some(layout::band(start, Point::new(200.0, 100.0))));
        assert_eq!(grid.selected_indices(), vec![0, 1]);

        // Shrinking the band deselects again
        gesture.pointer_moved(&mut grid, &layout, Point::new(100.0, 100.0));
        assert_eq!(grid.selected_indices(), vec![0]);

        assert!(!gesture.release(&mut grid));
        assert!(gesture.band().is_none());
    }

    #[test]
    fn test_rubber_band_with_command_extends() {
        let mut grid = grid();
        let layout = layout(&grid);
        grid.select_only(5);

        let mut gesture = Gesture::press_empty(&mut grid, Modifiers::COMMAND, Point::new(5.0, 5.0));
        gesture.pointer_moved(&mut grid, &layout, Point::new(100.0, 100.0));
        assert_eq!(grid.selected_indices(), vec![0, 5]);
        gesture.release(&mut grid);
    }
}
