use iced::event::{self, Event};
use iced::keyboard::{self, key, Modifiers};
use iced::mouse::{self, ScrollDelta};
use iced::widget::{
    button, canvas, column, container, horizontal_space, mouse_area, row, scrollable, slider,
    text, Column, Row, Stack,
};
use iced::{window, Alignment, Element, Length, Point, Size, Subscription, Task, Theme};
use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;

mod error;
mod pdf;
mod state;
mod ui;

use pdf::export::{self, ExportKind, ExportSummary};
use pdf::{PageRenderer, PdfiumRenderer, PlaceholderRenderer};
use state::data::ImportReport;
use state::grid::GridView;
use state::layout::{MAX_ZOOM, MIN_ZOOM};
use state::settings::Settings;
use ui::gesture::Gesture;
use ui::overlay::GestureOverlay;
use ui::{cell, dialogs};

/// Overrides the configured log level (e.g. `PDF_ARRANGE_LOG=debug`)
const LOG_ENV: &str = "PDF_ARRANGE_LOG";

const INITIAL_WINDOW: Size = Size::new(1000.0, 700.0);

/// Scroll offsets closer than this count as unchanged
const SCROLL_EPSILON: f32 = 0.5;

/// Main application state
struct PdfArrange {
    /// Ordered pages, selection and zoom
    grid: GridView,
    /// PDFium when available, blank page placeholders otherwise
    renderer: Box<dyn PageRenderer>,
    gesture: Gesture,
    /// Last pointer position in grid content coordinates
    pointer: Point,
    scroll_y: f32,
    viewport: Size,
    modifiers: Modifiers,
    /// Status message to display to the user
    status: String,
    /// An export task is running
    exporting: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    ImportFiles,
    ImportFolder,
    FileDropped(PathBuf),
    ExportMerged,
    ExportSplit,
    /// Background export completed
    ExportFinished(Result<ExportSummary, String>),
    DeleteSelected,
    Clear,
    SelectAll,
    /// Slider value in percent
    ZoomSlider(f32),
    Wheel(ScrollDelta),
    ModifiersChanged(Modifiers),
    WindowResized(Size),
    Scrolled(f32),
    CellPressed(usize),
    /// Right click deletes the selection, selecting the cell first if needed
    CellRightPressed(usize),
    GridPressed,
    /// Pointer position relative to the visible grid area
    PointerMoved(Point),
    PointerReleased,
}

impl PdfArrange {
    fn new(settings: Settings) -> (Self, Task<Message>) {
        let renderer: Box<dyn PageRenderer> = match PdfiumRenderer::bind(settings.pdfium_dir.as_deref()) {
            Ok(renderer) => Box::new(renderer),
            Err(e) => {
                log::warn!("⚠️  {}; thumbnails will be blank placeholders", e);
                Box::new(PlaceholderRenderer)
            }
        };

        (Self::with_renderer(settings, renderer), Task::none())
    }

    fn with_renderer(settings: Settings, renderer: Box<dyn PageRenderer>) -> Self {
        PdfArrange {
            grid: GridView::new(settings),
            renderer,
            gesture: Gesture::Idle,
            pointer: Point::ORIGIN,
            scroll_y: 0.0,
            viewport: INITIAL_WINDOW,
            modifiers: Modifiers::default(),
            status: "Ready. Drop PDF files or folders to begin.".to_string(),
            exporting: false,
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ImportFiles => {
                if let Some(files) = dialogs::pick_pdfs() {
                    let report = self.grid.import_paths(&files, self.renderer.as_ref());
                    self.finish_import(report);
                }
            }
            Message::ImportFolder => {
                if let Some(folder) = dialogs::pick_folder() {
                    self.status = format!("Importing from {}...", folder.display());
                    let report = self.grid.import_directory(&folder, self.renderer.as_ref());
                    self.finish_import(report);
                }
            }
            Message::FileDropped(path) => {
                let report = self.grid.import_paths(&[path], self.renderer.as_ref());
                self.finish_import(report);
            }
            Message::ExportMerged => {
                if self.grid.is_empty() {
                    dialogs::warn_nothing_to_export();
                } else if let Some(output) = dialogs::save_merged() {
                    self.status = format!("Merging {} pages...", self.grid.len());
                    return self.start_export(self.grid.merged_job(output));
                }
            }
            Message::ExportSplit => {
                if self.grid.is_empty() {
                    dialogs::warn_nothing_to_export();
                } else if let Some((dir, prefix)) = dialogs::save_split() {
                    self.status = format!("Splitting {} pages...", self.grid.len());
                    return self.start_export(self.grid.split_job(dir, prefix));
                }
            }
            Message::ExportFinished(result) => {
                self.exporting = false;
                match result {
                    Ok(summary) => self.finish_export(&summary),
                    Err(e) => {
                        log::error!("❌ Export failed: {}", e);
                        self.status = format!("❌ Export failed: {}", e);
                        dialogs::show_error("Export failed", &e);
                    }
                }
            }
            Message::DeleteSelected => {
                let removed = self.grid.delete_selected();
                if removed > 0 {
                    self.status = format!("Deleted {} pages", removed);
                }
            }
            Message::Clear => {
                self.grid.clear();
                self.gesture = Gesture::Idle;
                self.status = "Cleared".to_string();
            }
            Message::SelectAll => self.grid.select_all(),
            Message::ZoomSlider(percent) => {
                self.grid.set_zoom(percent / 100.0);
            }
            Message::Wheel(delta) => {
                if self.modifiers.command() {
                    self.grid.zoom_by(wheel_notches(delta));
                }
            }
            Message::ModifiersChanged(modifiers) => self.modifiers = modifiers,
            Message::WindowResized(size) => self.viewport = size,
            Message::Scrolled(offset) => {
                // Command+wheel zooms; undo the scroll the same wheel event caused
                if self.modifiers.command() && (offset - self.scroll_y).abs() > SCROLL_EPSILON {
                    return scrollable::scroll_to(
                        grid_scroll_id(),
                        scrollable::AbsoluteOffset { x: 0.0, y: self.scroll_y },
                    );
                }
                self.scroll_y = offset;
            }
            Message::CellPressed(index) => {
                self.gesture = Gesture::press_cell(&mut self.grid, index, self.modifiers, self.pointer);
            }
            Message::GridPressed => {
                self.gesture = Gesture::press_empty(&mut self.grid, self.modifiers, self.pointer);
            }
            Message::CellRightPressed(index) => {
                if !self.grid.is_selected(index) {
                    self.grid.select_only(index);
                }
                let removed = self.grid.delete_selected();
                if removed > 0 {
                    self.status = format!("Deleted {} pages", removed);
                }
            }
            Message::PointerMoved(position) => {
                self.pointer = Point::new(position.x, position.y + self.scroll_y);
                let layout = self.grid.layout(self.viewport.width);
                self.gesture.pointer_moved(&mut self.grid, &layout, self.pointer);
            }
            Message::PointerReleased => {
                if self.gesture.release(&mut self.grid) {
                    self.status = format!("Moved {} pages", self.grid.selected_count());
                }
            }
        }

        Task::none()
    }

    fn finish_import(&mut self, report: ImportReport) {
        log::info!("📊 Import summary: {}", report.summary());
        self.status = report.summary();
    }

    /// Launch an export on a background worker
    fn start_export(&mut self, job: export::ExportJob) -> Task<Message> {
        self.exporting = true;
        Task::perform(export::run_export(job), Message::ExportFinished)
    }

    fn finish_export(&mut self, summary: &ExportSummary) {
        self.status = format!("✅ {}", dialogs::done_message(summary).replace('\n', " "));

        if summary.kind == ExportKind::Merged {
            if let Err(e) = open::that(&summary.destination) {
                log::warn!("⚠️  Could not open {}: {}", summary.destination.display(), e);
            }
        }

        if dialogs::confirm_done(summary) {
            let folder = summary.folder();
            if let Err(e) = open::that(&folder) {
                log::warn!("⚠️  Could not open {}: {}", folder.display(), e);
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        column![self.toolbar(), self.body(), self.status_bar()].into()
    }

    fn toolbar(&self) -> Element<Message> {
        let idle = !self.exporting;
        let zoom = self.grid.zoom() * 100.0;

        row![
            button("Import PDF").on_press(Message::ImportFiles),
            button("Import Folder").on_press(Message::ImportFolder),
            button("Merge").on_press_maybe(idle.then_some(Message::ExportMerged)),
            button("Split").on_press_maybe(idle.then_some(Message::ExportSplit)),
            button("Delete")
                .on_press_maybe((self.grid.selected_count() > 0).then_some(Message::DeleteSelected)),
            button("Clear").on_press_maybe((!self.grid.is_empty()).then_some(Message::Clear)),
            horizontal_space(),
            text(format!("Zoom {:.0}%", zoom)).size(14),
            slider(MIN_ZOOM * 100.0..=MAX_ZOOM * 100.0, zoom, Message::ZoomSlider)
                .step(1.0)
                .width(160),
        ]
        .spacing(10)
        .padding(10)
        .align_y(Alignment::Center)
        .into()
    }

    /// Scrollable page grid, with the gesture overlay on top while dragging
    fn body(&self) -> Element<Message> {
        let content: Element<Message> = if self.grid.is_empty() {
            container(text("Drop PDF files or folders here").size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        } else {
            self.grid_rows()
        };

        let mut layers = Stack::new()
            .push(content)
            .width(Length::Fill)
            .height(Length::Fill);

        if self.gesture.is_active() {
            let layout = self.grid.layout(self.viewport.width);
            let overlay = GestureOverlay {
                band: self.gesture.band(),
                marker: self
                    .gesture
                    .insertion()
                    .and_then(|insertion| layout.drop_marker(insertion, self.grid.len())),
                scroll_y: self.scroll_y,
            };
            layers = layers.push(canvas(overlay).width(Length::Fill).height(Length::Fill));
        }

        mouse_area(layers)
            .on_press(Message::GridPressed)
            .on_move(Message::PointerMoved)
            .into()
    }

    /// Rows of cells, laid out exactly as `GridLayout` places them
    fn grid_rows(&self) -> Element<Message> {
        let layout = self.grid.layout(self.viewport.width);
        let size = self.grid.cell_size();
        let thumbnail_box = self.grid.thumbnail_box();
        let label_size = self.grid.label_size();

        let rows = self
            .grid
            .cells()
            .chunks(layout.columns)
            .enumerate()
            .map(|(row, chunk)| {
                let first = row * layout.columns;
                Row::with_children(chunk.iter().enumerate().map(|(offset, page)| {
                    cell::view(first + offset, page, size, thumbnail_box, label_size)
                }))
                .spacing(layout.spacing)
                .into()
            });

        let grid = Column::with_children(rows)
            .spacing(layout.spacing)
            .padding(layout.padding)
            .width(Length::Fill);

        scrollable(grid)
            .id(grid_scroll_id())
            .on_scroll(|viewport| Message::Scrolled(viewport.absolute_offset().y))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn status_bar(&self) -> Element<Message> {
        let selected = self.grid.selected_count();
        let mut line = format!("{} pages", self.grid.len());
        if selected > 0 {
            line.push_str(&format!(" ({} selected)", selected));
        }
        if !self.status.is_empty() {
            line.push_str(" | ");
            line.push_str(&self.status);
        }

        container(text(line).size(14))
            .padding([4, 10])
            .width(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            event::listen_with(handle_event),
            window::resize_events().map(|(_id, size)| Message::WindowResized(size)),
        ])
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Global input the grid reacts to regardless of which widget is hovered
fn handle_event(event: Event, status: event::Status, _window: window::Id) -> Option<Message> {
    match event {
        Event::Keyboard(keyboard::Event::ModifiersChanged(modifiers)) => {
            Some(Message::ModifiersChanged(modifiers))
        }
        Event::Keyboard(keyboard::Event::KeyPressed { key, modifiers, .. })
            if status == event::Status::Ignored =>
        {
            match key.as_ref() {
                keyboard::Key::Named(key::Named::Delete) => Some(Message::DeleteSelected),
                keyboard::Key::Character("a" | "A") if modifiers.command() => Some(Message::SelectAll),
                _ => None,
            }
        }
        Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => Some(Message::PointerReleased),
        Event::Mouse(mouse::Event::WheelScrolled { delta }) => Some(Message::Wheel(delta)),
        Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
        _ => None,
    }
}

fn grid_scroll_id() -> scrollable::Id {
    scrollable::Id::new("page-grid")
}

/// Wheel movement in notches; pixel deltas come from touchpads
fn wheel_notches(delta: ScrollDelta) -> f32 {
    match delta {
        ScrollDelta::Lines { y, .. } => y,
        ScrollDelta::Pixels { y, .. } => y * 0.02,
    }
}

fn init_logging(settings: &Settings) {
    let level = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| value.parse::<LevelFilter>().ok())
        .unwrap_or_else(|| settings.log_filter());

    let config = ConfigBuilder::new()
        .add_filter_ignore_str("wgpu")
        .add_filter_ignore_str("naga")
        .add_filter_ignore_str("cosmic_text")
        .build();

    if let Err(e) = TermLogger::init(level, config, TerminalMode::Mixed, ColorChoice::Auto) {
        eprintln!("⚠️  Logging unavailable: {}", e);
    }
}

fn main() -> iced::Result {
    let (settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    init_logging(&settings);
    if let Some(e) = settings_error {
        log::warn!("⚠️  {}; using default settings", e);
    }
    log::info!("🎨 PDF Arrange starting");

    iced::application("PDF Arrange", PdfArrange::update, PdfArrange::view)
        .theme(PdfArrange::theme)
        .subscription(PdfArrange::subscription)
        .window(window::Settings {
            size: INITIAL_WINDOW,
            icon: ui::icon::app_icon(),
            ..window::Settings::default()
        })
        .centered()
        .run_with(move || PdfArrange::new(settings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures;
    use tempfile::TempDir;

    fn app_with_pages(dir: &TempDir, pages: usize) -> PdfArrange {
        let mut app = PdfArrange::with_renderer(Settings::default(), Box::new(PlaceholderRenderer));
        let path = fixtures::write_pdf(dir.path(), "a.pdf", pages);
        let _ = app.update(Message::FileDropped(path));
        assert_eq!(app.grid.len(), pages);
        app
    }

    #[test]
    fn test_command_wheel_zooms_without_scrolling() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_pages(&dir, 1);

        let _ = app.update(Message::ModifiersChanged(Modifiers::COMMAND));
        let _ = app.update(Message::Wheel(ScrollDelta::Lines { x: 0.0, y: 1.0 }));
        let _ = app.update(Message::Scrolled(120.0));
        assert!(app.grid.zoom() > 1.0);
        assert_eq!(app.scroll_y, 0.0);

        let _ = app.update(Message::ModifiersChanged(Modifiers::empty()));
        let zoom = app.grid.zoom();
        let _ = app.update(Message::Wheel(ScrollDelta::Lines { x: 0.0, y: 1.0 }));
        let _ = app.update(Message::Scrolled(120.0));
        assert_eq!(app.grid.zoom(), zoom);
        assert_eq!(app.scroll_y, 120.0);
    }

    #[test]
    fn test_right_click_deletes_selection() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with_pages(&dir, 4);

        // Unselected cell: only that cell goes
        app.grid.select_only(0);
        let _ = app.update(Message::CellRightPressed(2));
        let indices: Vec<usize> = app.grid.cells().iter().map(|cell| cell.page.index).collect();
        assert_eq!(indices, vec![0, 1, 3]);
        assert_eq!(app.status, "Deleted 1 pages");

        // Selected cell: the whole selection goes
        app.grid.select_only(0);
        app.grid.toggle(2);
        let _ = app.update(Message::CellRightPressed(2));
        let indices: Vec<usize> = app.grid.cells().iter().map(|cell| cell.page.index).collect();
        assert_eq!(indices, vec![1]);
        assert_eq!(app.grid.selected_count(), 0);
    }

    #[test]
    fn test_wheel_notches() {
        assert_eq!(wheel_notches(ScrollDelta::Lines { x: 0.0, y: -2.0 }), -2.0);
        assert_eq!(wheel_notches(ScrollDelta::Pixels { x: 0.0, y: 50.0 }), 1.0);
    }

    #[test]
    fn test_delete_key_and_select_all() {
        let delete = Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Named(key::Named::Delete),
            modified_key: keyboard::Key::Named(key::Named::Delete),
            physical_key: key::Physical::Code(key::Code::Delete),
            location: keyboard::Location::Standard,
            modifiers: Modifiers::empty(),
            text: None,
        });
        assert!(matches!(
            handle_event(delete, event::Status::Ignored, window::Id::unique()),
            Some(Message::DeleteSelected)
        ));

        let select_all = Event::Keyboard(keyboard::Event::KeyPressed {
            key: keyboard::Key::Character("a".into()),
            modified_key: keyboard::Key::Character("a".into()),
            physical_key: key::Physical::Code(key::Code::KeyA),
            location: keyboard::Location::Standard,
            modifiers: Modifiers::COMMAND,
            text: None,
        });
        assert!(matches!(
            handle_event(select_all, event::Status::Ignored, window::Id::unique()),
            Some(Message::SelectAll)
        ));
    }
}
