/// UI building blocks for the main window
///
/// - Page cell widget (cell.rs)
/// - Native dialogs (dialogs.rs)
/// - Press, drag and rubber-band handling (gesture.rs)
/// - Window icon (icon.rs)
/// - Rubber band and drop marker drawing (overlay.rs)

pub mod cell;
pub mod dialogs;
pub mod gesture;
pub mod icon;
pub mod overlay;
