/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The ordered page grid, selection and zoom (grid.rs)
/// - Cell geometry and label wrapping (layout.rs)
/// - User settings loaded at startup (settings.rs)

pub mod data;
pub mod grid;
pub mod layout;
pub mod settings;
