/// Read-only application settings
///
/// Loaded once at startup from `<config dir>/pdf-arrange/settings.json`.
/// Every field is optional in the file; missing fields take their defaults.
/// The app never writes this file.
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use std::path::{Path, PathBuf};
use thiserror::Error;

const APP_DIR: &str = "pdf-arrange";
const SETTINGS_FILENAME: &str = "settings.json";

/// Errors while reading the settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Scale passed to the page renderer when importing (1.0 = 72 dpi)
    pub render_scale: f32,

    /// Cell footprint at 100% zoom, in logical pixels
    pub cell_width: f32,
    pub cell_height: f32,

    /// Thumbnail bounding box at 100% zoom
    pub thumbnail_width: f32,
    pub thumbnail_height: f32,

    /// Gap between cells and around the grid
    pub cell_spacing: f32,
    pub grid_padding: f32,

    /// Label font size and the average glyph width used to budget wrapping
    pub label_size: f32,
    pub label_glyph_width: f32,
    /// Horizontal space inside a cell not available to the label
    pub label_margin: f32,

    /// Zoom change per mouse wheel notch
    pub zoom_step: f32,

    /// Directory holding the PDFium shared library, searched first
    pub pdfium_dir: Option<PathBuf>,

    /// `error`, `warn`, `info`, `debug` or `trace`
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_scale: 0.7,
            cell_width: 150.0,
            cell_height: 200.0,
            thumbnail_width: 100.0,
            thumbnail_height: 140.0,
            cell_spacing: 10.0,
            grid_padding: 10.0,
            label_size: 13.0,
            label_glyph_width: 7.0,
            label_margin: 24.0,
            zoom_step: 0.1,
            pdfium_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the user's config directory.
    ///
    /// - Linux: ~/.config/pdf-arrange/settings.json
    /// - macOS: ~/Library/Application Support/pdf-arrange/settings.json
    /// - Windows: %APPDATA%\pdf-arrange\settings.json
    ///
    /// A missing file (or no config directory at all) yields the defaults.
    pub fn load() -> Result<Self, SettingsError> {
        match Self::path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load settings from an explicit JSON file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    fn path() -> Option<PathBuf> {
        let mut path = dirs::config_dir()?;
        path.push(APP_DIR);
        path.push(SETTINGS_FILENAME);
        Some(path)
    }

    /// Parsed log level, falling back to `info` for unknown names
    pub fn log_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "render_scale": 1.5 }"#).unwrap();
        assert_eq!(settings.render_scale, 1.5);
        assert_eq!(settings.cell_width, Settings::default().cell_width);
        assert!(settings.pdfium_dir.is_none());
    }

    #[test]
    fn test_unknown_log_level_falls_back_to_info() {
        let mut settings = Settings::default();
        assert_eq!(settings.log_filter(), LevelFilter::Info);

        settings.log_level = "debug".to_string();
        assert_eq!(settings.log_filter(), LevelFilter::Debug);

        settings.log_level = "loud".to_string();
        assert_eq!(settings.log_filter(), LevelFilter::Info);
    }

    #[test]
    fn test_load_from_reports_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = Settings::load_from(&path).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn test_load_from_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }
}
