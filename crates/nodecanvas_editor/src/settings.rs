// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor settings and configuration.
//!
//! Settings are stored as pretty-printed RON in the user's config
//! directory and cover:
//! - Window size
//! - Canvas rectangle and the expand-to-window flag
//! - Connection style and grid visibility
//! - Default node size
//! - Side panel width

use egui::{Pos2, Rect, Vec2};
use nodecanvas_graph::{CanvasStyle, ConnectionStyle};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.ron";

/// Directory name used under the platform config and data dirs
pub const APP_DIR_NAME: &str = "nodecanvas";

/// Errors reading or writing settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for this format
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer editor
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file
        found: u32,
        /// Highest version this build reads
        supported: u32,
    },
}

/// Axis-aligned rectangle as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl CanvasRect {
    /// Convert to an egui rectangle
    pub fn to_rect(self) -> Rect {
        Rect::from_min_size(Pos2::new(self.x, self.y), Vec2::new(self.width, self.height))
    }
}

impl From<Rect> for CanvasRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.min.x,
            y: rect.min.y,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

impl Default for CanvasRect {
    fn default() -> Self {
        Self {
            x: 260.0,
            y: 10.0,
            width: 1010.0,
            height: 700.0,
        }
    }
}

/// Persistent editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Settings format version
    pub version: u32,
    /// Initial window size in logical pixels
    pub window_size: [u32; 2],
    /// Canvas rectangle used when not expanded
    pub canvas_rect: CanvasRect,
    /// Fill the central area of the window with the canvas
    pub expand_canvas: bool,
    /// How connections are drawn
    pub connection_style: ConnectionStyle,
    /// Draw the background grid
    pub show_grid: bool,
    /// Size of newly created nodes
    pub node_size: [f32; 2],
    /// Width of the side panel
    pub side_panel_width: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        let style = CanvasStyle::default();
        Self {
            version: SETTINGS_FORMAT_VERSION,
            window_size: [1280, 720],
            canvas_rect: CanvasRect::default(),
            expand_canvas: false,
            connection_style: style.connection_style,
            show_grid: style.show_grid,
            node_size: style.node_size,
            side_panel_width: 250.0,
        }
    }
}

impl EditorSettings {
    /// Default settings path, `<config dir>/nodecanvas/settings.ron`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: EditorSettings = ron::from_str(&content)?;

        // Version check
        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// unreadable
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("No config directory available, using default settings");
            return Self::default();
        };

        match Self::load(path) {
            Ok(settings) => {
                tracing::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Ignoring settings at {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings to a file, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);

        let content = ron::ser::to_string_pretty(self, config)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Copy the visual settings onto a canvas style
    pub fn apply_to(&self, style: &mut CanvasStyle) {
        style.connection_style = self.connection_style;
        style.show_grid = self.show_grid;
        style.node_size = self.node_size;
    }

    /// Record the visual settings of a canvas style
    pub fn capture(&mut self, style: &CanvasStyle) {
        self.connection_style = style.connection_style;
        self.show_grid = style.show_grid;
        self.node_size = style.node_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = EditorSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.connection_style, ConnectionStyle::Bezier);
        assert!(settings.show_grid);
        assert!(!settings.expand_canvas);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SETTINGS_FILE_NAME);

        let mut settings = EditorSettings::default();
        settings.connection_style = ConnectionStyle::Line;
        settings.canvas_rect = CanvasRect::from(Rect::from_min_size(
            Pos2::new(5.0, 6.0),
            Vec2::new(400.0, 300.0),
        ));
        settings.save(&path).unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        assert_eq!(
            loaded.canvas_rect.to_rect(),
            Rect::from_min_size(Pos2::new(5.0, 6.0), Vec2::new(400.0, 300.0))
        );
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);

        let settings = EditorSettings {
            version: SETTINGS_FORMAT_VERSION + 1,
            ..EditorSettings::default()
        };
        settings.save(&path).unwrap();

        assert!(matches!(
            EditorSettings::load(&path),
            Err(SettingsError::UnsupportedVersion { .. })
        ));
        assert_eq!(
            EditorSettings::load_or_default(Some(&path)),
            EditorSettings::default()
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "(show_grid: false)").unwrap();

        let loaded = EditorSettings::load(&path).unwrap();
        assert!(!loaded.show_grid);
        assert_eq!(loaded.window_size, EditorSettings::default().window_size);
    }

    #[test]
    fn test_garbage_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE_NAME);
        std::fs::write(&path, "not ron at all {").unwrap();

        assert!(matches!(
            EditorSettings::load(&path),
            Err(SettingsError::Parse(_))
        ));
        assert_eq!(
            EditorSettings::load_or_default(Some(&path)),
            EditorSettings::default()
        );
        assert_eq!(
            EditorSettings::load_or_default(Some(&dir.path().join("missing.ron"))),
            EditorSettings::default()
        );
    }

    #[test]
    fn test_style_round_trip() {
        let mut settings = EditorSettings {
            show_grid: false,
            connection_style: ConnectionStyle::Line,
            ..EditorSettings::default()
        };
        let mut style = CanvasStyle::default();
        settings.apply_to(&mut style);
        assert!(!style.show_grid);
        assert_eq!(style.connection_style, ConnectionStyle::Line);

        style.show_grid = true;
        settings.capture(&style);
        assert!(settings.show_grid);
    }
}
