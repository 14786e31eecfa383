//! Editor settings persisted between sessions
//!
//! Stored as TOML in the platform config directory:
//! - Linux: ~/.config/map_tiler/settings.toml
//! - macOS: ~/Library/Application Support/map_tiler/settings.toml
//! - Windows: %APPDATA%/map_tiler/config/settings.toml

use crate::session::{EditorTool, ToolShape};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to write settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User preferences that shape a new [`EditorSession`](crate::EditorSession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Version for future migrations
    pub version: u32,
    /// Maximum number of undo snapshots kept, unbounded when absent
    pub history_limit: Option<usize>,
    /// Fixed seed for noise rolls, for reproducible sessions
    pub noise_seed: Option<u64>,
    pub default_tool: EditorTool,
    pub default_shape: ToolShape,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            version: 1,
            history_limit: None,
            noise_seed: None,
            default_tool: EditorTool::Paint,
            default_shape: ToolShape::Point,
        }
    }
}

impl EditorSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from `path`, falling back to defaults when the file is missing or
    /// unreadable
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("Failed to load settings from {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Platform-specific settings file location, if a home directory exists
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "map_tiler")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }
}
