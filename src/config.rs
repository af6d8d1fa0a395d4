use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::fs::model::{SortColumn, SortOrder};
use crate::theme::palette::{hex_name, parse_hex};
use crate::theme::state::{OPAQUE, ThemeMode, ThemeState};

/// Persisted theme preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreset {
    #[default]
    Dark,
    Light,
    Custom,
}

/// Theme settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeSettings {
    #[serde(default)]
    pub preset: ThemePreset,
    /// `#rrggbb`; only read when `preset` is `custom`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Whether the transparency slider has been revealed
    #[serde(default)]
    pub transparency_enabled: bool,
    /// Slider value, 0..=100
    #[serde(default = "default_transparency")]
    pub transparency: u8,
}

fn default_transparency() -> u8 {
    OPAQUE
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            preset: ThemePreset::Dark,
            background: None,
            transparency_enabled: false,
            transparency: default_transparency(),
        }
    }
}

/// Tree view settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TreeSettings {
    /// Directory shown when no path is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default)]
    pub sort_by: SortColumn,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default)]
    pub show_hidden: bool,
}

/// Application settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub theme: ThemeSettings,
    #[serde(default)]
    pub tree: TreeSettings,
}

impl Settings {
    /// Returns the config directory path (<config dir>/themed-explorer)
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("themed-explorer"))
    }

    /// Returns the config file path (<config dir>/themed-explorer/settings.json)
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("settings.json"))
    }

    /// Loads settings from the config file, returns default if not found or invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            log::warn!("{}", AppError::NoConfigDir);
            return Self::default();
        };
        if !path.exists() {
            log::info!("no settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("ignoring {}: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or(AppError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Atomic write: temp file first, then rename over the target
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let temp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Rebuild the theme state these settings describe. A custom preset with
    /// an unreadable color falls back to dark.
    pub fn theme_state(&self) -> ThemeState {
        let mut theme = ThemeState::default();
        match self.theme.preset {
            ThemePreset::Dark => {}
            ThemePreset::Light => theme.set_light_mode(),
            ThemePreset::Custom => match self.theme.background.as_deref().map(parse_hex) {
                Some(Ok(color)) => theme.set_background_color(color),
                Some(Err(e)) => log::warn!("custom background: {e}"),
                None => log::warn!("custom theme without a background color"),
            },
        }
        if self.theme.transparency_enabled {
            theme.show_transparency_slider();
        }
        theme.set_transparency(self.theme.transparency);
        theme
    }

    /// Record the current theme.
    pub fn store_theme(&mut self, theme: &ThemeState) {
        let (preset, background) = match theme.mode() {
            ThemeMode::Dark => (ThemePreset::Dark, None),
            ThemeMode::Light => (ThemePreset::Light, None),
            ThemeMode::Custom(color) => (ThemePreset::Custom, Some(hex_name(color))),
        };
        self.theme = ThemeSettings {
            preset,
            background,
            transparency_enabled: theme.slider_visible(),
            transparency: theme.transparency(),
        };
    }
}
