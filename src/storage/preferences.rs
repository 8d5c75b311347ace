//! Display and model preferences edited from the settings panel

use anyhow::{Context, Result};
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::DEFAULT_MODEL;

pub const MIN_BACKGROUND_OPACITY: u8 = 10;
pub const MAX_BACKGROUND_OPACITY: u8 = 90;

/// User-configurable response panel appearance and model selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    /// Response panel background, `#rrggbb`
    pub response_background_color: String,
    /// Background opacity in percent (10 - 90)
    pub response_background_opacity: u8,
    /// Response text color, `#rrggbb`
    pub response_font_color: String,
    /// Selected model identifier
    pub model: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            response_background_color: "#000000".to_string(),
            response_background_opacity: 80,
            response_font_color: "#e5e7eb".to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl UserPreferences {
    /// Replace out-of-range or unparseable values with defaults
    pub fn normalized(mut self) -> Self {
        let defaults = Self::default();

        if parse_hex_color(&self.response_background_color).is_none() {
            self.response_background_color = defaults.response_background_color;
        }
        if parse_hex_color(&self.response_font_color).is_none() {
            self.response_font_color = defaults.response_font_color;
        }
        if self.model.trim().is_empty() {
            self.model = defaults.model;
        }
        self.response_background_opacity = self
            .response_background_opacity
            .clamp(MIN_BACKGROUND_OPACITY, MAX_BACKGROUND_OPACITY);

        self
    }
}

/// Parse `#rrggbb` (or `#rgb`) into a color
pub fn parse_hex_color(value: &str) -> Option<Color32> {
    Color32::from_hex(value.trim()).ok()
}

/// `#rrggbb` for a color, alpha dropped
pub fn format_hex_color(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// Partial change set merged by [`PreferencesStore::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub response_background_color: Option<String>,
    pub response_background_opacity: Option<u8>,
    pub response_font_color: Option<String>,
    pub model: Option<String>,
}

impl PreferencesUpdate {
    fn apply_to(self, preferences: &mut UserPreferences) {
        if let Some(color) = self.response_background_color {
            preferences.response_background_color = color;
        }
        if let Some(opacity) = self.response_background_opacity {
            preferences.response_background_opacity = opacity;
        }
        if let Some(color) = self.response_font_color {
            preferences.response_font_color = color;
        }
        if let Some(model) = self.model {
            preferences.model = model;
        }
    }
}

impl From<UserPreferences> for PreferencesUpdate {
    fn from(preferences: UserPreferences) -> Self {
        Self {
            response_background_color: Some(preferences.response_background_color),
            response_background_opacity: Some(preferences.response_background_opacity),
            response_font_color: Some(preferences.response_font_color),
            model: Some(preferences.model),
        }
    }
}

/// Preferences backed by a JSON file (or memory only, for tests)
#[derive(Debug)]
pub struct PreferencesStore {
    path: Option<PathBuf>,
    current: UserPreferences,
}

impl PreferencesStore {
    /// Open the store at `path`. A missing or corrupt file yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = match load_preferences(&path) {
            Ok(Some(preferences)) => {
                info!("Loaded preferences from {:?}", path);
                preferences
            }
            Ok(None) => UserPreferences::default(),
            Err(e) => {
                warn!("Ignoring unreadable preferences {:?}: {:#}", path, e);
                UserPreferences::default()
            }
        };

        Self {
            path: Some(path),
            current,
        }
    }

    /// A store that never touches the filesystem
    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: UserPreferences::default(),
        }
    }

    /// Current preferences, always fully populated
    pub fn get(&self) -> UserPreferences {
        self.current.clone()
    }

    /// Merge `changes` into the current preferences and persist them
    pub fn update(&mut self, changes: PreferencesUpdate) -> Result<UserPreferences> {
        let mut next = self.current.clone();
        changes.apply_to(&mut next);
        let next = next.normalized();

        if let Some(path) = &self.path {
            save_preferences(&next, path)?;
        }
        self.current = next;

        Ok(self.get())
    }

    /// Drop every stored override
    pub fn reset_to_defaults(&mut self) -> Result<()> {
        if let Some(path) = &self.path {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to remove {:?}", path));
                }
            }
        }
        self.current = UserPreferences::default();
        info!("Preferences reset to defaults");

        Ok(())
    }
}

fn load_preferences(path: &Path) -> Result<Option<UserPreferences>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let preferences: UserPreferences = serde_json::from_str(&content)?;
    Ok(Some(preferences.normalized()))
}

fn save_preferences(preferences: &UserPreferences, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(preferences)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reset_then_get_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let mut store = PreferencesStore::open(temp.path().join("preferences.json"));

        store
            .update(PreferencesUpdate {
                response_background_color: Some("#112233".to_string()),
                response_background_opacity: Some(40),
                ..Default::default()
            })
            .unwrap();
        store.reset_to_defaults().unwrap();

        let preferences = store.get();
        assert_eq!(preferences, UserPreferences::default());
        assert_eq!(preferences.response_background_color, "#000000");
        assert_eq!(preferences.response_background_opacity, 80);
        assert_eq!(preferences.response_font_color, "#e5e7eb");
        assert_eq!(preferences.model, "gemini-2.0-flash");

        // Overrides are gone from disk too
        let reopened = PreferencesStore::open(temp.path().join("preferences.json"));
        assert_eq!(reopened.get(), UserPreferences::default());
    }

    #[test]
    fn test_update_merges_partial_changes() {
        let mut store = PreferencesStore::in_memory();

        let updated = store
            .update(PreferencesUpdate {
                response_font_color: Some("#ffffff".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(updated.response_font_color, "#ffffff");
        assert_eq!(updated.response_background_color, "#000000");
        assert_eq!(updated.response_background_opacity, 80);
    }

    #[test]
    fn test_update_persists_across_reopen() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");

        let mut store = PreferencesStore::open(&path);
        store
            .update(PreferencesUpdate {
                model: Some("gemini-2.5-pro".to_string()),
                ..Default::default()
            })
            .unwrap();

        let reopened = PreferencesStore::open(&path);
        assert_eq!(reopened.get().model, "gemini-2.5-pro");
    }

    #[test]
    fn test_missing_fields_are_backfilled() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        std::fs::write(&path, r##"{ "responseFontColor": "#abcdef" }"##).unwrap();

        let preferences = PreferencesStore::open(&path).get();
        assert_eq!(preferences.response_font_color, "#abcdef");
        assert_eq!(preferences.response_background_color, "#000000");
        assert_eq!(preferences.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("preferences.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert_eq!(PreferencesStore::open(&path).get(), UserPreferences::default());
    }

    #[test]
    fn test_opacity_is_clamped_and_bad_colors_replaced() {
        let mut store = PreferencesStore::in_memory();

        let updated = store
            .update(PreferencesUpdate {
                response_background_opacity: Some(100),
                response_background_color: Some("not a color".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.response_background_opacity, MAX_BACKGROUND_OPACITY);
        assert_eq!(updated.response_background_color, "#000000");

        let updated = store
            .update(PreferencesUpdate {
                response_background_opacity: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.response_background_opacity, MIN_BACKGROUND_OPACITY);
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff0000"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_hex_color(" #000000 "), Some(Color32::BLACK));
        assert!(parse_hex_color("red").is_none());
    }

    #[test]
    fn test_format_hex_color() {
        assert_eq!(format_hex_color(Color32::from_rgb(229, 231, 235)), "#e5e7eb");
        assert_eq!(format_hex_color(Color32::BLACK), "#000000");
    }
}
