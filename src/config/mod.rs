//! Application Configuration
//!
//! User settings stored in TOML format. Display preferences edited from the
//! settings panel live separately in [`crate::storage::preferences`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Filesystem locations
    pub paths: PathsConfig,
    /// AI model selection and credentials
    pub model: ModelConfig,
    /// Overlay window settings
    pub window: WindowSettings,
    /// Global shortcut bindings
    pub shortcuts: ShortcutSettings,
}

/// General application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Start with the overlay window hidden
    pub start_hidden: bool,
}

/// Overrides for the default per-user directories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root directory holding one folder per session
    pub sessions_root: Option<PathBuf>,
    /// Directory receiving files saved through `save-temp-file`
    pub temp_dir: Option<PathBuf>,
}

/// Model identifier used when nothing else is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// AI model settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier, without the `models/` prefix
    pub name: String,
    /// API key; falls back to `GEMINI_API_KEY` when unset
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            api_key: None,
        }
    }
}

/// Overlay window settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    /// Initial width in points
    pub width: f32,
    /// Initial height in points
    pub height: f32,
    /// Distance moved per move-window shortcut
    pub move_step: f32,
    /// Whether the window stays above other windows
    pub always_on_top: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            width: 420.0,
            height: 560.0,
            move_step: 60.0,
            always_on_top: true,
        }
    }
}

/// Accelerator strings for the global shortcuts, e.g. "Ctrl+Shift+O"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutSettings {
    pub take_screenshot: String,
    pub reset_queues: String,
    pub toggle_window: String,
    pub move_left: String,
    pub move_right: String,
    pub move_up: String,
    pub move_down: String,
}

impl Default for ShortcutSettings {
    fn default() -> Self {
        Self {
            take_screenshot: "Ctrl+H".to_string(),
            reset_queues: "Ctrl+R".to_string(),
            toggle_window: "Ctrl+B".to_string(),
            move_left: "Ctrl+Left".to_string(),
            move_right: "Ctrl+Right".to_string(),
            move_up: "Ctrl+Up".to_string(),
            move_down: "Ctrl+Down".to_string(),
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {:?}", path))?;
    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {:?}", path))?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        assert!(!config.general.start_hidden);
        assert!(config.paths.sessions_root.is_none());
        assert!(config.paths.temp_dir.is_none());

        assert_eq!(config.model.name, DEFAULT_MODEL);
        assert!(config.model.api_key.is_none());

        assert!(config.window.always_on_top);
        assert!((config.window.move_step - 60.0).abs() < 0.01);

        assert_eq!(config.shortcuts.take_screenshot, "Ctrl+H");
        assert_eq!(config.shortcuts.toggle_window, "Ctrl+B");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut config = AppConfig::default();
        config.paths.sessions_root = Some(PathBuf::from("/tmp/sessions"));
        config.model.api_key = Some("secret".to_string());

        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let parsed: AppConfig = toml::from_str(
            r#"
            [model]
            name = "gemini-2.5-pro"

            [window]
            move_step = 25.0
            "#,
        )
        .unwrap();

        assert_eq!(parsed.model.name, "gemini-2.5-pro");
        assert!(parsed.model.api_key.is_none());
        assert!((parsed.window.move_step - 25.0).abs() < 0.01);
        assert!((parsed.window.width - 420.0).abs() < 0.01);
        assert_eq!(parsed.shortcuts, ShortcutSettings::default());
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();
        let temp_file = NamedTempFile::new().unwrap();

        save_config(&config, temp_file.path()).unwrap();
        let loaded = load_config(temp_file.path()).unwrap();

        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
