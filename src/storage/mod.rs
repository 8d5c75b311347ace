//! Storage Layer
//!
//! Resolves per-user directories and handles persistence of sessions,
//! temp files and display preferences.

pub mod preferences;
pub mod sessions;
pub mod temp_files;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;

/// Folder under the user's documents directory holding session folders
pub const SESSIONS_DIR_NAME: &str = "AI-Interview-Assistant";
/// Folder under the system temp directory receiving uploaded files
pub const TEMP_DIR_NAME: &str = "ai-interview-assistant";

fn project_dirs() -> Result<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "interview-assistant", "InterviewAssistant")
        .ok_or_else(|| anyhow::anyhow!("Could not determine application directories"))
}

/// Get the application data directory
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = project_dirs()?.data_dir().to_path_buf();
    std::fs::create_dir_all(&data_dir)?;

    Ok(data_dir)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = project_dirs()?.config_dir().to_path_buf();
    std::fs::create_dir_all(&config_dir)?;

    Ok(config_dir)
}

/// Get the default sessions root, `<Documents>/AI-Interview-Assistant`
pub fn default_sessions_root() -> Result<PathBuf> {
    let user_dirs = directories::UserDirs::new()
        .ok_or_else(|| anyhow::anyhow!("Could not determine user directories"))?;

    let documents = user_dirs
        .document_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| user_dirs.home_dir().join("Documents"));

    Ok(documents.join(SESSIONS_DIR_NAME))
}

/// Get the default temp directory for saved uploads
pub fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join(TEMP_DIR_NAME)
}

/// Every filesystem location the application touches
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    /// `config.toml`
    pub config_file: PathBuf,
    /// `preferences.json`
    pub preferences_file: PathBuf,
    /// Parent of the session folders
    pub sessions_root: PathBuf,
    /// Target of `save-temp-file`
    pub temp_dir: PathBuf,
    /// Screenshots taken from the queue view
    pub screenshot_dir: PathBuf,
    /// Screenshots taken from any other view
    pub extra_screenshot_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the per-user locations, applying overrides from the config
    pub fn resolve(config: &AppConfig, config_file: Option<PathBuf>) -> Result<Self> {
        let config_file = match config_file {
            Some(path) => path,
            None => get_config_dir()?.join("config.toml"),
        };
        let preferences_file = config_file
            .parent()
            .map(|dir| dir.join("preferences.json"))
            .unwrap_or_else(|| PathBuf::from("preferences.json"));

        let sessions_root = match &config.paths.sessions_root {
            Some(root) => root.clone(),
            None => default_sessions_root()?,
        };
        let temp_dir = config
            .paths
            .temp_dir
            .clone()
            .unwrap_or_else(default_temp_dir);

        let data_dir = get_data_dir()?;

        Ok(Self {
            config_file,
            preferences_file,
            sessions_root,
            temp_dir,
            screenshot_dir: data_dir.join("screenshots"),
            extra_screenshot_dir: data_dir.join("extra_screenshots"),
        })
    }

    /// Lay every location out under a single root directory
    pub fn under(root: &Path) -> Self {
        Self {
            config_file: root.join("config.toml"),
            preferences_file: root.join("preferences.json"),
            sessions_root: root.join(SESSIONS_DIR_NAME),
            temp_dir: root.join(TEMP_DIR_NAME),
            screenshot_dir: root.join("screenshots"),
            extra_screenshot_dir: root.join("extra_screenshots"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_under_root() {
        let root = Path::new("/data");
        let paths = AppPaths::under(root);

        assert_eq!(paths.sessions_root, root.join("AI-Interview-Assistant"));
        assert_eq!(paths.temp_dir, root.join("ai-interview-assistant"));
        assert_eq!(paths.preferences_file, root.join("preferences.json"));
    }

    #[test]
    fn test_default_temp_dir_is_under_system_temp() {
        let dir = default_temp_dir();
        assert!(dir.starts_with(std::env::temp_dir()));
        assert!(dir.ends_with(TEMP_DIR_NAME));
    }
}
