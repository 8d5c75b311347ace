//! Model backend capability
//!
//! The settings panel reads and writes the API key and model through
//! [`ModelBackend`]. Production uses [`ConfigModelBackend`], which keeps the
//! values in `config.toml`; tests substitute a fake.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::AppConfig;
use crate::shared::SharedAppState;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Models offered by the settings panel: (identifier, label)
pub const AVAILABLE_MODELS: [(&str, &str); 3] = [
    ("gemini-2.0-flash", "Gemini 2.0 Flash (Fast)"),
    ("gemini-2.5-flash", "Gemini 2.5 Flash (Faster, Newest)"),
    ("gemini-2.5-pro", "Gemini 2.5 Pro (Highest Quality, Newest)"),
];

/// Display label for a model identifier
pub fn model_label(model: &str) -> &str {
    AVAILABLE_MODELS
        .iter()
        .find(|(id, _)| *id == model)
        .map(|(_, label)| *label)
        .unwrap_or(model)
}

/// Trim and drop the `models/` prefix some APIs report
pub fn normalize_model(model: &str) -> String {
    let trimmed = model.trim();
    trimmed.strip_prefix("models/").unwrap_or(trimmed).to_string()
}

/// Backend failures
#[derive(Debug, Error)]
pub enum BackendError {
    #[allow(dead_code)]
    #[error("model backend unavailable: {0}")]
    Unavailable(String),

    #[error("invalid model name: {0:?}")]
    InvalidModel(String),

    #[error("failed to persist settings: {0}")]
    Persist(String),
}

/// Read and write the AI model credentials and selection
#[async_trait]
pub trait ModelBackend: Send + Sync {
    async fn get_api_key(&self) -> Result<String, BackendError>;
    async fn set_api_key(&self, api_key: &str) -> Result<(), BackendError>;
    async fn get_model(&self) -> Result<String, BackendError>;
    async fn set_model(&self, model: &str) -> Result<(), BackendError>;
}

/// Keeps the model settings in the application config
pub struct ConfigModelBackend {
    state: Arc<RwLock<SharedAppState>>,
    config_path: Option<PathBuf>,
    env_api_key: Option<String>,
}

impl ConfigModelBackend {
    /// `config_path` is where changes are written; `None` keeps them in memory
    pub fn new(state: Arc<RwLock<SharedAppState>>, config_path: Option<PathBuf>) -> Self {
        Self {
            state,
            config_path,
            env_api_key: std::env::var(API_KEY_ENV).ok().filter(|key| !key.trim().is_empty()),
        }
    }

    /// Override the key normally read from the environment
    #[cfg(test)]
    pub fn with_env_api_key(mut self, api_key: Option<String>) -> Self {
        self.env_api_key = api_key;
        self
    }

    /// Apply `change` to a copy of the config, write it out, and only then
    /// commit it to the shared state
    async fn update_config(&self, change: impl FnOnce(&mut AppConfig)) -> Result<(), BackendError> {
        let mut updated = self.state.read().config.clone();
        change(&mut updated);

        if let Some(path) = &self.config_path {
            let content = toml::to_string_pretty(&updated)
                .map_err(|e| BackendError::Persist(e.to_string()))?;
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BackendError::Persist(e.to_string()))?;
            }
            tokio::fs::write(path, content)
                .await
                .map_err(|e| BackendError::Persist(format!("{:?}: {}", path, e)))?;
        }

        self.state.write().config = updated;
        Ok(())
    }
}

#[async_trait]
impl ModelBackend for ConfigModelBackend {
    async fn get_api_key(&self) -> Result<String, BackendError> {
        let configured = self.state.read().config.model.api_key.clone();
        Ok(configured
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.env_api_key.clone())
            .unwrap_or_default())
    }

    async fn set_api_key(&self, api_key: &str) -> Result<(), BackendError> {
        let api_key = api_key.trim().to_string();
        self.update_config(|config| {
            config.model.api_key = if api_key.is_empty() { None } else { Some(api_key) };
        })
        .await?;
        info!("API key updated");
        Ok(())
    }

    async fn get_model(&self) -> Result<String, BackendError> {
        Ok(normalize_model(&self.state.read().config.model.name))
    }

    async fn set_model(&self, model: &str) -> Result<(), BackendError> {
        let model = normalize_model(model);
        if model.is_empty() {
            return Err(BackendError::InvalidModel(model));
        }

        let name = model.clone();
        self.update_config(|config| config.model.name = name).await?;
        info!("Model changed to: {}", model);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_config;
    use crate::storage::AppPaths;
    use tempfile::TempDir;

    fn backend_in(temp: &TempDir) -> ConfigModelBackend {
        let paths = AppPaths::under(temp.path());
        let state = Arc::new(RwLock::new(SharedAppState::new(AppConfig::default(), &paths)));
        ConfigModelBackend::new(state, Some(paths.config_file)).with_env_api_key(None)
    }

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model(" models/gemini-2.5-pro "), "gemini-2.5-pro");
        assert_eq!(normalize_model("gemini-2.0-flash"), "gemini-2.0-flash");
    }

    #[test]
    fn test_model_label() {
        assert_eq!(model_label("gemini-2.5-pro"), "Gemini 2.5 Pro (Highest Quality, Newest)");
        assert_eq!(model_label("custom-model"), "custom-model");
    }

    #[tokio::test]
    async fn test_set_model_persists_to_config() {
        let temp = TempDir::new().unwrap();
        let backend = backend_in(&temp);

        backend.set_model("models/gemini-2.5-flash").await.unwrap();

        assert_eq!(backend.get_model().await.unwrap(), "gemini-2.5-flash");
        let saved = load_config(&temp.path().join("config.toml")).unwrap();
        assert_eq!(saved.model.name, "gemini-2.5-flash");
    }

    #[tokio::test]
    async fn test_set_model_rejects_blank() {
        let temp = TempDir::new().unwrap();
        let backend = backend_in(&temp);

        assert!(matches!(
            backend.set_model("  ").await,
            Err(BackendError::InvalidModel(_))
        ));
        assert_eq!(backend.get_model().await.unwrap(), crate::config::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_api_key_falls_back_to_environment() {
        let temp = TempDir::new().unwrap();
        let backend = backend_in(&temp).with_env_api_key(Some("from-env".to_string()));

        assert_eq!(backend.get_api_key().await.unwrap(), "from-env");

        backend.set_api_key("from-config").await.unwrap();
        assert_eq!(backend.get_api_key().await.unwrap(), "from-config");

        backend.set_api_key("").await.unwrap();
        assert_eq!(backend.get_api_key().await.unwrap(), "from-env");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_model_unchanged() {
        let temp = TempDir::new().unwrap();
        let backend = backend_in(&temp);
        // A directory where the config file should be makes the write fail
        std::fs::create_dir_all(temp.path().join("config.toml")).unwrap();

        assert!(matches!(
            backend.set_model("gemini-2.5-pro").await,
            Err(BackendError::Persist(_))
        ));
        assert_eq!(backend.get_model().await.unwrap(), crate::config::DEFAULT_MODEL);

        assert!(backend.set_api_key("new-key").await.is_err());
        assert_eq!(backend.get_api_key().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_missing_api_key_is_empty() {
        let temp = TempDir::new().unwrap();
        let backend = backend_in(&temp);

        assert_eq!(backend.get_api_key().await.unwrap(), "");
    }
}
