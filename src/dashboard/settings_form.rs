//! Settings form state
//!
//! Everything the settings view needs to decide what to show, with no egui in
//! sight. Backend round-trips are plain async functions whose results are fed
//! back through [`SettingsForm::apply_loaded`] and
//! [`SettingsForm::finish_save`]; [`SettingsForm::tick`] advances timers.

use parking_lot::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::backend::{normalize_model, BackendError, ModelBackend};
use crate::config::DEFAULT_MODEL;
use crate::shared::ViewMode;
use crate::storage::preferences::{PreferencesStore, PreferencesUpdate, UserPreferences};

/// Model shown when the backend cannot tell us which one is selected
pub const FALLBACK_MODEL: &str = DEFAULT_MODEL;
/// Delay between a successful save and returning to the queue view
pub const RETURN_DELAY: Duration = Duration::from_millis(1500);
/// How long a toast stays on screen
pub const TOAST_DURATION: Duration = Duration::from_millis(3000);

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Success,
    Error,
}

/// A transient notification
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
    pub expires_at: Instant,
}

impl Toast {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        variant: ToastVariant,
        now: Instant,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant,
            expires_at: now + TOAST_DURATION,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Where the form is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    /// Waiting for the backend values
    Loading,
    /// Editable
    Ready,
    /// A save is in flight
    Saving,
    /// Saved; the view returns to the queue at `return_at`
    Saved { return_at: Instant },
}

/// Values fetched from the backend when the panel opens
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSettings {
    pub api_key: String,
    pub model: String,
}

/// Everything a save pushes out
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub api_key: String,
    pub model: String,
    pub preferences: UserPreferences,
}

/// Save failures
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("failed to save preferences: {0:#}")]
    Preferences(anyhow::Error),
}

/// Fetch the key and model. Failures are logged and replaced by defaults so
/// the panel always opens.
pub async fn load_backend_settings(backend: &dyn ModelBackend) -> LoadedSettings {
    let api_key = match backend.get_api_key().await {
        Ok(key) => key,
        Err(e) => {
            warn!("[Settings] Failed to fetch API key: {}", e);
            String::new()
        }
    };

    let model = match backend.get_model().await {
        Ok(model) if !model.trim().is_empty() => {
            let model = normalize_model(&model);
            info!("[Settings] Loaded model from backend: {}", model);
            model
        }
        Ok(_) => {
            warn!("[Settings] Backend returned empty model, using fallback");
            FALLBACK_MODEL.to_string()
        }
        Err(e) => {
            error!("[Settings] Failed to fetch model from backend: {}", e);
            FALLBACK_MODEL.to_string()
        }
    };

    LoadedSettings { api_key, model }
}

/// Push the model and key to the backend, then persist the preferences
pub async fn save_settings(
    backend: &dyn ModelBackend,
    preferences: &Mutex<PreferencesStore>,
    request: SaveRequest,
) -> Result<(), SettingsError> {
    backend.set_model(&request.model).await?;
    backend.set_api_key(&request.api_key).await?;

    let mut update = PreferencesUpdate::from(request.preferences);
    update.model = Some(request.model);
    preferences
        .lock()
        .update(update)
        .map_err(SettingsError::Preferences)?;

    info!("[Settings] Settings saved");
    Ok(())
}

/// State behind the settings view
#[derive(Debug, Clone)]
pub struct SettingsForm {
    pub api_key: String,
    pub model: String,
    pub preferences: UserPreferences,
    phase: FormPhase,
    toast: Option<Toast>,
}

impl SettingsForm {
    /// A form waiting for its backend values
    pub fn new(preferences: UserPreferences) -> Self {
        Self {
            api_key: String::new(),
            model: FALLBACK_MODEL.to_string(),
            preferences,
            phase: FormPhase::Loading,
            toast: None,
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FormPhase::Loading
    }

    pub fn apply_loaded(&mut self, loaded: LoadedSettings) {
        self.api_key = loaded.api_key;
        self.model = loaded.model;
        if self.phase == FormPhase::Loading {
            self.phase = FormPhase::Ready;
        }
    }

    /// Saving needs an API key and nothing else in flight
    pub fn can_save(&self) -> bool {
        !self.api_key.trim().is_empty()
            && matches!(self.phase, FormPhase::Ready | FormPhase::Loading)
    }

    /// Move to `Saving` and hand out what to save, if saving is allowed
    pub fn begin_save(&mut self) -> Option<SaveRequest> {
        if !self.can_save() {
            return None;
        }
        self.phase = FormPhase::Saving;
        Some(SaveRequest {
            api_key: self.api_key.trim().to_string(),
            model: self.model.clone(),
            preferences: self.preferences.clone(),
        })
    }

    pub fn finish_save(&mut self, result: Result<(), SettingsError>, now: Instant) {
        match result {
            Ok(()) => {
                self.phase = FormPhase::Saved {
                    return_at: now + RETURN_DELAY,
                };
            }
            Err(e) => {
                error!("[Settings] Failed to save settings: {}", e);
                self.phase = FormPhase::Ready;
                self.toast = Some(Toast::new(
                    "Error",
                    "Failed to save settings",
                    ToastVariant::Error,
                    now,
                ));
            }
        }
    }

    /// Reset the stored preferences and reload them into the form
    pub fn reset_colors(&mut self, store: &mut PreferencesStore, now: Instant) {
        if let Err(e) = store.reset_to_defaults() {
            error!("[Settings] Failed to reset preferences: {:#}", e);
            self.toast = Some(Toast::new(
                "Error",
                "Failed to reset colors",
                ToastVariant::Error,
                now,
            ));
        }
        self.preferences = store.get();
    }

    /// Expire the toast and, once the post-save delay has passed, return the
    /// view to switch to
    pub fn tick(&mut self, now: Instant) -> Option<ViewMode> {
        if self.toast.as_ref().is_some_and(|toast| toast.is_expired(now)) {
            self.toast = None;
        }

        match self.phase {
            FormPhase::Saved { return_at } if now >= return_at => {
                self.phase = FormPhase::Ready;
                Some(ViewMode::Queue)
            }
            _ => None,
        }
    }

    /// Time until the next scheduled change, for repaint scheduling
    pub fn next_deadline(&self) -> Option<Instant> {
        let saved = match self.phase {
            FormPhase::Saved { return_at } => Some(return_at),
            _ => None,
        };
        let toast = self.toast.as_ref().map(|toast| toast.expires_at);
        match (saved, toast) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Backend double; `None` makes the call fail
    struct FakeBackend {
        api_key: Option<String>,
        model: Option<String>,
        accept_writes: bool,
        written_model: Mutex<Option<String>>,
    }

    impl FakeBackend {
        fn working() -> Self {
            Self {
                api_key: Some("key-123".to_string()),
                model: Some("models/gemini-2.5-pro".to_string()),
                accept_writes: true,
                written_model: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl ModelBackend for FakeBackend {
        async fn get_api_key(&self) -> Result<String, BackendError> {
            self.api_key
                .clone()
                .ok_or_else(|| BackendError::Unavailable("no key accessor".to_string()))
        }

        async fn set_api_key(&self, _api_key: &str) -> Result<(), BackendError> {
            if self.accept_writes {
                Ok(())
            } else {
                Err(BackendError::Unavailable("read only".to_string()))
            }
        }

        async fn get_model(&self) -> Result<String, BackendError> {
            self.model
                .clone()
                .ok_or_else(|| BackendError::Unavailable("no model accessor".to_string()))
        }

        async fn set_model(&self, model: &str) -> Result<(), BackendError> {
            if self.accept_writes {
                *self.written_model.lock() = Some(model.to_string());
                Ok(())
            } else {
                Err(BackendError::Unavailable("read only".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn test_load_uses_backend_values() {
        let loaded = load_backend_settings(&FakeBackend::working()).await;

        assert_eq!(loaded.api_key, "key-123");
        assert_eq!(loaded.model, "gemini-2.5-pro");
    }

    #[tokio::test]
    async fn test_failing_model_accessor_falls_back() {
        let backend = FakeBackend {
            api_key: None,
            model: None,
            ..FakeBackend::working()
        };

        let loaded = load_backend_settings(&backend).await;
        let mut form = SettingsForm::new(UserPreferences::default());
        form.apply_loaded(loaded);

        assert_eq!(form.model, FALLBACK_MODEL);
        assert_eq!(form.api_key, "");
        assert_eq!(form.phase(), FormPhase::Ready);
        assert!(form.toast().is_none());
    }

    #[tokio::test]
    async fn test_empty_model_falls_back() {
        let backend = FakeBackend {
            model: Some("   ".to_string()),
            ..FakeBackend::working()
        };

        assert_eq!(load_backend_settings(&backend).await.model, FALLBACK_MODEL);
    }

    #[test]
    fn test_save_requires_api_key() {
        let mut form = SettingsForm::new(UserPreferences::default());
        form.apply_loaded(LoadedSettings {
            api_key: "   ".to_string(),
            model: FALLBACK_MODEL.to_string(),
        });

        assert!(!form.can_save());
        assert!(form.begin_save().is_none());
        assert_eq!(form.phase(), FormPhase::Ready);
    }

    #[tokio::test]
    async fn test_successful_save_returns_to_queue_after_delay() {
        let backend = FakeBackend::working();
        let store = Mutex::new(PreferencesStore::in_memory());

        let mut form = SettingsForm::new(UserPreferences::default());
        form.apply_loaded(load_backend_settings(&backend).await);
        form.preferences.response_background_opacity = 55;

        let request = form.begin_save().unwrap();
        assert_eq!(form.phase(), FormPhase::Saving);
        assert!(!form.can_save());

        let result = save_settings(&backend, &store, request).await;
        let saved_at = Instant::now();
        form.finish_save(result, saved_at);

        assert_eq!(backend.written_model.lock().as_deref(), Some("gemini-2.5-pro"));
        assert_eq!(store.lock().get().response_background_opacity, 55);
        assert_eq!(store.lock().get().model, "gemini-2.5-pro");

        assert_eq!(form.tick(saved_at + Duration::from_millis(1000)), None);
        assert_eq!(form.tick(saved_at + RETURN_DELAY), Some(ViewMode::Queue));
        assert_eq!(form.phase(), FormPhase::Ready);
        // Fires once
        assert_eq!(form.tick(saved_at + RETURN_DELAY * 2), None);
    }

    #[tokio::test]
    async fn test_failed_save_shows_error_toast_and_stays() {
        let backend = FakeBackend {
            accept_writes: false,
            ..FakeBackend::working()
        };
        let store = Mutex::new(PreferencesStore::in_memory());

        let mut form = SettingsForm::new(UserPreferences::default());
        form.apply_loaded(load_backend_settings(&backend).await);
        form.preferences.response_font_color = "#ffffff".to_string();

        let request = form.begin_save().unwrap();
        let result = save_settings(&backend, &store, request).await;
        assert!(result.is_err());

        let now = Instant::now();
        form.finish_save(result, now);

        let toast = form.toast().unwrap();
        assert_eq!(toast.variant, ToastVariant::Error);
        assert_eq!(toast.title, "Error");
        assert_eq!(toast.description, "Failed to save settings");

        // Preferences untouched when the backend rejects the save
        assert_eq!(store.lock().get(), UserPreferences::default());

        assert_eq!(form.tick(now + RETURN_DELAY * 4), None);
        assert!(form.toast().is_none());
        assert_eq!(form.phase(), FormPhase::Ready);
        assert!(form.can_save());
    }

    #[test]
    fn test_reset_colors_reloads_defaults() {
        let mut store = PreferencesStore::in_memory();
        store
            .update(PreferencesUpdate {
                response_background_color: Some("#123456".to_string()),
                ..Default::default()
            })
            .unwrap();

        let mut form = SettingsForm::new(store.get());
        form.reset_colors(&mut store, Instant::now());

        assert_eq!(form.preferences, UserPreferences::default());
        assert_eq!(store.get(), UserPreferences::default());
    }

    #[test]
    fn test_next_deadline() {
        let mut form = SettingsForm::new(UserPreferences::default());
        assert!(form.next_deadline().is_none());

        let now = Instant::now();
        form.finish_save(Ok(()), now);
        assert_eq!(form.next_deadline(), Some(now + RETURN_DELAY));
    }
}
