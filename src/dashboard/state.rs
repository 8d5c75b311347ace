//! Dashboard view state management

use std::time::Instant;
use tracing::debug;

use crate::dashboard::settings_form::{
    LoadedSettings, SettingsError, SettingsForm, Toast, ToastVariant,
};
use crate::shared::ViewMode;
use crate::storage::preferences::UserPreferences;

/// UI-only state that lives alongside [`crate::shared::SharedAppState`]
#[derive(Debug, Default)]
pub struct DashboardState {
    /// Present while the settings view is open
    pub settings: Option<SettingsForm>,
    /// Bumped every time a settings form is opened
    settings_generation: u64,
    /// Dashboard-wide notifications
    toasts: Vec<Toast>,
}

impl DashboardState {
    /// Track the view the shared state is on. Returns the generation of a
    /// settings form that was just opened and needs its backend values.
    pub fn enter_view(&mut self, view: ViewMode, preferences: &UserPreferences) -> Option<u64> {
        match view {
            ViewMode::Settings if self.settings.is_none() => {
                self.settings_generation += 1;
                self.settings = Some(SettingsForm::new(preferences.clone()));
                Some(self.settings_generation)
            }
            ViewMode::Settings => None,
            _ => {
                self.settings = None;
                None
            }
        }
    }

    /// Generation of the open settings form
    pub fn settings_generation(&self) -> u64 {
        self.settings_generation
    }

    /// The open form for `generation`; results for a closed form are dropped
    fn settings_for(&mut self, generation: u64) -> Option<&mut SettingsForm> {
        if generation != self.settings_generation {
            debug!("Dropping result for settings form {}", generation);
            return None;
        }
        self.settings.as_mut()
    }

    /// Fill the form that asked for `loaded`. Returns false if it is gone.
    pub fn apply_loaded(&mut self, generation: u64, loaded: LoadedSettings) -> bool {
        match self.settings_for(generation) {
            Some(form) => {
                form.apply_loaded(loaded);
                true
            }
            None => false,
        }
    }

    /// Finish the save started by form `generation`. Returns false if it is gone.
    pub fn finish_save(
        &mut self,
        generation: u64,
        result: Result<(), SettingsError>,
        now: Instant,
    ) -> bool {
        match self.settings_for(generation) {
            Some(form) => {
                form.finish_save(result, now);
                true
            }
            None => false,
        }
    }

    pub fn toasts(&self) -> impl Iterator<Item = &Toast> {
        self.toasts
            .iter()
            .chain(self.settings.as_ref().and_then(|form| form.toast()))
    }

    pub fn push_toast(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    /// Show an error toast
    pub fn error(&mut self, description: impl Into<String>, now: Instant) {
        self.push_toast(Toast::new("Error", description, ToastVariant::Error, now));
    }

    /// Expire toasts and advance the settings form. Returns a view to switch
    /// to, if one is due.
    pub fn tick(&mut self, now: Instant) -> Option<ViewMode> {
        self.toasts.retain(|toast| !toast.is_expired(now));
        self.settings.as_mut().and_then(|form| form.tick(now))
    }

    /// Earliest pending timer
    pub fn next_deadline(&self) -> Option<Instant> {
        self.toasts
            .iter()
            .map(|toast| toast.expires_at)
            .chain(self.settings.as_ref().and_then(|form| form.next_deadline()))
            .min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::settings_form::TOAST_DURATION;

    #[test]
    fn test_settings_form_follows_view() {
        let mut state = DashboardState::default();
        let preferences = UserPreferences::default();

        assert_eq!(state.enter_view(ViewMode::Settings, &preferences), Some(1));
        assert!(state.settings.is_some());
        // Staying on the view keeps the form
        assert_eq!(state.enter_view(ViewMode::Settings, &preferences), None);

        assert_eq!(state.enter_view(ViewMode::Queue, &preferences), None);
        assert!(state.settings.is_none());

        assert_eq!(state.enter_view(ViewMode::Settings, &preferences), Some(2));
    }

    #[test]
    fn test_stale_settings_results_are_dropped() {
        let mut state = DashboardState::default();
        let preferences = UserPreferences::default();
        let now = Instant::now();

        let first = state.enter_view(ViewMode::Settings, &preferences).unwrap();
        state.enter_view(ViewMode::Queue, &preferences);
        let second = state.enter_view(ViewMode::Settings, &preferences).unwrap();

        // The first form's save and load land after the second form opened
        assert!(!state.finish_save(first, Ok(()), now));
        let loaded = LoadedSettings {
            api_key: "old-key".to_string(),
            model: "gemini-2.5-pro".to_string(),
        };
        assert!(!state.apply_loaded(first, loaded));

        let form = state.settings.as_ref().unwrap();
        assert!(form.is_loading());
        assert!(form.api_key.is_empty());
        assert_eq!(state.tick(now + crate::dashboard::settings_form::RETURN_DELAY), None);

        let loaded = LoadedSettings {
            api_key: "new-key".to_string(),
            model: "gemini-2.5-flash".to_string(),
        };
        assert!(state.apply_loaded(second, loaded));
        assert_eq!(state.settings.as_ref().unwrap().api_key, "new-key");
    }

    #[test]
    fn test_toasts_expire() {
        let mut state = DashboardState::default();
        let now = Instant::now();

        state.error("Failed to capture screenshot", now);
        assert_eq!(state.toasts().count(), 1);
        assert_eq!(state.next_deadline(), Some(now + TOAST_DURATION));

        state.tick(now + TOAST_DURATION);
        assert_eq!(state.toasts().count(), 0);
        assert!(state.next_deadline().is_none());
    }

    #[test]
    fn test_tick_reports_return_to_queue() {
        let mut state = DashboardState::default();
        let generation = state
            .enter_view(ViewMode::Settings, &UserPreferences::default())
            .unwrap();

        let now = Instant::now();
        assert!(state.finish_save(generation, Ok(()), now));

        assert_eq!(
            state.tick(now + crate::dashboard::settings_form::RETURN_DELAY),
            Some(ViewMode::Queue)
        );
    }
}
