//! Application Context
//!
//! Owns every long-lived collaborator (shared state, preferences, model
//! backend, IPC router) and the channel the processing pipeline reports on.
//! Built once by `main` and handed to the dashboard.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::info;

use crate::backend::{ConfigModelBackend, ModelBackend};
use crate::config::AppConfig;
use crate::ipc::{IpcError, IpcRequest, IpcResponse, IpcRouter};
use crate::shared::{ProcessingEvent, SharedAppState};
use crate::storage::preferences::PreferencesStore;
use crate::storage::AppPaths;

/// Everything the running application shares
#[derive(Clone)]
pub struct AppContext {
    /// Shared state between dashboard, shortcuts and background tasks
    pub shared_state: Arc<RwLock<SharedAppState>>,
    /// Response panel preferences
    pub preferences: Arc<Mutex<PreferencesStore>>,
    /// API key and model accessors
    pub backend: Arc<dyn ModelBackend>,
    /// Session bookkeeping routes
    pub ipc: Arc<IpcRouter>,
    /// Resolved filesystem locations
    pub paths: AppPaths,
    runtime: Handle,
    processing_tx: Sender<ProcessingEvent>,
    processing_rx: Receiver<ProcessingEvent>,
}

impl AppContext {
    /// Wire up the collaborators for `config`
    pub fn new(config: AppConfig, paths: AppPaths, runtime: Handle) -> Self {
        let shared_state = Arc::new(RwLock::new(SharedAppState::new(config, &paths)));
        let preferences = Arc::new(Mutex::new(PreferencesStore::open(&paths.preferences_file)));
        let backend: Arc<dyn ModelBackend> = Arc::new(ConfigModelBackend::new(
            shared_state.clone(),
            Some(paths.config_file.clone()),
        ));
        let ipc = Arc::new(IpcRouter::new(&paths.sessions_root, &paths.temp_dir));
        let (processing_tx, processing_rx) = unbounded();

        info!("Sessions root: {:?}", paths.sessions_root);
        info!("Temp directory: {:?}", paths.temp_dir);

        Self {
            shared_state,
            preferences,
            backend,
            ipc,
            paths,
            runtime,
            processing_tx,
            processing_rx,
        }
    }

    /// Start with the window hidden for this run only. The persisted config
    /// is left as it is.
    pub fn hide_on_launch(&self) {
        self.shared_state.write().window.set_launch_visibility(false);
    }

    pub fn runtime(&self) -> &Handle {
        &self.runtime
    }

    /// Sender handed to the processing pipeline
    #[allow(dead_code)]
    pub fn processing_sender(&self) -> Sender<ProcessingEvent> {
        self.processing_tx.clone()
    }

    /// Events reported by the processing pipeline
    pub fn processing_events(&self) -> &Receiver<ProcessingEvent> {
        &self.processing_rx
    }
}

/// Query the session routes and store the answers in the runtime state
pub async fn refresh_sessions(
    ipc: &IpcRouter,
    shared_state: &RwLock<SharedAppState>,
) -> Result<(), IpcError> {
    let current = match ipc.handle(IpcRequest::GetCurrentSessionPath).await? {
        IpcResponse::Path(path) if !path.is_empty() => Some(path.into()),
        _ => None,
    };
    let sessions = match ipc.handle(IpcRequest::ListSessions).await? {
        IpcResponse::Sessions(sessions) => sessions,
        IpcResponse::Path(_) => Vec::new(),
    };

    let mut state = shared_state.write();
    state.runtime.current_session = current;
    state.runtime.sessions = sessions;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_context_wires_paths() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::under(temp.path());
        let context = AppContext::new(AppConfig::default(), paths.clone(), Handle::current());

        assert_eq!(context.ipc.sessions().root(), paths.sessions_root.as_path());
        assert_eq!(context.preferences.lock().get(), Default::default());
    }

    #[tokio::test]
    async fn test_hide_on_launch_is_not_persisted() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::under(temp.path());
        let context = AppContext::new(AppConfig::default(), paths.clone(), Handle::current());

        context.hide_on_launch();
        assert!(!context.shared_state.read().is_visible());

        context.backend.set_model("gemini-2.5-pro").await.unwrap();

        let saved = crate::config::load_config(&paths.config_file).unwrap();
        assert_eq!(saved.model.name, "gemini-2.5-pro");
        assert!(!saved.general.start_hidden);
    }

    #[tokio::test]
    async fn test_processing_events_reach_receiver() {
        let temp = TempDir::new().unwrap();
        let context = AppContext::new(AppConfig::default(), AppPaths::under(temp.path()), Handle::current());

        context.processing_sender().send(ProcessingEvent::DebugStart).unwrap();
        assert_eq!(context.processing_events().try_recv().unwrap(), ProcessingEvent::DebugStart);
    }

    #[tokio::test]
    async fn test_refresh_sessions_updates_runtime_state() {
        let temp = TempDir::new().unwrap();
        let paths = AppPaths::under(temp.path());
        std::fs::create_dir_all(paths.sessions_root.join("2024-06-01")).unwrap();
        let context = AppContext::new(AppConfig::default(), paths.clone(), Handle::current());

        refresh_sessions(&context.ipc, &context.shared_state).await.unwrap();

        let state = context.shared_state.read();
        assert_eq!(state.runtime.sessions, vec!["2024-06-01".to_string()]);
        assert_eq!(
            state.runtime.current_session,
            Some(PathBuf::from(paths.sessions_root.join("2024-06-01")))
        );
    }
}
