//! Work that must happen whether or not the window is drawing frames
//!
//! Global shortcuts arrive on the hotkey event handler, and a hidden window
//! may not run `update` at all. [`Dispatcher`] mutates the shared state,
//! pushes window changes straight to the viewport and wakes eframe, so a
//! shortcut or a finished capture takes effect without waiting for a frame.

use anyhow::anyhow;
use crossbeam_channel::Sender;
use eframe::egui;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tracing::debug;

use crate::capture::{capture_to_dir, ScreenGrabber};
use crate::dashboard::settings_form::{LoadedSettings, SettingsError};
use crate::hotkey::ShortcutAction;
use crate::ipc::IpcError;
use crate::overlay::{MoveDirection, WindowCommand};
use crate::shared::SharedAppState;

/// Time given to the window to disappear before the screen is grabbed
const CAPTURE_HIDE_DELAY: Duration = Duration::from_millis(150);

/// Results of background work, applied on the next frame. Settings results
/// carry the generation of the form that asked for them.
pub enum TaskResult {
    SettingsLoaded {
        generation: u64,
        loaded: LoadedSettings,
    },
    SettingsSaved {
        generation: u64,
        result: Result<(), SettingsError>,
    },
    SessionsRefreshed(Result<(), IpcError>),
    ScreenshotFailed(anyhow::Error),
    FileSaved {
        name: String,
        result: Result<PathBuf, String>,
    },
}

/// Native viewport commands for one queued window change
pub fn viewport_commands(command: WindowCommand) -> Vec<egui::ViewportCommand> {
    match command {
        WindowCommand::Show => vec![
            egui::ViewportCommand::Visible(true),
            egui::ViewportCommand::Focus,
        ],
        WindowCommand::Hide => vec![egui::ViewportCommand::Visible(false)],
        WindowCommand::MoveTo { x, y } => {
            vec![egui::ViewportCommand::OuterPosition(egui::pos2(x, y))]
        }
        WindowCommand::Resize { width, height } => {
            vec![egui::ViewportCommand::InnerSize(egui::vec2(width, height))]
        }
    }
}

/// Applies shortcuts and captures from any thread
#[derive(Clone)]
pub struct Dispatcher {
    shared_state: Arc<RwLock<SharedAppState>>,
    egui_ctx: egui::Context,
    runtime: Handle,
    grabber: Arc<dyn ScreenGrabber>,
    task_tx: Sender<TaskResult>,
}

impl Dispatcher {
    pub fn new(
        shared_state: Arc<RwLock<SharedAppState>>,
        egui_ctx: egui::Context,
        runtime: Handle,
        grabber: Arc<dyn ScreenGrabber>,
        task_tx: Sender<TaskResult>,
    ) -> Self {
        Self {
            shared_state,
            egui_ctx,
            runtime,
            grabber,
            task_tx,
        }
    }

    /// Send queued window changes to the viewport and wake eframe. Returns
    /// the number of changes sent.
    pub fn flush_window_commands(&self) -> usize {
        let commands = self.shared_state.write().window.take_commands();
        let count = commands.len();

        for command in commands {
            for viewport_command in viewport_commands(command) {
                self.egui_ctx.send_viewport_cmd(viewport_command);
            }
        }
        if count > 0 {
            self.egui_ctx.request_repaint();
        }

        count
    }

    /// Run a global shortcut
    pub fn handle(&self, action: ShortcutAction) {
        debug!("Shortcut: {:?}", action);
        match action {
            ShortcutAction::TakeScreenshot => self.take_screenshot(),
            ShortcutAction::ResetQueues => {
                self.shared_state.write().clear_queues();
                self.egui_ctx.request_repaint();
            }
            ShortcutAction::ToggleWindow => self.shared_state.write().toggle_window(),
            ShortcutAction::MoveWindow(direction) => {
                let mut state = self.shared_state.write();
                match direction {
                    MoveDirection::Left => state.move_window_left(),
                    MoveDirection::Right => state.move_window_right(),
                    MoveDirection::Up => state.move_window_up(),
                    MoveDirection::Down => state.move_window_down(),
                }
            }
        }
        self.flush_window_commands();
    }

    /// Capture the screen into the queue for the current view. The window is
    /// hidden for the duration of the capture and shown again afterwards
    /// from the capture task itself.
    pub fn take_screenshot(&self) {
        let (kind, dir, restore_window) = {
            let mut state = self.shared_state.write();
            if state.runtime.is_capturing {
                debug!("Capture already in progress");
                return;
            }
            state.runtime.is_capturing = true;

            let kind = state.screenshots.active_kind();
            let dir = state.screenshots.capture_dir(kind).to_path_buf();
            let was_visible = state.is_visible();
            state.hide_window();
            (kind, dir, was_visible)
        };
        self.flush_window_commands();

        let dispatcher = self.clone();
        self.runtime.spawn(async move {
            if restore_window {
                tokio::time::sleep(CAPTURE_HIDE_DELAY).await;
            }
            let grabber = dispatcher.grabber.clone();
            let result =
                match tokio::task::spawn_blocking(move || capture_to_dir(grabber.as_ref(), &dir)).await {
                    Ok(result) => result,
                    Err(e) => Err(anyhow!("Capture task failed: {}", e)),
                };

            let failure = {
                let mut state = dispatcher.shared_state.write();
                state.runtime.is_capturing = false;
                if restore_window {
                    state.show_window();
                }
                match result {
                    Ok(path) => {
                        if let Some(evicted) = state.screenshots.push(kind, path) {
                            debug!("Evicted {:?} from the {:?} queue", evicted, kind);
                        }
                        None
                    }
                    Err(e) => Some(e),
                }
            };

            if let Some(e) = failure {
                let _ = dispatcher.task_tx.send(TaskResult::ScreenshotFailed(e));
            }
            dispatcher.flush_window_commands();
            dispatcher.egui_ctx.request_repaint();
        });
    }
}
