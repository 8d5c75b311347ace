//! Dashboard application entry point

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::app::{refresh_sessions, AppContext};
use crate::capture::{PrimaryScreenGrabber, ScreenGrabber};
use crate::config::WindowSettings;
use crate::dashboard::components::{render_nav_bar, render_toasts, NavAction};
use crate::dashboard::dispatch::{Dispatcher, TaskResult};
use crate::dashboard::settings_form::{load_backend_settings, save_settings, Toast, ToastVariant};
use crate::dashboard::state::DashboardState;
use crate::dashboard::theme::{self, ThemeColors};
use crate::dashboard::views::{
    render_debug_view, render_queue_view, render_settings_view, render_solutions_view, ViewAction,
};
use crate::hotkey::HotkeyManager;
use crate::ipc::{IpcRequest, IpcResponse};
use crate::overlay::widgets::ResponseStyle;
use crate::shared::{ProcessingEvent, ViewMode};

/// Repaint cadence while idle, so processing events are picked up
const IDLE_REPAINT: Duration = Duration::from_millis(100);

/// The assistant window
pub struct DashboardApp {
    context: AppContext,
    /// Dashboard-specific state
    dashboard_state: DashboardState,
    egui_ctx: egui::Context,
    /// Keeps the global shortcuts registered while the app runs
    _hotkeys: Option<HotkeyManager>,
    dispatcher: Dispatcher,
    task_tx: Sender<TaskResult>,
    task_rx: Receiver<TaskResult>,
    theme_applied: bool,
    /// Re-read the window position once the pointer is released
    sync_position: bool,
    /// Set when a view panicked; replaces the UI until dismissed
    failure: Option<String>,
}

impl DashboardApp {
    /// Create the dashboard. Must run on the main thread, where the global
    /// shortcuts are registered.
    pub fn new(cc: &eframe::CreationContext<'_>, context: AppContext) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let mut app = Self::with_grabber(cc.egui_ctx.clone(), context, Arc::new(PrimaryScreenGrabber));

        app._hotkeys = match HotkeyManager::new() {
            Ok(mut manager) => {
                let shortcuts = app.context.shared_state.read().config.shortcuts.clone();
                let count = manager.register_shortcuts(&shortcuts);
                info!("Registered {} global shortcuts", count);

                let dispatcher = app.dispatcher.clone();
                manager.install_handler(move |action| dispatcher.handle(action));
                Some(manager)
            }
            Err(e) => {
                warn!("Global shortcuts unavailable: {:#}", e);
                None
            }
        };

        app
    }

    /// Dashboard without global shortcuts, capturing through `grabber`
    fn with_grabber(
        egui_ctx: egui::Context,
        context: AppContext,
        grabber: Arc<dyn ScreenGrabber>,
    ) -> Self {
        let (task_tx, task_rx) = unbounded();
        let dispatcher = Dispatcher::new(
            context.shared_state.clone(),
            egui_ctx.clone(),
            context.runtime().clone(),
            grabber,
            task_tx.clone(),
        );

        let app = Self {
            context,
            dashboard_state: DashboardState::default(),
            egui_ctx,
            _hotkeys: None,
            dispatcher,
            task_tx,
            task_rx,
            theme_applied: false,
            sync_position: true,
            failure: None,
        };
        app.refresh_sessions();
        app
    }

    /// Create eframe options for the assistant window
    pub fn options(window: &WindowSettings, visible: bool) -> eframe::NativeOptions {
        let mut viewport = egui::ViewportBuilder::default()
            .with_inner_size([window.width, window.height])
            .with_min_inner_size([280.0, 200.0])
            .with_title("Interview Assistant")
            .with_transparent(true)
            .with_decorations(false)
            .with_visible(visible);
        if window.always_on_top {
            viewport = viewport.with_always_on_top();
        }

        eframe::NativeOptions {
            viewport,
            ..Default::default()
        }
    }

    /// Spawn `task` on the runtime; its result is applied on a later frame
    fn spawn<F>(&self, task: F)
    where
        F: std::future::Future<Output = TaskResult> + Send + 'static,
    {
        let tx = self.task_tx.clone();
        let ctx = self.egui_ctx.clone();
        self.context.runtime().spawn(async move {
            let _ = tx.send(task.await);
            ctx.request_repaint();
        });
    }

    fn refresh_sessions(&self) {
        let ipc = self.context.ipc.clone();
        let shared_state = self.context.shared_state.clone();
        self.spawn(async move {
            TaskResult::SessionsRefreshed(refresh_sessions(&ipc, &shared_state).await)
        });
    }

    /// Files dropped on the window go through `save-temp-file` and join the queue
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());

        for file in dropped {
            let name = file
                .path
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.name.clone());
            info!("File dropped: {}", name);

            let ipc = self.context.ipc.clone();
            self.spawn(async move {
                let buffer = match (file.bytes, file.path) {
                    (Some(bytes), _) => Ok(bytes.to_vec()),
                    (None, Some(path)) => tokio::fs::read(&path)
                        .await
                        .map_err(|e| format!("Failed to read {:?}: {}", path, e)),
                    (None, None) => Err("Dropped file has no contents".to_string()),
                };

                let result = match buffer {
                    Ok(buffer) => {
                        let request = IpcRequest::SaveTempFile {
                            file_name: name.clone(),
                            buffer,
                        };
                        match ipc.handle(request).await {
                            Ok(IpcResponse::Path(path)) => Ok(PathBuf::from(path)),
                            Ok(other) => Err(format!("Unexpected response: {:?}", other)),
                            Err(e) => Err(e.to_string()),
                        }
                    }
                    Err(e) => Err(e),
                };

                TaskResult::FileSaved { name, result }
            });
        }
    }

    fn handle_view_action(&mut self, action: ViewAction) {
        let now = Instant::now();
        match action {
            ViewAction::TakeScreenshot => self.dispatcher.take_screenshot(),
            ViewAction::DeleteScreenshot(path) => {
                if let Err(e) = self.context.shared_state.write().delete_screenshot(&path) {
                    error!("{:#}", e);
                    self.dashboard_state.error("Failed to delete screenshot", now);
                }
            }
            ViewAction::ClearQueues => self.context.shared_state.write().clear_queues(),
            ViewAction::RefreshSessions => self.refresh_sessions(),
            ViewAction::SaveSettings => {
                let request = self
                    .dashboard_state
                    .settings
                    .as_mut()
                    .and_then(|form| form.begin_save());
                if let Some(request) = request {
                    let generation = self.dashboard_state.settings_generation();
                    let backend = self.context.backend.clone();
                    let preferences = self.context.preferences.clone();
                    self.spawn(async move {
                        TaskResult::SettingsSaved {
                            generation,
                            result: save_settings(backend.as_ref(), &preferences, request).await,
                        }
                    });
                }
            }
            ViewAction::ResetColors => {
                if let Some(form) = self.dashboard_state.settings.as_mut() {
                    let mut store = self.context.preferences.lock();
                    form.reset_colors(&mut store, now);
                }
            }
            ViewAction::Back => self.context.shared_state.write().set_view(ViewMode::Queue),
        }
    }

    fn process_task_results(&mut self) {
        let now = Instant::now();
        while let Ok(result) = self.task_rx.try_recv() {
            match result {
                TaskResult::SettingsLoaded { generation, loaded } => {
                    self.dashboard_state.apply_loaded(generation, loaded);
                }
                TaskResult::SettingsSaved { generation, result } => {
                    self.dashboard_state.finish_save(generation, result, now);
                }
                TaskResult::SessionsRefreshed(Err(e)) => {
                    warn!("Failed to refresh sessions: {}", e);
                    self.dashboard_state.error("Failed to read sessions", now);
                }
                TaskResult::SessionsRefreshed(Ok(())) => {}
                TaskResult::ScreenshotFailed(e) => {
                    error!("Screenshot failed: {:#}", e);
                    self.dashboard_state.error("Failed to capture screenshot", now);
                }
                TaskResult::FileSaved { name, result } => match result {
                    Ok(path) => {
                        self.context.shared_state.write().add_file_to_queue(path);
                        self.dashboard_state.push_toast(Toast::new(
                            "File added",
                            name,
                            ToastVariant::Success,
                            now,
                        ));
                    }
                    Err(e) => {
                        error!("Failed to save {}: {}", name, e);
                        self.dashboard_state.error(format!("Failed to add {}", name), now);
                    }
                },
            }
        }
    }

    fn process_processing_events(&mut self) {
        let events: Vec<ProcessingEvent> = self.context.processing_events().try_iter().collect();
        if events.is_empty() {
            return;
        }

        let now = Instant::now();
        let mut state = self.context.shared_state.write();
        for event in events {
            info!("Processing event: {}", event.name());
            state.apply_processing_event(event);
            if let Some(error) = state.runtime.last_error.clone() {
                self.dashboard_state.error(error, now);
                state.runtime.clear_error();
            }
        }
    }

    /// Keep the settings form in step with the current view
    fn sync_view(&mut self) {
        let view = self.context.shared_state.read().view();
        let preferences = self.context.preferences.lock().get();
        if let Some(generation) = self.dashboard_state.enter_view(view, &preferences) {
            let backend = self.context.backend.clone();
            self.spawn(async move {
                TaskResult::SettingsLoaded {
                    generation,
                    loaded: load_backend_settings(backend.as_ref()).await,
                }
            });
        }
    }

    /// Track the native window geometry and forward queued window changes
    fn apply_window_commands(&mut self, ctx: &egui::Context) {
        let (outer_rect, monitor_size, pointer_down) =
            ctx.input(|i| (i.viewport().outer_rect, i.viewport().monitor_size, i.pointer.any_down()));

        {
            let mut state = self.context.shared_state.write();
            if let Some(size) = monitor_size {
                state.window.set_screen_size(size.x, size.y);
            }
            if self.sync_position && !pointer_down {
                if let Some(rect) = outer_rect {
                    state.window.observe_position(rect.min.x, rect.min.y);
                    self.sync_position = false;
                }
            }
        }

        self.dispatcher.flush_window_commands();
    }

    /// Run one render step. A panic inside `render` is caught and replaces
    /// the UI with the failure screen on later frames.
    fn render_guarded(
        &mut self,
        ctx: &egui::Context,
        render: impl FnOnce(&mut Self, &egui::Context),
    ) {
        if self.failure.is_some() {
            self.render_failure(ctx);
            return;
        }

        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| render(self, ctx))) {
            let message = panic_message(payload.as_ref());
            error!("View panicked: {}", message);
            self.failure = Some(message);
        }
    }

    /// Draw the window contents
    fn render(&mut self, ctx: &egui::Context) {
        let view = self.context.shared_state.read().view();
        let style = ResponseStyle::from_preferences(&self.context.preferences.lock().get());
        let mut nav_action = None;
        let mut view_action = None;

        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(ThemeColors::BG_DARK)
                    .rounding(10.0)
                    .inner_margin(10.0),
            )
            .show(ctx, |ui| {
                nav_action = render_nav_bar(ui, view);
                ui.separator();

                view_action = match view {
                    ViewMode::Queue => render_queue_view(ui, &self.context.shared_state),
                    ViewMode::Solutions => {
                        render_solutions_view(ui, &self.context.shared_state, &style)
                    }
                    ViewMode::Debug => render_debug_view(ui, &self.context.shared_state, &style),
                    ViewMode::Settings => match self.dashboard_state.settings.as_mut() {
                        Some(form) => render_settings_view(ui, form),
                        None => None,
                    },
                };
            });

        match nav_action {
            Some(NavAction::Select(view)) => self.context.shared_state.write().set_view(view),
            Some(NavAction::Hide) => self.context.shared_state.write().hide_window(),
            Some(NavAction::StartDrag) => {
                ctx.send_viewport_cmd(egui::ViewportCommand::StartDrag);
                self.sync_position = true;
            }
            None => {}
        }
        if let Some(action) = view_action {
            self.handle_view_action(action);
        }

        render_toasts(ctx, self.dashboard_state.toasts());
    }

    /// Shown in place of the UI after a view panicked
    fn render_failure(&mut self, ctx: &egui::Context) {
        let mut dismissed = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(ThemeColors::BG_DARK).inner_margin(16.0))
            .show(ctx, |ui| {
                ui.heading(egui::RichText::new("Something went wrong").color(ThemeColors::ACCENT_ERROR));
                ui.add_space(8.0);
                if let Some(message) = &self.failure {
                    ui.label(egui::RichText::new(message).color(ThemeColors::TEXT_SECONDARY));
                }
                ui.add_space(12.0);
                dismissed = ui.button("Back to queue").clicked();
            });

        if dismissed {
            self.failure = None;
            self.dashboard_state.settings = None;
            self.context.shared_state.write().set_view(ViewMode::Queue);
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme once
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.process_task_results();
        self.process_processing_events();
        self.handle_dropped_files(ctx);

        if let Some(view) = self.dashboard_state.tick(Instant::now()) {
            self.context.shared_state.write().set_view(view);
        }
        self.sync_view();

        self.render_guarded(ctx, Self::render);

        self.apply_window_commands(ctx);

        let wait = self
            .dashboard_state
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()).min(IDLE_REPAINT))
            .unwrap_or(IDLE_REPAINT);
        ctx.request_repaint_after(wait);
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }
}

/// Text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unknown error".to_string()
    }
}

/// Run the dashboard application
pub fn run_dashboard(context: AppContext) -> Result<(), eframe::Error> {
    let (window, visible) = {
        let state = context.shared_state.read();
        (state.config.window.clone(), state.is_visible())
    };

    eframe::run_native(
        "Interview Assistant",
        DashboardApp::options(&window, visible),
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, context)))),
    )
}
