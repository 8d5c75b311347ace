//! Application state shared by the dashboard, shortcuts and background tasks

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::capture::ScreenshotQueue;
use crate::config::AppConfig;
use crate::overlay::WindowController;
use crate::shared::messages::ProcessingEvent;
use crate::storage::AppPaths;

/// Which top-level panel the UI renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Queue,
    Solutions,
    Debug,
    Settings,
}

impl ViewMode {
    /// Get the display name for this view
    pub fn name(&self) -> &'static str {
        match self {
            ViewMode::Queue => "Queue",
            ViewMode::Solutions => "Solutions",
            ViewMode::Debug => "Debug",
            ViewMode::Settings => "Settings",
        }
    }
}

/// A problem extracted from the screenshots. Every field is required, so a
/// record is either complete or absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemInfo {
    pub problem_statement: String,
    pub input_format: Map<String, Value>,
    pub output_format: Map<String, Value>,
    pub constraints: Vec<Map<String, Value>>,
    pub test_cases: Vec<Map<String, Value>>,
}

/// Central application state, constructed once by the entry point
#[derive(Debug, Clone)]
pub struct SharedAppState {
    /// Application configuration
    pub config: AppConfig,
    /// The overlay window
    pub window: WindowController,
    /// Main and extra screenshot queues
    pub screenshots: ScreenshotQueue,
    /// Runtime state (not persisted)
    pub runtime: RuntimeState,
    view: ViewMode,
    problem_info: Option<ProblemInfo>,
    has_debugged: bool,
}

impl SharedAppState {
    /// Create a new shared state with the given configuration
    pub fn new(config: AppConfig, paths: &AppPaths) -> Self {
        let window = WindowController::new(
            (config.window.width, config.window.height),
            config.window.move_step,
            !config.general.start_hidden,
        );
        let screenshots = ScreenshotQueue::new(&paths.screenshot_dir, &paths.extra_screenshot_dir);

        Self {
            config,
            window,
            screenshots,
            runtime: RuntimeState::default(),
            view: ViewMode::Queue,
            problem_info: None,
            has_debugged: false,
        }
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            info!("View changed: {} -> {}", self.view.name(), view.name());
        }
        self.view = view;
        self.screenshots.set_view(view);
    }

    pub fn problem_info(&self) -> Option<&ProblemInfo> {
        self.problem_info.as_ref()
    }

    #[allow(dead_code)]
    pub fn set_problem_info(&mut self, problem_info: Option<ProblemInfo>) {
        self.problem_info = problem_info;
    }

    pub fn has_debugged(&self) -> bool {
        self.has_debugged
    }

    #[allow(dead_code)]
    pub fn set_has_debugged(&mut self, value: bool) {
        self.has_debugged = value;
    }

    /// Empty both screenshot queues, drop the problem and go back to the
    /// queue view. The has-debugged flag is left as is.
    pub fn clear_queues(&mut self) {
        self.screenshots.clear_queues();
        self.problem_info = None;
        self.set_view(ViewMode::Queue);
    }

    pub fn screenshot_queue(&self) -> &[PathBuf] {
        self.screenshots.screenshot_queue()
    }

    pub fn extra_screenshot_queue(&self) -> &[PathBuf] {
        self.screenshots.extra_screenshot_queue()
    }

    pub fn add_file_to_queue(&mut self, path: PathBuf) {
        self.screenshots.add_file_to_queue(path);
    }

    pub fn delete_screenshot(&mut self, path: &Path) -> anyhow::Result<()> {
        self.screenshots.delete_screenshot(path)
    }

    // Window delegation

    pub fn is_visible(&self) -> bool {
        self.window.is_visible()
    }

    pub fn show_window(&mut self) {
        self.window.show();
    }

    pub fn hide_window(&mut self) {
        self.window.hide();
    }

    pub fn toggle_window(&mut self) {
        info!(
            "Screenshots: {}, extra screenshots: {}",
            self.screenshot_queue().len(),
            self.extra_screenshot_queue().len()
        );
        self.window.toggle();
    }

    #[allow(dead_code)]
    pub fn set_window_dimensions(&mut self, width: f32, height: f32) {
        self.window.set_dimensions(width, height);
    }

    pub fn move_window_left(&mut self) {
        self.window.move_left();
    }

    pub fn move_window_right(&mut self) {
        self.window.move_right();
    }

    pub fn move_window_up(&mut self) {
        self.window.move_up();
    }

    pub fn move_window_down(&mut self) {
        self.window.move_down();
    }

    /// Fold a processing lifecycle event into the state
    pub fn apply_processing_event(&mut self, event: ProcessingEvent) {
        match event {
            ProcessingEvent::Unauthorized => {
                self.runtime.set_error("API key missing or rejected");
                self.set_view(ViewMode::Settings);
            }
            ProcessingEvent::NoScreenshots => {
                self.runtime.set_error("No screenshots to process");
            }
            ProcessingEvent::InitialStart => {
                self.runtime.clear_error();
                self.runtime.is_processing = true;
                self.set_view(ViewMode::Solutions);
            }
            ProcessingEvent::ProblemExtracted(problem) => {
                self.problem_info = Some(problem);
            }
            ProcessingEvent::SolutionSuccess => {
                self.runtime.is_processing = false;
            }
            ProcessingEvent::InitialSolutionError(message) => {
                self.runtime.is_processing = false;
                self.runtime.set_error(message);
                self.set_view(ViewMode::Queue);
            }
            ProcessingEvent::DebugStart => {
                self.runtime.clear_error();
                self.runtime.is_processing = true;
            }
            ProcessingEvent::DebugSuccess => {
                self.runtime.is_processing = false;
                self.has_debugged = true;
                self.set_view(ViewMode::Debug);
            }
            ProcessingEvent::DebugError(message) => {
                self.runtime.is_processing = false;
                self.runtime.set_error(message);
            }
        }
    }
}

/// Runtime state that is not persisted
#[derive(Debug, Clone, Default)]
pub struct RuntimeState {
    /// A capture is in flight
    pub is_capturing: bool,
    /// The processing collaborator is working
    pub is_processing: bool,
    /// Current session folder, as last reported by the session index
    pub current_session: Option<PathBuf>,
    /// Names of all session folders
    pub sessions: Vec<String>,
    /// Last error message (if any)
    pub last_error: Option<String>,
}

impl RuntimeState {
    /// Clear any error state
    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Set an error message
    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }
}
