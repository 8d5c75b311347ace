//! Dashboard views

pub mod debug;
pub mod queue;
pub mod settings;
pub mod solutions;

use std::path::PathBuf;

pub use debug::render_debug_view;
pub use queue::render_queue_view;
pub use settings::render_settings_view;
pub use solutions::render_solutions_view;

/// Work a view hands back to the dashboard app
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    TakeScreenshot,
    DeleteScreenshot(PathBuf),
    ClearQueues,
    RefreshSessions,
    SaveSettings,
    ResetColors,
    Back,
}

/// Thumbnail for a screenshot on disk
pub(crate) fn thumbnail(path: &std::path::Path) -> egui::Image<'static> {
    egui::Image::new(format!("file://{}", path.display()))
        .max_size(egui::vec2(160.0, 100.0))
        .rounding(4.0)
}
