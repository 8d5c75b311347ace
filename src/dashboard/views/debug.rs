//! Debug view - extra screenshots taken after a solution

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::capture::MAX_SCREENSHOTS;
use crate::dashboard::theme::ThemeColors;
use crate::dashboard::views::solutions::render_problem;
use crate::dashboard::views::{thumbnail, ViewAction};
use crate::overlay::widgets::ResponseStyle;
use crate::shared::SharedAppState;

/// Render the debug view
pub fn render_debug_view(
    ui: &mut egui::Ui,
    shared_state: &Arc<RwLock<SharedAppState>>,
    style: &ResponseStyle,
) -> Option<ViewAction> {
    let mut action = None;

    let (extra, problem, has_debugged, is_processing) = {
        let state = shared_state.read();
        (
            state.extra_screenshot_queue().to_vec(),
            state.problem_info().cloned(),
            state.has_debugged(),
            state.runtime.is_processing,
        )
    };

    ui.horizontal(|ui| {
        ui.label(
            RichText::new(format!("Extra screenshots: {}/{}", extra.len(), MAX_SCREENSHOTS))
                .color(ThemeColors::TEXT_SECONDARY),
        );
        if has_debugged {
            ui.label(RichText::new("debugged").size(11.0).color(ThemeColors::ACCENT_SUCCESS));
        }
        if is_processing {
            ui.spinner();
        }
    });

    ui.horizontal(|ui| {
        if ui.button("Take screenshot").on_hover_text("Ctrl+H").clicked() {
            action = Some(ViewAction::TakeScreenshot);
        }
        if ui.button("Start over").on_hover_text("Ctrl+R").clicked() {
            action = Some(ViewAction::ClearQueues);
        }
    });

    ui.add_space(8.0);

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for path in &extra {
                ui.vertical(|ui| {
                    ui.add(thumbnail(path));
                    if ui
                        .small_button(RichText::new("Delete").color(ThemeColors::ACCENT_ERROR))
                        .clicked()
                    {
                        action = Some(ViewAction::DeleteScreenshot(path.clone()));
                    }
                });
            }
        });

        if let Some(problem) = &problem {
            ui.add_space(8.0);
            render_problem(ui, problem, style);
        }
    });

    action
}
