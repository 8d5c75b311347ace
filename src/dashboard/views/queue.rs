//! Queue view - screenshots waiting to be processed

use egui::RichText;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::capture::MAX_SCREENSHOTS;
use crate::dashboard::components::{CardStatus, StatusCard};
use crate::dashboard::theme::ThemeColors;
use crate::dashboard::views::{thumbnail, ViewAction};
use crate::shared::SharedAppState;

/// Render the queue view
pub fn render_queue_view(
    ui: &mut egui::Ui,
    shared_state: &Arc<RwLock<SharedAppState>>,
) -> Option<ViewAction> {
    let mut action = None;

    let (queue, current_session, session_count, is_capturing, last_error) = {
        let state = shared_state.read();
        (
            state.screenshot_queue().to_vec(),
            state.runtime.current_session.clone(),
            state.runtime.sessions.len(),
            state.runtime.is_capturing,
            state.runtime.last_error.clone(),
        )
    };

    ui.horizontal(|ui| {
        StatusCard::new(
            "Screenshots",
            format!("{}/{}", queue.len(), MAX_SCREENSHOTS),
            CardStatus::for_queue(queue.len(), MAX_SCREENSHOTS),
        )
        .show(ui);

        let session_label = current_session
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "None".to_string());
        let session_status = if current_session.is_some() {
            CardStatus::Active
        } else {
            CardStatus::Inactive
        };
        StatusCard::new(format!("Session ({} total)", session_count), session_label, session_status)
            .show(ui);
    });

    if let Some(error) = last_error {
        ui.add_space(4.0);
        ui.label(RichText::new(error).size(12.0).color(ThemeColors::ACCENT_ERROR));
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        let capture_label = if is_capturing { "Capturing..." } else { "Take screenshot" };
        if ui
            .add_enabled(!is_capturing, egui::Button::new(capture_label))
            .on_hover_text("Ctrl+H")
            .clicked()
        {
            action = Some(ViewAction::TakeScreenshot);
        }
        if ui
            .add_enabled(!queue.is_empty(), egui::Button::new("Reset"))
            .on_hover_text("Ctrl+R")
            .clicked()
        {
            action = Some(ViewAction::ClearQueues);
        }
        if ui.small_button("Refresh sessions").clicked() {
            action = Some(ViewAction::RefreshSessions);
        }
    });

    ui.add_space(8.0);

    if queue.is_empty() {
        ui.label(
            RichText::new("No screenshots yet. Take one or drop files onto the window.")
                .size(12.0)
                .color(ThemeColors::TEXT_MUTED),
        );
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        ui.horizontal_wrapped(|ui| {
            for path in &queue {
                ui.vertical(|ui| {
                    ui.add(thumbnail(path))
                        .on_hover_text(path.display().to_string());
                    if ui
                        .small_button(RichText::new("Delete").color(ThemeColors::ACCENT_ERROR))
                        .clicked()
                    {
                        action = Some(ViewAction::DeleteScreenshot(path.clone()));
                    }
                });
            }
        });
    });

    action
}
