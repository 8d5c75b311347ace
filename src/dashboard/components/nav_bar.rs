//! Top navigation bar

use egui::{Color32, RichText, Rounding, Sense, Vec2};

use crate::dashboard::theme::{color_with_alpha, ThemeColors};
use crate::shared::ViewMode;

/// What the user asked for from the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Select(ViewMode),
    Hide,
    StartDrag,
}

/// Render the navigation bar
pub fn render_nav_bar(ui: &mut egui::Ui, current_view: ViewMode) -> Option<NavAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        // Drag handle for the undecorated window
        let handle = ui.add(
            egui::Label::new(RichText::new("::").size(16.0).color(ThemeColors::TEXT_MUTED))
                .sense(Sense::drag()),
        );
        if handle.drag_started() {
            action = Some(NavAction::StartDrag);
        }

        for view in [ViewMode::Queue, ViewMode::Solutions, ViewMode::Debug, ViewMode::Settings] {
            if nav_button(ui, view.name(), current_view == view) {
                action = Some(NavAction::Select(view));
            }
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .small_button(RichText::new("Hide").color(ThemeColors::TEXT_SECONDARY))
                .on_hover_text("Hide the window (Ctrl+B brings it back)")
                .clicked()
            {
                action = Some(NavAction::Hide);
            }
        });
    });

    action
}

/// Render a navigation button
fn nav_button(ui: &mut egui::Ui, label: &str, is_selected: bool) -> bool {
    let galley = ui.painter().layout_no_wrap(
        label.to_string(),
        egui::FontId::proportional(13.0),
        Color32::WHITE,
    );
    let desired_size = Vec2::new(galley.size().x + 20.0, 26.0);
    let (rect, response) = ui.allocate_exact_size(desired_size, Sense::click());

    if ui.is_rect_visible(rect) {
        let bg_color = if is_selected {
            color_with_alpha(ThemeColors::ACCENT_PRIMARY, 51)
        } else if response.hovered() {
            ThemeColors::BG_HOVER
        } else {
            Color32::TRANSPARENT
        };

        let text_color = if is_selected {
            ThemeColors::ACCENT_PRIMARY
        } else if response.hovered() {
            ThemeColors::TEXT_PRIMARY
        } else {
            ThemeColors::TEXT_SECONDARY
        };

        ui.painter().rect_filled(rect, Rounding::same(6.0), bg_color);

        // Selection underline
        if is_selected {
            let indicator_rect = egui::Rect::from_min_size(
                rect.left_bottom() + Vec2::new(6.0, -3.0),
                Vec2::new(rect.width() - 12.0, 2.0),
            );
            ui.painter()
                .rect_filled(indicator_rect, Rounding::same(1.0), ThemeColors::ACCENT_PRIMARY);
        }

        ui.painter().text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(13.0),
            text_color,
        );
    }

    response.clicked()
}
