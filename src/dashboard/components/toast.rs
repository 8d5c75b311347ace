//! Toast notifications pinned to the bottom of the window

use egui::{RichText, Rounding, Stroke};

use crate::dashboard::settings_form::Toast;
use crate::dashboard::theme::{toast_color, ThemeColors};

/// Draw `toasts` stacked above the bottom edge
pub fn render_toasts<'a>(ctx: &egui::Context, toasts: impl IntoIterator<Item = &'a Toast>) {
    let toasts: Vec<&Toast> = toasts.into_iter().collect();
    if toasts.is_empty() {
        return;
    }

    egui::Area::new(egui::Id::new("toasts"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -12.0))
        .order(egui::Order::Foreground)
        .interactable(false)
        .show(ctx, |ui| {
            for toast in toasts {
                let accent = toast_color(toast.variant);
                egui::Frame::none()
                    .fill(ThemeColors::BG_MEDIUM)
                    .stroke(Stroke::new(1.0, accent))
                    .rounding(Rounding::same(6.0))
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_max_width(280.0);
                        ui.label(RichText::new(&toast.title).color(accent).strong());
                        if !toast.description.is_empty() {
                            ui.label(
                                RichText::new(&toast.description)
                                    .size(12.0)
                                    .color(ThemeColors::TEXT_SECONDARY),
                            );
                        }
                    });
                ui.add_space(4.0);
            }
        });
}
