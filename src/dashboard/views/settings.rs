//! Settings view - API key, model and response colors

use egui::{Color32, RichText, Rounding};

use crate::backend::{model_label, AVAILABLE_MODELS};
use crate::dashboard::settings_form::{FormPhase, SettingsForm};
use crate::dashboard::theme::ThemeColors;
use crate::dashboard::views::ViewAction;
use crate::overlay::widgets::ResponseStyle;
use crate::storage::preferences::{
    format_hex_color, parse_hex_color, MAX_BACKGROUND_OPACITY, MIN_BACKGROUND_OPACITY,
};

/// Render the settings view
pub fn render_settings_view(ui: &mut egui::Ui, form: &mut SettingsForm) -> Option<ViewAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui.small_button("< Back").clicked() {
            action = Some(ViewAction::Back);
        }
        ui.heading(RichText::new("Settings").strong());
    });
    ui.add_space(8.0);

    if form.is_loading() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Loading settings...").color(ThemeColors::TEXT_SECONDARY));
        });
        return action;
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        settings_group(ui, "Model", |ui| {
            ui.label(RichText::new("API key").size(12.0).color(ThemeColors::TEXT_SECONDARY));
            ui.add(
                egui::TextEdit::singleline(&mut form.api_key)
                    .password(true)
                    .hint_text("Enter your API key")
                    .desired_width(f32::INFINITY),
            );
            if form.api_key.trim().is_empty() {
                ui.label(
                    RichText::new("An API key is required to save")
                        .size(11.0)
                        .color(ThemeColors::ACCENT_WARNING),
                );
            }

            ui.add_space(6.0);
            ui.label(RichText::new("Model").size(12.0).color(ThemeColors::TEXT_SECONDARY));
            egui::ComboBox::from_id_salt("model_select")
                .selected_text(model_label(&form.model).to_string())
                .width(ui.available_width())
                .show_ui(ui, |ui| {
                    for (id, label) in AVAILABLE_MODELS {
                        ui.selectable_value(&mut form.model, id.to_string(), label);
                    }
                });
        });

        ui.add_space(8.0);

        settings_group(ui, "Response appearance", |ui| {
            color_row(ui, "Background", &mut form.preferences.response_background_color);
            color_row(ui, "Text", &mut form.preferences.response_font_color);

            ui.horizontal(|ui| {
                ui.label("Opacity:");
                ui.add(
                    egui::Slider::new(
                        &mut form.preferences.response_background_opacity,
                        MIN_BACKGROUND_OPACITY..=MAX_BACKGROUND_OPACITY,
                    )
                    .suffix("%"),
                );
            });

            // Preview
            let style = ResponseStyle::from_preferences(&form.preferences);
            egui::Frame::none()
                .fill(style.background)
                .rounding(Rounding::same(style.corner_radius))
                .inner_margin(style.padding)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(RichText::new("Preview of a response").color(style.text_color));
                });

            ui.add_space(4.0);
            if ui.small_button("Reset colors").clicked() {
                action = Some(ViewAction::ResetColors);
            }
        });

        ui.add_space(12.0);

        ui.horizontal(|ui| {
            let saving = form.phase() == FormPhase::Saving;
            let label = if saving { "Saving..." } else { "Save" };
            if ui
                .add_enabled(form.can_save(), egui::Button::new(label).min_size(egui::vec2(90.0, 28.0)))
                .clicked()
            {
                action = Some(ViewAction::SaveSettings);
            }

            if let FormPhase::Saved { .. } = form.phase() {
                ui.label(RichText::new("Saved").color(ThemeColors::ACCENT_SUCCESS));
            }
        });
    });

    action
}

fn settings_group(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(ThemeColors::BG_MEDIUM)
        .rounding(Rounding::same(8.0))
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.label(RichText::new(title).strong());
            ui.separator();
            add_contents(ui);
        });
}

/// Color picker bound to a `#rrggbb` string
fn color_row(ui: &mut egui::Ui, label: &str, value: &mut String) {
    ui.horizontal(|ui| {
        ui.label(format!("{}:", label));
        let mut color = parse_hex_color(value).unwrap_or(Color32::BLACK);
        if ui.color_edit_button_srgba(&mut color).changed() {
            *value = format_hex_color(color);
        }
        ui.label(RichText::new(value.as_str()).monospace().color(ThemeColors::TEXT_MUTED));
    });
}
