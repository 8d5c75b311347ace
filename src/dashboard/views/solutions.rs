//! Solutions view - the extracted problem rendered in the response colors

use egui::{RichText, Rounding};
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::dashboard::theme::ThemeColors;
use crate::dashboard::views::ViewAction;
use crate::overlay::widgets::ResponseStyle;
use crate::shared::{ProblemInfo, SharedAppState};

/// Render the solutions view
pub fn render_solutions_view(
    ui: &mut egui::Ui,
    shared_state: &Arc<RwLock<SharedAppState>>,
    style: &ResponseStyle,
) -> Option<ViewAction> {
    let (problem, is_processing, last_error) = {
        let state = shared_state.read();
        (
            state.problem_info().cloned(),
            state.runtime.is_processing,
            state.runtime.last_error.clone(),
        )
    };

    if is_processing {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(RichText::new("Processing screenshots...").color(ThemeColors::TEXT_SECONDARY));
        });
        ui.add_space(8.0);
    }

    if let Some(error) = last_error {
        ui.label(RichText::new(error).size(12.0).color(ThemeColors::ACCENT_ERROR));
        ui.add_space(8.0);
    }

    let Some(problem) = problem else {
        if !is_processing {
            ui.label(
                RichText::new("No problem extracted yet.")
                    .size(12.0)
                    .color(ThemeColors::TEXT_MUTED),
            );
        }
        return None;
    };

    egui::ScrollArea::vertical().show(ui, |ui| {
        render_problem(ui, &problem, style);
    });

    let mut action = None;
    ui.add_space(8.0);
    if ui.small_button("Start over").on_hover_text("Ctrl+R").clicked() {
        action = Some(ViewAction::ClearQueues);
    }
    action
}

/// Draw a problem inside a response-styled frame
pub(crate) fn render_problem(ui: &mut egui::Ui, problem: &ProblemInfo, style: &ResponseStyle) {
    egui::Frame::none()
        .fill(style.background)
        .rounding(Rounding::same(style.corner_radius))
        .inner_margin(style.padding)
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let text = |s: &str| RichText::new(s).color(style.text_color);

            ui.label(text("Problem").strong());
            ui.label(text(&problem.problem_statement));

            section(ui, style, "Input", &[problem.input_format.clone()]);
            section(ui, style, "Output", &[problem.output_format.clone()]);
            section(ui, style, "Constraints", &problem.constraints);
            section(ui, style, "Test cases", &problem.test_cases);
        });
}

fn section(ui: &mut egui::Ui, style: &ResponseStyle, title: &str, entries: &[Map<String, Value>]) {
    if entries.iter().all(|entry| entry.is_empty()) {
        return;
    }

    ui.add_space(6.0);
    ui.label(RichText::new(title).color(style.text_color).strong());
    for entry in entries {
        for line in describe_entry(entry) {
            ui.label(RichText::new(line).color(style.text_color).size(13.0));
        }
    }
}

/// One `key: value` line per field, strings unquoted
fn describe_entry(entry: &Map<String, Value>) -> Vec<String> {
    entry
        .iter()
        .map(|(key, value)| match value {
            Value::String(s) => format!("{}: {}", key, s),
            other => format!("{}: {}", key, other),
        })
        .collect()
}
