//! Compact status card for the queue view

use egui::{Color32, RichText, Rounding, Vec2};

use crate::dashboard::theme::ThemeColors;

/// A card displaying one piece of status information
pub struct StatusCard {
    pub title: String,
    pub value: String,
    pub status: CardStatus,
}

/// Status types for cards
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CardStatus {
    Active,
    Inactive,
    Warning,
    Error,
}

impl CardStatus {
    pub fn color(&self) -> Color32 {
        match self {
            CardStatus::Active => ThemeColors::ACCENT_SUCCESS,
            CardStatus::Inactive => ThemeColors::TEXT_SECONDARY,
            CardStatus::Warning => ThemeColors::ACCENT_WARNING,
            CardStatus::Error => ThemeColors::ACCENT_ERROR,
        }
    }

    /// Status for a queue holding `len` of `capacity` screenshots
    pub fn for_queue(len: usize, capacity: usize) -> Self {
        match len {
            0 => CardStatus::Inactive,
            n if n >= capacity => CardStatus::Warning,
            _ => CardStatus::Active,
        }
    }
}

impl StatusCard {
    pub fn new(title: impl Into<String>, value: impl Into<String>, status: CardStatus) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
            status,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        egui::Frame::none()
            .fill(ThemeColors::BG_MEDIUM)
            .rounding(Rounding::same(8.0))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_min_width(120.0);

                ui.horizontal(|ui| {
                    let dot_center = ui.cursor().left_top() + Vec2::new(4.0, 8.0);
                    ui.painter().circle_filled(dot_center, 4.0, self.status.color());
                    ui.add_space(12.0);

                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new(&self.title)
                                .size(11.0)
                                .color(ThemeColors::TEXT_MUTED),
                        );
                        ui.label(
                            RichText::new(&self.value)
                                .size(14.0)
                                .color(ThemeColors::TEXT_PRIMARY)
                                .strong(),
                        );
                    });
                });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_status() {
        assert_eq!(CardStatus::for_queue(0, 5), CardStatus::Inactive);
        assert_eq!(CardStatus::for_queue(3, 5), CardStatus::Active);
        assert_eq!(CardStatus::for_queue(5, 5), CardStatus::Warning);
    }
}
