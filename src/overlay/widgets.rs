//! Styling for the AI response panel

use egui::Color32;

use crate::storage::preferences::{parse_hex_color, UserPreferences};

/// Resolved colors for rendering a response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponseStyle {
    /// Background including opacity
    pub background: Color32,
    /// Text color
    pub text_color: Color32,
    /// Border radius
    pub corner_radius: f32,
    /// Padding
    pub padding: f32,
}

impl Default for ResponseStyle {
    fn default() -> Self {
        Self::from_preferences(&UserPreferences::default())
    }
}

impl ResponseStyle {
    /// Build the style from the user's preferences
    pub fn from_preferences(preferences: &UserPreferences) -> Self {
        let background = parse_hex_color(&preferences.response_background_color)
            .unwrap_or(Color32::BLACK);
        let text_color = parse_hex_color(&preferences.response_font_color)
            .unwrap_or(Color32::from_rgb(229, 231, 235));

        let alpha = (f32::from(preferences.response_background_opacity.min(100)) / 100.0 * 255.0)
            .round() as u8;

        Self {
            background: Color32::from_rgba_unmultiplied(
                background.r(),
                background.g(),
                background.b(),
                alpha,
            ),
            text_color,
            corner_radius: 8.0,
            padding: 12.0,
        }
    }
}
