//! Reusable UI components for the dashboard

pub mod nav_bar;
pub mod status_card;
pub mod toast;

pub use nav_bar::{render_nav_bar, NavAction};
pub use status_card::{CardStatus, StatusCard};
pub use toast::render_toasts;
