//! Dashboard UI Module
//!
//! The assistant window: a small translucent panel with a queue of
//! screenshots, the extracted problem, a debug view and the settings form.

pub mod app;
pub mod components;
pub mod dispatch;
pub mod settings_form;
pub mod state;
pub mod theme;
pub mod views;

pub use app::run_dashboard;
