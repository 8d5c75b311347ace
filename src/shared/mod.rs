//! Shared state and messaging
//!
//! The application state is built once by the entry point and handed to the
//! dashboard, the shortcut handler and background tasks as
//! `Arc<RwLock<SharedAppState>>`.

pub mod state;
pub mod messages;

pub use state::{ProblemInfo, SharedAppState, ViewMode};
pub use messages::ProcessingEvent;
