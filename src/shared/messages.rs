//! Message types exchanged with the dashboard over channels

use crate::shared::state::ProblemInfo;

/// Lifecycle events reported by the screenshot processing pipeline
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingEvent {
    /// The model rejected the API key, or none is configured
    Unauthorized,
    /// Processing was requested with an empty queue
    NoScreenshots,
    /// Initial solution generation started
    InitialStart,
    /// The problem was extracted from the screenshots
    ProblemExtracted(ProblemInfo),
    /// A solution is ready
    SolutionSuccess,
    /// Initial solution generation failed
    InitialSolutionError(String),
    /// Debugging with the extra screenshots started
    DebugStart,
    /// Debugging finished
    DebugSuccess,
    /// Debugging failed
    DebugError(String),
}

impl ProcessingEvent {
    /// Wire name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingEvent::Unauthorized => "processing-unauthorized",
            ProcessingEvent::NoScreenshots => "processing-no-screenshots",
            ProcessingEvent::InitialStart => "initial-start",
            ProcessingEvent::ProblemExtracted(_) => "problem-extracted",
            ProcessingEvent::SolutionSuccess => "solution-success",
            ProcessingEvent::InitialSolutionError(_) => "solution-error",
            ProcessingEvent::DebugStart => "debug-start",
            ProcessingEvent::DebugSuccess => "debug-success",
            ProcessingEvent::DebugError(_) => "debug-error",
        }
    }
}
