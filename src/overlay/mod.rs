//! Overlay Window Control
//!
//! Tracks where the always-on-top assistant window sits and whether it is
//! shown. Changes are queued as [`WindowCommand`]s and applied to the real
//! viewport by the dashboard on its next frame.

pub mod widgets;

use tracing::debug;

/// A change to apply to the native window
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowCommand {
    Show,
    Hide,
    MoveTo { x: f32, y: f32 },
    Resize { width: f32, height: f32 },
}

/// Direction for the move-window shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Left,
    Right,
    Up,
    Down,
}

/// State of the single overlay window
#[derive(Debug, Clone)]
pub struct WindowController {
    position: (f32, f32),
    size: (f32, f32),
    screen_size: Option<(f32, f32)>,
    visible: bool,
    step: f32,
    pending: Vec<WindowCommand>,
}

impl WindowController {
    /// Create a controller for a window of the given size
    pub fn new(size: (f32, f32), step: f32, visible: bool) -> Self {
        Self {
            position: (0.0, 0.0),
            size,
            screen_size: None,
            visible,
            step,
            pending: Vec::new(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set visibility before the native window exists; no command is queued
    pub fn set_launch_visibility(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[allow(dead_code)]
    pub fn position(&self) -> (f32, f32) {
        self.position
    }

    #[allow(dead_code)]
    pub fn size(&self) -> (f32, f32) {
        self.size
    }

    /// Record the monitor size so moves can be kept on-screen
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen_size = Some((width, height));
    }

    /// Sync the position reported by the windowing system (no command issued)
    pub fn observe_position(&mut self, x: f32, y: f32) {
        self.position = (x, y);
    }

    pub fn show(&mut self) {
        if !self.visible {
            self.visible = true;
            self.pending.push(WindowCommand::Show);
        }
    }

    pub fn hide(&mut self) {
        if self.visible {
            self.visible = false;
            self.pending.push(WindowCommand::Hide);
        }
    }

    pub fn toggle(&mut self) {
        if self.visible {
            self.hide();
        } else {
            self.show();
        }
        debug!("Window visibility toggled to {}", self.visible);
    }

    pub fn set_dimensions(&mut self, width: f32, height: f32) {
        self.size = (width.max(1.0), height.max(1.0));
        self.pending.push(WindowCommand::Resize {
            width: self.size.0,
            height: self.size.1,
        });
    }

    /// Move one step, keeping at least half of the window on-screen
    pub fn move_by_step(&mut self, direction: MoveDirection) {
        let (mut x, mut y) = self.position;
        match direction {
            MoveDirection::Left => x -= self.step,
            MoveDirection::Right => x += self.step,
            MoveDirection::Up => y -= self.step,
            MoveDirection::Down => y += self.step,
        }

        if let Some((screen_w, screen_h)) = self.screen_size {
            let (w, h) = self.size;
            x = x.clamp(-w / 2.0, (screen_w - w / 2.0).max(-w / 2.0));
            y = y.clamp(-h / 2.0, (screen_h - h / 2.0).max(-h / 2.0));
        }

        if (x, y) != self.position {
            self.position = (x, y);
            self.pending.push(WindowCommand::MoveTo { x, y });
        }
    }

    pub fn move_left(&mut self) {
        self.move_by_step(MoveDirection::Left);
    }

    pub fn move_right(&mut self) {
        self.move_by_step(MoveDirection::Right);
    }

    pub fn move_up(&mut self) {
        self.move_by_step(MoveDirection::Up);
    }

    pub fn move_down(&mut self) {
        self.move_by_step(MoveDirection::Down);
    }

    /// Drain the commands queued since the last call
    pub fn take_commands(&mut self) -> Vec<WindowCommand> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_emits_show_and_hide() {
        let mut window = WindowController::new((400.0, 300.0), 50.0, true);

        window.toggle();
        assert!(!window.is_visible());
        window.toggle();
        assert!(window.is_visible());

        assert_eq!(
            window.take_commands(),
            vec![WindowCommand::Hide, WindowCommand::Show]
        );
        assert!(window.take_commands().is_empty());
    }

    #[test]
    fn test_launch_visibility_queues_nothing() {
        let mut window = WindowController::new((400.0, 300.0), 50.0, true);

        window.set_launch_visibility(false);
        assert!(!window.is_visible());
        assert!(window.take_commands().is_empty());

        window.toggle();
        assert_eq!(window.take_commands(), vec![WindowCommand::Show]);
    }

    #[test]
    fn test_show_when_visible_is_noop() {
        let mut window = WindowController::new((400.0, 300.0), 50.0, true);
        window.show();
        assert!(window.take_commands().is_empty());
    }

    #[test]
    fn test_moves_by_step() {
        let mut window = WindowController::new((400.0, 300.0), 50.0, true);
        window.observe_position(100.0, 100.0);

        window.move_right();
        window.move_down();
        assert_eq!(window.position(), (150.0, 150.0));

        window.move_left();
        window.move_up();
        assert_eq!(window.position(), (100.0, 100.0));
        assert_eq!(window.take_commands().len(), 4);
    }

    #[test]
    fn test_move_keeps_half_the_window_on_screen() {
        let mut window = WindowController::new((400.0, 300.0), 500.0, true);
        window.set_screen_size(1920.0, 1080.0);

        window.move_left();
        assert_eq!(window.position(), (-200.0, 0.0));

        // Already at the edge: nothing to do
        window.take_commands();
        window.move_left();
        assert!(window.take_commands().is_empty());

        for _ in 0..10 {
            window.move_right();
            window.move_down();
        }
        assert_eq!(window.position(), (1720.0, 930.0));
    }

    #[test]
    fn test_set_dimensions() {
        let mut window = WindowController::new((400.0, 300.0), 50.0, true);
        window.set_dimensions(640.0, 0.0);

        assert_eq!(window.size(), (640.0, 1.0));
        assert_eq!(
            window.take_commands(),
            vec![WindowCommand::Resize { width: 640.0, height: 1.0 }]
        );
    }
}
