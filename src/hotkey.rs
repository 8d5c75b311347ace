//! Global shortcuts: screenshot, reset, show/hide and window movement

use anyhow::{anyhow, Result};
use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers},
    GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState,
};
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::ShortcutSettings;
use crate::overlay::MoveDirection;

/// Parses a hotkey string like "F9", "Ctrl+Shift+O", "Alt+F1" into a HotKey
pub fn parse_hotkey(hotkey_str: &str) -> Result<HotKey> {
    let parts: Vec<&str> = hotkey_str.split('+').map(|s| s.trim()).collect();

    let mut modifiers = Modifiers::empty();
    let mut key_code: Option<Code> = None;

    for part in parts {
        let upper = part.to_uppercase();
        match upper.as_str() {
            "CTRL" | "CONTROL" => modifiers |= Modifiers::CONTROL,
            "SHIFT" => modifiers |= Modifiers::SHIFT,
            "ALT" => modifiers |= Modifiers::ALT,
            "WIN" | "SUPER" | "META" | "CMD" | "COMMAND" => modifiers |= Modifiers::SUPER,
            "CMDORCTRL" | "COMMANDORCONTROL" => {
                modifiers |= if cfg!(target_os = "macos") {
                    Modifiers::SUPER
                } else {
                    Modifiers::CONTROL
                }
            }
            _ => {
                // This should be the key code
                key_code = Some(parse_key_code(&upper)?);
            }
        }
    }

    let code = key_code.ok_or_else(|| anyhow!("No key code found in hotkey string"))?;
    Ok(HotKey::new(Some(modifiers), code))
}

/// Parse a key code string into a Code enum
fn parse_key_code(key: &str) -> Result<Code> {
    let code = match key {
        // Function keys
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,

        // Letters
        "A" => Code::KeyA,
        "B" => Code::KeyB,
        "C" => Code::KeyC,
        "D" => Code::KeyD,
        "E" => Code::KeyE,
        "F" => Code::KeyF,
        "G" => Code::KeyG,
        "H" => Code::KeyH,
        "I" => Code::KeyI,
        "J" => Code::KeyJ,
        "K" => Code::KeyK,
        "L" => Code::KeyL,
        "M" => Code::KeyM,
        "N" => Code::KeyN,
        "O" => Code::KeyO,
        "P" => Code::KeyP,
        "Q" => Code::KeyQ,
        "R" => Code::KeyR,
        "S" => Code::KeyS,
        "T" => Code::KeyT,
        "U" => Code::KeyU,
        "V" => Code::KeyV,
        "W" => Code::KeyW,
        "X" => Code::KeyX,
        "Y" => Code::KeyY,
        "Z" => Code::KeyZ,

        // Numbers
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,

        // Special keys
        "SPACE" => Code::Space,
        "ENTER" | "RETURN" => Code::Enter,
        "TAB" => Code::Tab,
        "ESCAPE" | "ESC" => Code::Escape,
        "BACKSPACE" => Code::Backspace,
        "DELETE" | "DEL" => Code::Delete,
        "INSERT" | "INS" => Code::Insert,
        "HOME" => Code::Home,
        "END" => Code::End,
        "PAGEUP" | "PGUP" => Code::PageUp,
        "PAGEDOWN" | "PGDN" => Code::PageDown,
        "UP" => Code::ArrowUp,
        "DOWN" => Code::ArrowDown,
        "LEFT" => Code::ArrowLeft,
        "RIGHT" => Code::ArrowRight,

        // Numpad
        "NUMPAD0" | "NUM0" => Code::Numpad0,
        "NUMPAD1" | "NUM1" => Code::Numpad1,
        "NUMPAD2" | "NUM2" => Code::Numpad2,
        "NUMPAD3" | "NUM3" => Code::Numpad3,
        "NUMPAD4" | "NUM4" => Code::Numpad4,
        "NUMPAD5" | "NUM5" => Code::Numpad5,
        "NUMPAD6" | "NUM6" => Code::Numpad6,
        "NUMPAD7" | "NUM7" => Code::Numpad7,
        "NUMPAD8" | "NUM8" => Code::Numpad8,
        "NUMPAD9" | "NUM9" => Code::Numpad9,

        _ => return Err(anyhow!("Unknown key code: {}", key)),
    };

    Ok(code)
}

/// What a global shortcut does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutAction {
    TakeScreenshot,
    ResetQueues,
    ToggleWindow,
    MoveWindow(MoveDirection),
}

/// Pair each action with its configured accelerator string
pub fn shortcut_bindings(settings: &ShortcutSettings) -> Vec<(ShortcutAction, String)> {
    vec![
        (ShortcutAction::TakeScreenshot, settings.take_screenshot.clone()),
        (ShortcutAction::ResetQueues, settings.reset_queues.clone()),
        (ShortcutAction::ToggleWindow, settings.toggle_window.clone()),
        (ShortcutAction::MoveWindow(MoveDirection::Left), settings.move_left.clone()),
        (ShortcutAction::MoveWindow(MoveDirection::Right), settings.move_right.clone()),
        (ShortcutAction::MoveWindow(MoveDirection::Up), settings.move_up.clone()),
        (ShortcutAction::MoveWindow(MoveDirection::Down), settings.move_down.clone()),
    ]
}

/// Manages global hotkeys for the application
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    registered: HashMap<u32, (ShortcutAction, HotKey)>,
}

impl HotkeyManager {
    /// Create a new hotkey manager. Must be called on the main thread.
    pub fn new() -> Result<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| anyhow!("Failed to create hotkey manager: {:?}", e))?;

        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }

    /// Register every configured shortcut, replacing earlier registrations.
    /// Bindings that fail to parse or register are skipped.
    pub fn register_shortcuts(&mut self, settings: &ShortcutSettings) -> usize {
        self.unregister_all();

        for (action, hotkey_str) in shortcut_bindings(settings) {
            if hotkey_str.trim().is_empty() {
                continue;
            }
            let hotkey = match parse_hotkey(&hotkey_str) {
                Ok(hotkey) => hotkey,
                Err(e) => {
                    warn!("Failed to parse hotkey '{}': {}", hotkey_str, e);
                    continue;
                }
            };
            if let Err(e) = self.manager.register(hotkey) {
                warn!("Failed to register hotkey '{}': {:?}", hotkey_str, e);
                continue;
            }

            info!("Registered {:?} hotkey: {}", action, hotkey_str);
            self.registered.insert(hotkey.id(), (action, hotkey));
        }

        self.registered.len()
    }

    /// Unregister every shortcut
    pub fn unregister_all(&mut self) {
        for (_, (_, hotkey)) in self.registered.drain() {
            let _ = self.manager.unregister(hotkey);
        }
    }

    /// Action for each registered hotkey id
    pub fn action_map(&self) -> HashMap<u32, ShortcutAction> {
        self.registered
            .iter()
            .map(|(id, (action, _))| (*id, *action))
            .collect()
    }

    /// Route hotkey presses to `on_action` as they arrive, independently of
    /// the window's frame loop. Replaces any earlier handler.
    pub fn install_handler<F>(&self, on_action: F)
    where
        F: Fn(ShortcutAction) + Send + Sync + 'static,
    {
        let actions = self.action_map();
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if let Some(action) = resolve_event(&actions, &event) {
                debug!("Hotkey pressed: {:?}", action);
                on_action(action);
            }
        }));
    }
}

/// The action for a hotkey event; releases and unknown ids map to nothing
pub fn resolve_event(
    actions: &HashMap<u32, ShortcutAction>,
    event: &GlobalHotKeyEvent,
) -> Option<ShortcutAction> {
    if event.state != HotKeyState::Pressed {
        return None;
    }
    actions.get(&event.id).copied()
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        GlobalHotKeyEvent::set_event_handler(None::<fn(GlobalHotKeyEvent)>);
        self.unregister_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let hotkey = parse_hotkey("F9").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_with_modifiers() {
        let hotkey = parse_hotkey("Ctrl+Shift+O").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_alt_key() {
        let hotkey = parse_hotkey("Alt+F1").unwrap();
        assert!(hotkey.id() > 0);
    }

    #[test]
    fn test_parse_invalid_key() {
        let result = parse_hotkey("InvalidKey");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_empty() {
        let result = parse_hotkey("");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_arrow_keys() {
        let left = parse_hotkey("Ctrl+Left").unwrap();
        let right = parse_hotkey("ctrl + right").unwrap();
        assert_ne!(left.id(), right.id());
        assert_eq!(left, HotKey::new(Some(Modifiers::CONTROL), Code::ArrowLeft));
    }

    #[test]
    fn test_default_bindings_all_parse() {
        let bindings = shortcut_bindings(&ShortcutSettings::default());
        assert_eq!(bindings.len(), 7);

        let mut ids = std::collections::HashSet::new();
        for (action, hotkey_str) in bindings {
            let hotkey = parse_hotkey(&hotkey_str)
                .unwrap_or_else(|e| panic!("{:?} binding '{}': {}", action, hotkey_str, e));
            assert!(ids.insert(hotkey.id()), "duplicate binding for {:?}", action);
        }
    }

    #[test]
    fn test_resolve_event_only_on_press() {
        let hotkey = parse_hotkey("CmdOrCtrl+B").unwrap();
        let actions = HashMap::from([(hotkey.id(), ShortcutAction::ToggleWindow)]);

        let pressed = GlobalHotKeyEvent {
            id: hotkey.id(),
            state: HotKeyState::Pressed,
        };
        assert_eq!(resolve_event(&actions, &pressed), Some(ShortcutAction::ToggleWindow));

        let released = GlobalHotKeyEvent {
            id: hotkey.id(),
            state: HotKeyState::Released,
        };
        assert_eq!(resolve_event(&actions, &released), None);

        let unknown = GlobalHotKeyEvent {
            id: hotkey.id().wrapping_add(1),
            state: HotKeyState::Pressed,
        };
        assert_eq!(resolve_event(&actions, &unknown), None);
    }
}
