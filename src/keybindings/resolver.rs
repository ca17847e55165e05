//! Keybinding resolution from key events to actions

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};

use super::KeyBinding;
use crate::config::KeybindingsConfig;

/// Actions that can be triggered by keybindings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Application actions
    Quit,
    Cancel,
    Settings,
    Profile,
    OpenDeviceSettings,

    // Tab navigation
    NextTab,
    PrevTab,
    GoToTab(usize),

    // In-screen navigation
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Execute,
    ZoomIn,
    ZoomOut,

    // No action bound to this key
    None,
}

/// Resolves key events to actions based on configuration
pub struct KeybindingResolver {
    bindings: HashMap<KeyBinding, KeyAction>,
    binding_display: HashMap<KeyAction, String>,
}

impl KeybindingResolver {
    /// Create a resolver with default keybindings
    pub fn new() -> Self {
        let mut resolver = Self {
            bindings: HashMap::new(),
            binding_display: HashMap::new(),
        };

        resolver.register_default("q", KeyAction::Quit);
        resolver.register_default("Ctrl+c", KeyAction::Cancel);
        resolver.register_default("s", KeyAction::Settings);
        resolver.register_default("p", KeyAction::Profile);
        resolver.register_default("o", KeyAction::OpenDeviceSettings);

        resolver.register_default("Tab", KeyAction::NextTab);
        resolver.register_default("BackTab", KeyAction::PrevTab);
        for (i, key) in ["1", "2", "3", "4", "5"].into_iter().enumerate() {
            resolver.register_default(key, KeyAction::GoToTab(i));
        }

        resolver.register_default("k", KeyAction::MoveUp);
        resolver.register_default("Up", KeyAction::MoveUp);
        resolver.register_default("j", KeyAction::MoveDown);
        resolver.register_default("Down", KeyAction::MoveDown);
        resolver.register_default("h", KeyAction::MoveLeft);
        resolver.register_default("Left", KeyAction::MoveLeft);
        resolver.register_default("l", KeyAction::MoveRight);
        resolver.register_default("Right", KeyAction::MoveRight);
        resolver.register_default("Enter", KeyAction::Execute);
        resolver.register_default("+", KeyAction::ZoomIn);
        resolver.register_default("=", KeyAction::ZoomIn);
        resolver.register_default("-", KeyAction::ZoomOut);

        resolver
    }

    fn register_default(&mut self, key_str: &str, action: KeyAction) {
        if let Ok(binding) = KeyBinding::parse(key_str) {
            self.bindings.insert(binding, action.clone());
            self.binding_display
                .entry(action)
                .or_insert_with(|| key_str.to_string());
        }
    }

    /// Create a resolver from configuration, falling back to defaults
    pub fn from_config(config: Option<&KeybindingsConfig>) -> Self {
        let mut resolver = Self::new();

        if let Some(keybindings) = config {
            resolver.remap_action(&keybindings.quit, KeyAction::Quit);
            resolver.remap_action(&keybindings.next_tab, KeyAction::NextTab);
            resolver.remap_action(&keybindings.prev_tab, KeyAction::PrevTab);
            resolver.remap_action(&keybindings.move_up, KeyAction::MoveUp);
            resolver.remap_action(&keybindings.move_down, KeyAction::MoveDown);
            resolver.remap_action(&keybindings.move_left, KeyAction::MoveLeft);
            resolver.remap_action(&keybindings.move_right, KeyAction::MoveRight);
            resolver.remap_action(&keybindings.execute, KeyAction::Execute);
            resolver.remap_action(&keybindings.zoom_in, KeyAction::ZoomIn);
            resolver.remap_action(&keybindings.zoom_out, KeyAction::ZoomOut);
            resolver.remap_action(&keybindings.settings, KeyAction::Settings);
            resolver.remap_action(&keybindings.profile, KeyAction::Profile);
            resolver.remap_action(
                &keybindings.open_device_settings,
                KeyAction::OpenDeviceSettings,
            );
        }

        resolver
    }

    fn remap_action(&mut self, key_opt: &Option<String>, action: KeyAction) {
        let Some(key_str) = key_opt else {
            return;
        };
        match KeyBinding::parse(key_str) {
            Ok(binding) => {
                self.bindings.retain(|_, v| v != &action);
                self.bindings.insert(binding, action.clone());
                self.binding_display.insert(action, key_str.clone());
            }
            Err(e) => {
                tracing::warn!(key = %key_str, action = ?action, error = %e, "Ignoring keybinding");
            }
        }
    }

    /// Resolve a key event to an action
    pub fn resolve(&self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(code, modifiers))
            .map(|(_, action)| action.clone())
            .unwrap_or(KeyAction::None)
    }

    /// Get the display string for an action's keybinding
    pub fn get_binding_display(&self, action: &KeyAction) -> Option<&str> {
        self.binding_display.get(action).map(|s| s.as_str())
    }
}

impl Default for KeybindingResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let resolver = KeybindingResolver::new();

        assert_eq!(
            resolver.resolve(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyAction::Quit
        );
        assert_eq!(
            resolver.resolve(KeyCode::Tab, KeyModifiers::NONE),
            KeyAction::NextTab
        );
        assert_eq!(
            resolver.resolve(KeyCode::BackTab, KeyModifiers::SHIFT),
            KeyAction::PrevTab
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('4'), KeyModifiers::NONE),
            KeyAction::GoToTab(3)
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('+'), KeyModifiers::SHIFT),
            KeyAction::ZoomIn
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('x'), KeyModifiers::NONE),
            KeyAction::None
        );
    }

    #[test]
    fn test_config_remap() {
        let config = KeybindingsConfig {
            quit: Some("Ctrl+q".to_string()),
            settings: Some("F2".to_string()),
            ..Default::default()
        };

        let resolver = KeybindingResolver::from_config(Some(&config));

        assert_eq!(
            resolver.resolve(KeyCode::Char('q'), KeyModifiers::NONE),
            KeyAction::None
        );
        assert_eq!(
            resolver.resolve(KeyCode::Char('q'), KeyModifiers::CONTROL),
            KeyAction::Quit
        );
        assert_eq!(
            resolver.resolve(KeyCode::F(2), KeyModifiers::NONE),
            KeyAction::Settings
        );
        assert_eq!(resolver.get_binding_display(&KeyAction::Settings), Some("F2"));
    }

    #[test]
    fn test_invalid_remap_keeps_default() {
        let config = KeybindingsConfig {
            execute: Some("Hyper+x".to_string()),
            ..Default::default()
        };

        let resolver = KeybindingResolver::from_config(Some(&config));

        assert_eq!(
            resolver.resolve(KeyCode::Enter, KeyModifiers::NONE),
            KeyAction::Execute
        );
    }
}
