//! Keybinding parsing and resolution
//!
//! Built-in actions can be remapped from the config file.

mod resolver;

pub use resolver::{KeyAction, KeybindingResolver};

use crossterm::event::{KeyCode, KeyModifiers};

/// A parsed key binding that can be matched against key events
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Parse a keybinding string into a KeyBinding
    ///
    /// Supported formats:
    /// - Single character: "q", "+", "1"
    /// - Special keys: "Enter", "Esc", "Tab", "BackTab", "F1"-"F12"
    /// - With modifiers: "Ctrl+c", "Alt+x"
    /// - A literal plus after modifiers: "Ctrl++"
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Err("empty keybinding".to_string());
        }

        let (modifier_part, key_part) = split_key(s);
        let mut modifiers = KeyModifiers::NONE;
        if let Some(modifier_part) = modifier_part {
            for part in modifier_part.split('+') {
                match part.to_lowercase().as_str() {
                    "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    _ => return Err(format!("unknown modifier: {}", part)),
                }
            }
        }

        let code = Self::parse_key_code(key_part)?;
        Ok(Self { code, modifiers })
    }

    fn parse_key_code(s: &str) -> Result<KeyCode, String> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(KeyCode::Char(c.to_ascii_lowercase()));
        }

        match s.to_lowercase().as_str() {
            "enter" | "return" => Ok(KeyCode::Enter),
            "esc" | "escape" => Ok(KeyCode::Esc),
            "tab" => Ok(KeyCode::Tab),
            "backtab" => Ok(KeyCode::BackTab),
            "backspace" => Ok(KeyCode::Backspace),
            "home" => Ok(KeyCode::Home),
            "end" => Ok(KeyCode::End),
            "pageup" | "pgup" => Ok(KeyCode::PageUp),
            "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
            "up" => Ok(KeyCode::Up),
            "down" => Ok(KeyCode::Down),
            "left" => Ok(KeyCode::Left),
            "right" => Ok(KeyCode::Right),
            "space" => Ok(KeyCode::Char(' ')),
            "plus" => Ok(KeyCode::Char('+')),
            "minus" => Ok(KeyCode::Char('-')),
            other => other
                .strip_prefix('f')
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| (1..=12).contains(n))
                .map(KeyCode::F)
                .ok_or_else(|| format!("unknown key: {}", s)),
        }
    }

    /// Check if this binding matches the given key event.
    ///
    /// Shift is ignored for characters and BackTab, since terminals
    /// disagree on whether they report it.
    pub fn matches(&self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        let (code, modifiers) = normalize(code, modifiers);
        let (self_code, self_modifiers) = normalize(self.code, self.modifiers);
        self_code == code && self_modifiers == modifiers
    }
}

/// Split "Ctrl+Alt+x" into ("Ctrl+Alt", "x"); a trailing "+" is the key itself
fn split_key(s: &str) -> (Option<&str>, &str) {
    if let Some(prefix) = s.strip_suffix("++") {
        return (Some(prefix), "+");
    }
    match s.rsplit_once('+') {
        Some((modifiers, key)) if !modifiers.is_empty() && !key.is_empty() => {
            (Some(modifiers), key)
        }
        _ => (None, s),
    }
}

fn normalize(code: KeyCode, modifiers: KeyModifiers) -> (KeyCode, KeyModifiers) {
    match code {
        KeyCode::Char(c) => (
            KeyCode::Char(c.to_ascii_lowercase()),
            modifiers & !KeyModifiers::SHIFT,
        ),
        KeyCode::BackTab => (KeyCode::BackTab, modifiers & !KeyModifiers::SHIFT),
        other => (other, modifiers),
    }
}

impl std::fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("Shift".to_string());
        }

        let key_str = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "BackTab".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => "?".to_string(),
        };

        parts.push(key_str);
        write!(f, "{}", parts.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_keys() {
        let binding = KeyBinding::parse("q").unwrap();
        assert_eq!(binding.code, KeyCode::Char('q'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);

        assert_eq!(KeyBinding::parse("Enter").unwrap().code, KeyCode::Enter);
        assert_eq!(KeyBinding::parse("F12").unwrap().code, KeyCode::F(12));
        assert_eq!(KeyBinding::parse("+").unwrap().code, KeyCode::Char('+'));
        assert!(KeyBinding::parse("F13").is_err());
        assert!(KeyBinding::parse("").is_err());
    }

    #[test]
    fn test_parse_with_modifiers() {
        let binding = KeyBinding::parse("Ctrl+c").unwrap();
        assert_eq!(binding.code, KeyCode::Char('c'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL);

        let binding = KeyBinding::parse("Ctrl++").unwrap();
        assert_eq!(binding.code, KeyCode::Char('+'));
        assert_eq!(binding.modifiers, KeyModifiers::CONTROL);

        assert!(KeyBinding::parse("Meta+x").is_err());
    }

    #[test]
    fn test_matches_ignores_shift_on_chars() {
        let binding = KeyBinding::parse("Ctrl+c").unwrap();
        assert!(binding.matches(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(binding.matches(KeyCode::Char('C'), KeyModifiers::CONTROL | KeyModifiers::SHIFT));
        assert!(!binding.matches(KeyCode::Char('c'), KeyModifiers::NONE));

        let plus = KeyBinding::parse("+").unwrap();
        assert!(plus.matches(KeyCode::Char('+'), KeyModifiers::SHIFT));

        let back = KeyBinding::parse("BackTab").unwrap();
        assert!(back.matches(KeyCode::BackTab, KeyModifiers::SHIFT));
    }

    #[test]
    fn test_display() {
        assert_eq!(KeyBinding::parse("ctrl+alt+P").unwrap().to_string(), "Ctrl+Alt+p");
        assert_eq!(KeyBinding::parse("space").unwrap().to_string(), "Space");
    }
}
