use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// All bindable actions in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    // Cursor movement
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    MoveHome,
    MoveEnd,

    // Editing
    Backspace,
    DeleteForward,
    InsertNewline,

    // The clipboard-to-link action
    InsertReview,

    // File and UI
    Save,
    Quit,
    ToggleHelp,
    Dismiss,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveHome => "move_home",
            Action::MoveEnd => "move_end",
            Action::Backspace => "backspace",
            Action::DeleteForward => "delete_forward",
            Action::InsertNewline => "insert_newline",
            Action::InsertReview => "insert_review",
            Action::Save => "save",
            Action::Quit => "quit",
            Action::ToggleHelp => "toggle_help",
            Action::Dismiss => "dismiss",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "move_left" => Ok(Action::MoveLeft),
            "move_right" => Ok(Action::MoveRight),
            "move_up" => Ok(Action::MoveUp),
            "move_down" => Ok(Action::MoveDown),
            "move_home" => Ok(Action::MoveHome),
            "move_end" => Ok(Action::MoveEnd),
            "backspace" => Ok(Action::Backspace),
            "delete_forward" => Ok(Action::DeleteForward),
            "insert_newline" => Ok(Action::InsertNewline),
            "insert_review" => Ok(Action::InsertReview),
            "save" => Ok(Action::Save),
            "quit" => Ok(Action::Quit),
            "toggle_help" => Ok(Action::ToggleHelp),
            "dismiss" => Ok(Action::Dismiss),
            _ => Err(format!("Unknown action: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        let modifiers = if event.code == KeyCode::BackTab {
            event.modifiers - KeyModifiers::SHIFT
        } else {
            event.modifiers
        };
        Self {
            code: event.code,
            modifiers,
        }
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            parts.push("C");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            parts.push("A");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            parts.push("S");
        }

        let key_str = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "S-Tab".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "BS".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Delete => "Del".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };

        parts.push(&key_str);

        if parts.len() > 1 || key_str.len() > 1 {
            write!(f, "<{}>", parts.join("-"))
        } else {
            write!(f, "{}", key_str)
        }
    }
}

impl FromStr for KeyBinding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.starts_with('<') && s.ends_with('>') {
            let inner = &s[1..s.len() - 1];
            return parse_bracket_notation(inner);
        }

        if s.len() == 1 {
            let c = s.chars().next().unwrap();
            return Ok(KeyBinding::new(KeyCode::Char(c), KeyModifiers::NONE));
        }

        Err(format!("Invalid key binding: {}", s))
    }
}

fn parse_bracket_notation(s: &str) -> Result<KeyBinding, String> {
    let parts: Vec<&str> = s.split('-').collect();

    let mut modifiers = KeyModifiers::NONE;
    let mut key_part = "";

    for (i, part) in parts.iter().enumerate() {
        let part_upper = part.to_uppercase();
        if i == parts.len() - 1 {
            key_part = part;
        } else {
            match part_upper.as_str() {
                "C" | "CTRL" | "CONTROL" => modifiers |= KeyModifiers::CONTROL,
                "A" | "ALT" | "M" | "META" => modifiers |= KeyModifiers::ALT,
                "S" | "SHIFT" => modifiers |= KeyModifiers::SHIFT,
                _ => return Err(format!("Unknown modifier: {}", part)),
            }
        }
    }

    let code = parse_key_code(key_part)?;

    Ok(KeyBinding::new(code, modifiers))
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let s_lower = s.to_lowercase();

    match s_lower.as_str() {
        "space" => Ok(KeyCode::Char(' ')),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "enter" | "return" | "cr" => Ok(KeyCode::Enter),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "bs" | "backspace" => Ok(KeyCode::Backspace),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "del" | "delete" => Ok(KeyCode::Delete),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        s if s.starts_with('f') && s.len() > 1 => {
            let n: u8 = s[1..].parse().map_err(|_| format!("Invalid F key: {}", s))?;
            Ok(KeyCode::F(n))
        }
        s if s.len() == 1 => {
            let c = s.chars().next().unwrap();
            Ok(KeyCode::Char(c))
        }
        _ => Err(format!("Unknown key: {}", s)),
    }
}

/// Resolved binding table, built once from the config.
#[derive(Debug, Clone)]
pub struct KeybindingCache {
    bindings: HashMap<KeyBinding, Action>,
}

impl KeybindingCache {
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        let mut bindings = HashMap::new();

        for (key_str, action_str) in &config.bindings {
            if let (Ok(binding), Ok(action)) =
                (key_str.parse::<KeyBinding>(), action_str.parse::<Action>())
            {
                bindings.insert(binding, action);
            }
        }

        Self { bindings }
    }

    pub fn get(&self, event: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(event);
        self.bindings.get(&binding).copied()
    }

    /// First key bound to `action`, for display in hints and help.
    pub fn key_for(&self, action: Action) -> Option<KeyBinding> {
        self.bindings
            .iter()
            .find(|(_, a)| **a == action)
            .map(|(k, _)| *k)
    }
}

impl Default for KeybindingCache {
    fn default() -> Self {
        Self::from_config(&KeybindingsConfig::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeybindingsConfig {
    #[serde(flatten)]
    pub bindings: HashMap<String, String>,
}

impl KeybindingsConfig {
    /// User bindings override defaults; unmentioned defaults stay bound.
    pub fn merge_with_defaults(self) -> Self {
        let mut bindings = default_bindings();
        bindings.extend(self.bindings);
        Self { bindings }
    }
}

impl Default for KeybindingsConfig {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

fn default_bindings() -> HashMap<String, String> {
    let mut m = HashMap::new();

    m.insert("<Left>".to_string(), "move_left".to_string());
    m.insert("<Right>".to_string(), "move_right".to_string());
    m.insert("<Up>".to_string(), "move_up".to_string());
    m.insert("<Down>".to_string(), "move_down".to_string());
    m.insert("<Home>".to_string(), "move_home".to_string());
    m.insert("<End>".to_string(), "move_end".to_string());
    m.insert("<BS>".to_string(), "backspace".to_string());
    m.insert("<Del>".to_string(), "delete_forward".to_string());
    m.insert("<Enter>".to_string(), "insert_newline".to_string());
    m.insert("<C-r>".to_string(), "insert_review".to_string());
    m.insert("<C-s>".to_string(), "save".to_string());
    m.insert("<C-q>".to_string(), "quit".to_string());
    m.insert("<F1>".to_string(), "toggle_help".to_string());
    m.insert("<Esc>".to_string(), "dismiss".to_string());

    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_key() {
        let binding: KeyBinding = "r".parse().unwrap();
        assert_eq!(binding.code, KeyCode::Char('r'));
        assert_eq!(binding.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_special_key() {
        let binding: KeyBinding = "<Enter>".parse().unwrap();
        assert_eq!(binding.code, KeyCode::Enter);
        assert_eq!(binding.modifiers, KeyModifiers::NONE);
    }

    #[test]
    fn test_parse_modifier_key() {
        let binding: KeyBinding = "<C-r>".parse().unwrap();
        assert_eq!(binding.code, KeyCode::Char('r'));
        assert!(binding.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn test_parse_multi_modifier() {
        let binding: KeyBinding = "<S-A-Up>".parse().unwrap();
        assert_eq!(binding.code, KeyCode::Up);
        assert!(binding.modifiers.contains(KeyModifiers::SHIFT));
        assert!(binding.modifiers.contains(KeyModifiers::ALT));
    }

    #[test]
    fn test_default_cache_lookup() {
        let cache = KeybindingCache::default();

        let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert_eq!(cache.get(&event), Some(Action::InsertReview));

        let event = KeyEvent::new(KeyCode::Char('r'), KeyModifiers::NONE);
        assert_eq!(cache.get(&event), None);
    }

    #[test]
    fn test_merge_with_defaults_overrides() {
        let mut user = HashMap::new();
        user.insert("<C-l>".to_string(), "insert_review".to_string());
        let config = KeybindingsConfig { bindings: user }.merge_with_defaults();

        let cache = KeybindingCache::from_config(&config);
        let event = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(cache.get(&event), Some(Action::InsertReview));
        // Defaults that were not overridden survive
        let event = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(cache.get(&event), Some(Action::Save));
    }

    #[test]
    fn test_key_for_action() {
        let cache = KeybindingCache::default();
        let key = cache.key_for(Action::InsertReview).unwrap();
        assert_eq!(key.code, KeyCode::Char('r'));
        assert!(key.modifiers.contains(KeyModifiers::CONTROL));
    }

    #[test]
    fn test_action_roundtrip() {
        let action = Action::InsertReview;
        let s = action.to_string();
        let parsed: Action = s.parse().unwrap();
        assert_eq!(action, parsed);
    }
}
