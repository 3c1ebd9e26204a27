use serde::Deserialize;

use iocraft::prelude::{KeyCode, KeyEventKind, KeyModifiers};

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// A single key binding: maps a key chord to a built-in action.
#[derive(Debug, Clone, Deserialize)]
pub struct Keybinding {
    pub key: String,
    pub builtin: String,
    pub name: Option<String>,
}

/// All keybinding overrides from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub universal: Vec<Keybinding>,
    pub sidebar: Vec<Keybinding>,
}

/// Action identifier used for dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinAction {
    // Universal
    MoveDown,
    MoveUp,
    NextSection,
    PrevSection,
    Refresh,
    Quit,
    // Sidebar
    AddReviewer,
    AddLabel,
    Remove,
}

impl BuiltinAction {
    /// Parse a builtin action name from the config string.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "move_down" => Self::MoveDown,
            "move_up" => Self::MoveUp,
            "next_section" => Self::NextSection,
            "prev_section" => Self::PrevSection,
            "refresh" => Self::Refresh,
            "quit" => Self::Quit,
            "add_reviewer" => Self::AddReviewer,
            "add_label" => Self::AddLabel,
            "remove" => Self::Remove,
            _ => return None,
        })
    }

    /// Human-readable description, shown in the footer.
    pub fn description(self) -> &'static str {
        match self {
            Self::MoveDown => "Move cursor down",
            Self::MoveUp => "Move cursor up",
            Self::NextSection => "Next section",
            Self::PrevSection => "Previous section",
            Self::Refresh => "Refresh",
            Self::Quit => "Quit",
            Self::AddReviewer => "Add reviewer",
            Self::AddLabel => "Add label",
            Self::Remove => "Remove",
        }
    }
}

// ---------------------------------------------------------------------------
// Key string conversion
// ---------------------------------------------------------------------------

/// Convert a crossterm `KeyEvent` to our canonical key string format.
///
/// Examples: `"j"`, `"L"`, `"ctrl+c"`, `"alt+d"`, `"enter"`, `"delete"`,
/// `"shift+tab"`, `"up"`.
pub fn key_event_to_string(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<String> {
    if kind == KeyEventKind::Release {
        return None;
    }

    let base = match code {
        KeyCode::Char(c) => {
            // For ctrl+<char>, use lowercase in the key string.
            if modifiers.contains(KeyModifiers::CONTROL) {
                Some(c.to_ascii_lowercase().to_string())
            } else {
                Some(c.to_string())
            }
        }
        KeyCode::Enter => Some("enter".to_owned()),
        KeyCode::Esc => Some("esc".to_owned()),
        KeyCode::Backspace => Some("backspace".to_owned()),
        KeyCode::Tab => Some("tab".to_owned()),
        KeyCode::BackTab => return Some("shift+tab".to_owned()),
        KeyCode::Delete => Some("delete".to_owned()),
        KeyCode::Up => Some("up".to_owned()),
        KeyCode::Down => Some("down".to_owned()),
        KeyCode::Left => Some("left".to_owned()),
        KeyCode::Right => Some("right".to_owned()),
        KeyCode::F(n) => Some(format!("f{n}")),
        _ => None,
    }?;

    // No shift prefix for regular chars: the char itself encodes the case.
    let mut prefix = String::new();
    if modifiers.contains(KeyModifiers::CONTROL) {
        prefix.push_str("ctrl+");
    }
    if modifiers.contains(KeyModifiers::ALT) {
        prefix.push_str("alt+");
    }

    Some(format!("{prefix}{base}"))
}

// ---------------------------------------------------------------------------
// Default keybindings
// ---------------------------------------------------------------------------

fn kb(key: &str, builtin: &str, name: &str) -> Keybinding {
    Keybinding {
        key: key.to_owned(),
        builtin: builtin.to_owned(),
        name: Some(name.to_owned()),
    }
}

/// Default universal keybindings.
pub fn default_universal() -> Vec<Keybinding> {
    vec![
        kb("j", "move_down", "Move cursor down"),
        kb("down", "move_down", "Move cursor down"),
        kb("k", "move_up", "Move cursor up"),
        kb("up", "move_up", "Move cursor up"),
        kb("tab", "next_section", "Next section"),
        kb("l", "next_section", "Next section"),
        kb("shift+tab", "prev_section", "Previous section"),
        kb("h", "prev_section", "Previous section"),
        kb("r", "refresh", "Refresh"),
        kb("q", "quit", "Quit"),
        kb("ctrl+c", "quit", "Quit"),
    ]
}

/// Default sidebar keybindings.
pub fn default_sidebar() -> Vec<Keybinding> {
    vec![
        kb("a", "add_reviewer", "Add reviewer"),
        kb("L", "add_label", "Add label"),
        kb("x", "remove", "Remove"),
        kb("delete", "remove", "Remove"),
    ]
}

// ---------------------------------------------------------------------------
// Merged keybinding set
// ---------------------------------------------------------------------------

/// A fully resolved keybinding map: defaults merged with user overrides.
#[derive(Debug, Clone)]
pub struct MergedBindings {
    pub universal: Vec<Keybinding>,
    pub sidebar: Vec<Keybinding>,
}

impl MergedBindings {
    /// Merge user config overrides on top of defaults.
    ///
    /// User bindings for a given key replace the default binding for that
    /// key; user bindings for new keys are appended.
    pub fn from_config(config: &KeybindingsConfig) -> Self {
        Self {
            universal: merge_lists(&default_universal(), &config.universal),
            sidebar: merge_lists(&default_sidebar(), &config.sidebar),
        }
    }

    /// Look up a key string, sidebar bindings first, then universal.
    pub fn resolve(&self, key: &str) -> Option<BuiltinAction> {
        find_binding(&self.sidebar, key).or_else(|| find_binding(&self.universal, key))
    }

    /// First key bound to `action`, for footer hints.
    pub fn key_for(&self, action: BuiltinAction) -> Option<&str> {
        self.sidebar
            .iter()
            .chain(&self.universal)
            .find(|b| BuiltinAction::from_name(&b.builtin) == Some(action))
            .map(|b| b.key.as_str())
    }
}

fn merge_lists(defaults: &[Keybinding], overrides: &[Keybinding]) -> Vec<Keybinding> {
    let override_keys: std::collections::HashSet<&str> =
        overrides.iter().map(|b| b.key.as_str()).collect();

    let mut result: Vec<Keybinding> = defaults
        .iter()
        .filter(|b| !override_keys.contains(b.key.as_str()))
        .cloned()
        .collect();

    result.extend(overrides.iter().cloned());
    result
}

fn find_binding(bindings: &[Keybinding], key: &str) -> Option<BuiltinAction> {
    bindings
        .iter()
        .filter(|b| b.key == key)
        .find_map(|b| BuiltinAction::from_name(&b.builtin))
}
