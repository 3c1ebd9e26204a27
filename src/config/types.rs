use serde::Deserialize;

use crate::color::Color;
use crate::config::keybindings::KeybindingsConfig;

// ---------------------------------------------------------------------------
// Custom Color deserialization
// ---------------------------------------------------------------------------

/// Deserialize an `Option<Color>` from a TOML string value.
pub(crate) mod color_de {
    use serde::{self, Deserialize, Deserializer};

    use crate::color::Color;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Color>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            None => Ok(None),
            Some(s) => Color::parse(&s, "<theme>")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub defaults: Defaults,
    pub strings: Strings,
    pub theme: Theme,
    pub keybindings: KeybindingsConfig,
}

// ---------------------------------------------------------------------------
// API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base of every API route, e.g. `http://localhost:3000/api/v1`.
    pub base_url: String,
    /// Personal access token; falls back to `PR_SIDEBAR_TOKEN` / `HARNESS_TOKEN`.
    pub token: Option<String>,
    pub timeout_secs: u64,
    /// Page size for principal search in the reviewer picker.
    pub principal_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api/v1".to_owned(),
            token: None,
            timeout_secs: 30,
            principal_limit: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Quiet period before a label or principal search is sent.
    pub search_debounce_ms: u64,
    /// Share of the terminal width given to the sidebar.
    pub sidebar_width: f64,
    /// How long a toast stays on screen.
    pub toast_seconds: u64,
    pub date_format: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            search_debounce_ms: 500,
            sidebar_width: 0.30,
            toast_seconds: 4,
            date_format: "relative".to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Strings
// ---------------------------------------------------------------------------

/// User-visible strings. `{label}` is substituted at call time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Strings {
    pub reviewers: String,
    pub no_reviewers: String,
    pub labels: String,
    pub no_labels: String,
    pub remove: String,
    pub removed_label: String,
    pub applied_label: String,
    pub activity: String,
    pub add_reviewer_prompt: String,
    pub add_label_prompt: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            reviewers: "Reviewers".to_owned(),
            no_reviewers: "No reviewers".to_owned(),
            labels: "Labels".to_owned(),
            no_labels: "No labels".to_owned(),
            remove: "Remove".to_owned(),
            removed_label: "Removed '{label}' label".to_owned(),
            applied_label: "Applied '{label}' label".to_owned(),
            activity: "Activity".to_owned(),
            add_reviewer_prompt: "Add reviewer:".to_owned(),
            add_label_prompt: "Add label:".to_owned(),
        }
    }
}

/// Replace every `{name}` placeholder in `template` with `value`.
pub fn substitute(template: &str, name: &str, value: &str) -> String {
    template.replace(&format!("{{{name}}}"), value)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: ColorsTheme,
    pub icons: IconConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColorsTheme {
    pub text: TextColors,
    pub background: BgColors,
    pub border: BorderColors,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TextColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub secondary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub placeholder: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub success: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub error: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub heading: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BgColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub selected: Option<Color>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BorderColors {
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub primary: Option<Color>,
    #[serde(default, deserialize_with = "color_de::deserialize")]
    pub faint: Option<Color>,
}

// ---------------------------------------------------------------------------
// Icons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub preset: Option<String>,
    // Review decision
    pub review_approved: Option<String>,
    pub review_changes: Option<String>,
    pub review_pending: Option<String>,
    pub review_dot: Option<String>,
    pub review_outdated: Option<String>,
    // Reviewer row
    pub options: Option<String>,
    // Label chip
    pub label_remove: Option<String>,
    pub scope_repo: Option<String>,
    pub scope_space: Option<String>,
    // Activity
    pub spinner: Option<String>,
    // Toasts
    pub toast_success: Option<String>,
    pub toast_error: Option<String>,
}
