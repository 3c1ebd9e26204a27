use crate::color::{Color, DesignColor};
use crate::config::types::Theme;

/// Detected terminal background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Dark,
    Light,
}

impl Background {
    /// Detect whether the terminal has a dark or light background.
    ///
    /// Heuristic: check `COLORFGBG` (format "fg;bg"), fall back to dark.
    pub fn detect() -> Self {
        if let Ok(val) = std::env::var("COLORFGBG")
            && let Some(bg) = val.rsplit(';').next()
            && let Ok(n) = bg.parse::<u8>()
        {
            // ANSI colors 0-6 and 8 are typically dark backgrounds.
            if n > 6 && n != 8 {
                return Background::Light;
            }
        }
        Background::Dark
    }
}

/// A fully resolved theme: every color slot has a concrete `Color` value
/// (either from user config or from defaults for the detected background).
#[derive(Debug, Clone)]
pub struct ResolvedTheme {
    pub text_primary: Color,
    pub text_secondary: Color,
    /// Placeholder lines ("No reviewers", "No labels").
    pub text_placeholder: Color,
    pub text_success: Color,
    pub text_error: Color,
    pub text_heading: Color,
    pub bg_selected: Color,
    pub border_primary: Color,
    pub border_faint: Color,
}

impl ResolvedTheme {
    /// Build a resolved theme from user config and detected background.
    pub fn resolve(theme: &Theme, bg: Background) -> Self {
        let d = Self::defaults(bg);
        let text = &theme.colors.text;
        let border = &theme.colors.border;

        Self {
            text_primary: text.primary.unwrap_or(d.text_primary),
            text_secondary: text.secondary.unwrap_or(d.text_secondary),
            text_placeholder: text.placeholder.unwrap_or(d.text_placeholder),
            text_success: text.success.unwrap_or(d.text_success),
            text_error: text.error.unwrap_or(d.text_error),
            text_heading: text.heading.unwrap_or(d.text_heading),
            bg_selected: theme.colors.background.selected.unwrap_or(d.bg_selected),
            border_primary: border.primary.unwrap_or(d.border_primary),
            border_faint: border.faint.unwrap_or(d.border_faint),
        }
    }

    fn defaults(bg: Background) -> Self {
        match bg {
            Background::Dark => Self {
                text_primary: Color::Ansi256(7),
                text_secondary: Color::Ansi256(245),
                text_placeholder: DesignColor::Grey300.color(),
                text_success: Color::Ansi256(10),
                text_error: Color::Ansi256(9),
                text_heading: Color::Ansi256(15),
                bg_selected: Color::Ansi256(237),
                border_primary: Color::Ansi256(244),
                border_faint: Color::Ansi256(241),
            },
            Background::Light => Self {
                text_primary: Color::Ansi256(0),
                text_secondary: Color::Ansi256(240),
                text_placeholder: DesignColor::Grey300.color(),
                text_success: Color::Ansi256(2),
                text_error: Color::Ansi256(1),
                text_heading: Color::Ansi256(0),
                bg_selected: Color::Ansi256(254),
                border_primary: Color::Ansi256(240),
                border_faint: Color::Ansi256(252),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::Theme;

    #[test]
    fn override_wins_over_background_default() {
        let mut theme = Theme::default();
        theme.colors.text.primary = Some(Color::Ansi256(3));
        let resolved = ResolvedTheme::resolve(&theme, Background::Light);
        assert_eq!(resolved.text_primary, Color::Ansi256(3));
        assert_eq!(resolved.text_heading, Color::Ansi256(0));
    }
}
