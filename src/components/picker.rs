use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::icons::ResolvedIcons;
use crate::theme::ResolvedTheme;

/// Rows of suggestions shown under the input.
const MAX_SUGGESTIONS: usize = 8;

// ---------------------------------------------------------------------------
// Pre-rendered picker
// ---------------------------------------------------------------------------

pub struct RenderedPicker {
    pub prompt: String,
    pub text: String,
    pub suggestions: Vec<RenderedSuggestion>,
    /// Spinner glyph while the suggestion list is being fetched.
    pub loading: Option<String>,
    pub text_fg: Color,
    pub prompt_fg: Color,
    pub border_fg: Color,
    pub placeholder_fg: Color,
}

pub struct RenderedSuggestion {
    pub text: String,
    pub is_selected: bool,
    pub fg: Color,
    pub selected_bg: Color,
}

impl RenderedPicker {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        prompt: &str,
        text: &str,
        suggestions: &[String],
        selected_index: Option<usize>,
        loading: bool,
        theme: &ResolvedTheme,
        icons: &ResolvedIcons,
        depth: ColorDepth,
    ) -> Self {
        let text_fg = theme.text_primary.to_crossterm_color(depth);
        let selected_bg = theme.bg_selected.to_crossterm_color(depth);

        let selected_index = highlighted(selected_index, suggestions.len());
        // Keep the selection inside the visible window.
        let start = selected_index
            .map_or(0, |i| (i + 1).saturating_sub(MAX_SUGGESTIONS));
        let suggestions = suggestions
            .iter()
            .enumerate()
            .skip(start)
            .take(MAX_SUGGESTIONS)
            .map(|(i, s)| RenderedSuggestion {
                text: s.clone(),
                is_selected: selected_index == Some(i),
                fg: text_fg,
                selected_bg,
            })
            .collect();

        Self {
            prompt: prompt.to_owned(),
            text: format!("{text}\u{2588}"), // block cursor
            suggestions,
            loading: loading.then(|| icons.spinner.clone()),
            text_fg,
            prompt_fg: theme.text_heading.to_crossterm_color(depth),
            border_fg: theme.border_primary.to_crossterm_color(depth),
            placeholder_fg: theme.text_placeholder.to_crossterm_color(depth),
        }
    }
}

/// The suggestion Enter would pick: the explicit selection clamped to `len`,
/// else the first entry.
pub fn highlighted(selected: Option<usize>, len: usize) -> Option<usize> {
    (len > 0).then(|| selected.unwrap_or(0).min(len - 1))
}

/// Move the highlighted suggestion by `delta`, clamped to `len` entries.
pub fn step_selection(current: Option<usize>, delta: isize, len: usize) -> Option<usize> {
    let start = highlighted(current, len)?;
    Some(start.saturating_add_signed(delta).min(len - 1))
}

// ---------------------------------------------------------------------------
// Picker component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct PickerProps {
    pub picker: Option<RenderedPicker>,
}

#[component]
pub fn Picker(props: &mut PickerProps) -> impl Into<AnyElement<'static>> {
    let Some(picker) = props.picker.take() else {
        return element! { View }.into_any();
    };

    let no_matches = picker.suggestions.is_empty() && picker.loading.is_none();
    let placeholder_fg = picker.placeholder_fg;

    element! {
        View(
            flex_direction: FlexDirection::Column,
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: picker.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: picker.prompt, color: picker.prompt_fg, wrap: TextWrap::NoWrap)
                Text(content: " ", color: picker.text_fg)
                Text(content: picker.text, color: picker.text_fg, wrap: TextWrap::NoWrap)
                #(picker.loading.map(|s| element! {
                    Text(content: format!(" {s}"), color: placeholder_fg, wrap: TextWrap::NoWrap)
                }))
            }
            #(no_matches.then(|| element! {
                Text(content: "  (no matches)", color: placeholder_fg, wrap: TextWrap::NoWrap)
            }))
            #(picker.suggestions.into_iter().enumerate().map(|(i, s)| {
                let bg = if s.is_selected { s.selected_bg } else { Color::Reset };
                let prefix = if s.is_selected { "> " } else { "  " };
                element! {
                    View(key: i, background_color: bg) {
                        Text(content: format!("{prefix}{}", s.text), color: s.fg, wrap: TextWrap::NoWrap)
                    }
                }
                .into_any()
            }))
        }
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_suggestion_highlighted_by_default() {
        assert_eq!(highlighted(None, 3), Some(0));
        assert_eq!(highlighted(Some(5), 3), Some(2));
        assert_eq!(highlighted(None, 0), None);
    }

    #[test]
    fn default_highlight_is_rendered() {
        let theme = ResolvedTheme::resolve(
            &crate::config::types::Theme::default(),
            crate::theme::Background::Dark,
        );
        let icons = ResolvedIcons::resolve(&crate::config::types::IconConfig::default());
        let items = ["bug".to_owned(), "prio:high".to_owned()];
        let picker =
            RenderedPicker::build("Add label:", "", &items, None, false, &theme, &icons, ColorDepth::TrueColor);
        let selected: Vec<bool> = picker.suggestions.iter().map(|s| s.is_selected).collect();
        assert_eq!(selected, [true, false]);
    }

    #[test]
    fn step_clamps_to_bounds() {
        // Down from the default highlight moves to the second entry.
        assert_eq!(step_selection(None, 1, 3), Some(1));
        assert_eq!(step_selection(None, -1, 3), Some(0));
        assert_eq!(step_selection(Some(2), 1, 3), Some(2));
        assert_eq!(step_selection(Some(0), -1, 3), Some(0));
        assert_eq!(step_selection(Some(1), 1, 0), None);
    }
}
