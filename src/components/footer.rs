use std::time::Instant;

use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::config::keybindings::{BuiltinAction, MergedBindings};
use crate::theme::ResolvedTheme;

// ---------------------------------------------------------------------------
// Footer component: status bar
// ---------------------------------------------------------------------------

/// Actions advertised in the footer, in display order.
const HINTED: &[BuiltinAction] = &[
    BuiltinAction::AddReviewer,
    BuiltinAction::AddLabel,
    BuiltinAction::Remove,
    BuiltinAction::NextSection,
    BuiltinAction::Refresh,
    BuiltinAction::Quit,
];

pub struct RenderedFooter {
    pub context_text: String,
    pub hints: Vec<(String, String)>,
    pub updated_text: String,
    pub text_fg: Color,
    pub key_fg: Color,
    pub border_fg: Color,
}

impl RenderedFooter {
    pub fn build(
        context_text: String,
        bindings: &MergedBindings,
        last_fetch: Option<Instant>,
        theme: &ResolvedTheme,
        depth: ColorDepth,
    ) -> Self {
        let hints = HINTED
            .iter()
            .filter_map(|&action| {
                bindings
                    .key_for(action)
                    .map(|key| (key.to_owned(), action.description().to_lowercase()))
            })
            .collect();

        Self {
            context_text,
            hints,
            updated_text: format_updated_ago(last_fetch),
            text_fg: theme.text_secondary.to_crossterm_color(depth),
            key_fg: theme.text_heading.to_crossterm_color(depth),
            border_fg: theme.border_faint.to_crossterm_color(depth),
        }
    }
}

/// Format a last-fetch instant as a human-readable "Updated ~Xs ago" string.
pub fn format_updated_ago(last_fetch: Option<Instant>) -> String {
    let Some(t) = last_fetch else {
        return String::new();
    };
    let elapsed = t.elapsed().as_secs();
    if elapsed < 60 {
        format!("Updated ~{elapsed}s ago")
    } else if elapsed < 3600 {
        format!("Updated ~{}m ago", elapsed / 60)
    } else {
        format!("Updated ~{}h ago", elapsed / 3600)
    }
}

#[derive(Default, Props)]
pub struct FooterProps {
    pub footer: Option<RenderedFooter>,
}

#[component]
pub fn Footer(props: &mut FooterProps) -> impl Into<AnyElement<'static>> {
    let Some(f) = props.footer.take() else {
        return element! { View }.into_any();
    };

    let mut hint_contents = Vec::new();
    for (i, (key, label)) in f.hints.iter().enumerate() {
        if i > 0 {
            hint_contents.push(MixedTextContent::new("  ").color(f.text_fg));
        }
        hint_contents.push(MixedTextContent::new(key).color(f.key_fg).weight(Weight::Bold));
        hint_contents.push(MixedTextContent::new(format!(" {label}")).color(f.text_fg));
    }

    element! {
        View(
            border_style: BorderStyle::Single,
            border_edges: Edges::Top,
            border_color: f.border_fg,
            padding_left: 1,
            padding_right: 1,
        ) {
            Text(content: f.context_text, color: f.key_fg, wrap: TextWrap::NoWrap)
            Text(content: " \u{2502} ", color: f.text_fg, wrap: TextWrap::NoWrap)
            View(flex_grow: 1.0) {
                MixedText(contents: hint_contents, wrap: TextWrap::NoWrap)
            }
            Text(content: f.updated_text, color: f.text_fg, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
