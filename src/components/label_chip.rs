use iocraft::prelude::*;

use crate::color::{ColorDepth, label_color};
use crate::icons::ResolvedIcons;
use crate::types::{LabelAssignment, ScopeData};

// ---------------------------------------------------------------------------
// Pre-rendered label chip
// ---------------------------------------------------------------------------

pub struct RenderedLabelChip {
    /// Label id; also the element key.
    pub id: i64,
    pub key: String,
    pub key_fg: Color,
    pub value: Option<(String, Color)>,
    /// Repository or space marker, with the scope path when known.
    pub scope: String,
    pub remove: String,
    pub is_selected: bool,
}

impl RenderedLabelChip {
    pub fn build(
        label: &LabelAssignment,
        scopes: &[ScopeData],
        is_selected: bool,
        icons: &ResolvedIcons,
        depth: ColorDepth,
    ) -> Self {
        let marker = if label.scope == 0 {
            &icons.scope_repo
        } else {
            &icons.scope_space
        };
        let scope_path = scopes
            .iter()
            .find(|s| s.scope == label.scope)
            .and_then(|s| s.space_path.as_deref().or(s.repo_path.as_deref()));
        let scope = match scope_path {
            Some(path) if label.scope != 0 => format!("{marker} {path}"),
            _ => marker.clone(),
        };

        Self {
            id: label.id,
            key: label.key.clone(),
            key_fg: label_color(label.color).to_crossterm_color(depth),
            value: label.assigned_value.as_ref().map(|v| {
                (
                    v.value.clone(),
                    label_color(v.color).to_crossterm_color(depth),
                )
            }),
            scope,
            remove: icons.label_remove.clone(),
            is_selected,
        }
    }

    /// Chip text as it reads on screen: `key:value` or `key`.
    pub fn text(&self) -> String {
        match &self.value {
            Some((v, _)) => format!("{}:{v}", self.key),
            None => self.key.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// LabelChip component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct LabelChipProps {
    pub chip: Option<RenderedLabelChip>,
    pub secondary_fg: Option<Color>,
    pub selected_bg: Option<Color>,
}

#[component]
pub fn LabelChip(props: &mut LabelChipProps) -> impl Into<AnyElement<'static>> {
    let Some(chip) = props.chip.take() else {
        return element! { View }.into_any();
    };
    let secondary_fg = props.secondary_fg.unwrap_or(Color::DarkGrey);
    let bg = if chip.is_selected {
        props.selected_bg.unwrap_or(Color::Reset)
    } else {
        Color::Reset
    };

    let mut contents = vec![MixedTextContent::new(&chip.key).color(chip.key_fg).weight(Weight::Bold)];
    if let Some((value, fg)) = &chip.value {
        contents.push(MixedTextContent::new(":").color(secondary_fg));
        contents.push(MixedTextContent::new(value).color(*fg));
    }
    contents.push(MixedTextContent::new(format!(" {} ", chip.scope)).color(secondary_fg));
    contents.push(MixedTextContent::new(&chip.remove).color(secondary_fg));

    element! {
        View(background_color: bg) {
            MixedText(contents: contents, wrap: TextWrap::NoWrap)
        }
    }
    .into_any()
}
