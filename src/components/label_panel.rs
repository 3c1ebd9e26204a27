use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::components::label_chip::{LabelChip, RenderedLabelChip};
use crate::config::types::Strings;
use crate::icons::ResolvedIcons;
use crate::theme::ResolvedTheme;
use crate::types::ScopesLabels;

// ---------------------------------------------------------------------------
// Pre-rendered label panel
// ---------------------------------------------------------------------------

pub struct RenderedLabelPanel {
    pub title: String,
    pub placeholder: Option<String>,
    pub chips: Vec<RenderedLabelChip>,
    /// Spinner glyph while a removal is in flight.
    pub spinner: Option<String>,
    /// Sole entry of the chip options menu.
    pub remove: String,
    pub title_fg: Color,
    pub secondary_fg: Color,
    pub placeholder_fg: Color,
    pub selected_bg: Color,
}

impl RenderedLabelPanel {
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        labels: Option<&ScopesLabels>,
        removing: bool,
        selected: Option<usize>,
        strings: &Strings,
        theme: &ResolvedTheme,
        icons: &ResolvedIcons,
        depth: ColorDepth,
    ) -> Self {
        let (label_data, scope_data) = match labels {
            Some(l) => (l.label_data.as_slice(), l.scope_data.as_slice()),
            None => (&[][..], &[][..]),
        };
        let placeholder = label_data.is_empty().then(|| strings.no_labels.clone());

        let chips = label_data
            .iter()
            .enumerate()
            .map(|(i, label)| {
                RenderedLabelChip::build(label, scope_data, selected == Some(i), icons, depth)
            })
            .collect();

        Self {
            title: strings.labels.clone(),
            placeholder,
            chips,
            spinner: removing.then(|| icons.spinner.clone()),
            remove: strings.remove.clone(),
            title_fg: theme.text_heading.to_crossterm_color(depth),
            secondary_fg: theme.text_secondary.to_crossterm_color(depth),
            placeholder_fg: theme.text_placeholder.to_crossterm_color(depth),
            selected_bg: theme.bg_selected.to_crossterm_color(depth),
        }
    }
}

// ---------------------------------------------------------------------------
// LabelPanel component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct LabelPanelProps {
    pub panel: Option<RenderedLabelPanel>,
}

#[component]
pub fn LabelPanel(props: &mut LabelPanelProps) -> impl Into<AnyElement<'static>> {
    let Some(panel) = props.panel.take() else {
        return element! { View }.into_any();
    };

    let secondary_fg = panel.secondary_fg;
    let selected_bg = panel.selected_bg;
    let remove = panel.remove;

    element! {
        View(flex_direction: FlexDirection::Column, padding_bottom: 1) {
            View(flex_direction: FlexDirection::Row) {
                Text(content: panel.title, color: panel.title_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
                #(panel.spinner.map(|s| element! {
                    Text(content: format!(" {s}"), color: secondary_fg, wrap: TextWrap::NoWrap)
                }))
            }
            #(panel.placeholder.map(|p| element! {
                Text(content: p, color: panel.placeholder_fg, wrap: TextWrap::NoWrap)
            }))
            #(panel.chips.into_iter().map(|chip| {
                let id = chip.id;
                let menu = chip.is_selected.then(|| format!("{} {remove}", chip.remove));
                element! {
                    View(key: id, flex_direction: FlexDirection::Column) {
                        LabelChip(
                            chip: Some(chip),
                            secondary_fg: Some(secondary_fg),
                            selected_bg: Some(selected_bg),
                        )
                        #(menu.map(|m| element! {
                            View(padding_left: 2) {
                                Text(content: m, color: secondary_fg, wrap: TextWrap::NoWrap)
                            }
                        }))
                    }
                }
                .into_any()
            }))
        }
    }
    .into_any()
}
