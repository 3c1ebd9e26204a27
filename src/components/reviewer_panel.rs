use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::config::types::Strings;
use crate::decision::{DecisionDisplay, decision_display, process_review_decision};
use crate::icons::ResolvedIcons;
use crate::theme::ResolvedTheme;
use crate::types::ReviewerAssignment;
use crate::util::{initials, truncate_to_width};

// ---------------------------------------------------------------------------
// Pre-rendered reviewer panel
// ---------------------------------------------------------------------------

pub struct ReviewerRow {
    /// Reviewer id; also the element key.
    pub id: i64,
    pub decision: DecisionDisplay,
    pub glyph: String,
    pub glyph_fg: Color,
    pub initials: String,
    pub name: String,
    pub options: String,
    pub is_selected: bool,
}

impl ReviewerRow {
    /// Tooltip text, shown only for the row under the cursor.
    pub fn tooltip(&self) -> Option<&'static str> {
        self.is_selected.then_some(self.decision.message)
    }
}

pub struct RenderedReviewerPanel {
    pub title: String,
    pub placeholder: Option<String>,
    pub rows: Vec<ReviewerRow>,
    /// Sole entry of the row options menu.
    pub remove: String,
    pub title_fg: Color,
    pub text_fg: Color,
    pub secondary_fg: Color,
    pub placeholder_fg: Color,
    pub selected_bg: Color,
}

impl RenderedReviewerPanel {
    /// `width` is the column budget for one row, used to clamp names.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        reviewers: Option<&[ReviewerAssignment]>,
        current_sha: Option<&str>,
        selected: Option<usize>,
        width: usize,
        strings: &Strings,
        theme: &ResolvedTheme,
        icons: &ResolvedIcons,
        depth: ColorDepth,
    ) -> Self {
        let reviewers = reviewers.unwrap_or_default();
        let placeholder = reviewers.is_empty().then(|| strings.no_reviewers.clone());

        // glyph + space + initials (<= 2) + two spaces + name + space + options
        let name_width = width.saturating_sub(8 + icons.options.chars().count());

        let rows = reviewers
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let effective = process_review_decision(r.review_decision, &r.sha, current_sha);
                let decision = decision_display(effective);
                ReviewerRow {
                    id: r.id(),
                    decision,
                    glyph: decision.glyph(icons).to_owned(),
                    glyph_fg: decision.color.color().to_crossterm_color(depth),
                    initials: initials(&r.reviewer.display_name),
                    name: truncate_to_width(&r.reviewer.display_name, name_width),
                    options: icons.options.clone(),
                    is_selected: selected == Some(i),
                }
            })
            .collect();

        Self {
            title: strings.reviewers.clone(),
            placeholder,
            rows,
            remove: strings.remove.clone(),
            title_fg: theme.text_heading.to_crossterm_color(depth),
            text_fg: theme.text_primary.to_crossterm_color(depth),
            secondary_fg: theme.text_secondary.to_crossterm_color(depth),
            placeholder_fg: theme.text_placeholder.to_crossterm_color(depth),
            selected_bg: theme.bg_selected.to_crossterm_color(depth),
        }
    }
}

// ---------------------------------------------------------------------------
// ReviewerPanel component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct ReviewerPanelProps {
    pub panel: Option<RenderedReviewerPanel>,
}

#[component]
pub fn ReviewerPanel(props: &mut ReviewerPanelProps) -> impl Into<AnyElement<'static>> {
    let Some(panel) = props.panel.take() else {
        return element! { View }.into_any();
    };

    let text_fg = panel.text_fg;
    let secondary_fg = panel.secondary_fg;
    let selected_bg = panel.selected_bg;
    let remove = panel.remove;

    element! {
        View(flex_direction: FlexDirection::Column, padding_bottom: 1) {
            Text(content: panel.title, color: panel.title_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
            #(panel.placeholder.map(|p| element! {
                Text(content: p, color: panel.placeholder_fg, wrap: TextWrap::NoWrap)
            }))
            #(panel.rows.into_iter().map(|row| {
                let menu = row
                    .tooltip()
                    .map(|t| format!("{t} \u{00b7} {} {remove}", row.options));
                let bg = if row.is_selected { selected_bg } else { Color::Reset };
                // The larger marker size is drawn bold.
                let glyph_weight = if row.decision.size > 16 { Weight::Bold } else { Weight::Normal };
                element! {
                    View(key: row.id, flex_direction: FlexDirection::Column, background_color: bg) {
                        View(flex_direction: FlexDirection::Row) {
                            Text(content: row.glyph, color: row.glyph_fg, weight: glyph_weight, wrap: TextWrap::NoWrap)
                            Text(content: format!(" {:>2}  ", row.initials), color: secondary_fg, wrap: TextWrap::NoWrap)
                            View(flex_grow: 1.0) {
                                Text(content: row.name, color: text_fg, wrap: TextWrap::NoWrap)
                            }
                            Text(content: row.options, color: secondary_fg, wrap: TextWrap::NoWrap)
                        }
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
