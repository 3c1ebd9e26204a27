use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use iocraft::prelude::*;

use crate::color::ColorDepth;
use crate::components::footer::{Footer, RenderedFooter};
use crate::components::label_panel::{LabelPanel, RenderedLabelPanel};
use crate::components::picker::{Picker, RenderedPicker, highlighted, step_selection};
use crate::components::reviewer_panel::{RenderedReviewerPanel, ReviewerPanel};
use crate::components::toast::{RenderedToast, ToastBanner};
use crate::config::keybindings::{BuiltinAction, MergedBindings, key_event_to_string};
use crate::config::types::AppConfig;
use crate::engine::{EngineHandle, Event, Request};
use crate::icons::ResolvedIcons;
use crate::sidebar::{PullRequestSidebar, Refetch, RefetchCallbacks, Toast};
use crate::theme::ResolvedTheme;
use crate::types::{
    Activity, LabelAssignment, PullReq, PullReqTarget, ReviewerAssignment, ScopesLabels,
};
use crate::util::{format_date, truncate_to_width};

// ---------------------------------------------------------------------------
// Host data
// ---------------------------------------------------------------------------

/// Sidebar section holding the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Reviewers,
    Labels,
}

impl Section {
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::Reviewers => Self::Labels,
            Self::Labels => Self::Reviewers,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    AddReviewer,
    AddLabel,
}

/// Collections owned by the host page and handed to the sidebar for display.
///
/// `None` means "not loaded yet"; the panels render their placeholder for it.
#[derive(Debug, Clone, Default)]
pub struct HostData {
    pub pullreq: Option<PullReq>,
    pub reviewers: Option<Vec<ReviewerAssignment>>,
    pub labels: Option<ScopesLabels>,
    pub activities: Vec<Activity>,
    pub last_fetch: Option<Instant>,
    /// Last failed host fetch, cleared by the next successful one.
    pub error: Option<String>,
}

impl HostData {
    /// Fold one engine event into the host collections.
    pub fn apply(&mut self, event: Event, now: Instant) {
        match event {
            Event::PullReqFetched { pullreq } => self.pullreq = Some(pullreq),
            Event::ReviewersFetched { reviewers } => self.reviewers = Some(reviewers),
            Event::LabelsFetched { labels } => self.labels = Some(labels),
            Event::ActivitiesFetched { activities } => self.activities = activities,
            Event::FetchError { context, message } => {
                tracing::warn!("host: {context} failed: {message}");
                self.error = Some(message);
                return;
            }
            other => {
                tracing::debug!("host: ignoring {other:?}");
                return;
            }
        }
        self.last_fetch = Some(now);
        self.error = None;
    }

    pub fn current_sha(&self) -> Option<&str> {
        self.pullreq.as_ref().and_then(|p| p.source_sha.as_deref())
    }

    pub fn section_len(&self, section: Section) -> usize {
        match section {
            Section::Reviewers => self.reviewers.as_ref().map_or(0, Vec::len),
            Section::Labels => self.labels.as_ref().map_or(0, |l| l.label_data.len()),
        }
    }

    /// Row under `cursor`, pulled back onto the last row when a refetch has
    /// shrunk the section. `None` for an empty section.
    pub fn clamp_cursor(&self, section: Section, cursor: usize) -> Option<usize> {
        let len = self.section_len(section);
        (len > 0).then(|| cursor.min(len - 1))
    }

    pub fn selected_reviewer(&self, cursor: usize) -> Option<&ReviewerAssignment> {
        let idx = self.clamp_cursor(Section::Reviewers, cursor)?;
        self.reviewers.as_ref()?.get(idx)
    }

    pub fn selected_label(&self, cursor: usize) -> Option<&LabelAssignment> {
        let idx = self.clamp_cursor(Section::Labels, cursor)?;
        self.labels.as_ref()?.label_data.get(idx)
    }
}

/// Refetch callbacks that reload the host collections through the engine.
pub fn host_refetch_callbacks(
    engine: &EngineHandle,
    target: &PullReqTarget,
    reply_tx: &Sender<Event>,
) -> RefetchCallbacks {
    let make = |build: fn(PullReqTarget, Sender<Event>) -> Request| -> Refetch {
        let engine = engine.clone();
        let target = target.clone();
        let reply_tx = reply_tx.clone();
        Box::new(move || engine.send(build(target.clone(), reply_tx.clone())))
    };
    RefetchCallbacks {
        reviewers: Some(make(|target, reply_tx| Request::FetchReviewers { target, reply_tx })),
        labels: Some(make(|target, reply_tx| Request::FetchLabels { target, reply_tx })),
        activities: Some(make(|target, reply_tx| Request::FetchActivities {
            target,
            reply_tx,
        })),
    }
}

fn fetch_all(engine: &EngineHandle, target: &PullReqTarget, reply_tx: &Sender<Event>) {
    engine.send(Request::FetchPullReq {
        target: target.clone(),
        reply_tx: reply_tx.clone(),
    });
    let mut callbacks = host_refetch_callbacks(engine, target, reply_tx);
    for f in [
        &mut callbacks.reviewers,
        &mut callbacks.labels,
        &mut callbacks.activities,
    ]
    .into_iter()
    .flatten()
    {
        f();
    }
}

/// Columns given to the sidebar for a terminal `width` and configured share.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn sidebar_columns(width: u16, share: f64) -> u16 {
    let share = if share > 0.0 && share < 1.0 { share } else { 0.30 };
    let cols = (f64::from(width) * share).round() as u16;
    cols.clamp(24.min(width), width)
}

// ---------------------------------------------------------------------------
// Root App component
// ---------------------------------------------------------------------------

#[derive(Default, Props)]
pub struct AppProps<'a> {
    pub config: Option<&'a AppConfig>,
    pub engine: Option<&'a EngineHandle>,
    pub target: Option<&'a PullReqTarget>,
    pub theme: Option<&'a ResolvedTheme>,
    pub icons: Option<&'a ResolvedIcons>,
    pub keybindings: Option<&'a MergedBindings>,
    pub color_depth: ColorDepth,
}

#[component]
#[allow(clippy::too_many_lines)]
pub fn App<'a>(props: &AppProps<'a>, mut hooks: Hooks) -> impl Into<AnyElement<'a>> {
    let (Some(config), Some(engine), Some(target), Some(theme), Some(icons), Some(bindings)) = (
        props.config,
        props.engine,
        props.target,
        props.theme,
        props.icons,
        props.keybindings,
    ) else {
        return element! { View }.into_any();
    };

    let (width, height) = hooks.use_terminal_size();
    let mut system = hooks.use_context_mut::<SystemContext>();
    let mut should_exit = hooks.use_state(|| false);

    let depth = props.color_depth;
    let strings = &config.strings;
    let debounce = Duration::from_millis(config.defaults.search_debounce_ms);
    let toast_ttl = Duration::from_secs(config.defaults.toast_seconds);

    // Event channel: engine sends events back to this page.
    let event_channel = hooks.use_state(|| {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        (tx, Arc::new(Mutex::new(rx)))
    });
    let (event_tx, event_rx) = event_channel.read().clone();

    let sidebar_state = hooks.use_state({
        let engine = engine.clone();
        let target = target.clone();
        let event_tx = event_tx.clone();
        let strings = strings.clone();
        move || {
            let callbacks = host_refetch_callbacks(&engine, &target, &event_tx);
            Arc::new(Mutex::new(PullRequestSidebar::new(
                target, engine, event_tx, callbacks, strings, debounce,
            )))
        }
    });
    let sidebar = sidebar_state.read().clone();

    let mut host = hooks.use_state(HostData::default);
    let mut mounted = hooks.use_state(|| false);
    let mut render_gen = hooks.use_state(|| 0u64);
    let mut section = hooks.use_state(|| Section::Reviewers);
    let mut cursor = hooks.use_state(|| 0usize);
    let mut mode = hooks.use_state(|| InputMode::Normal);
    let mut picker_text = hooks.use_state(String::new);
    let mut picker_sel = hooks.use_state(|| Option::<usize>::None);
    let mut toast = hooks.use_state(|| Option::<(Toast, Instant)>::None);

    if should_exit.get() {
        system.exit();
    }

    // Initial load of the host collections.
    if !mounted.get() {
        mounted.set(true);
        fetch_all(engine, target, &event_tx);
    }

    // Poll engine events, drive debounced searches, expire toasts.
    {
        let rx = Arc::clone(&event_rx);
        let sidebar = Arc::clone(&sidebar);
        hooks.use_future(async move {
            loop {
                smol::Timer::after(Duration::from_millis(100)).await;
                let now = Instant::now();
                let events: Vec<Event> = rx
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .try_iter()
                    .collect();
                let mut changed = !events.is_empty();
                {
                    let mut sb = sidebar.lock().unwrap_or_else(PoisonError::into_inner);
                    let mut data: Option<HostData> = None;
                    for event in events {
                        if let Some(event) = sb.handle_event(event) {
                            data.get_or_insert_with(|| host.read().clone())
                                .apply(event, now);
                        }
                    }
                    if let Some(data) = data {
                        host.set(data);
                    }
                    sb.poll(now);
                    if let Some(newest) = sb.take_toasts().pop() {
                        toast.set(Some((newest, now)));
                        changed = true;
                    }
                }
                let expired = toast
                    .read()
                    .as_ref()
                    .is_some_and(|(_, shown)| now.saturating_duration_since(*shown) >= toast_ttl);
                if expired {
                    toast.set(None);
                    changed = true;
                }
                if changed {
                    render_gen.set(render_gen.get() + 1);
                }
            }
        });
    }

    // Keyboard handling.
    hooks.use_terminal_events({
        let sidebar = Arc::clone(&sidebar);
        let bindings = bindings.clone();
        let engine = engine.clone();
        let target = target.clone();
        let event_tx = event_tx.clone();
        move |event| match event {
            TerminalEvent::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) if kind != KeyEventKind::Release => {
                let now = Instant::now();
                let mut sb = sidebar.lock().unwrap_or_else(PoisonError::into_inner);
                let current_mode = mode.get();

                if current_mode != InputMode::Normal {
                    let reviewers = host.read().reviewers.clone().unwrap_or_default();
                    let suggestion_count = match current_mode {
                        InputMode::AddLabel => sb.label_suggestions().len(),
                        _ => sb.principal_suggestions(&reviewers).len(),
                    };
                    let mut text = picker_text.read().clone();
                    let mut close = false;
                    match code {
                        KeyCode::Esc => close = true,
                        KeyCode::Enter => {
                            // Same entry the picker draws as highlighted.
                            let idx = highlighted(picker_sel.get(), suggestion_count);
                            if current_mode == InputMode::AddLabel {
                                if let Some(choice) =
                                    idx.and_then(|i| sb.label_suggestions().into_iter().nth(i))
                                {
                                    sb.assign_label(choice);
                                    close = true;
                                }
                            } else if let Some(p) = idx.and_then(|i| {
                                sb.principal_suggestions(&reviewers).into_iter().nth(i)
                            }) {
                                sb.add_reviewer(p.id);
                                close = true;
                            }
                        }
                        KeyCode::Down => {
                            picker_sel.set(step_selection(picker_sel.get(), 1, suggestion_count));
                        }
                        KeyCode::Up => {
                            picker_sel.set(step_selection(picker_sel.get(), -1, suggestion_count));
                        }
                        KeyCode::Backspace => {
                            text.pop();
                        }
                        KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                            text.push(c);
                        }
                        _ => {}
                    }

                    if close {
                        if current_mode == InputMode::AddReviewer {
                            sb.close_reviewer_picker();
                        }
                        mode.set(InputMode::Normal);
                        picker_text.set(String::new());
                        picker_sel.set(None);
                    } else if text != *picker_text.read() {
                        match current_mode {
                            InputMode::AddLabel => sb.set_label_query(text.clone(), now),
                            _ => sb.set_principal_query(text.clone(), now),
                        }
                        picker_text.set(text);
                        picker_sel.set(None);
                    }
                    render_gen.set(render_gen.get() + 1);
                    return;
                }

                let Some(key) = key_event_to_string(code, modifiers, kind) else {
                    return;
                };
                let Some(action) = bindings.resolve(&key) else {
                    return;
                };
                tracing::debug!("key {key} -> {action:?}");
                let (pos, len) = {
                    let data = host.read();
                    let sec = section.get();
                    (data.clamp_cursor(sec, cursor.get()).unwrap_or(0), data.section_len(sec))
                };
                match action {
                    BuiltinAction::Quit => should_exit.set(true),
                    BuiltinAction::MoveDown => cursor.set((pos + 1).min(len.saturating_sub(1))),
                    BuiltinAction::MoveUp => cursor.set(pos.saturating_sub(1)),
                    BuiltinAction::NextSection | BuiltinAction::PrevSection => {
                        section.set(section.get().toggle());
                        cursor.set(0);
                    }
                    BuiltinAction::Refresh => {
                        fetch_all(&engine, &target, &event_tx);
                        sb.refetch_label_list();
                    }
                    BuiltinAction::AddReviewer => {
                        sb.open_reviewer_picker();
                        mode.set(InputMode::AddReviewer);
                    }
                    BuiltinAction::AddLabel => {
                        sb.set_label_query(String::new(), now);
                        sb.refetch_label_list();
                        mode.set(InputMode::AddLabel);
                    }
                    BuiltinAction::Remove => {
                        let data = host.read();
                        match section.get() {
                            Section::Reviewers => {
                                if let Some(r) = data.selected_reviewer(pos) {
                                    sb.remove_reviewer(r.id());
                                }
                            }
                            Section::Labels => {
                                if let Some(label) = data.selected_label(pos) {
                                    sb.remove_label(label);
                                }
                            }
                        }
                    }
                }
                render_gen.set(render_gen.get() + 1);
            }
            _ => {}
        }
    });

    // -----------------------------------------------------------------------
    // Render
    // -----------------------------------------------------------------------

    let data = host.read().clone();
    let sb = sidebar.lock().unwrap_or_else(PoisonError::into_inner);
    let current_mode = mode.get();
    let active_section = section.get();
    let cursor_pos = data.clamp_cursor(active_section, cursor.get()).unwrap_or(0);
    let selected_in = |s: Section| {
        (current_mode == InputMode::Normal && active_section == s).then_some(cursor_pos)
    };

    let sidebar_cols = sidebar_columns(width, config.defaults.sidebar_width);
    let row_width = usize::from(sidebar_cols.saturating_sub(4));
    let feed_width = usize::from(width.saturating_sub(sidebar_cols).saturating_sub(4));

    let reviewer_panel = RenderedReviewerPanel::build(
        data.reviewers.as_deref(),
        data.current_sha(),
        selected_in(Section::Reviewers),
        row_width,
        strings,
        theme,
        icons,
        depth,
    );
    let label_panel = RenderedLabelPanel::build(
        data.labels.as_ref(),
        sb.removing_label(),
        selected_in(Section::Labels),
        strings,
        theme,
        icons,
        depth,
    );

    let picker = match current_mode {
        InputMode::Normal => None,
        InputMode::AddLabel => {
            let suggestions: Vec<String> =
                sb.label_suggestions().iter().map(|c| c.text()).collect();
            Some(RenderedPicker::build(
                &strings.add_label_prompt,
                &picker_text.read(),
                &suggestions,
                picker_sel.get(),
                sb.labels_loading(),
                theme,
                icons,
                depth,
            ))
        }
        InputMode::AddReviewer => {
            let existing = data.reviewers.as_deref().unwrap_or_default();
            let suggestions: Vec<String> = sb
                .principal_suggestions(existing)
                .iter()
                .map(|p| p.picker_label())
                .collect();
            Some(RenderedPicker::build(
                &strings.add_reviewer_prompt,
                &picker_text.read(),
                &suggestions,
                picker_sel.get(),
                false,
                theme,
                icons,
                depth,
            ))
        }
    };
    drop(sb);

    let rendered_toast = toast
        .read()
        .as_ref()
        .map(|(t, _)| RenderedToast::build(t, theme, icons, depth));
    let footer = RenderedFooter::build(target.to_string(), bindings, data.last_fetch, theme, depth);

    // Activity feed: newest entries that fit, oldest on top.
    let feed_rows = usize::from(height.saturating_sub(6));
    let date_format = config.defaults.date_format.as_str();
    let skip = data.activities.len().saturating_sub(feed_rows);
    let feed_lines: Vec<(i64, String)> = data
        .activities
        .iter()
        .skip(skip)
        .map(|a| {
            let line = format!("{:>4}  {}", format_date(&a.created, date_format), a.summary());
            (a.id, truncate_to_width(&line, feed_width))
        })
        .collect();

    let (title, branches) = match &data.pullreq {
        Some(pr) => (
            truncate_to_width(&format!("#{} {}", pr.number, pr.title), row_width),
            format!("{} \u{2192} {}", pr.source_branch, pr.target_branch),
        ),
        None => (format!("#{}", target.number), String::new()),
    };

    let text_fg = theme.text_primary.to_crossterm_color(depth);
    let secondary_fg = theme.text_secondary.to_crossterm_color(depth);
    let heading_fg = theme.text_heading.to_crossterm_color(depth);
    let error_fg = theme.text_error.to_crossterm_color(depth);
    let border_fg = theme.border_primary.to_crossterm_color(depth);

    element! {
        View(width: u32::from(width), height: u32::from(height), flex_direction: FlexDirection::Column) {
            View(flex_grow: 1.0, flex_direction: FlexDirection::Row) {
                // Left: activity feed.
                View(flex_grow: 1.0, flex_direction: FlexDirection::Column, padding_left: 1, padding_right: 1) {
                    Text(content: strings.activity.clone(), color: heading_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
                    #(data.error.map(|e| element! {
                        Text(content: e, color: error_fg, wrap: TextWrap::NoWrap)
                    }))
                    #(feed_lines.into_iter().map(|(id, line)| element! {
                        Text(key: id, content: line, color: text_fg, wrap: TextWrap::NoWrap)
                    }))
                }
                // Right: sidebar.
                View(
                    width: u32::from(sidebar_cols),
                    flex_direction: FlexDirection::Column,
                    border_style: BorderStyle::Single,
                    border_edges: Edges::Left,
                    border_color: border_fg,
                    padding_left: 1,
                    padding_right: 1,
                ) {
                    View(flex_direction: FlexDirection::Column, padding_bottom: 1) {
                        Text(content: title, color: heading_fg, weight: Weight::Bold, wrap: TextWrap::NoWrap)
                        Text(content: branches, color: secondary_fg, wrap: TextWrap::NoWrap)
                    }
                    ReviewerPanel(panel: Some(reviewer_panel))
                    LabelPanel(panel: Some(label_panel))
                    Picker(picker)
                }
            }
            ToastBanner(toast: rendered_toast)
            Footer(footer: Some(footer))
        }
    }
    .into_any()
}
