//! Pull-request sidebar controller.
//!
//! Owns the label search text, the assignable-label results and the toast
//! queue, and turns user actions into engine requests. The host supplies the
//! refetch callbacks for the collections it owns (reviewers, labels,
//! activities) and forwards every engine event through
//! [`PullRequestSidebar::handle_event`].
//!
//! Reviewer and label refetches fire when a mutation is *initiated*, not when
//! it settles, so the host may reload before the server has applied the
//! change. Activity refetches wait for success.

use std::collections::VecDeque;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use crate::config::types::{Strings, substitute};
use crate::engine::{EngineHandle, Event, Mutation, Request, SearchKind};
use crate::search::Debounced;
use crate::types::{
    LabelAssignment, LabelChoice, Principal, PullReqTarget, ReviewerAssignment, ScopesLabels,
    label_choices, label_text,
};

/// Host-side reload of one collection.
pub type Refetch = Box<dyn FnMut() + Send>;

/// Refetch callbacks supplied by the host. Absent callbacks are skipped.
#[derive(Default)]
pub struct RefetchCallbacks {
    pub reviewers: Option<Refetch>,
    pub labels: Option<Refetch>,
    pub activities: Option<Refetch>,
}

fn call(callback: &mut Option<Refetch>) {
    if let Some(f) = callback.as_mut() {
        f();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    fn success(message: String) -> Self {
        Self {
            kind: ToastKind::Success,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            kind: ToastKind::Error,
            message,
        }
    }
}

/// Search state of the reviewer picker; exists only while the picker is open.
struct PrincipalSearch {
    query: Debounced,
    results: Vec<Principal>,
}

pub struct PullRequestSidebar {
    target: PullReqTarget,
    engine: EngineHandle,
    reply_tx: Sender<Event>,
    refetch: RefetchCallbacks,
    strings: Strings,
    debounce: Duration,

    label_search: Debounced,
    assignable: ScopesLabels,
    searches_in_flight: usize,
    removals_in_flight: usize,

    principal_search: Option<PrincipalSearch>,

    toasts: VecDeque<Toast>,
}

impl PullRequestSidebar {
    pub fn new(
        target: PullReqTarget,
        engine: EngineHandle,
        reply_tx: Sender<Event>,
        refetch: RefetchCallbacks,
        strings: Strings,
        debounce: Duration,
    ) -> Self {
        Self {
            target,
            engine,
            reply_tx,
            refetch,
            strings,
            debounce,
            label_search: Debounced::new(debounce),
            assignable: ScopesLabels::default(),
            searches_in_flight: 0,
            removals_in_flight: 0,
            principal_search: None,
            toasts: VecDeque::new(),
        }
    }

    fn mutate(&self, mutation: Mutation) {
        tracing::debug!("sidebar: {} on {}", mutation.describe(), self.target);
        self.engine.send(Request::Mutate {
            target: self.target.clone(),
            mutation,
            reply_tx: self.reply_tx.clone(),
        });
    }

    // -----------------------------------------------------------------------
    // Reviewers
    // -----------------------------------------------------------------------

    /// Attach `reviewer_id` to the pull request.
    pub fn add_reviewer(&mut self, reviewer_id: i64) {
        self.mutate(Mutation::AddReviewer { reviewer_id });
        call(&mut self.refetch.reviewers);
    }

    /// Detach `reviewer_id` from the pull request.
    pub fn remove_reviewer(&mut self, reviewer_id: i64) {
        self.mutate(Mutation::RemoveReviewer { reviewer_id });
        call(&mut self.refetch.reviewers);
    }

    // -----------------------------------------------------------------------
    // Labels
    // -----------------------------------------------------------------------

    pub fn remove_label(&mut self, label: &LabelAssignment) {
        tracing::debug!("sidebar: removing label {}", label.display_name());
        self.removals_in_flight += 1;
        self.mutate(Mutation::RemoveLabel {
            label_id: label.id,
            key: label.key.clone(),
            value: label.assigned_value.as_ref().map(|v| v.value.clone()),
        });
        call(&mut self.refetch.labels);
    }

    pub fn assign_label(&mut self, choice: LabelChoice) {
        self.mutate(Mutation::AssignLabel { choice });
    }

    pub fn label_query(&self) -> &str {
        self.label_search.text()
    }

    pub fn set_label_query(&mut self, text: impl Into<String>, now: Instant) {
        self.label_search.set(text, now);
    }

    /// Re-issue the current assignable-label query without waiting.
    pub fn refetch_label_list(&mut self) {
        self.label_search.refetch();
    }

    pub fn assignable_labels(&self) -> &ScopesLabels {
        &self.assignable
    }

    /// Picker entries for the current assignable-label results.
    pub fn label_suggestions(&self) -> Vec<LabelChoice> {
        label_choices(&self.assignable.label_data)
    }

    pub fn labels_loading(&self) -> bool {
        self.searches_in_flight > 0
    }

    /// True while at least one label removal has not settled.
    pub fn removing_label(&self) -> bool {
        self.removals_in_flight > 0
    }

    // -----------------------------------------------------------------------
    // Reviewer picker
    // -----------------------------------------------------------------------

    /// Start a principal search; the empty query goes out on the next poll.
    pub fn open_reviewer_picker(&mut self) {
        self.principal_search = Some(PrincipalSearch {
            query: Debounced::new(self.debounce),
            results: Vec::new(),
        });
    }

    pub fn close_reviewer_picker(&mut self) {
        self.principal_search = None;
    }

    pub fn set_principal_query(&mut self, text: impl Into<String>, now: Instant) {
        if let Some(search) = self.principal_search.as_mut() {
            search.query.set(text, now);
        }
    }

    /// Principals matching the query, minus those already reviewing.
    pub fn principal_suggestions(&self, existing: &[ReviewerAssignment]) -> Vec<Principal> {
        let Some(search) = &self.principal_search else {
            return Vec::new();
        };
        search
            .results
            .iter()
            .filter(|p| existing.iter().all(|r| r.id() != p.id))
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Driving
    // -----------------------------------------------------------------------

    /// Issue any debounced search that has come due.
    pub fn poll(&mut self, now: Instant) {
        if let Some(query) = self.label_search.poll(now) {
            tracing::debug!("sidebar: assignable label search {query:?}");
            self.searches_in_flight += 1;
            self.engine.send(Request::SearchAssignableLabels {
                target: self.target.clone(),
                query,
                reply_tx: self.reply_tx.clone(),
            });
        }
        if let Some(search) = self.principal_search.as_mut()
            && let Some(query) = search.query.poll(now)
        {
            self.engine.send(Request::SearchPrincipals {
                query,
                reply_tx: self.reply_tx.clone(),
            });
        }
    }

    /// Consume the events that belong to the sidebar; hand the rest back.
    pub fn handle_event(&mut self, event: Event) -> Option<Event> {
        match event {
            Event::AssignableLabelsFetched { query, labels } => {
                self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
                // A slow reply for older text must not replace newer results.
                if query != self.label_search.text() {
                    tracing::debug!("sidebar: dropping stale assignable labels for {query:?}");
                    return None;
                }
                tracing::debug!(
                    "sidebar: {} assignable labels for {query:?}",
                    labels.label_data.len()
                );
                self.assignable = labels;
                None
            }
            Event::PrincipalsFetched { query, principals } => {
                match self.principal_search.as_mut() {
                    Some(search) if search.query.text() == query => search.results = principals,
                    _ => tracing::debug!("sidebar: dropping stale principals for {query:?}"),
                }
                None
            }
            Event::SearchFailed {
                search,
                query,
                message,
            } => {
                if search == SearchKind::AssignableLabels {
                    self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
                }
                tracing::warn!("sidebar: {search:?} search {query:?} failed: {message}");
                None
            }
            Event::MutationOk { mutation } => {
                self.on_success(mutation);
                None
            }
            Event::MutationError { mutation, message } => {
                if matches!(mutation, Mutation::RemoveLabel { .. }) {
                    self.removals_in_flight = self.removals_in_flight.saturating_sub(1);
                }
                tracing::warn!("sidebar: {} failed: {message}", mutation.describe());
                self.toasts.push_back(Toast::error(message));
                None
            }
            other => Some(other),
        }
    }

    fn on_success(&mut self, mutation: Mutation) {
        match mutation {
            Mutation::AddReviewer { .. } | Mutation::RemoveReviewer { .. } => {
                call(&mut self.refetch.activities);
            }
            Mutation::RemoveLabel { key, value, .. } => {
                self.removals_in_flight = self.removals_in_flight.saturating_sub(1);
                let text = label_text(&key, value.as_deref());
                self.toasts.push_back(Toast::success(substitute(
                    &self.strings.removed_label,
                    "label",
                    &text,
                )));
                call(&mut self.refetch.activities);
            }
            Mutation::AssignLabel { choice } => {
                self.toasts.push_back(Toast::success(substitute(
                    &self.strings.applied_label,
                    "label",
                    &choice.text(),
                )));
                call(&mut self.refetch.labels);
                call(&mut self.refetch.activities);
                self.label_search.refetch();
            }
        }
    }

    /// Drain queued toasts, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }
}
