use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use pr_sidebar::config::types::Strings;
use pr_sidebar::engine::{Engine, Event, SearchKind, StubEngine};
use pr_sidebar::sidebar::{PullRequestSidebar, RefetchCallbacks, Toast, ToastKind};
use pr_sidebar::types::{LabelAssignment, LabelChoice, PullReqTarget, ScopesLabels};

const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Clone, Default)]
struct Counters {
    reviewers: Arc<AtomicUsize>,
    labels: Arc<AtomicUsize>,
    activities: Arc<AtomicUsize>,
}

impl Counters {
    fn callbacks(&self) -> RefetchCallbacks {
        let counter = |c: &Arc<AtomicUsize>| {
            let c = Arc::clone(c);
            Some(Box::new(move || {
                c.fetch_add(1, Ordering::SeqCst);
            }) as pr_sidebar::sidebar::Refetch)
        };
        RefetchCallbacks {
            reviewers: counter(&self.reviewers),
            labels: counter(&self.labels),
            activities: counter(&self.activities),
        }
    }

    fn get(&self) -> (usize, usize, usize) {
        (
            self.reviewers.load(Ordering::SeqCst),
            self.labels.load(Ordering::SeqCst),
            self.activities.load(Ordering::SeqCst),
        )
    }
}

struct Harness {
    sidebar: PullRequestSidebar,
    rx: Receiver<Event>,
    counters: Counters,
    /// Events the sidebar handed back to the host.
    passed_through: Vec<Event>,
}

fn harness(stub: StubEngine) -> Harness {
    let engine = stub.start();
    let (tx, rx) = mpsc::channel();
    let counters = Counters::default();
    let sidebar = PullRequestSidebar::new(
        PullReqTarget::new("space/repo", 7),
        engine,
        tx,
        counters.callbacks(),
        Strings::default(),
        DEBOUNCE,
    );
    Harness {
        sidebar,
        rx,
        counters,
        passed_through: Vec::new(),
    }
}

impl Harness {
    /// Feed engine replies to the sidebar until `n` have arrived.
    fn settle(&mut self, n: usize) {
        for _ in 0..n {
            let event = self
                .rx
                .recv_timeout(Duration::from_secs(5))
                .expect("engine reply");
            if let Some(rest) = self.sidebar.handle_event(event) {
                self.passed_through.push(rest);
            }
        }
    }
}

fn label(id: i64, key: &str, value: Option<&str>) -> LabelAssignment {
    let mut json = serde_json::json!({"id": id, "key": key, "color": "blue", "scope": 0});
    if let Some(v) = value {
        json["assigned_value"] = serde_json::json!({"id": id * 10, "value": v, "color": "red"});
    }
    serde_json::from_value(json).unwrap()
}

// ---------------------------------------------------------------------------
// Reviewers
// ---------------------------------------------------------------------------

#[test]
fn add_reviewer_refetches_reviewers_once_at_initiation() {
    let mut h = harness(StubEngine::default());

    h.sidebar.add_reviewer(42);
    // Before the mutation settles.
    assert_eq!(h.counters.get(), (1, 0, 0));

    h.settle(1);
    assert_eq!(h.counters.get(), (1, 0, 1));
    assert!(h.sidebar.take_toasts().is_empty());
}

#[test]
fn failed_add_reviewer_shows_error_and_skips_activities() {
    let mut h = harness(StubEngine {
        fail_mutations: Some("reviewer not found".to_owned()),
        ..Default::default()
    });

    h.sidebar.add_reviewer(42);
    h.settle(1);

    assert_eq!(h.counters.get(), (1, 0, 0));
    assert_eq!(
        h.sidebar.take_toasts(),
        [Toast {
            kind: ToastKind::Error,
            message: "reviewer not found".to_owned(),
        }]
    );
}

#[test]
fn remove_reviewer_refetches_reviewers_then_activities() {
    let mut h = harness(StubEngine::default());

    h.sidebar.remove_reviewer(3);
    assert_eq!(h.counters.get(), (1, 0, 0));
    h.settle(1);
    assert_eq!(h.counters.get(), (1, 0, 1));
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[test]
fn remove_label_with_value_toasts_key_and_value() {
    let mut h = harness(StubEngine::default());

    h.sidebar.remove_label(&label(11, "prio", Some("high")));
    // Labels reload right away, whatever the outcome.
    assert_eq!(h.counters.get(), (0, 1, 0));
    assert!(h.sidebar.removing_label());

    h.settle(1);
    assert!(!h.sidebar.removing_label());
    assert_eq!(h.counters.get(), (0, 1, 1));
    assert_eq!(
        h.sidebar.take_toasts(),
        [Toast {
            kind: ToastKind::Success,
            message: "Removed 'prio:high' label".to_owned(),
        }]
    );
}

#[test]
fn remove_label_without_value_toasts_key() {
    let mut h = harness(StubEngine::default());

    h.sidebar.remove_label(&label(12, "bug", None));
    h.settle(1);

    let toasts = h.sidebar.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].message, "Removed 'bug' label");
}

#[test]
fn failed_remove_label_still_refetched_labels() {
    let mut h = harness(StubEngine {
        fail_mutations: Some("forbidden".to_owned()),
        ..Default::default()
    });

    h.sidebar.remove_label(&label(12, "bug", None));
    h.settle(1);

    assert_eq!(h.counters.get(), (0, 1, 0));
    assert!(!h.sidebar.removing_label());
    let toasts = h.sidebar.take_toasts();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].kind, ToastKind::Error);
    assert_eq!(toasts[0].message, "forbidden");
}

#[test]
fn overlapping_removals_keep_spinner_until_last_settles() {
    let mut h = harness(StubEngine::default());

    h.sidebar.remove_label(&label(11, "prio", Some("high")));
    h.sidebar.remove_label(&label(12, "bug", None));
    assert!(h.sidebar.removing_label());

    h.settle(1);
    assert!(h.sidebar.removing_label());
    h.settle(1);
    assert!(!h.sidebar.removing_label());
    assert_eq!(h.counters.get(), (0, 2, 2));
}

#[test]
fn assign_label_refetches_everything_label_related() {
    let mut h = harness(StubEngine::default());
    let now = Instant::now();

    // Drain the initial assignable-label search first.
    h.sidebar.poll(now);
    h.settle(1);

    h.sidebar.assign_label(LabelChoice {
        label_id: 2,
        value_id: Some(20),
        key: "prio".to_owned(),
        value: Some("high".to_owned()),
    });
    h.settle(1);

    assert_eq!(h.counters.get(), (0, 1, 1));
    let toasts = h.sidebar.take_toasts();
    assert_eq!(toasts[0].message, "Applied 'prio:high' label");

    // The assignable list is re-queried without waiting for the debounce.
    h.sidebar.poll(now);
    assert!(h.sidebar.labels_loading());
    h.settle(1);
    assert!(!h.sidebar.labels_loading());
}

// ---------------------------------------------------------------------------
// Assignable-label search
// ---------------------------------------------------------------------------

fn assignable() -> ScopesLabels {
    serde_json::from_value(serde_json::json!({
        "label_data": [
            {"id": 1, "key": "bug"},
            {"id": 2, "key": "prio", "values": [
                {"id": 20, "value": "high", "color": "red"},
                {"id": 21, "value": "low", "color": "green"}
            ]},
            {"id": 3, "key": "backend"}
        ]
    }))
    .unwrap()
}

#[test]
fn initial_search_fires_on_first_poll() {
    let mut h = harness(StubEngine {
        assignable: assignable(),
        ..Default::default()
    });

    assert!(!h.sidebar.labels_loading());
    h.sidebar.poll(Instant::now());
    assert!(h.sidebar.labels_loading());
    h.settle(1);

    assert_eq!(h.sidebar.assignable_labels().label_data.len(), 3);
    assert_eq!(h.sidebar.label_suggestions().len(), 4);
}

#[test]
fn typing_burst_issues_a_single_search() {
    let mut h = harness(StubEngine {
        assignable: assignable(),
        ..Default::default()
    });
    let t0 = Instant::now();
    h.sidebar.poll(t0);
    h.settle(1);

    for (i, text) in ["b", "ba", "bac"].into_iter().enumerate() {
        let at = t0 + Duration::from_millis(100 * i as u64);
        h.sidebar.set_label_query(text, at);
        h.sidebar.poll(at);
        assert!(!h.sidebar.labels_loading(), "no search while typing");
    }

    // Quiet period not over yet.
    h.sidebar.poll(t0 + Duration::from_millis(600));
    assert!(!h.sidebar.labels_loading());

    h.sidebar.poll(t0 + Duration::from_millis(700));
    assert!(h.sidebar.labels_loading());
    h.settle(1);

    assert_eq!(h.sidebar.label_query(), "bac");
    let keys: Vec<&str> = h
        .sidebar
        .assignable_labels()
        .label_data
        .iter()
        .map(|l| l.key.as_str())
        .collect();
    assert_eq!(keys, ["backend"]);

    // Nothing else went out.
    h.sidebar.poll(t0 + Duration::from_secs(5));
    assert!(!h.sidebar.labels_loading());
}

#[test]
fn stale_search_reply_does_not_replace_newer_text() {
    let mut h = harness(StubEngine {
        assignable: assignable(),
        ..Default::default()
    });
    let t0 = Instant::now();
    h.sidebar.poll(t0);
    h.settle(1);

    h.sidebar.set_label_query("bac", t0);
    // A reply for an older query arrives after the text moved on.
    let mut older = assignable();
    older.label_data.retain(|l| l.key == "bug");
    let rest = h.sidebar.handle_event(Event::AssignableLabelsFetched {
        query: "b".to_owned(),
        labels: older,
    });
    assert!(rest.is_none());
    assert_eq!(h.sidebar.assignable_labels().label_data.len(), 3);

    h.sidebar.poll(t0 + DEBOUNCE);
    h.settle(1);
    let keys: Vec<&str> = h
        .sidebar
        .assignable_labels()
        .label_data
        .iter()
        .map(|l| l.key.as_str())
        .collect();
    assert_eq!(keys, ["backend"]);
    assert!(!h.sidebar.labels_loading());
}

#[test]
fn failed_label_search_clears_loading_without_toast() {
    let mut h = harness(StubEngine {
        assignable: assignable(),
        fail_searches: Some("search unavailable".to_owned()),
        ..Default::default()
    });

    h.sidebar.poll(Instant::now());
    assert!(h.sidebar.labels_loading());
    h.settle(1);

    assert!(!h.sidebar.labels_loading());
    assert!(h.sidebar.assignable_labels().is_empty());
    assert!(h.sidebar.take_toasts().is_empty());
    // Never reaches the host's error banner.
    assert!(h.passed_through.is_empty());
}

#[test]
fn failed_principal_search_stays_in_sidebar() {
    let mut h = harness(StubEngine {
        fail_searches: Some("search unavailable".to_owned()),
        ..Default::default()
    });

    h.sidebar.open_reviewer_picker();
    h.sidebar.poll(Instant::now());
    h.settle(2);

    assert!(h.passed_through.is_empty());
    assert!(h.sidebar.take_toasts().is_empty());
    assert!(h.sidebar.principal_suggestions(&[]).is_empty());
    assert!(!h.sidebar.labels_loading());
}

#[test]
fn principal_search_failure_does_not_touch_label_loading() {
    let mut h = harness(StubEngine::default());
    h.sidebar.poll(Instant::now());
    assert!(h.sidebar.labels_loading());

    h.sidebar.handle_event(Event::SearchFailed {
        search: SearchKind::Principals,
        query: String::new(),
        message: "boom".to_owned(),
    });
    assert!(h.sidebar.labels_loading());
    h.settle(1);
    assert!(!h.sidebar.labels_loading());
}

#[test]
fn unrelated_events_pass_through() {
    let mut h = harness(StubEngine::default());
    let rest = h.sidebar.handle_event(Event::FetchError {
        context: "FetchReviewers".to_owned(),
        message: "boom".to_owned(),
    });
    assert!(matches!(rest, Some(Event::FetchError { .. })));
    assert!(h.passed_through.is_empty());
    assert!(h.sidebar.take_toasts().is_empty());
}

// ---------------------------------------------------------------------------
// Reviewer picker
// ---------------------------------------------------------------------------

#[test]
fn principal_suggestions_skip_existing_reviewers() {
    let mut h = harness(StubEngine {
        principals: serde_json::from_value(serde_json::json!([
            {"id": 1, "display_name": "Ann"},
            {"id": 5, "display_name": "Anna Berg"},
            {"id": 6, "display_name": "Bob"}
        ]))
        .unwrap(),
        ..Default::default()
    });
    let existing = serde_json::from_value::<Vec<pr_sidebar::types::ReviewerAssignment>>(
        serde_json::json!([
            {"reviewer": {"id": 1, "display_name": "Ann"}, "review_decision": "pending", "sha": ""}
        ]),
    )
    .unwrap();
    let t0 = Instant::now();

    // The label search goes out on the same poll; settle both replies.
    h.sidebar.open_reviewer_picker();
    h.sidebar.poll(t0);
    h.settle(2);
    assert_eq!(h.sidebar.principal_suggestions(&existing).len(), 2);

    h.sidebar.set_principal_query("ann", t0);
    h.sidebar.poll(t0 + DEBOUNCE);
    h.settle(1);
    let names: Vec<String> = h
        .sidebar
        .principal_suggestions(&existing)
        .into_iter()
        .map(|p| p.display_name)
        .collect();
    assert_eq!(names, ["Anna Berg"]);

    h.sidebar.close_reviewer_picker();
    assert!(h.sidebar.principal_suggestions(&existing).is_empty());
}
