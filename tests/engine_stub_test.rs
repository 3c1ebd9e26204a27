use std::sync::mpsc;
use std::time::Duration;

use pr_sidebar::engine::{Engine, Event, Mutation, Request, SearchKind, StubEngine};
use pr_sidebar::types::{PullReqTarget, decode_entries};

fn target() -> PullReqTarget {
    PullReqTarget::new("space/repo", 7)
}

#[test]
fn stub_serves_fixture_reviewers() {
    let raw: Vec<serde_json::Value> =
        serde_json::from_str(include_str!("fixtures/reviewers.json")).unwrap();
    let engine = StubEngine {
        reviewers: decode_entries("reviewer", raw),
        ..Default::default()
    }
    .start();
    let (tx, rx) = mpsc::channel();

    engine.send(Request::FetchReviewers {
        target: target(),
        reply_tx: tx,
    });

    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        Event::ReviewersFetched { reviewers } => assert_eq!(reviewers.len(), 3),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn stub_without_pullreq_reports_error() {
    let engine = StubEngine::default().start();
    let (tx, rx) = mpsc::channel();

    engine.send(Request::FetchPullReq {
        target: target(),
        reply_tx: tx,
    });

    assert!(matches!(
        rx.recv_timeout(Duration::from_secs(5)).unwrap(),
        Event::FetchError { .. }
    ));
}

#[test]
fn mutation_comes_back_unchanged() {
    let engine = StubEngine::default().start();
    let (tx, rx) = mpsc::channel();
    let mutation = Mutation::RemoveLabel {
        label_id: 11,
        key: "prio".to_owned(),
        value: Some("high".to_owned()),
    };

    engine.send(Request::Mutate {
        target: target(),
        mutation: mutation.clone(),
        reply_tx: tx,
    });

    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        Event::MutationOk { mutation: back } => assert_eq!(back, mutation),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(mutation.describe(), "remove label prio:high");
}

#[test]
fn failing_search_reports_its_kind() {
    let engine = StubEngine {
        fail_searches: Some("down".to_owned()),
        ..Default::default()
    }
    .start();
    let (tx, rx) = mpsc::channel();

    engine.send(Request::SearchAssignableLabels {
        target: target(),
        query: "pri".to_owned(),
        reply_tx: tx,
    });

    match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
        Event::SearchFailed {
            search,
            query,
            message,
        } => {
            assert_eq!(search, SearchKind::AssignableLabels);
            assert_eq!(query, "pri");
            assert_eq!(message, "down");
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn shutdown_stops_the_loop() {
    let engine = StubEngine::default().start();
    let (tx, rx) = mpsc::channel();

    engine.send(Request::Shutdown);
    engine.send(Request::FetchActivities {
        target: target(),
        reply_tx: tx,
    });

    // The request after shutdown is never answered; its sender is dropped.
    assert!(rx.recv_timeout(Duration::from_secs(5)).is_err());
}
