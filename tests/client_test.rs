use pr_sidebar::api::{ApiError, CodeClient, error_message};
use pr_sidebar::config::types::ApiConfig;
use pr_sidebar::types::{PullReqTarget, ReviewDecision};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTE: &str = "/api/v1/repos/space/repo/+/pullreq/7";

fn client(server: &MockServer) -> CodeClient {
    let config = ApiConfig {
        base_url: format!("{}/api/v1", server.uri()),
        token: Some("tok".to_owned()),
        ..ApiConfig::default()
    };
    CodeClient::new(&config).unwrap()
}

fn target() -> PullReqTarget {
    PullReqTarget::new("space/repo", 7)
}

fn fixture(name: &str) -> serde_json::Value {
    let text = match name {
        "reviewers" => include_str!("fixtures/reviewers.json"),
        "labels" => include_str!("fixtures/labels.json"),
        "pullreq" => include_str!("fixtures/pullreq.json"),
        "activities" => include_str!("fixtures/activities.json"),
        other => panic!("no fixture {other}"),
    };
    serde_json::from_str(text).unwrap()
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_reviewer_puts_reviewer_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ROUTE}/reviewers")))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(serde_json::json!({"reviewer_id": 42})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).add_reviewer(&target(), 42).await.unwrap();
}

#[tokio::test]
async fn remove_reviewer_deletes_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ROUTE}/reviewers/3")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).remove_reviewer(&target(), 3).await.unwrap();
}

#[tokio::test]
async fn assign_label_puts_label_and_value() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ROUTE}/labels")))
        .and(body_json(serde_json::json!({"label_id": 2, "value_id": 20})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .assign_label(&target(), 2, Some(20))
        .await
        .unwrap();
}

#[tokio::test]
async fn assign_label_without_value_omits_value_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ROUTE}/labels")))
        .and(body_json(serde_json::json!({"label_id": 1})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).assign_label(&target(), 1, None).await.unwrap();
}

#[tokio::test]
async fn remove_label_deletes_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ROUTE}/labels/11")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).remove_label(&target(), 11).await.unwrap();
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn error_payload_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{ROUTE}/reviewers")))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(serde_json::json!({"message": "reviewer is the author"})),
        )
        .mount(&server)
        .await;

    let err = client(&server).add_reviewer(&target(), 5).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 400, .. }));
    assert_eq!(error_message(&err), "reviewer is the author");
}

#[tokio::test]
async fn empty_error_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{ROUTE}/labels/9")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).remove_label(&target(), 9).await.unwrap_err();
    assert_eq!(error_message(&err), "Not Found");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let config = ApiConfig {
        // Port 9 (discard) is not expected to be listening.
        base_url: "http://127.0.0.1:9/api/v1".to_owned(),
        ..ApiConfig::default()
    };
    let client = CodeClient::new(&config).unwrap();
    let err = client.list_reviewers(&target()).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert!(!error_message(&err).is_empty());
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reviewers_drop_malformed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROUTE}/reviewers")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("reviewers")))
        .mount(&server)
        .await;

    let reviewers = client(&server).list_reviewers(&target()).await.unwrap();
    let ids: Vec<i64> = reviewers.iter().map(|r| r.id()).collect();
    assert_eq!(ids, [1, 2, 3]);
    assert_eq!(reviewers[1].review_decision, ReviewDecision::ChangeReq);
}

#[tokio::test]
async fn null_reviewers_are_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROUTE}/reviewers")))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let reviewers = client(&server).list_reviewers(&target()).await.unwrap();
    assert!(reviewers.is_empty());
}

#[tokio::test]
async fn pull_request_and_labels_decode() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("pullreq")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{ROUTE}/labels")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("labels")))
        .mount(&server)
        .await;

    let client = client(&server);
    let pullreq = client.get_pull_req(&target()).await.unwrap();
    assert_eq!(pullreq.source_sha.as_deref(), Some("x"));

    let labels = client.list_labels(&target()).await.unwrap();
    assert_eq!(labels.label_data.len(), 2);
    assert_eq!(labels.scope_data.len(), 2);
}

#[tokio::test]
async fn activities_drop_malformed_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROUTE}/activities")))
        .respond_with(ResponseTemplate::new(200).set_body_json(fixture("activities")))
        .mount(&server)
        .await;

    let activities = client(&server).list_activities(&target()).await.unwrap();
    assert_eq!(activities.len(), 2);
    assert_eq!(activities[1].summary(), "Ann: Looks good");
}

#[tokio::test]
async fn assignable_search_sends_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{ROUTE}/labels")))
        .and(query_param("assignable", "true"))
        .and(query_param("query", "pri"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "label_data": [{"id": 2, "key": "prio"}],
            "scope_data": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let labels = client(&server)
        .search_assignable_labels(&target(), "pri")
        .await
        .unwrap();
    assert_eq!(labels.label_data[0].key, "prio");
}

#[tokio::test]
async fn principal_search_limits_to_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/principals"))
        .and(query_param("query", "an"))
        .and(query_param("type", "user"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "uid": "ann", "display_name": "Ann", "email": "ann@example.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let principals = client(&server).search_principals("an").await.unwrap();
    assert_eq!(principals[0].picker_label(), "Ann <ann@example.com>");
}
