use std::sync::mpsc::Sender;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{ApiError, CodeClient, error_message};
use crate::types::PullReqTarget;

use super::interface::{Engine, EngineHandle, Event, Mutation, Request, SearchKind};

/// The real backend engine: executes requests against the server's REST API.
pub struct CodeEngine {
    client: CodeClient,
}

impl CodeEngine {
    pub fn new(client: CodeClient) -> Self {
        Self { client }
    }
}

impl Engine for CodeEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let spawned = std::thread::Builder::new()
            .name("api-engine".to_owned())
            .spawn(move || match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(self.run_loop(rx)),
                Err(e) => tracing::error!("engine: tokio runtime init failed: {e}"),
            });
        if let Err(e) = spawned {
            tracing::error!("engine: thread spawn failed: {e}");
        }
        handle
    }
}

impl CodeEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        loop {
            match rx.recv().await {
                None | Some(Request::Shutdown) => {
                    tracing::debug!("engine: shutting down");
                    break;
                }
                Some(req) => {
                    // Requests run concurrently: a label search may overlap
                    // a removal, and nothing is cancelled.
                    let client = self.client.clone();
                    tokio::spawn(handle_request(req, client));
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Request dispatch
// ---------------------------------------------------------------------------

async fn handle_request(req: Request, client: CodeClient) {
    match req {
        Request::FetchPullReq { target, reply_tx } => {
            let result = client.get_pull_req(&target).await;
            reply(&reply_tx, "FetchPullReq", &target, result, |pullreq| {
                Event::PullReqFetched { pullreq }
            });
        }
        Request::FetchReviewers { target, reply_tx } => {
            let result = client.list_reviewers(&target).await;
            reply(&reply_tx, "FetchReviewers", &target, result, |reviewers| {
                tracing::debug!("engine: sending ReviewersFetched count={}", reviewers.len());
                Event::ReviewersFetched { reviewers }
            });
        }
        Request::FetchLabels { target, reply_tx } => {
            let result = client.list_labels(&target).await;
            reply(&reply_tx, "FetchLabels", &target, result, |labels| {
                Event::LabelsFetched { labels }
            });
        }
        Request::FetchActivities { target, reply_tx } => {
            let result = client.list_activities(&target).await;
            reply(&reply_tx, "FetchActivities", &target, result, |activities| {
                Event::ActivitiesFetched { activities }
            });
        }
        Request::SearchAssignableLabels {
            target,
            query,
            reply_tx,
        } => {
            let event = match client.search_assignable_labels(&target, &query).await {
                Ok(labels) => Event::AssignableLabelsFetched { query, labels },
                Err(e) => search_failed(SearchKind::AssignableLabels, query, &e),
            };
            let _ = reply_tx.send(event);
        }
        Request::SearchPrincipals { query, reply_tx } => {
            let event = match client.search_principals(&query).await {
                Ok(principals) => Event::PrincipalsFetched { query, principals },
                Err(e) => search_failed(SearchKind::Principals, query, &e),
            };
            let _ = reply_tx.send(event);
        }
        Request::Mutate {
            target,
            mutation,
            reply_tx,
        } => {
            let result = run_mutation(&client, &target, &mutation).await;
            let event = match result {
                Ok(()) => {
                    tracing::debug!("engine: {} on {target} ok", mutation.describe());
                    Event::MutationOk { mutation }
                }
                Err(e) => {
                    tracing::debug!("engine: {} on {target} failed: {e}", mutation.describe());
                    Event::MutationError {
                        mutation,
                        message: error_message(&e),
                    }
                }
            };
            let _ = reply_tx.send(event);
        }
        // Handled by the run loop.
        Request::Shutdown => {}
    }
}

async fn run_mutation(
    client: &CodeClient,
    target: &PullReqTarget,
    mutation: &Mutation,
) -> Result<(), ApiError> {
    match mutation {
        Mutation::AddReviewer { reviewer_id } => client.add_reviewer(target, *reviewer_id).await,
        Mutation::RemoveReviewer { reviewer_id } => {
            client.remove_reviewer(target, *reviewer_id).await
        }
        Mutation::AssignLabel { choice } => {
            client
                .assign_label(target, choice.label_id, choice.value_id)
                .await
        }
        Mutation::RemoveLabel { label_id, .. } => client.remove_label(target, *label_id).await,
    }
}

fn search_failed(search: SearchKind, query: String, err: &ApiError) -> Event {
    tracing::debug!("engine: {search:?} search {query:?} error: {err}");
    Event::SearchFailed {
        search,
        query,
        message: error_message(err),
    }
}

fn reply<T>(
    reply_tx: &Sender<Event>,
    context: &str,
    target: &PullReqTarget,
    result: Result<T, ApiError>,
    on_ok: impl FnOnce(T) -> Event,
) {
    let event = match result {
        Ok(value) => on_ok(value),
        Err(e) => {
            tracing::debug!("engine: {context} {target} error: {e}");
            Event::FetchError {
                context: context.to_owned(),
                message: error_message(&e),
            }
        }
    };
    let _ = reply_tx.send(event);
}
