use tokio::sync::mpsc::UnboundedReceiver;

use crate::types::{Activity, Principal, PullReq, ReviewerAssignment, ScopesLabels};

use super::interface::{Engine, EngineHandle, Event, Request, SearchKind};

/// A stub engine that serves pre-loaded fixture data without any network calls.
///
/// Useful for integration tests and UI demos that must not require a server.
#[derive(Debug, Clone, Default)]
pub struct StubEngine {
    pub pullreq: Option<PullReq>,
    pub reviewers: Vec<ReviewerAssignment>,
    pub labels: ScopesLabels,
    pub assignable: ScopesLabels,
    pub activities: Vec<Activity>,
    pub principals: Vec<Principal>,
    /// When set, every mutation fails with this message.
    pub fail_mutations: Option<String>,
    /// When set, every label or principal search fails with this message.
    pub fail_searches: Option<String>,
}

impl Engine for StubEngine {
    fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        std::thread::spawn(move || match tokio::runtime::Runtime::new() {
            Ok(rt) => rt.block_on(self.run_loop(rx)),
            Err(e) => tracing::error!("stub engine: tokio runtime init failed: {e}"),
        });
        EngineHandle::new(tx)
    }
}

impl StubEngine {
    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        while let Some(req) = rx.recv().await {
            match req {
                Request::FetchPullReq { reply_tx, .. } => {
                    let event = match &self.pullreq {
                        Some(pullreq) => Event::PullReqFetched {
                            pullreq: pullreq.clone(),
                        },
                        None => Event::FetchError {
                            context: "stub".into(),
                            message: "no pull request in stub".into(),
                        },
                    };
                    let _ = reply_tx.send(event);
                }
                Request::FetchReviewers { reply_tx, .. } => {
                    let _ = reply_tx.send(Event::ReviewersFetched {
                        reviewers: self.reviewers.clone(),
                    });
                }
                Request::FetchLabels { reply_tx, .. } => {
                    let _ = reply_tx.send(Event::LabelsFetched {
                        labels: self.labels.clone(),
                    });
                }
                Request::FetchActivities { reply_tx, .. } => {
                    let _ = reply_tx.send(Event::ActivitiesFetched {
                        activities: self.activities.clone(),
                    });
                }
                Request::SearchAssignableLabels {
                    query, reply_tx, ..
                } if self.fail_searches.is_some() => {
                    let _ = reply_tx.send(self.search_failed(SearchKind::AssignableLabels, query));
                }
                Request::SearchAssignableLabels {
                    query, reply_tx, ..
                } => {
                    let mut labels = self.assignable.clone();
                    labels.label_data.retain(|l| l.key.contains(query.as_str()));
                    let _ = reply_tx.send(Event::AssignableLabelsFetched { query, labels });
                }
                Request::SearchPrincipals { query, reply_tx } if self.fail_searches.is_some() => {
                    let _ = reply_tx.send(self.search_failed(SearchKind::Principals, query));
                }
                Request::SearchPrincipals { query, reply_tx } => {
                    let needle = query.to_lowercase();
                    let principals = self
                        .principals
                        .iter()
                        .filter(|p| p.display_name.to_lowercase().contains(&needle))
                        .cloned()
                        .collect();
                    let _ = reply_tx.send(Event::PrincipalsFetched { query, principals });
                }

                // Mutations settle instantly, with the configured outcome.
                Request::Mutate {
                    mutation, reply_tx, ..
                } => {
                    let event = match &self.fail_mutations {
                        Some(message) => Event::MutationError {
                            mutation,
                            message: message.clone(),
                        },
                        None => Event::MutationOk { mutation },
                    };
                    let _ = reply_tx.send(event);
                }

                Request::Shutdown => break,
            }
        }
    }

    fn search_failed(&self, search: SearchKind, query: String) -> Event {
        Event::SearchFailed {
            search,
            query,
            message: self.fail_searches.clone().unwrap_or_default(),
        }
    }
}
