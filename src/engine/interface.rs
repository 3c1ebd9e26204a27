use std::sync::mpsc::Sender;

use crate::types::{
    Activity, LabelChoice, Principal, PullReq, PullReqTarget, ReviewerAssignment, ScopesLabels,
    label_text,
};

/// Handle to the backend engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking, returns immediately.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// Trait implemented by both `CodeEngine` and `StubEngine`.
pub trait Engine: Send + 'static {
    fn start(self) -> EngineHandle;
}

/// A state-changing call issued from the sidebar.
///
/// Travels with the request and comes back unchanged in the outcome event,
/// so the sidebar knows which follow-ups to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddReviewer {
        reviewer_id: i64,
    },
    RemoveReviewer {
        reviewer_id: i64,
    },
    AssignLabel {
        choice: LabelChoice,
    },
    RemoveLabel {
        label_id: i64,
        key: String,
        value: Option<String>,
    },
}

impl Mutation {
    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::AddReviewer { reviewer_id } => format!("add reviewer {reviewer_id}"),
            Self::RemoveReviewer { reviewer_id } => format!("remove reviewer {reviewer_id}"),
            Self::AssignLabel { choice } => format!("assign label {}", choice.text()),
            Self::RemoveLabel { key, value, .. } => {
                format!("remove label {}", label_text(key, value.as_deref()))
            }
        }
    }
}

/// All operations the UI layer can send to the engine.
pub enum Request {
    // -----------------------------------------------------------------------
    // Fetch operations
    // -----------------------------------------------------------------------
    FetchPullReq {
        target: PullReqTarget,
        reply_tx: Sender<Event>,
    },
    FetchReviewers {
        target: PullReqTarget,
        reply_tx: Sender<Event>,
    },
    FetchLabels {
        target: PullReqTarget,
        reply_tx: Sender<Event>,
    },
    FetchActivities {
        target: PullReqTarget,
        reply_tx: Sender<Event>,
    },
    SearchAssignableLabels {
        target: PullReqTarget,
        query: String,
        reply_tx: Sender<Event>,
    },
    SearchPrincipals {
        query: String,
        reply_tx: Sender<Event>,
    },

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------
    Mutate {
        target: PullReqTarget,
        mutation: Mutation,
        reply_tx: Sender<Event>,
    },

    // -----------------------------------------------------------------------
    // Control
    // -----------------------------------------------------------------------
    Shutdown,
}

/// The sidebar's own searches, as opposed to host collection fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    AssignableLabels,
    Principals,
}

/// All events the engine can push back to the UI.
#[derive(Debug, Clone)]
pub enum Event {
    // -----------------------------------------------------------------------
    // Fetch results
    // -----------------------------------------------------------------------
    PullReqFetched {
        pullreq: PullReq,
    },
    ReviewersFetched {
        reviewers: Vec<ReviewerAssignment>,
    },
    LabelsFetched {
        labels: ScopesLabels,
    },
    ActivitiesFetched {
        activities: Vec<Activity>,
    },
    AssignableLabelsFetched {
        query: String,
        labels: ScopesLabels,
    },
    PrincipalsFetched {
        query: String,
        principals: Vec<Principal>,
    },
    /// A host fetch failed; mutations report through `MutationError` and
    /// searches through `SearchFailed` instead.
    FetchError {
        context: String,
        message: String,
    },
    SearchFailed {
        search: SearchKind,
        query: String,
        message: String,
    },

    // -----------------------------------------------------------------------
    // Mutation results
    // -----------------------------------------------------------------------
    MutationOk {
        mutation: Mutation,
    },
    MutationError {
        mutation: Mutation,
        message: String,
    },
}
