use serde::{Deserialize, Serialize};

/// Review decision as stored by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approved,
    #[serde(rename = "changereq")]
    ChangeReq,
    Pending,
    Reviewed,
    #[serde(other)]
    Unknown,
}

/// A user or service account known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

impl Principal {
    /// Label used by the reviewer picker: `"Name <email>"`, or the bare name.
    pub fn picker_label(&self) -> String {
        if self.email.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} <{}>", self.display_name, self.email)
        }
    }
}

/// A reviewer attached to a pull request together with their latest decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewerAssignment {
    pub reviewer: Principal,
    pub review_decision: ReviewDecision,
    /// Commit the decision was recorded against; empty when never reviewed.
    #[serde(default)]
    pub sha: String,
    /// How the reviewer got attached (`requested`, `self_assigned`, ...).
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl ReviewerAssignment {
    pub fn id(&self) -> i64 {
        self.reviewer.id
    }
}
