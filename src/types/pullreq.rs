use std::fmt;

use serde::{Deserialize, Serialize};

use super::reviewer::Principal;

/// Addresses one pull request: repository path (`space/repo`) plus number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PullReqTarget {
    pub repo_path: String,
    pub number: u64,
}

impl PullReqTarget {
    pub fn new(repo_path: impl Into<String>, number: u64) -> Self {
        Self {
            repo_path: repo_path.into(),
            number,
        }
    }

    /// API route prefix shared by every pull-request endpoint.
    pub fn route(&self) -> String {
        format!("/repos/{}/+/pullreq/{}", self.repo_path, self.number)
    }
}

impl fmt::Display for PullReqTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.repo_path, self.number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullReqState {
    Open,
    Closed,
    Merged,
    #[serde(other)]
    Unknown,
}

/// Pull-request metadata the sidebar needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullReq {
    pub number: u64,
    pub title: String,
    pub state: PullReqState,
    #[serde(default)]
    pub is_draft: bool,
    /// Head commit of the source branch; reviews recorded on other commits are outdated.
    #[serde(default)]
    pub source_sha: Option<String>,
    #[serde(default)]
    pub source_branch: String,
    #[serde(default)]
    pub target_branch: String,
    #[serde(default)]
    pub author: Option<Principal>,
}
