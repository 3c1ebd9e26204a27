use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::reviewer::Principal;

/// One entry of the pull-request activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub text: String,
    pub author: Principal,
}

impl Activity {
    /// One-line summary for the feed: comment text when present, else the event type.
    pub fn summary(&self) -> String {
        let body = if self.text.is_empty() {
            self.activity_type.replace('-', " ")
        } else {
            self.text.lines().next().unwrap_or_default().to_owned()
        };
        format!("{}: {body}", self.author.display_name)
    }
}
