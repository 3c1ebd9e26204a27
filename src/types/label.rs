use serde::{Deserialize, Serialize};

/// Named label colors understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColor {
    Red,
    Green,
    Yellow,
    Blue,
    Pink,
    Purple,
    Violet,
    Indigo,
    Cyan,
    Orange,
    Brown,
    Mint,
    Lime,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One selectable value of a label (`team:backend` has key `team`, value `backend`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelValue {
    #[serde(default)]
    pub id: Option<i64>,
    pub value: String,
    #[serde(default)]
    pub color: LabelColor,
}

/// A label as attached to (or assignable to) a pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelAssignment {
    pub id: i64,
    pub key: String,
    #[serde(default)]
    pub color: LabelColor,
    /// 0 for repository labels, > 0 for labels inherited from parent spaces.
    #[serde(default)]
    pub scope: i64,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub assigned_value: Option<LabelValue>,
    /// Candidate values; only populated in the assignable-label listing.
    #[serde(default)]
    pub values: Vec<LabelValue>,
}

impl LabelAssignment {
    /// `"key:value"` when a value is assigned, else `"key"`.
    pub fn display_name(&self) -> String {
        label_text(&self.key, self.assigned_value.as_ref().map(|v| v.value.as_str()))
    }
}

/// Format a label the way it appears in chips and notifications.
pub fn label_text(key: &str, value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => format!("{key}:{v}"),
        _ => key.to_owned(),
    }
}

/// Where a label scope lives (repository or one of its parent spaces).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeData {
    pub scope: i64,
    #[serde(default)]
    pub space_path: Option<String>,
    #[serde(default)]
    pub repo_path: Option<String>,
}

/// Labels plus the scopes they come from, as returned by the label endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScopesLabels {
    pub label_data: Vec<LabelAssignment>,
    pub scope_data: Vec<ScopeData>,
}

impl ScopesLabels {
    pub fn is_empty(&self) -> bool {
        self.label_data.is_empty()
    }
}

#[derive(Deserialize)]
struct RawScopesLabels {
    #[serde(default)]
    label_data: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    scope_data: Option<Vec<ScopeData>>,
}

impl<'de> Deserialize<'de> for ScopesLabels {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // `label_data` may be null; malformed entries are dropped one by one.
        let raw = RawScopesLabels::deserialize(deserializer)?;
        Ok(Self {
            label_data: super::decode_entries("label", raw.label_data.unwrap_or_default()),
            scope_data: raw.scope_data.unwrap_or_default(),
        })
    }
}

/// One entry in the label picker: a label key, optionally narrowed to a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelChoice {
    pub label_id: i64,
    pub value_id: Option<i64>,
    pub key: String,
    pub value: Option<String>,
}

impl LabelChoice {
    pub fn text(&self) -> String {
        label_text(&self.key, self.value.as_deref())
    }
}

/// Flatten assignable labels into picker entries: one per value, or the bare key.
pub fn label_choices(labels: &[LabelAssignment]) -> Vec<LabelChoice> {
    let mut out = Vec::new();
    for label in labels {
        if label.values.is_empty() {
            out.push(LabelChoice {
                label_id: label.id,
                value_id: None,
                key: label.key.clone(),
                value: None,
            });
            continue;
        }
        for value in &label.values {
            out.push(LabelChoice {
                label_id: label.id,
                value_id: value.id,
                key: label.key.clone(),
                value: Some(value.value.clone()),
            });
        }
    }
    out
}
