// Shared domain types: used by the API client, the engine and the UI layer.
// None of those layers depends on another; all import from this module.

pub mod activity;
pub mod label;
pub mod pullreq;
pub mod reviewer;

pub use activity::*;
pub use label::*;
pub use pullreq::*;
pub use reviewer::*;

use serde::de::DeserializeOwned;

/// Decode a JSON array entry by entry, dropping entries that do not match `T`.
///
/// A single malformed element must not hide the rest of a collection, so
/// failures are logged and skipped instead of failing the whole list.
pub fn decode_entries<T: DeserializeOwned>(what: &str, values: Vec<serde_json::Value>) -> Vec<T> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match serde_json::from_value::<T>(value) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("dropping malformed {what} entry #{idx}: {e}");
                None
            }
        })
        .collect()
}
