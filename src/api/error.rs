use thiserror::Error;

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-success status.
    #[error("{message}")]
    Status {
        status: u16,
        /// Payload message, or the reason phrase when the body carries none.
        message: String,
    },

    #[error(transparent)]
    Network(#[from] reqwest::Error),

    #[error("invalid response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Build a status error from a response body that may carry a JSON payload.
    pub(crate) fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        let message = payload_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
        });
        Self::Status {
            status: status.as_u16(),
            message,
        }
    }
}

/// The message shown to the user for a failed call.
///
/// Payload `error`, then payload `message`, then the HTTP reason, then the
/// transport error text.
pub fn error_message(err: &ApiError) -> String {
    err.to_string()
}

fn payload_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"].into_iter().find_map(|field| {
        value
            .get(field)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn error_field_preferred_over_message() {
        let err = ApiError::from_body(
            StatusCode::BAD_REQUEST,
            r#"{"message": "generic", "error": "reviewer already added"}"#,
        );
        assert_eq!(error_message(&err), "reviewer already added");
    }

    #[test]
    fn message_field_used_when_no_error() {
        let err = ApiError::from_body(StatusCode::FORBIDDEN, r#"{"message": "Forbidden!"}"#);
        assert_eq!(error_message(&err), "Forbidden!");
    }

    #[test]
    fn reason_phrase_for_non_json_body() {
        let err = ApiError::from_body(StatusCode::NOT_FOUND, "<html>nope</html>");
        assert_eq!(error_message(&err), "Not Found");
    }
}
