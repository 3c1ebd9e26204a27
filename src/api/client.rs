use std::time::Duration;

use reqwest::{Client, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::api::auth;
use crate::api::error::ApiError;
use crate::config::types::ApiConfig;
use crate::types::{
    Activity, Principal, PullReq, PullReqTarget, ReviewerAssignment, ScopesLabels, decode_entries,
};

/// HTTP client bound to one server's API base URL.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted.
#[derive(Debug, Clone)]
pub struct CodeClient {
    client: Client,
    base_url: String,
    principal_limit: u32,
}

#[derive(Serialize)]
struct AddReviewerBody {
    reviewer_id: i64,
}

#[derive(Serialize)]
struct AssignLabelBody {
    label_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    value_id: Option<i64>,
}

impl CodeClient {
    /// Build a client from the `[api]` config table.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = auth::resolve_token(config) {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::Config("token contains invalid characters".to_owned()))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            principal_limit: config.principal_limit,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn pullreq_url(&self, target: &PullReqTarget, suffix: &str) -> String {
        self.url(&format!("{}{suffix}", target.route()))
    }

    // -----------------------------------------------------------------------
    // Response handling
    // -----------------------------------------------------------------------

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!("api: {status} body={body}");
        Err(ApiError::from_body(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response, endpoint: &str) -> Result<T, ApiError> {
        let bytes = Self::check(response).await?.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_owned(),
            source,
        })
    }

    /// Decode a JSON array, dropping malformed entries instead of failing.
    async fn decode_list<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
        what: &str,
    ) -> Result<Vec<T>, ApiError> {
        // The server sends `null` for empty collections.
        let raw: Option<Vec<serde_json::Value>> = Self::decode(response, endpoint).await?;
        Ok(decode_entries(what, raw.unwrap_or_default()))
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub async fn get_pull_req(&self, target: &PullReqTarget) -> Result<PullReq, ApiError> {
        let url = self.pullreq_url(target, "");
        tracing::debug!("api: GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::decode(response, &url).await
    }

    pub async fn list_reviewers(
        &self,
        target: &PullReqTarget,
    ) -> Result<Vec<ReviewerAssignment>, ApiError> {
        let url = self.pullreq_url(target, "/reviewers");
        tracing::debug!("api: GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::decode_list(response, &url, "reviewer").await
    }

    pub async fn list_labels(&self, target: &PullReqTarget) -> Result<ScopesLabels, ApiError> {
        let url = self.pullreq_url(target, "/labels");
        tracing::debug!("api: GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::decode(response, &url).await
    }

    /// Labels that can still be assigned, filtered by `query`.
    pub async fn search_assignable_labels(
        &self,
        target: &PullReqTarget,
        query: &str,
    ) -> Result<ScopesLabels, ApiError> {
        let url = self.pullreq_url(target, "/labels");
        tracing::debug!("api: GET {url} assignable query={query:?}");
        let response = self
            .client
            .get(&url)
            .query(&[("assignable", "true"), ("query", query)])
            .send()
            .await?;
        Self::decode(response, &url).await
    }

    pub async fn list_activities(&self, target: &PullReqTarget) -> Result<Vec<Activity>, ApiError> {
        let url = self.pullreq_url(target, "/activities");
        tracing::debug!("api: GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::decode_list(response, &url, "activity").await
    }

    /// User principals matching `query`, for the reviewer picker.
    pub async fn search_principals(&self, query: &str) -> Result<Vec<Principal>, ApiError> {
        let url = self.url("/principals");
        tracing::debug!("api: GET {url} query={query:?}");
        let limit = self.principal_limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("query", query), ("type", "user"), ("limit", limit.as_str())])
            .send()
            .await?;
        Self::decode_list(response, &url, "principal").await
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    pub async fn add_reviewer(&self, target: &PullReqTarget, reviewer_id: i64) -> Result<(), ApiError> {
        let url = self.pullreq_url(target, "/reviewers");
        tracing::debug!("api: PUT {url} reviewer_id={reviewer_id}");
        let response = self
            .client
            .put(&url)
            .json(&AddReviewerBody { reviewer_id })
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    pub async fn remove_reviewer(
        &self,
        target: &PullReqTarget,
        reviewer_id: i64,
    ) -> Result<(), ApiError> {
        let url = self.pullreq_url(target, &format!("/reviewers/{reviewer_id}"));
        tracing::debug!("api: DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await.map(drop)
    }

    pub async fn assign_label(
        &self,
        target: &PullReqTarget,
        label_id: i64,
        value_id: Option<i64>,
    ) -> Result<(), ApiError> {
        let url = self.pullreq_url(target, "/labels");
        tracing::debug!("api: PUT {url} label_id={label_id} value_id={value_id:?}");
        let response = self
            .client
            .put(&url)
            .json(&AssignLabelBody { label_id, value_id })
            .send()
            .await?;
        Self::check(response).await.map(drop)
    }

    pub async fn remove_label(&self, target: &PullReqTarget, label_id: i64) -> Result<(), ApiError> {
        let url = self.pullreq_url(target, &format!("/labels/{label_id}"));
        tracing::debug!("api: DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        Self::check(response).await.map(drop)
    }
}
