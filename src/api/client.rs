use crate::api::models::{
    parse_peptides, parse_posts, CommunityPost, EntityType, Peptide, RejectionCode,
    SubmissionPayload,
};
use crate::utils::config::Config;
use crate::utils::error::{ApiError, ApiResult, SubmitError};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const PEPTIDES_PATH: &str = "/api/content/peptides";
pub const SUBMIT_PATH: &str = "/api/ugc/submit";
pub const LIST_PATH: &str = "/api/ugc/list";

/// The site endpoints the forms talk to.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UgcBackend: Send + Sync {
    /// Compound list for search. A body of the wrong shape is an empty list,
    /// not an error.
    async fn fetch_peptides(&self) -> ApiResult<Vec<Peptide>>;

    /// Sends one submission to the moderation queue.
    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError>;

    /// Approved community posts for one page.
    async fn list_posts(&self, entity_type: EntityType, slug: &str) -> ApiResult<Vec<CommunityPost>>;
}

#[derive(Debug, Clone)]
pub struct UgcClient {
    client: Client,
    endpoint: String,
}

impl UgcClient {
    pub fn new(endpoint: &str, timeout: Duration) -> ApiResult<Self> {
        let parsed =
            Url::parse(endpoint).map_err(|_| ApiError::InvalidEndpoint(endpoint.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidEndpoint(endpoint.to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stack-suggest/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> ApiResult<Self> {
        Self::new(&config.endpoint, Duration::from_secs(config.request_timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    async fn get_json(&self, url: String, query: &[(&str, &str)]) -> ApiResult<Value> {
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;

        if !response.status().is_success() {
            return Err(ApiError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        match response.json::<Value>().await {
            Ok(body) => Ok(body),
            Err(e) => {
                warn!(%url, error = %e, "response body is not JSON, treating as empty");
                Ok(Value::Null)
            }
        }
    }
}

#[async_trait]
impl UgcBackend for UgcClient {
    async fn fetch_peptides(&self) -> ApiResult<Vec<Peptide>> {
        let body = self.get_json(self.url(PEPTIDES_PATH), &[]).await?;
        let peptides = parse_peptides(&body);
        debug!(count = peptides.len(), "fetched compound list");
        Ok(peptides)
    }

    async fn submit(&self, payload: &SubmissionPayload) -> Result<(), SubmitError> {
        let url = self.url(SUBMIT_PATH);
        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SubmitError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.bytes().await.unwrap_or_default();
        let code = RejectionCode::from_body(&body);
        debug!(status = status.as_u16(), code = code.as_str(), "submission rejected");
        Err(SubmitError::Rejected(code))
    }

    async fn list_posts(&self, entity_type: EntityType, slug: &str) -> ApiResult<Vec<CommunityPost>> {
        let body = self
            .get_json(
                self.url(LIST_PATH),
                &[("type", entity_type.as_str()), ("slug", slug)],
            )
            .await?;
        Ok(parse_posts(&body))
    }
}
