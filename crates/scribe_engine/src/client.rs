use reqwest::StatusCode;
use scribe_core::{
    Article, ArticleOutline, ArticleRequest, Job, JobCreateResponse, JobId, ListQuery,
    SerpAnalysis,
};
use scribe_logging::{scribe_debug, scribe_warn};
use serde::de::DeserializeOwned;
use url::Url;

use crate::{ApiError, ApiSettings, FailureKind};

/// Typed access to the content backend. No retries, no caching.
#[async_trait::async_trait]
pub trait ContentApi: Send + Sync {
    async fn health(&self) -> Result<serde_json::Value, ApiError>;

    async fn create_job(&self, request: &ArticleRequest) -> Result<JobCreateResponse, ApiError>;

    async fn get_job(&self, job_id: &JobId) -> Result<Job, ApiError>;

    async fn list_jobs(&self, query: ListQuery) -> Result<Vec<Job>, ApiError>;

    async fn resume_job(&self, job_id: &JobId) -> Result<Job, ApiError>;

    async fn generate_article(&self, request: &ArticleRequest) -> Result<Article, ApiError>;

    async fn research_topic(&self, topic: &str) -> Result<SerpAnalysis, ApiError>;

    async fn generate_outline(&self, request: &ArticleRequest) -> Result<ArticleOutline, ApiError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestContentApi {
    settings: ApiSettings,
    client: reqwest::Client,
}

impl ReqwestContentApi {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| ApiError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.settings.base_url
    }

    /// Joins `segments` onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.settings.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be used as a base URL", self.settings.base_url),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let err = http_error(status, &body);
            scribe_warn!("{what} failed: {} ({})", err.message, err.kind);
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|err| {
            scribe_warn!("{what} returned an undecodable body: {err}");
            ApiError::new(FailureKind::Decode, format!("invalid {what} response: {err}"))
        })
    }
}

#[async_trait::async_trait]
impl ContentApi for ReqwestContentApi {
    async fn health(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(&[])?;
        scribe_debug!("GET {url}");
        self.send(self.client.get(url), "health check").await
    }

    async fn create_job(&self, request: &ArticleRequest) -> Result<JobCreateResponse, ApiError> {
        let url = self.endpoint(&["jobs"])?;
        scribe_debug!("POST {url} topic_len={}", request.topic.len());
        self.send(self.client.post(url).json(request), "create job")
            .await
    }

    async fn get_job(&self, job_id: &JobId) -> Result<Job, ApiError> {
        let url = self.endpoint(&["jobs", job_id.as_str()])?;
        scribe_debug!("GET {url}");
        self.send(self.client.get(url), "get job").await
    }

    async fn list_jobs(&self, query: ListQuery) -> Result<Vec<Job>, ApiError> {
        let mut url = self.endpoint(&["jobs"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(status) = query.status {
                pairs.append_pair("status", status.as_str());
            }
            pairs.append_pair("limit", &query.limit.to_string());
        }
        scribe_debug!("GET {url}");
        self.send(self.client.get(url), "list jobs").await
    }

    async fn resume_job(&self, job_id: &JobId) -> Result<Job, ApiError> {
        let url = self.endpoint(&["jobs", job_id.as_str(), "resume"])?;
        scribe_debug!("POST {url}");
        self.send(self.client.post(url), "resume job").await
    }

    async fn generate_article(&self, request: &ArticleRequest) -> Result<Article, ApiError> {
        let url = self.endpoint(&["generate"])?;
        scribe_debug!("POST {url} topic_len={}", request.topic.len());
        self.send(self.client.post(url).json(request), "generate article")
            .await
    }

    async fn research_topic(&self, topic: &str) -> Result<SerpAnalysis, ApiError> {
        let url = self.endpoint(&["research", topic])?;
        scribe_debug!("GET {url}");
        self.send(self.client.get(url), "research topic").await
    }

    async fn generate_outline(&self, request: &ArticleRequest) -> Result<ArticleOutline, ApiError> {
        let url = self.endpoint(&["outline"])?;
        scribe_debug!("POST {url} topic_len={}", request.topic.len());
        self.send(self.client.post(url).json(request), "generate outline")
            .await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        return ApiError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return ApiError::new(FailureKind::Decode, err.to_string());
    }
    ApiError::new(FailureKind::Network, err.to_string())
}

/// Builds the error for a non-2xx response, preferring the backend's `detail`.
fn http_error(status: StatusCode, body: &[u8]) -> ApiError {
    let kind = if status == StatusCode::NOT_FOUND {
        FailureKind::NotFound
    } else {
        FailureKind::HttpStatus(status.as_u16())
    };
    let message = serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|payload| detail_message(payload.get("detail")?))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string())
        });
    ApiError::new(kind, message)
}

/// `detail` is a string for handled errors and a list of `{loc, msg}` for
/// request validation failures.
fn detail_message(detail: &serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(|msg| msg.as_str()) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}
