use std::fmt;
use std::time::Duration;

use scribe_core::{
    FetchPurpose, IntentId, Job, JobCreateResponse, JobId, ListRequestId, OperationError,
    PollGeneration, ToolOutput,
};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiSettings {
    pub base_url: Url,
    /// `None` keeps the HTTP client's default.
    pub connect_timeout: Option<Duration>,
    /// `None` keeps the HTTP client's default.
    pub request_timeout: Option<Duration>,
}

impl ApiSettings {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| ApiError::new(FailureKind::InvalidUrl, format!("{base_url}: {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base URL"),
            ));
        }
        Ok(Self {
            base_url,
            connect_timeout: None,
            request_timeout: None,
        })
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            connect_timeout: None,
            request_timeout: None,
        }
    }
}

/// Failure of a backend call. The kind is informational; callers surface
/// only the message and status code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self.kind {
            FailureKind::HttpStatus(code) => Some(code),
            FailureKind::NotFound => Some(404),
            _ => None,
        }
    }
}

impl From<ApiError> for OperationError {
    fn from(err: ApiError) -> Self {
        let status = err.status_code();
        OperationError {
            message: err.message,
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    NotFound,
    Timeout,
    Network,
    Decode,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::NotFound => write!(f, "not found"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "invalid response body"),
        }
    }
}

/// Results delivered back from the engine, one per command or poll tick.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HealthChecked(Result<serde_json::Value, ApiError>),
    JobCreated(Result<JobCreateResponse, ApiError>),
    JobFetched {
        job_id: JobId,
        purpose: FetchPurpose,
        result: Result<Job, ApiError>,
    },
    JobsListed {
        request: ListRequestId,
        result: Result<Vec<Job>, ApiError>,
    },
    JobResumed {
        job_id: JobId,
        intent: IntentId,
        result: Result<Job, ApiError>,
    },
    ToolFinished(Result<ToolOutput, ApiError>),
    PollTick {
        job_id: JobId,
        generation: PollGeneration,
    },
}
