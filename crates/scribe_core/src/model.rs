//! Wire-level data model shared by the controller and the gateway client.
//!
//! Field names follow the backend's JSON. Collections and optional blocks
//! default when absent so that partial payloads still decode.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default page size for job listings.
pub const DEFAULT_LIST_LIMIT: u32 = 50;
/// Bounds the backend enforces on `target_word_count`.
pub const MIN_WORD_COUNT: u32 = 500;
pub const MAX_WORD_COUNT: u32 = 10_000;
pub const MAX_TOPIC_CHARS: usize = 500;

/// Opaque job identifier assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<String> for JobId {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Researching,
    Analyzing,
    Outlining,
    Generating,
    Validating,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::Pending,
        JobStatus::Researching,
        JobStatus::Analyzing,
        JobStatus::Outlining,
        JobStatus::Generating,
        JobStatus::Validating,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    /// Wire value, as used in JSON bodies and the `status` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Researching => "researching",
            JobStatus::Analyzing => "analyzing",
            JobStatus::Outlining => "outlining",
            JobStatus::Generating => "generating",
            JobStatus::Validating => "validating",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// `Completed` and `Failed` never transition further.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown job status `{0}`")]
pub struct ParseStatusError(pub String);

impl FromStr for JobStatus {
    type Err = ParseStatusError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ParseStatusError(raw.to_string()))
    }
}

/// A tracked unit of backend work, exactly as the backend reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub result: Option<Article>,
    #[serde(default)]
    pub serp_data_collected: bool,
    #[serde(default)]
    pub outline_generated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCreateResponse {
    pub job_id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub message: String,
}

/// Body of `POST /jobs`, `POST /generate` and `POST /outline`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRequest {
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_word_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("topic must not be empty")]
    EmptyTopic,
    #[error("topic must be at most {max} characters")]
    TopicTooLong { max: usize },
    #[error("target word count {value} is outside {min}..={max}")]
    WordCountOutOfRange { value: u32, min: u32, max: u32 },
    #[error("language code `{0}` must be 2 to 10 characters")]
    InvalidLanguage(String),
}

impl ArticleRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            target_word_count: None,
            language: None,
        }
    }

    pub fn with_word_count(mut self, words: u32) -> Self {
        self.target_word_count = Some(words);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Checks the request against the bounds the backend enforces.
    pub fn validate(&self) -> Result<(), RequestError> {
        let topic = self.topic.trim();
        if topic.is_empty() {
            return Err(RequestError::EmptyTopic);
        }
        if topic.chars().count() > MAX_TOPIC_CHARS {
            return Err(RequestError::TopicTooLong {
                max: MAX_TOPIC_CHARS,
            });
        }
        if let Some(value) = self.target_word_count {
            if !(MIN_WORD_COUNT..=MAX_WORD_COUNT).contains(&value) {
                return Err(RequestError::WordCountOutOfRange {
                    value,
                    min: MIN_WORD_COUNT,
                    max: MAX_WORD_COUNT,
                });
            }
        }
        if let Some(language) = &self.language {
            let len = language.trim().chars().count();
            if !(2..=10).contains(&len) {
                return Err(RequestError::InvalidLanguage(language.clone()));
            }
        }
        Ok(())
    }
}

/// Server-side filter for `GET /jobs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListQuery {
    pub status: Option<JobStatus>,
    pub limit: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

/// Failure of any backend operation, as seen by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationError {
    pub message: String,
    pub status: Option<u16>,
}

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for OperationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (HTTP {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

// ---- Article ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub sections: Vec<ArticleSection>,
    pub full_content: String,
    pub word_count: u32,
    pub seo_metadata: SeoMetadata,
    pub keyword_analysis: KeywordAnalysis,
    #[serde(default)]
    pub internal_links: Vec<LinkSuggestion>,
    #[serde(default)]
    pub external_references: Vec<ExternalReference>,
    #[serde(default)]
    pub faq_section: Vec<FaqItem>,
    #[serde(default)]
    pub quality_score: Option<QualityScore>,
    #[serde(default)]
    pub seo_validation: Option<SeoValidationResult>,
    #[serde(default)]
    pub generation_time_seconds: f64,
    #[serde(default)]
    pub serp_analysis_summary: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSection {
    pub heading: String,
    pub level: u8,
    pub content: String,
    #[serde(default)]
    pub word_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMetadata {
    pub title_tag: String,
    pub meta_description: String,
    #[serde(default)]
    pub og_title: Option<String>,
    #[serde(default)]
    pub og_description: Option<String>,
    #[serde(default)]
    pub canonical_url_suggestion: Option<String>,
    pub focus_keyword: String,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub primary_keyword: String,
    pub primary_keyword_count: u32,
    pub primary_keyword_density: f64,
    #[serde(default)]
    pub secondary_keywords: BTreeMap<String, u32>,
    #[serde(default)]
    pub lsi_keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSuggestion {
    pub anchor_text: String,
    pub suggested_target_topic: String,
    pub context: String,
    pub relevance_score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    pub source_name: String,
    pub source_type: String,
    #[serde(default)]
    pub url: Option<String>,
    pub citation_context: String,
    pub credibility_reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoValidationResult {
    pub is_valid: bool,
    pub score: f64,
    #[serde(default)]
    pub checks: BTreeMap<String, bool>,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    pub overall_score: f64,
    pub readability_score: f64,
    pub seo_score: f64,
    #[serde(default)]
    pub uniqueness_indicators: BTreeMap<String, f64>,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
    #[serde(default)]
    pub needs_revision: bool,
}

// ---- Research and outline ----

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpAnalysis {
    pub query: String,
    pub total_results: u32,
    #[serde(default)]
    pub results: Vec<SerpResult>,
    #[serde(default)]
    pub common_themes: Vec<ThemeAnalysis>,
    #[serde(default)]
    pub common_questions: Vec<String>,
    #[serde(default)]
    pub avg_title_length: f64,
    #[serde(default)]
    pub avg_content_indicators: BTreeMap<String, i64>,
    #[serde(default)]
    pub top_domains: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerpResult {
    pub rank: u32,
    pub url: String,
    pub title: String,
    pub snippet: String,
    #[serde(default)]
    pub domain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeAnalysis {
    pub theme: String,
    pub frequency: u32,
    #[serde(default)]
    pub related_keywords: Vec<String>,
    #[serde(default)]
    pub example_headings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleOutline {
    pub title: String,
    pub meta_description: String,
    pub primary_keyword: String,
    #[serde(default)]
    pub secondary_keywords: Vec<String>,
    pub sections: Vec<OutlineSection>,
    pub estimated_word_count: u32,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub content_angle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSection {
    pub heading: String,
    pub level: u8,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub target_word_count: u32,
    #[serde(default)]
    pub keywords_to_include: Vec<String>,
}

/// Backend timestamps come without an offset and are UTC; RFC 3339 values
/// are accepted as well.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Some(with_offset.with_timezone(&Utc));
        }
        raw.parse::<NaiveDateTime>().ok().map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp `{raw}`")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_some(&value.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw).map(Some).ok_or_else(|| {
                    serde::de::Error::custom(format!("invalid timestamp `{raw}`"))
                }),
                None => Ok(None),
            }
        }
    }
}
