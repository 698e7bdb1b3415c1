//! Scribe core: job data model, pure controller state machine and view-model helpers.
mod effect;
mod model;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{
    Effect, FetchPurpose, IntentId, ListRequestId, PollGeneration, ToolKind, ToolRequest,
};
pub use model::{
    Article, ArticleOutline, ArticleRequest, ArticleSection, ExternalReference, FaqItem, Job,
    JobCreateResponse, JobId, JobStatus, KeywordAnalysis, LinkSuggestion, ListQuery,
    OperationError, OutlineSection, ParseStatusError, QualityScore, RequestError, SeoMetadata,
    SeoValidationResult, SerpAnalysis, SerpResult, ThemeAnalysis, DEFAULT_LIST_LIMIT,
    MAX_TOPIC_CHARS, MAX_WORD_COUNT, MIN_WORD_COUNT,
};
pub use msg::{Msg, ToolOutput};
pub use state::{AppState, BackendStatus, PollState, SubmitPhase, ToolPanel};
pub use update::update;
pub use view_model::{
    facet_view, resume_intent, select_intent, steps_for, submit_intent, AppViewModel,
    ArticleFacet, ContentFacet, FacetView, FaqFacet, JobDetailView, JobRowView, LinksFacet,
    QualityFacet, StatusDescriptor, StepOrdinal, StepState, StepView, ToolPanelView,
    PROGRESSION,
};
