use crate::{
    Article, ArticleOutline, ArticleRequest, FetchPurpose, IntentId, Job, JobCreateResponse,
    JobId, JobStatus, ListRequestId, OperationError, PollGeneration, SerpAnalysis, ToolRequest,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// First activation of the dashboard.
    Initialize,
    /// User submitted the job form.
    SubmitRequested(ArticleRequest),
    /// User picked a job from the list.
    JobSelected { job_id: JobId },
    /// User asked to resume a job.
    ResumeRequested { job_id: JobId },
    /// User changed the server-side status filter of the job list.
    ListFilterChanged(Option<JobStatus>),
    /// User started an untracked research/outline/generate call.
    ToolRequested(ToolRequest),
    /// User acknowledged the last error.
    ErrorDismissed,
    /// The dashboard is being torn down.
    Shutdown,
    /// Result of the backend health probe.
    HealthChecked(Result<serde_json::Value, OperationError>),
    /// Result of `POST /jobs`.
    JobCreated(Result<JobCreateResponse, OperationError>),
    /// Result of `GET /jobs/{id}`.
    JobFetched {
        job_id: JobId,
        purpose: FetchPurpose,
        result: Result<Job, OperationError>,
    },
    /// Result of `GET /jobs`.
    JobsListed {
        request: ListRequestId,
        result: Result<Vec<Job>, OperationError>,
    },
    /// Result of `POST /jobs/{id}/resume`.
    JobResumed {
        job_id: JobId,
        intent: IntentId,
        result: Result<Job, OperationError>,
    },
    /// The poll timer fired.
    PollTick {
        job_id: JobId,
        generation: PollGeneration,
    },
    /// Result of an untracked tool call.
    ToolFinished(Result<ToolOutput, OperationError>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Research(SerpAnalysis),
    Outline(ArticleOutline),
    Article(Article),
}
