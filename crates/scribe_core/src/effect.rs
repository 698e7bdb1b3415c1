use crate::{ArticleRequest, JobId, ListQuery};

/// Sequence number of a user intent (submit, select, resume).
pub type IntentId = u64;
/// Identifies one poll target; bumped every time polling (re)starts.
pub type PollGeneration = u64;
/// Sequence number of a job-list request; responses older than the last
/// applied one are dropped.
pub type ListRequestId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth,
    CreateJob {
        request: ArticleRequest,
    },
    FetchJob {
        job_id: JobId,
        purpose: FetchPurpose,
    },
    ListJobs {
        query: ListQuery,
        request: ListRequestId,
    },
    ResumeJob {
        job_id: JobId,
        intent: IntentId,
    },
    /// Replace any running poll timer with one ticking for `job_id`.
    StartPolling {
        job_id: JobId,
        generation: PollGeneration,
    },
    /// Cancel the poll timer; a late tick must never reach the state.
    StopPolling {
        job_id: JobId,
        generation: PollGeneration,
    },
    RunTool(ToolRequest),
}

/// Why a job is being fetched; echoed back with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPurpose {
    Submit { intent: IntentId },
    Select { intent: IntentId },
    Resume { intent: IntentId },
    Poll { generation: PollGeneration },
}

/// Untracked one-shot backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    Research { topic: String },
    Outline { request: ArticleRequest },
    Generate { request: ArticleRequest },
}

impl ToolRequest {
    pub fn kind(&self) -> ToolKind {
        match self {
            ToolRequest::Research { .. } => ToolKind::Research,
            ToolRequest::Outline { .. } => ToolKind::Outline,
            ToolRequest::Generate { .. } => ToolKind::Generate,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Research,
    Outline,
    Generate,
}
