//! Display structure derived from [`AppState`]; no state of its own.

use crate::state::{BackendStatus, ToolPanel};
use crate::{
    AppState, Article, ArticleRequest, ArticleSection, ExternalReference, FaqItem, Job, JobId,
    JobStatus, KeywordAnalysis, LinkSuggestion, Msg, QualityScore, RequestError, SeoMetadata,
    SeoValidationResult, ToolKind, ToolOutput,
};

/// Position of a status in the pipeline progression, counted from 1.
pub type StepOrdinal = u8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDescriptor {
    pub status: JobStatus,
    pub label: &'static str,
    pub glyph: &'static str,
    /// `None` for statuses outside the progression (`Failed`).
    pub step: Option<StepOrdinal>,
}

impl JobStatus {
    pub fn descriptor(self) -> StatusDescriptor {
        let (label, glyph, step) = match self {
            JobStatus::Pending => ("Pending", "…", Some(1)),
            JobStatus::Researching => ("Researching", "?", Some(2)),
            JobStatus::Analyzing => ("Analyzing", "~", Some(3)),
            JobStatus::Outlining => ("Outlining", "#", Some(4)),
            JobStatus::Generating => ("Generating", "+", Some(5)),
            JobStatus::Validating => ("Validating", "=", Some(6)),
            JobStatus::Completed => ("Completed", "✓", Some(7)),
            JobStatus::Failed => ("Failed", "✗", None),
        };
        StatusDescriptor {
            status: self,
            label,
            glyph,
            step,
        }
    }
}

/// The seven-step pipeline shown by the progress tracker, in display order.
pub const PROGRESSION: [JobStatus; 7] = [
    JobStatus::Pending,
    JobStatus::Researching,
    JobStatus::Analyzing,
    JobStatus::Outlining,
    JobStatus::Generating,
    JobStatus::Validating,
    JobStatus::Completed,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    Done,
    Active,
    Upcoming,
    /// The job failed before this step was confirmed done.
    Halted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepView {
    pub descriptor: StatusDescriptor,
    pub state: StepState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppViewModel {
    pub backend: String,
    pub busy: bool,
    pub last_error: Option<String>,
    pub list_filter: Option<JobStatus>,
    pub jobs: Vec<JobRowView>,
    pub current: Option<JobDetailView>,
    pub tool: ToolPanelView,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobRowView {
    pub job_id: JobId,
    pub status: StatusDescriptor,
    pub progress_percent: u8,
    pub created_at: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobDetailView {
    pub job_id: JobId,
    pub status: StatusDescriptor,
    pub progress_percent: u8,
    pub current_step: Option<String>,
    pub steps: Vec<StepView>,
    pub polling: bool,
    pub poll_warning: Option<String>,
    pub can_resume: bool,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub completed_at: Option<String>,
    pub serp_data_collected: bool,
    pub outline_generated: bool,
    pub article: Option<Article>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolPanelView {
    Hidden,
    Running(ToolKind),
    Ready(ToolOutput),
}

pub(crate) fn build(state: &AppState) -> AppViewModel {
    let current_id = state.current_job().map(|job| &job.job_id);
    AppViewModel {
        backend: match state.backend() {
            BackendStatus::Unknown => "backend: checking".to_string(),
            BackendStatus::Healthy(status) => format!("backend: {status}"),
            BackendStatus::Unreachable(_) => "backend: unreachable".to_string(),
        },
        busy: state.is_busy(),
        last_error: state.last_error().map(str::to_string),
        list_filter: state.list_query().status,
        jobs: state
            .jobs()
            .iter()
            .map(|job| JobRowView {
                job_id: job.job_id.clone(),
                status: job.status.descriptor(),
                progress_percent: percent(job.progress),
                created_at: format_time(job.created_at),
                is_current: current_id == Some(&job.job_id),
            })
            .collect(),
        current: state.current_job().map(|job| detail(state, job)),
        tool: match state.tool() {
            ToolPanel::Empty => ToolPanelView::Hidden,
            ToolPanel::Running(kind) => ToolPanelView::Running(*kind),
            ToolPanel::Ready(output) => ToolPanelView::Ready(output.clone()),
        },
    }
}

fn detail(state: &AppState, job: &Job) -> JobDetailView {
    let polling = state
        .poll()
        .is_some_and(|poll| poll.job_id == job.job_id);
    JobDetailView {
        job_id: job.job_id.clone(),
        status: job.status.descriptor(),
        progress_percent: percent(job.progress),
        current_step: job.current_step.clone(),
        steps: steps_for(job),
        polling,
        poll_warning: if polling {
            state.poll_warning().map(str::to_string)
        } else {
            None
        },
        can_resume: job.status == JobStatus::Failed,
        error_message: job.error_message.clone(),
        created_at: format_time(job.created_at),
        updated_at: format_time(job.updated_at),
        completed_at: job.completed_at.map(format_time),
        serp_data_collected: job.serp_data_collected,
        outline_generated: job.outline_generated,
        article: job.result.clone(),
    }
}

/// Step states for the progress tracker.
///
/// A failed job has no position in the progression; only the steps its
/// checkpoints prove finished are shown as done.
pub fn steps_for(job: &Job) -> Vec<StepView> {
    let current = job.status.descriptor().step;
    PROGRESSION
        .iter()
        .map(|status| {
            let descriptor = status.descriptor();
            let ordinal = descriptor.step.unwrap_or(StepOrdinal::MAX);
            let state = match current {
                None => {
                    if checkpoint_done(job, *status) {
                        StepState::Done
                    } else {
                        StepState::Halted
                    }
                }
                Some(at) if ordinal < at => StepState::Done,
                Some(at) if ordinal == at && job.status == JobStatus::Completed => StepState::Done,
                Some(at) if ordinal == at => StepState::Active,
                Some(_) => StepState::Upcoming,
            };
            StepView { descriptor, state }
        })
        .collect()
}

fn checkpoint_done(job: &Job, status: JobStatus) -> bool {
    match status {
        JobStatus::Pending => true,
        JobStatus::Researching | JobStatus::Analyzing => job.serp_data_collected,
        JobStatus::Outlining => job.outline_generated,
        JobStatus::Generating
        | JobStatus::Validating
        | JobStatus::Completed
        | JobStatus::Failed => false,
    }
}

/// The resume intent, offered only for failed jobs.
pub fn resume_intent(detail: &JobDetailView) -> Option<Msg> {
    detail.can_resume.then(|| Msg::ResumeRequested {
        job_id: detail.job_id.clone(),
    })
}

/// The submit intent for a filled-in job form.
pub fn submit_intent(request: ArticleRequest) -> Result<Msg, RequestError> {
    request.validate()?;
    Ok(Msg::SubmitRequested(request))
}

pub fn select_intent(job_id: JobId) -> Msg {
    Msg::JobSelected { job_id }
}

// ---- Article facets ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleFacet {
    Content,
    Quality,
    Links,
    Faq,
}

impl ArticleFacet {
    pub const ALL: [ArticleFacet; 4] = [
        ArticleFacet::Content,
        ArticleFacet::Quality,
        ArticleFacet::Links,
        ArticleFacet::Faq,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ArticleFacet::Content => "content",
            ArticleFacet::Quality => "quality",
            ArticleFacet::Links => "links",
            ArticleFacet::Faq => "faq",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentFacet<'a> {
    pub title: &'a str,
    pub word_count: u32,
    pub generation_time_seconds: f64,
    pub metadata: &'a SeoMetadata,
    pub sections: &'a [ArticleSection],
}

#[derive(Debug, Clone, PartialEq)]
pub struct QualityFacet<'a> {
    pub quality: Option<&'a QualityScore>,
    pub validation: Option<&'a SeoValidationResult>,
    pub keywords: &'a KeywordAnalysis,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinksFacet<'a> {
    pub internal: &'a [LinkSuggestion],
    pub external: &'a [ExternalReference],
}

#[derive(Debug, Clone, PartialEq)]
pub struct FaqFacet<'a> {
    pub items: &'a [FaqItem],
}

#[derive(Debug, Clone, PartialEq)]
pub enum FacetView<'a> {
    Content(ContentFacet<'a>),
    Quality(QualityFacet<'a>),
    Links(LinksFacet<'a>),
    Faq(FaqFacet<'a>),
}

/// Borrows one facet of an article; the article itself is never copied.
pub fn facet_view(article: &Article, facet: ArticleFacet) -> FacetView<'_> {
    match facet {
        ArticleFacet::Content => FacetView::Content(ContentFacet {
            title: &article.title,
            word_count: article.word_count,
            generation_time_seconds: article.generation_time_seconds,
            metadata: &article.seo_metadata,
            sections: &article.sections,
        }),
        ArticleFacet::Quality => FacetView::Quality(QualityFacet {
            quality: article.quality_score.as_ref(),
            validation: article.seo_validation.as_ref(),
            keywords: &article.keyword_analysis,
        }),
        ArticleFacet::Links => FacetView::Links(LinksFacet {
            internal: &article.internal_links,
            external: &article.external_references,
        }),
        ArticleFacet::Faq => FacetView::Faq(FaqFacet {
            items: &article.faq_section,
        }),
    }
}

fn percent(progress: f64) -> u8 {
    progress.clamp(0.0, 100.0).round() as u8
}

fn format_time(at: chrono::DateTime<chrono::Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}
