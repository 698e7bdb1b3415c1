use std::sync::Arc;
use std::time::Duration;

use scribe_core::{
    ArticleRequest, FetchPurpose, IntentId, JobId, ListQuery, ListRequestId, PollGeneration,
    ToolOutput, ToolRequest,
};
use scribe_logging::scribe_warn;
use tokio::sync::mpsc;

use crate::{ContentApi, EngineEvent, PollTimer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    CheckHealth,
    CreateJob { request: ArticleRequest },
    FetchJob { job_id: JobId, purpose: FetchPurpose },
    ListJobs {
        query: ListQuery,
        request: ListRequestId,
    },
    ResumeJob { job_id: JobId, intent: IntentId },
    RunTool(ToolRequest),
}

/// Runs backend calls as tasks on the current tokio runtime and reports
/// each result as one [`EngineEvent`].
#[derive(Clone)]
pub struct EngineHandle {
    api: Arc<dyn ContentApi>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(api: Arc<dyn ContentApi>) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (Self { api, event_tx }, event_rx)
    }

    /// Must be called from within a tokio runtime.
    pub fn submit(&self, command: EngineCommand) {
        let api = self.api.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = handle_command(api.as_ref(), command).await;
            if event_tx.send(event).is_err() {
                scribe_warn!("engine event dropped: receiver closed");
            }
        });
    }

    pub fn start_polling(
        &self,
        job_id: JobId,
        generation: PollGeneration,
        interval: Duration,
    ) -> PollTimer {
        PollTimer::start(job_id, generation, interval, self.event_tx.clone())
    }
}

async fn handle_command(api: &dyn ContentApi, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::CheckHealth => EngineEvent::HealthChecked(api.health().await),
        EngineCommand::CreateJob { request } => {
            EngineEvent::JobCreated(api.create_job(&request).await)
        }
        EngineCommand::FetchJob { job_id, purpose } => {
            let result = api.get_job(&job_id).await;
            EngineEvent::JobFetched {
                job_id,
                purpose,
                result,
            }
        }
        EngineCommand::ListJobs { query, request } => EngineEvent::JobsListed {
            request,
            result: api.list_jobs(query).await,
        },
        EngineCommand::ResumeJob { job_id, intent } => {
            let result = api.resume_job(&job_id).await;
            EngineEvent::JobResumed {
                job_id,
                intent,
                result,
            }
        }
        EngineCommand::RunTool(request) => {
            let result = match request {
                ToolRequest::Research { topic } => api
                    .research_topic(&topic)
                    .await
                    .map(ToolOutput::Research),
                ToolRequest::Outline { request } => api
                    .generate_outline(&request)
                    .await
                    .map(ToolOutput::Outline),
                ToolRequest::Generate { request } => api
                    .generate_article(&request)
                    .await
                    .map(ToolOutput::Article),
            };
            EngineEvent::ToolFinished(result)
        }
    }
}
