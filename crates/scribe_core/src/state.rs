use crate::view_model::{self, AppViewModel};
use crate::{
    Effect, IntentId, Job, JobId, ListQuery, ListRequestId, PollGeneration, ToolKind, ToolOutput,
};

/// Where an in-flight submission currently is. The form is busy while set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitPhase {
    Creating { intent: IntentId },
    Fetching { job_id: JobId, intent: IntentId },
    /// Waiting for the list request issued after the job was fetched.
    Refreshing { job_id: JobId, list: ListRequestId },
}

/// The single job being polled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    pub job_id: JobId,
    pub generation: PollGeneration,
    /// A poll fetch is outstanding; further ticks are skipped until it lands.
    pub in_flight: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Healthy(String),
    Unreachable(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ToolPanel {
    #[default]
    Empty,
    Running(ToolKind),
    Ready(ToolOutput),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    initialized: bool,
    current_job: Option<Job>,
    jobs: Vec<Job>,
    list_query: ListQuery,
    latest_list_request: ListRequestId,
    applied_list_request: ListRequestId,
    submit_phase: Option<SubmitPhase>,
    latest_intent: IntentId,
    last_error: Option<String>,
    poll: Option<PollState>,
    last_generation: PollGeneration,
    poll_failures: u32,
    poll_warning: Option<String>,
    backend: BackendStatus,
    tool: ToolPanel,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a non-default page size for list refreshes.
    pub fn with_list_limit(limit: u32) -> Self {
        Self {
            list_query: ListQuery {
                status: None,
                limit,
            },
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        view_model::build(self)
    }

    /// Returns whether the state changed since the last call, and resets it.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.current_job.as_ref()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn list_query(&self) -> ListQuery {
        self.list_query
    }

    pub fn is_busy(&self) -> bool {
        self.submit_phase.is_some()
    }

    pub fn submit_phase(&self) -> Option<&SubmitPhase> {
        self.submit_phase.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn poll(&self) -> Option<&PollState> {
        self.poll.as_ref()
    }

    pub fn poll_failures(&self) -> u32 {
        self.poll_failures
    }

    pub fn poll_warning(&self) -> Option<&str> {
        self.poll_warning.as_deref()
    }

    pub fn backend(&self) -> &BackendStatus {
        &self.backend
    }

    pub fn tool(&self) -> &ToolPanel {
        &self.tool
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Flags first activation; returns `false` if it already happened.
    pub(crate) fn begin_initialize(&mut self) -> bool {
        !std::mem::replace(&mut self.initialized, true)
    }

    pub(crate) fn next_intent(&mut self) -> IntentId {
        self.latest_intent += 1;
        self.latest_intent
    }

    pub(crate) fn is_latest_intent(&self, intent: IntentId) -> bool {
        self.latest_intent == intent
    }

    pub(crate) fn set_submit_phase(&mut self, phase: Option<SubmitPhase>) {
        self.submit_phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn set_list_filter(&mut self, query: ListQuery) {
        self.list_query = query;
        self.mark_dirty();
    }

    /// A list refresh for the current query under a fresh request id.
    pub(crate) fn list_refresh(&mut self) -> Effect {
        let request = self.next_list_request();
        Effect::ListJobs {
            query: self.list_query,
            request,
        }
    }

    pub(crate) fn next_list_request(&mut self) -> ListRequestId {
        self.latest_list_request += 1;
        self.latest_list_request
    }

    /// Claims `request` as the newest applied list; `false` if a newer one
    /// already landed.
    pub(crate) fn accept_list(&mut self, request: ListRequestId) -> bool {
        if request <= self.applied_list_request {
            return false;
        }
        self.applied_list_request = request;
        true
    }

    pub(crate) fn replace_jobs(&mut self, jobs: Vec<Job>) {
        self.jobs = jobs;
        self.mark_dirty();
    }

    pub(crate) fn set_backend(&mut self, backend: BackendStatus) {
        self.backend = backend;
        self.mark_dirty();
    }

    pub(crate) fn set_tool(&mut self, tool: ToolPanel) {
        self.tool = tool;
        self.mark_dirty();
    }

    /// Makes `job` the current job and reconciles the poll target with it.
    ///
    /// Polling continues untouched when the same non-terminal job is
    /// re-adopted. A different or terminal job stops the old timer; a
    /// non-terminal job gets a fresh generation. When the job that was being
    /// polled turns up terminal, the list is refreshed once.
    pub(crate) fn adopt_current(&mut self, job: Job) -> Vec<Effect> {
        let mut effects = Vec::new();
        let terminal = job.status.is_terminal();
        let same_target = self
            .poll
            .as_ref()
            .is_some_and(|poll| poll.job_id == job.job_id);

        if !(same_target && !terminal) {
            if let Some(stale) = self.poll.take() {
                effects.push(Effect::StopPolling {
                    job_id: stale.job_id,
                    generation: stale.generation,
                });
                if same_target && terminal {
                    effects.push(self.list_refresh());
                }
            }
            if !terminal {
                self.last_generation += 1;
                let generation = self.last_generation;
                self.poll = Some(PollState {
                    job_id: job.job_id.clone(),
                    generation,
                    in_flight: false,
                });
                self.poll_failures = 0;
                self.poll_warning = None;
                effects.push(Effect::StartPolling {
                    job_id: job.job_id.clone(),
                    generation,
                });
            }
        }

        self.current_job = Some(job);
        self.mark_dirty();
        effects
    }

    /// Returns the live poll target if `generation` still matches it.
    pub(crate) fn poll_matching(
        &mut self,
        job_id: &JobId,
        generation: PollGeneration,
    ) -> Option<&mut PollState> {
        self.poll
            .as_mut()
            .filter(|poll| poll.generation == generation && &poll.job_id == job_id)
    }

    pub(crate) fn record_poll_failure(&mut self, message: String) {
        self.poll_failures += 1;
        self.poll_warning = Some(message);
        self.mark_dirty();
    }

    pub(crate) fn clear_poll_warning(&mut self) {
        if self.poll_warning.take().is_some() {
            self.mark_dirty();
        }
    }

    /// Drops the poll target, returning the effect that cancels its timer.
    pub(crate) fn stop_polling(&mut self) -> Option<Effect> {
        self.poll.take().map(|poll| Effect::StopPolling {
            job_id: poll.job_id,
            generation: poll.generation,
        })
    }
}
