use crate::state::{BackendStatus, SubmitPhase, ToolPanel};
use crate::{
    AppState, ArticleRequest, Effect, FetchPurpose, IntentId, Job, JobId, ListQuery,
    ListRequestId, Msg, OperationError, PollGeneration, ToolKind, ToolRequest,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Initialize => {
            if state.begin_initialize() {
                vec![Effect::CheckHealth, state.list_refresh()]
            } else {
                Vec::new()
            }
        }
        Msg::SubmitRequested(request) => submit(&mut state, request),
        Msg::JobSelected { job_id } => {
            let intent = state.next_intent();
            state.clear_error();
            vec![Effect::FetchJob {
                job_id,
                purpose: FetchPurpose::Select { intent },
            }]
        }
        Msg::ResumeRequested { job_id } => {
            // No status precondition here: the view decides when resume is offered.
            let intent = state.next_intent();
            state.clear_error();
            vec![Effect::ResumeJob { job_id, intent }]
        }
        Msg::ListFilterChanged(status) => {
            let query = ListQuery {
                status,
                limit: state.list_query().limit,
            };
            state.set_list_filter(query);
            vec![state.list_refresh()]
        }
        Msg::ToolRequested(request) => run_tool(&mut state, request),
        Msg::ErrorDismissed => {
            state.clear_error();
            Vec::new()
        }
        Msg::Shutdown => state.stop_polling().into_iter().collect(),
        Msg::HealthChecked(result) => {
            let backend = match result {
                Ok(payload) => BackendStatus::Healthy(
                    payload
                        .get("status")
                        .and_then(|status| status.as_str())
                        .unwrap_or("ok")
                        .to_string(),
                ),
                Err(err) => BackendStatus::Unreachable(err.to_string()),
            };
            state.set_backend(backend);
            Vec::new()
        }
        Msg::JobCreated(result) => job_created(&mut state, result),
        Msg::JobFetched {
            job_id,
            purpose,
            result,
        } => match purpose {
            FetchPurpose::Poll { generation } => poll_landed(&mut state, job_id, generation, result),
            FetchPurpose::Submit { intent } => submit_fetched(&mut state, job_id, intent, result),
            FetchPurpose::Select { intent } => {
                if !state.is_latest_intent(intent) {
                    return (state, Vec::new());
                }
                match result {
                    Ok(job) => state.adopt_current(job),
                    Err(err) => {
                        state.set_error(format!("Failed to load job {job_id}: {err}"));
                        Vec::new()
                    }
                }
            }
            FetchPurpose::Resume { intent } => {
                if !state.is_latest_intent(intent) {
                    return (state, Vec::new());
                }
                match result {
                    Ok(job) => {
                        let mut effects = state.adopt_current(job);
                        push_list_refresh(&mut effects, &mut state);
                        effects
                    }
                    Err(err) => {
                        state.set_error(format!("Failed to load job {job_id}: {err}"));
                        Vec::new()
                    }
                }
            }
        },
        Msg::JobsListed { request, result } => {
            // The submit's own refresh, or a later one, ends the submission.
            let finishing_submit = matches!(
                state.submit_phase(),
                Some(SubmitPhase::Refreshing { list, .. }) if request >= *list
            );
            if state.accept_list(request) {
                match result {
                    Ok(jobs) => state.replace_jobs(jobs),
                    Err(err) => state.set_error(format!("Failed to load jobs: {err}")),
                }
            }
            if finishing_submit {
                state.set_submit_phase(None);
            }
            Vec::new()
        }
        Msg::JobResumed {
            job_id,
            intent,
            result,
        } => match result {
            Ok(_) if state.is_latest_intent(intent) => vec![Effect::FetchJob {
                job_id,
                purpose: FetchPurpose::Resume { intent },
            }],
            // Superseded by a later intent: the backend state still changed.
            Ok(_) => vec![state.list_refresh()],
            Err(err) => {
                if state.is_latest_intent(intent) {
                    state.set_error(format!("Failed to resume job {job_id}: {err}"));
                }
                Vec::new()
            }
        },
        Msg::PollTick { job_id, generation } => match state.poll_matching(&job_id, generation) {
            Some(poll) if !poll.in_flight => {
                poll.in_flight = true;
                vec![Effect::FetchJob {
                    job_id,
                    purpose: FetchPurpose::Poll { generation },
                }]
            }
            _ => Vec::new(),
        },
        Msg::ToolFinished(result) => {
            let kind = match state.tool() {
                ToolPanel::Running(kind) => *kind,
                ToolPanel::Empty | ToolPanel::Ready(_) => return (state, Vec::new()),
            };
            match result {
                Ok(output) => state.set_tool(ToolPanel::Ready(output)),
                Err(err) => {
                    state.set_tool(ToolPanel::Empty);
                    state.set_error(format!("{} failed: {err}", tool_label(kind)));
                }
            }
            Vec::new()
        }
    };

    (state, effects)
}

fn submit(state: &mut AppState, request: ArticleRequest) -> Vec<Effect> {
    if state.is_busy() {
        return Vec::new();
    }
    let topic = request.topic.trim();
    if topic.is_empty() {
        state.set_error("Topic is required");
        return Vec::new();
    }
    let request = ArticleRequest {
        topic: topic.to_string(),
        ..request
    };
    let intent = state.next_intent();
    state.clear_error();
    state.set_submit_phase(Some(SubmitPhase::Creating { intent }));
    vec![Effect::CreateJob { request }]
}

fn job_created(
    state: &mut AppState,
    result: Result<crate::JobCreateResponse, OperationError>,
) -> Vec<Effect> {
    let intent = match state.submit_phase() {
        Some(SubmitPhase::Creating { intent }) => *intent,
        _ => return Vec::new(),
    };
    match result {
        Ok(created) => {
            state.set_submit_phase(Some(SubmitPhase::Fetching {
                job_id: created.job_id.clone(),
                intent,
            }));
            vec![Effect::FetchJob {
                job_id: created.job_id,
                purpose: FetchPurpose::Submit { intent },
            }]
        }
        Err(err) => {
            state.set_submit_phase(None);
            state.set_error(format!("Failed to create job: {err}"));
            Vec::new()
        }
    }
}

fn submit_fetched(
    state: &mut AppState,
    job_id: JobId,
    intent: IntentId,
    result: Result<Job, OperationError>,
) -> Vec<Effect> {
    let expected = matches!(
        state.submit_phase(),
        Some(SubmitPhase::Fetching { job_id: pending, .. }) if *pending == job_id
    );
    if !expected {
        return Vec::new();
    }
    match result {
        Ok(job) => {
            // A select issued meanwhile wins the detail view; the list still refreshes.
            let mut effects = if state.is_latest_intent(intent) {
                state.adopt_current(job)
            } else {
                Vec::new()
            };
            let list = push_list_refresh(&mut effects, state);
            state.set_submit_phase(Some(SubmitPhase::Refreshing { job_id, list }));
            effects
        }
        Err(err) => {
            state.set_submit_phase(None);
            state.set_error(format!("Failed to load job {job_id}: {err}"));
            Vec::new()
        }
    }
}

fn poll_landed(
    state: &mut AppState,
    job_id: JobId,
    generation: PollGeneration,
    result: Result<Job, OperationError>,
) -> Vec<Effect> {
    // Responses for an abandoned poll target are dropped.
    let Some(poll) = state.poll_matching(&job_id, generation) else {
        return Vec::new();
    };
    poll.in_flight = false;
    match result {
        Ok(job) if job.job_id == job_id => {
            state.clear_poll_warning();
            state.adopt_current(job)
        }
        Ok(job) => {
            state.record_poll_failure(format!(
                "poll for {job_id} returned job {}",
                job.job_id
            ));
            Vec::new()
        }
        Err(err) => {
            state.record_poll_failure(err.to_string());
            Vec::new()
        }
    }
}

fn run_tool(state: &mut AppState, request: ToolRequest) -> Vec<Effect> {
    if matches!(state.tool(), ToolPanel::Running(_)) {
        return Vec::new();
    }
    let topic = match &request {
        ToolRequest::Research { topic } => topic,
        ToolRequest::Outline { request } | ToolRequest::Generate { request } => &request.topic,
    };
    if topic.trim().is_empty() {
        state.set_error("Topic is required");
        return Vec::new();
    }
    state.clear_error();
    state.set_tool(ToolPanel::Running(request.kind()));
    vec![Effect::RunTool(request)]
}

/// Ensures `effects` holds exactly one list refresh and returns its id.
fn push_list_refresh(effects: &mut Vec<Effect>, state: &mut AppState) -> ListRequestId {
    let pending = effects.iter().find_map(|effect| match effect {
        Effect::ListJobs { request, .. } => Some(*request),
        _ => None,
    });
    pending.unwrap_or_else(|| {
        let request = state.next_list_request();
        effects.push(Effect::ListJobs {
            query: state.list_query(),
            request,
        });
        request
    })
}

fn tool_label(kind: ToolKind) -> &'static str {
    match kind {
        ToolKind::Research => "Research",
        ToolKind::Outline => "Outline",
        ToolKind::Generate => "Generation",
    }
}
