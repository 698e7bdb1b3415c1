use std::time::Duration;

use scribe_core::{Effect, Msg, OperationError};
use scribe_engine::{EngineCommand, EngineEvent, EngineHandle, PollTimer};
use scribe_logging::{scribe_debug, scribe_info, scribe_warn};

/// Turns effects into engine commands and owns the single poll timer slot.
pub struct EffectRunner {
    engine: EngineHandle,
    poll_interval: Duration,
    poll: Option<PollTimer>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, poll_interval: Duration) -> Self {
        Self {
            engine,
            poll_interval,
            poll: None,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poll.is_some()
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartPolling { job_id, generation } => {
                    scribe_info!("StartPolling job_id={} generation={}", job_id, generation);
                    // Replacing the slot drops (and cancels) the previous timer.
                    self.poll = Some(self.engine.start_polling(
                        job_id,
                        generation,
                        self.poll_interval,
                    ));
                }
                Effect::StopPolling { job_id, generation } => {
                    let matches = self
                        .poll
                        .as_ref()
                        .is_some_and(|timer| timer.generation() == generation);
                    if matches {
                        scribe_info!("StopPolling job_id={} generation={}", job_id, generation);
                        self.poll = None;
                    } else {
                        scribe_debug!(
                            "StopPolling for inactive generation job_id={} generation={}",
                            job_id,
                            generation
                        );
                    }
                }
                Effect::CreateJob { request } => {
                    scribe_info!(
                        "CreateJob topic_len={} words={:?} language={:?}",
                        request.topic.len(),
                        request.target_word_count,
                        request.language
                    );
                    self.engine.submit(EngineCommand::CreateJob { request });
                }
                Effect::CheckHealth => self.engine.submit(EngineCommand::CheckHealth),
                Effect::FetchJob { job_id, purpose } => {
                    scribe_debug!("FetchJob job_id={} purpose={:?}", job_id, purpose);
                    self.engine
                        .submit(EngineCommand::FetchJob { job_id, purpose });
                }
                Effect::ListJobs { query, request } => {
                    scribe_debug!(
                        "ListJobs request={} status={:?} limit={}",
                        request,
                        query.status,
                        query.limit
                    );
                    self.engine
                        .submit(EngineCommand::ListJobs { query, request });
                }
                Effect::ResumeJob { job_id, intent } => {
                    scribe_info!("ResumeJob job_id={} intent={}", job_id, intent);
                    self.engine
                        .submit(EngineCommand::ResumeJob { job_id, intent });
                }
                Effect::RunTool(request) => {
                    scribe_info!("RunTool kind={:?}", request.kind());
                    self.engine.submit(EngineCommand::RunTool(request));
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(timer) = self.poll.take() {
            scribe_info!("poll timer cancelled on shutdown job_id={}", timer.job_id());
            timer.cancel();
        }
    }
}

pub fn event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked(result) => Msg::HealthChecked(result.map_err(failure)),
        EngineEvent::JobCreated(result) => Msg::JobCreated(result.map_err(failure)),
        EngineEvent::JobFetched {
            job_id,
            purpose,
            result,
        } => {
            if let Err(err) = &result {
                scribe_warn!(
                    "fetch failed job_id={} purpose={:?} kind={}: {}",
                    job_id,
                    purpose,
                    err.kind,
                    err
                );
            }
            Msg::JobFetched {
                job_id,
                purpose,
                result: result.map_err(failure),
            }
        }
        EngineEvent::JobsListed { request, result } => Msg::JobsListed {
            request,
            result: result.map_err(failure),
        },
        EngineEvent::JobResumed {
            job_id,
            intent,
            result,
        } => Msg::JobResumed {
            job_id,
            intent,
            result: result.map_err(failure),
        },
        EngineEvent::ToolFinished(result) => Msg::ToolFinished(result.map_err(failure)),
        EngineEvent::PollTick { job_id, generation } => Msg::PollTick { job_id, generation },
    }
}

fn failure(err: scribe_engine::ApiError) -> OperationError {
    OperationError::from(err)
}
