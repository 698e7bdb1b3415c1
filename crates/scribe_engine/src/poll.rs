use std::time::Duration;

use scribe_core::{JobId, PollGeneration};
use scribe_logging::{scribe_debug, scribe_trace};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::EngineEvent;

/// Owned handle to the single poll timer.
///
/// Emits [`EngineEvent::PollTick`] every `interval`, measured from when the
/// previous tick was scheduled. Cancelling or dropping the handle stops the
/// timer before it can emit again.
#[derive(Debug)]
pub struct PollTimer {
    job_id: JobId,
    generation: PollGeneration,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl PollTimer {
    /// Must be called from within a tokio runtime.
    pub fn start(
        job_id: JobId,
        generation: PollGeneration,
        interval: Duration,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tick_job = job_id.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        scribe_trace!("poll tick job_id={} generation={}", tick_job, generation);
                        let event = EngineEvent::PollTick {
                            job_id: tick_job.clone(),
                            generation,
                        };
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                }
            }
        });
        scribe_debug!(
            "poll timer started job_id={} generation={} interval_ms={}",
            job_id,
            generation,
            interval.as_millis()
        );
        Self {
            job_id,
            generation,
            cancel,
            task,
        }
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn generation(&self) -> PollGeneration {
        self.generation
    }

    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.task.abort();
        scribe_debug!(
            "poll timer stopped job_id={} generation={}",
            self.job_id,
            self.generation
        );
    }
}
