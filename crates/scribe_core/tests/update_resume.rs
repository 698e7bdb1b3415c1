mod support;

use pretty_assertions::assert_eq;
use scribe_core::{
    resume_intent, update, AppState, Effect, FetchPurpose, JobId, JobStatus, ListQuery, Msg,
    OperationError,
};
use support::{failed_job, init_logging, job, only_fetch_purpose, poll_result, tick, tracking};

#[test]
fn failed_poll_offers_resume_which_refetches() {
    init_logging();
    let (state, generation) = tracking(AppState::new(), job("abc123", JobStatus::Outlining, 35.0));
    let (state, _) = tick(state, "abc123", generation);
    let (state, effects) = poll_result(
        state,
        "abc123",
        generation,
        Ok(failed_job("abc123", "rate limited")),
    );
    assert_eq!(
        effects,
        vec![
            Effect::StopPolling {
                job_id: JobId::from("abc123"),
                generation,
            },
            Effect::ListJobs {
                query: ListQuery::default(),
                request: 1,
            },
        ]
    );

    let view = state.view();
    let detail = view.current.expect("detail view");
    assert!(detail.can_resume);
    assert_eq!(detail.error_message.as_deref(), Some("rate limited"));

    let intent = resume_intent(&detail).expect("resume offered");
    let (state, effects) = update(state, intent);
    let resume_intent_id = match effects.as_slice() {
        [Effect::ResumeJob { job_id, intent }] => {
            assert_eq!(job_id.as_str(), "abc123");
            *intent
        }
        other => panic!("expected resume effect, got {other:?}"),
    };

    let (state, effects) = update(
        state,
        Msg::JobResumed {
            job_id: JobId::from("abc123"),
            intent: resume_intent_id,
            result: Ok(job("abc123", JobStatus::Pending, 0.0)),
        },
    );
    assert_eq!(
        only_fetch_purpose(&effects),
        FetchPurpose::Resume {
            intent: resume_intent_id
        }
    );

    let (state, effects) = update(
        state,
        Msg::JobFetched {
            job_id: JobId::from("abc123"),
            purpose: FetchPurpose::Resume {
                intent: resume_intent_id,
            },
            result: Ok(job("abc123", JobStatus::Pending, 0.0)),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::StartPolling {
                job_id: JobId::from("abc123"),
                generation: generation + 1,
            },
            Effect::ListJobs {
                query: ListQuery::default(),
                request: 2,
            },
        ]
    );
    assert_eq!(state.current_job().unwrap().status, JobStatus::Pending);
}

#[test]
fn resume_failure_keeps_current_job() {
    let (state, _generation) = tracking(AppState::new(), job("abc123", JobStatus::Pending, 0.0));
    let (state, effects) = update(
        state,
        Msg::ResumeRequested {
            job_id: JobId::from("abc123"),
        },
    );
    let intent = match effects.as_slice() {
        [Effect::ResumeJob { intent, .. }] => *intent,
        other => panic!("expected resume effect, got {other:?}"),
    };
    let before = state.current_job().cloned();

    let (state, effects) = update(
        state,
        Msg::JobResumed {
            job_id: JobId::from("abc123"),
            intent,
            result: Err(OperationError::new("Cannot resume job with status: pending").with_status(400)),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.current_job().cloned(), before);
    assert_eq!(
        state.last_error(),
        Some("Failed to resume job abc123: Cannot resume job with status: pending (HTTP 400)")
    );
}

#[test]
fn controller_resumes_without_checking_status() {
    let (state, effects) = update(
        AppState::new(),
        Msg::ResumeRequested {
            job_id: JobId::from("finished"),
        },
    );
    assert!(matches!(
        effects.as_slice(),
        [Effect::ResumeJob { job_id, .. }] if job_id.as_str() == "finished"
    ));
    assert!(state.last_error().is_none());
}

#[test]
fn view_offers_resume_only_for_failed_jobs() {
    for status in JobStatus::ALL {
        let (state, effects) = update(
            AppState::new(),
            Msg::JobSelected {
                job_id: JobId::from("j"),
            },
        );
        let purpose = only_fetch_purpose(&effects);
        let (state, _) = update(
            state,
            Msg::JobFetched {
                job_id: JobId::from("j"),
                purpose,
                result: Ok(job("j", status, 0.0)),
            },
        );
        let detail = state.view().current.expect("detail");
        assert_eq!(detail.can_resume, status == JobStatus::Failed, "{status}");
        assert_eq!(resume_intent(&detail).is_some(), status == JobStatus::Failed);
    }
}

#[test]
fn superseded_resume_failure_is_not_reported() {
    let (state, effects) = update(
        AppState::new(),
        Msg::ResumeRequested {
            job_id: JobId::from("first"),
        },
    );
    let first = match effects.as_slice() {
        [Effect::ResumeJob { intent, .. }] => *intent,
        other => panic!("expected resume effect, got {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::JobSelected {
            job_id: JobId::from("second"),
        },
    );

    let (state, effects) = update(
        state,
        Msg::JobResumed {
            job_id: JobId::from("first"),
            intent: first,
            result: Err(OperationError::new("Job not found").with_status(404)),
        },
    );
    assert!(effects.is_empty());
    assert!(state.last_error().is_none());
}
