use veritas_logging::{veritas_debug, veritas_info, veritas_warn};

use crate::state::{Job, Lifecycle};
use crate::{
    classify, map_stage, validate, AnalysisRequest, AppState, Effect, JobError, JobKey, JobStatus,
    Msg, NotifyLevel, StageSignal, ValidationError,
};

const SUBMITTING_CAPTION: &str = "Submitting claim...";
const CONNECTING_CAPTION: &str = "Connecting to the analysis crew...";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::ModeSelected(mode) => {
            if state.mode != mode {
                state.mode = mode;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::InputChanged(text) => {
            if state.input != text {
                state.input = text;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ResetClicked => {
            let effects = state.cancel_streaming();
            if !matches!(&state.lifecycle, Lifecycle::Active(job) if job.status == JobStatus::Cancelled)
            {
                // An in-flight submission is abandoned; its reply no longer matches a live key.
                state.lifecycle = Lifecycle::Idle;
            }
            state.input.clear();
            state.result = None;
            state.last_error = None;
            state.fetching = false;
            state.caption = None;
            state.notify(NotifyLevel::Info, "Ready for new analysis");
            effects
        }
        Msg::SubmitSucceeded { key, job_id } => {
            let request = match &state.lifecycle {
                Lifecycle::Submitting { key: pending, request } if *pending == key => request.clone(),
                _ => {
                    veritas_debug!("ignoring submit reply for stale attempt {}", key);
                    return (state, Vec::new());
                }
            };
            veritas_info!("job {} accepted as {}", key, job_id);
            let mut job = Job {
                key,
                id: job_id.clone(),
                request,
                status: JobStatus::Submitted,
            };
            job.status = JobStatus::Streaming;
            state.lifecycle = Lifecycle::Active(job);
            state.caption = Some(CONNECTING_CAPTION);
            state.spinner = 0;
            state.mark_dirty();
            vec![Effect::OpenStream { key, job_id }, Effect::StartTicker { key }]
        }
        Msg::SubmitFailed { key, reason } => {
            if !matches!(&state.lifecycle, Lifecycle::Submitting { key: pending, .. } if *pending == key)
            {
                return (state, Vec::new());
            }
            veritas_warn!("submission {} failed: {}", key, reason);
            state.lifecycle = Lifecycle::Idle;
            state.caption = None;
            report(&mut state, JobError::Submission(reason));
            Vec::new()
        }
        Msg::StreamEvent { key, event } => {
            if !state.is_streaming(key) {
                veritas_debug!(
                    "dropping {}/{} for attempt {}; not streaming",
                    event.source,
                    event.kind,
                    key
                );
                return (state, Vec::new());
            }
            match classify(&event) {
                StageSignal::Progress => {
                    state.caption = Some(map_stage(&event.source));
                    state.mark_dirty();
                    Vec::new()
                }
                StageSignal::Failed => match state.finish_job(key, JobStatus::Failed) {
                    Some(effects) => {
                        report(&mut state, JobError::AnalysisFailed);
                        effects
                    }
                    None => Vec::new(),
                },
                StageSignal::Completed => match state.finish_job(key, JobStatus::Completed) {
                    Some(mut effects) => {
                        let job_id = match state.active_job_mut(key) {
                            Some(job) => job.id.clone(),
                            None => return (state, effects),
                        };
                        state.fetching = true;
                        effects.push(Effect::FetchResult { key, job_id });
                        effects
                    }
                    None => Vec::new(),
                },
            }
        }
        Msg::StreamFailed { key, reason } => {
            if !state.is_streaming(key) {
                veritas_debug!("ignoring transport error after teardown: {}", reason);
                return (state, Vec::new());
            }
            match state.finish_job(key, JobStatus::Errored) {
                Some(effects) => {
                    report(&mut state, JobError::StreamTransport(reason));
                    effects
                }
                None => Vec::new(),
            }
        }
        Msg::ResultFetched { key, result } => {
            if !awaiting_result(&mut state, key) {
                return (state, Vec::new());
            }
            state.fetching = false;
            if let Lifecycle::Active(job) = &state.lifecycle {
                let (job_id, request) = (job.id.clone(), job.request.clone());
                state.record_history(&job_id, &request, &result);
            }
            veritas_info!(
                "verdict {} at {:.0}% for attempt {}",
                result.verdict().label(),
                result.confidence(),
                key
            );
            state.result = Some(result);
            state.notify(NotifyLevel::Success, "Analysis complete");
            vec![Effect::SaveHistory(state.history_snapshot())]
        }
        Msg::ResultFailed { key, reason } => {
            if !awaiting_result(&mut state, key) {
                return (state, Vec::new());
            }
            state.fetching = false;
            report(&mut state, JobError::Fetch(reason));
            Vec::new()
        }
        Msg::Tick { key } => {
            if state.is_streaming(key) {
                state.spinner = state.spinner.wrapping_add(1);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RestoreHistory(entries) => {
            state.restore_history(entries);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    if matches!(state.lifecycle, Lifecycle::Submitting { .. }) {
        veritas_debug!("submit ignored; a submission is already in flight");
        return Vec::new();
    }
    let content = match validate(state.mode, &state.input, state.settings.min_text_len) {
        Ok(content) => content,
        Err(err) => {
            state.last_error = Some(JobError::Validation(err.clone()));
            state.notify(NotifyLevel::Warning, validation_message(&err));
            return Vec::new();
        }
    };

    let mut effects = state.cancel_streaming();
    let key = state.allocate_key();
    veritas_info!("submitting attempt {} ({} chars)", key, content.chars().count());
    state.lifecycle = Lifecycle::Submitting {
        key,
        request: AnalysisRequest {
            mode: state.mode,
            content: content.clone(),
        },
    };
    state.result = None;
    state.last_error = None;
    state.fetching = false;
    state.caption = Some(SUBMITTING_CAPTION);
    state.mark_dirty();
    effects.push(Effect::SubmitJob { key, claim: content });
    effects
}

fn awaiting_result(state: &mut AppState, key: JobKey) -> bool {
    let fetching = state.fetching;
    matches!(state.active_job_mut(key), Some(job) if job.status == JobStatus::Completed && fetching)
}

fn report(state: &mut AppState, error: JobError) {
    state.notify(NotifyLevel::Error, format!("{error}. You can submit again."));
    state.last_error = Some(error);
}

fn validation_message(err: &ValidationError) -> String {
    match err {
        ValidationError::Empty => "Please enter something to analyze".to_string(),
        ValidationError::TooShort { min, actual } => format!(
            "Please enter at least {min} characters of text ({actual} so far)"
        ),
    }
}
