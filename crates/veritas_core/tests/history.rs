use std::collections::BTreeMap;

use veritas_core::{
    update, AppState, CoreSettings, Effect, FinalResult, InputMode, JobId, Msg, ProgressEvent,
    RecentAnalysis, Verdict,
};

fn complete_job(state: AppState, key: u64, input: &str, verdict: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::InputChanged(input.to_string()));
    let (state, _) = update(state, Msg::SubmitClicked);
    let (state, _) = update(
        state,
        Msg::SubmitSucceeded {
            key,
            job_id: JobId::new(format!("job-{key}")),
        },
    );
    let (state, _) = update(
        state,
        Msg::StreamEvent {
            key,
            event: ProgressEvent::new("VERDICT AGENT", "END"),
        },
    );
    update(
        state,
        Msg::ResultFetched {
            key,
            result: FinalResult::new(
                Verdict::parse(verdict),
                72.4,
                "because",
                BTreeMap::new(),
                BTreeMap::new(),
            ),
        },
    )
}

#[test]
fn completed_jobs_are_recorded_newest_first_and_capped() {
    veritas_logging::initialize_for_tests();
    let mut state = AppState::with_settings(CoreSettings {
        min_text_len: 1,
        history_limit: 2,
    });
    for key in 1..=3 {
        let (next, _) = complete_job(state, key, &format!("claim number {key}"), "real");
        state = next;
    }

    let recent = state.view().recent;
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].title, "claim number 3");
    assert_eq!(recent[0].job_id, "job-3");
    assert_eq!(recent[0].verdict, Verdict::Real);
    assert_eq!(recent[0].confidence, 72);
    assert_eq!(recent[1].title, "claim number 2");
}

#[test]
fn long_claims_are_truncated_and_urls_use_host() {
    let (state, _) = complete_job(AppState::new(), 1, &"word ".repeat(30), "fake");
    let title = &state.view().recent[0].title;
    assert!(title.ends_with("..."));
    assert_eq!(title.chars().count(), 51);

    let (state, _) = update(state, Msg::ModeSelected(InputMode::Url));
    let (state, _) = complete_job(state, 2, "https://news.example.com/story/1", "unsure");
    let recent = state.view().recent;
    assert_eq!(recent[0].title, "news.example.com");
    assert_eq!(recent[0].verdict, Verdict::Unverified);
}

#[test]
fn restore_history_respects_limit() {
    let entries: Vec<_> = (0..8)
        .map(|i| RecentAnalysis {
            title: format!("t{i}"),
            verdict: Verdict::Real,
            confidence: 80,
            job_id: format!("j{i}"),
        })
        .collect();
    let (mut state, effects) = update(AppState::new(), Msg::RestoreHistory(entries));
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
    let recent = state.view().recent;
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].title, "t0");
}
