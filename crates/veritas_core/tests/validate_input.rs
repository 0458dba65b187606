use veritas_core::{
    map_stage, update, validate, AppState, CoreSettings, InputGauge, InputMode, JobError, Msg,
    NotifyLevel, ValidationError, GENERIC_CAPTION,
};

fn init_logging() {
    veritas_logging::initialize_for_tests();
}

#[test]
fn rejects_blank_input_in_both_modes() {
    assert_eq!(validate(InputMode::Text, "   \n\t", 50), Err(ValidationError::Empty));
    assert_eq!(validate(InputMode::Url, "", 50), Err(ValidationError::Empty));
}

#[test]
fn text_mode_enforces_minimum_after_trimming() {
    let short = format!("  {}  ", "x".repeat(49));
    assert_eq!(
        validate(InputMode::Text, &short, 50),
        Err(ValidationError::TooShort { min: 50, actual: 49 })
    );

    let exact = format!("  {}  ", "x".repeat(50));
    assert_eq!(validate(InputMode::Text, &exact, 50), Ok("x".repeat(50)));
}

#[test]
fn minimum_counts_characters_not_bytes() {
    let accented = "é".repeat(50);
    assert_eq!(validate(InputMode::Text, &accented, 50), Ok(accented.clone()));
}

#[test]
fn url_mode_only_requires_content() {
    assert_eq!(
        validate(InputMode::Url, " https://x.example ", 50),
        Ok("https://x.example".to_string())
    );
}

#[test]
fn short_text_is_rejected_without_network_effects() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::InputChanged("too short to judge".into()));
    let (mut state, effects) = update(state, Msg::SubmitClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.job_id, None);
    assert!(view.can_submit);
    assert_eq!(
        view.error,
        Some(
            JobError::Validation(ValidationError::TooShort { min: 50, actual: 18 }).to_string()
        )
    );
    let notes = state.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotifyLevel::Warning);
    assert!(state.take_notifications().is_empty());
}

#[test]
fn configured_minimum_is_honoured() {
    init_logging();
    let state = AppState::with_settings(CoreSettings {
        min_text_len: 5,
        history_limit: 5,
    });
    let (state, _) = update(state, Msg::InputChanged("hello".into()));
    let (_state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
}

#[test]
fn gauge_tracks_input_length() {
    let (state, _) = update(AppState::new(), Msg::InputChanged("a".repeat(10)));
    assert_eq!(state.view().gauge, InputGauge::Short);
    let (state, _) = update(state, Msg::InputChanged("a".repeat(60)));
    assert_eq!(state.view().gauge, InputGauge::Fair);
    let (state, _) = update(state, Msg::InputChanged("a".repeat(100)));
    assert_eq!(state.view().gauge, InputGauge::Good);
}

#[test]
fn mode_toggle_switches_validation_rules() {
    let (state, _) = update(AppState::new(), Msg::ModeSelected(InputMode::Url));
    let (state, _) = update(state, Msg::InputChanged("https://news.example/a".into()));
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.view().mode, InputMode::Url);
}

#[test]
fn stage_mapper_is_case_insensitive_with_generic_fallback() {
    assert_eq!(map_stage("Search-Tool"), "Searching the web for coverage...");
    assert_eq!(map_stage("search-tool"), "Searching the web for coverage...");
    assert_eq!(map_stage("Mystery Stage"), GENERIC_CAPTION);
    assert_eq!(map_stage(""), GENERIC_CAPTION);
}
