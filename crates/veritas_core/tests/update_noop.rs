use veritas_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn tick_without_job_is_noop() {
    let mut state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::Tick { key: 1 });

    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
    assert!(!state.consume_dirty());
}
