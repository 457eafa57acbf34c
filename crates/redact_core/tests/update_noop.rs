use redact_core::{update, AppState, Msg};

#[test]
fn update_is_noop() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn empty_pick_keeps_previous_assets() {
    let (state, _) = update(AppState::new(), Msg::AssetsPicked(vec!["a.jpg".into()]));
    let (next, effects) = update(state.clone(), Msg::AssetsPicked(Vec::new()));

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn clearing_selection_twice_only_marks_dirty_once() {
    let (state, _) = update(AppState::new(), Msg::AssetsPicked(vec!["a.jpg".into()]));
    let id = state.assets().iter().next().map(|asset| asset.id).unwrap();
    let (mut state, _) = update(state, Msg::AssetSelected(id));
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::SelectionCleared);
    assert_eq!(state.selected(), None);
    assert!(effects.is_empty());
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::SelectionCleared);
    assert!(!state.consume_dirty());
    assert!(state.view().selected.is_none());
}

#[test]
fn selecting_unknown_asset_is_ignored() {
    let state = AppState::new();
    let (next, effects) = update(state.clone(), Msg::AssetSelected(42));

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
