use std::sync::Once;

use redact_core::{
    update, AnalysisResultKind, AppState, AssetId, Effect, Msg, RiskSummary, ANALYSIS_FAILED,
    NO_RISKS_IDENTIFIED,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(redact_logging::initialize_for_tests);
}

fn selected_state(uris: &[&str]) -> (AppState, Vec<AssetId>) {
    let (state, _) = update(
        AppState::new(),
        Msg::AssetsPicked(uris.iter().map(|u| u.to_string()).collect()),
    );
    let ids: Vec<AssetId> = state.assets().iter().map(|a| a.id).collect();
    let (state, _) = update(state, Msg::AssetSelected(ids[0]));
    (state, ids)
}

fn ticket_of(effects: &[Effect]) -> u64 {
    match effects {
        [Effect::SubmitAnalysis { ticket, .. }] => *ticket,
        other => panic!("expected one analysis effect, got {other:?}"),
    }
}

fn analyze_with(result: AnalysisResultKind) -> AppState {
    let (state, _ids) = selected_state(&["a.jpg"]);
    let (state, effects) = update(state, Msg::AnalyzeClicked);
    let (state, effects_after) = update(
        state,
        Msg::AnalysisCompleted {
            ticket: ticket_of(&effects),
            result,
        },
    );
    assert!(effects_after.is_empty());
    state
}

#[test]
fn analyze_requires_a_selected_asset() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::AssetsPicked(vec!["a.jpg".into()]));
    let (state, effects) = update(state, Msg::AnalyzeClicked);
    assert!(effects.is_empty());
    assert!(!state.analysis().is_analyzing());
}

#[test]
fn analyze_emits_effect_and_sets_pending() {
    init_logging();
    let (state, ids) = selected_state(&["a.jpg", "b.jpg"]);
    let (state, effects) = update(state, Msg::AnalyzeClicked);

    assert_eq!(
        effects,
        vec![Effect::SubmitAnalysis {
            ticket: 1,
            asset_id: ids[0],
            uri: "a.jpg".to_string(),
        }]
    );
    assert!(state.analysis().is_analyzing());
    assert_eq!(state.analysis().summary(), &RiskSummary::Pending);
    let view = state.view();
    assert!(view.analyzing);
    assert_eq!(view.selected.unwrap().risk_summary, RiskSummary::Pending);
}

#[test]
fn second_click_while_analyzing_is_ignored() {
    init_logging();
    let (state, _ids) = selected_state(&["a.jpg"]);
    let (state, first) = update(state, Msg::AnalyzeClicked);
    assert_eq!(first.len(), 1);
    let (_state, second) = update(state, Msg::AnalyzeClicked);
    assert!(second.is_empty());
}

#[test]
fn summary_text_becomes_available() {
    init_logging();
    let state = analyze_with(AnalysisResultKind::Summary("X".to_string()));
    assert_eq!(
        state.analysis().summary(),
        &RiskSummary::Available("X".to_string())
    );
    assert!(!state.analysis().is_analyzing());
}

#[test]
fn missing_text_becomes_negative_sentinel() {
    init_logging();
    let state = analyze_with(AnalysisResultKind::NoFindings);
    assert_eq!(
        state.analysis().summary(),
        &RiskSummary::Available(NO_RISKS_IDENTIFIED.to_string())
    );
    assert!(!state.analysis().is_analyzing());
}

#[test]
fn failure_becomes_generic_message() {
    init_logging();
    let state = analyze_with(AnalysisResultKind::Failed);
    assert_eq!(
        state.analysis().summary(),
        &RiskSummary::Failed(ANALYSIS_FAILED.to_string())
    );
    assert_eq!(state.analysis().summary().text(), Some(ANALYSIS_FAILED));
    assert!(!state.analysis().is_analyzing());
    assert!(state.is_settled());
}

#[test]
fn new_analysis_discards_prior_summary() {
    init_logging();
    let state = analyze_with(AnalysisResultKind::Summary("first".to_string()));
    let first_id = state.assets().iter().map(|a| a.id).last().unwrap();
    let (state, _) = update(state, Msg::AssetsPicked(vec!["b.jpg".into(), "c.jpg".into()]));
    let other = state.assets().iter().map(|a| a.id).last().unwrap();
    assert_ne!(other, first_id);
    let (state, _) = update(state, Msg::AssetSelected(other));

    let (state, effects) = update(state, Msg::AnalyzeClicked);
    assert_eq!(ticket_of(&effects), 2);
    assert_eq!(state.analysis().summary(), &RiskSummary::Pending);
    assert_eq!(state.analysis().asset(), Some(other));
}

#[test]
fn summary_is_only_shown_for_the_asset_it_describes() {
    init_logging();
    let (state, ids) = selected_state(&["a.jpg", "b.jpg"]);
    let (state, effects) = update(state, Msg::AnalyzeClicked);
    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            ticket: ticket_of(&effects),
            result: AnalysisResultKind::Summary("about a".to_string()),
        },
    );

    let (state, _) = update(state, Msg::AssetSelected(ids[1]));
    assert_eq!(state.view().selected.unwrap().risk_summary, RiskSummary::Absent);

    let (state, _) = update(state, Msg::AssetSelected(ids[0]));
    assert_eq!(
        state.view().selected.unwrap().risk_summary,
        RiskSummary::Available("about a".to_string())
    );
}

#[test]
fn stale_ticket_is_discarded() {
    init_logging();
    let (state, _ids) = selected_state(&["a.jpg"]);
    let (state, effects) = update(state, Msg::AnalyzeClicked);
    let ticket = ticket_of(&effects);

    let (state, _) = update(
        state,
        Msg::AnalysisCompleted {
            ticket: ticket + 1,
            result: AnalysisResultKind::Summary("wrong".to_string()),
        },
    );
    assert!(state.analysis().is_analyzing());
    assert_eq!(state.analysis().summary(), &RiskSummary::Pending);
}
