use crate::assets::ToggleOutcome;
use crate::{
    AppState, AssetId, Effect, LatestEstimate, Msg, RedactionParameters, RedactionSignature,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::AssetsPicked(uris) => {
            if uris.is_empty() {
                return (state, Vec::new());
            }
            state.assets_mut().replace_all(uris);
            state.set_selected(None);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AssetSelected(asset_id) => {
            if state.assets().get(asset_id).is_some() && state.selected() != Some(asset_id) {
                state.set_selected(Some(asset_id));
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::SelectionCleared => {
            if state.selected().is_some() {
                state.set_selected(None);
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RedactionToggled(asset_id) => {
            let parameters = state.current_parameters();
            let signature = RedactionSignature::new(&parameters, state.targets());
            let outcome = state.assets_mut().toggle(asset_id, signature);
            redaction_effects(&mut state, asset_id, parameters, outcome)
        }
        Msg::RedactionRerequested(asset_id) => {
            let parameters = state.current_parameters();
            let signature = RedactionSignature::new(&parameters, state.targets());
            let outcome = state.assets_mut().rerequest(asset_id, signature);
            redaction_effects(&mut state, asset_id, parameters, outcome)
        }
        Msg::MethodChanged(method) => {
            if state.inputs().method != method {
                state.inputs_mut().method = method;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::BlurInputChanged(raw) => {
            if state.inputs().blur != raw {
                state.inputs_mut().blur = raw;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::MosaicInputChanged(raw) => {
            if state.inputs().mosaic != raw {
                state.inputs_mut().mosaic = raw;
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::TargetToggled(label) => {
            state.targets_mut().toggle(&label);
            state.mark_dirty();
            Vec::new()
        }
        Msg::AnalyzeClicked => {
            let Some(asset) = state.selected().and_then(|id| state.assets().get(id)) else {
                return (state, Vec::new());
            };
            let (asset_id, uri) = (asset.id, asset.uri.clone());
            match state.analysis_mut().begin(asset_id) {
                Some(ticket) => {
                    state.mark_dirty();
                    vec![Effect::SubmitAnalysis {
                        ticket,
                        asset_id,
                        uri,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::RedactionCompleted {
            asset_id,
            generation,
            result,
        } => {
            let applied = match result {
                Ok(done) => {
                    let applied = state.assets_mut().complete_success(
                        asset_id,
                        generation,
                        done.redacted_uri,
                    );
                    if applied {
                        state.set_estimate(LatestEstimate {
                            asset_id,
                            estimate: done.estimate,
                        });
                    }
                    applied
                }
                Err(_) => state.assets_mut().complete_failure(asset_id, generation),
            };
            if applied {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AnalysisCompleted { ticket, result } => {
            if state.analysis_mut().complete(ticket, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn redaction_effects(
    state: &mut AppState,
    asset_id: AssetId,
    parameters: RedactionParameters,
    outcome: ToggleOutcome,
) -> Vec<Effect> {
    match outcome {
        ToggleOutcome::Request { generation } => {
            let Some(uri) = state.assets().get(asset_id).map(|asset| asset.uri.clone()) else {
                return Vec::new();
            };
            let selection = state.targets().clone();
            state.mark_dirty();
            vec![Effect::SubmitRedaction {
                asset_id,
                generation,
                uri,
                parameters,
                selection,
            }]
        }
        ToggleOutcome::Flipped => {
            state.mark_dirty();
            Vec::new()
        }
        ToggleOutcome::Busy | ToggleOutcome::UnknownAsset => Vec::new(),
    }
}
