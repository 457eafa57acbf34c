use crate::params::{normalize, DEFAULT_BLUR_INPUT, DEFAULT_MOSAIC_INPUT};
use crate::view_model::{AppViewModel, AssetRowView, SelectedAssetView};
use crate::{
    AnalysisState, AssetId, AssetStore, LatestEstimate, RedactionMethod, RedactionParameters,
    RedactionSignature, TargetSelection,
};

/// Raw redaction inputs as the user typed them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionInputs {
    pub method: RedactionMethod,
    pub blur: String,
    pub mosaic: String,
}

impl Default for RedactionInputs {
    fn default() -> Self {
        Self {
            method: RedactionMethod::default(),
            blur: DEFAULT_BLUR_INPUT.to_string(),
            mosaic: DEFAULT_MOSAIC_INPUT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    assets: AssetStore,
    selected: Option<AssetId>,
    inputs: RedactionInputs,
    targets: TargetSelection,
    estimate: Option<LatestEstimate>,
    analysis: AnalysisState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(inputs: RedactionInputs) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn with_targets(mut self, targets: TargetSelection) -> Self {
        self.targets = targets;
        self
    }

    pub fn view(&self) -> AppViewModel {
        let current = self.current_signature();
        let assets = self
            .assets
            .iter()
            .map(|asset| AssetRowView {
                asset_id: asset.id,
                uri: asset.uri.clone(),
                displayed_uri: asset.displayed_uri().to_string(),
                phase: asset.phase,
                is_redacted: asset.is_redacted,
                loading: asset.loading,
                stale: asset
                    .applied
                    .as_ref()
                    .is_some_and(|applied| !applied.matches(&current)),
            })
            .collect();

        let selected = self
            .selected
            .and_then(|id| self.assets.get(id))
            .map(|asset| SelectedAssetView {
                asset_id: asset.id,
                analyzing: self.analysis.is_analyzing() && self.analysis.asset() == Some(asset.id),
                risk_summary: (self.analysis.asset() == Some(asset.id))
                    .then(|| self.analysis.summary().clone())
                    .unwrap_or_default(),
            });

        AppViewModel {
            assets,
            selected,
            inputs: self.inputs.clone(),
            targets: self.targets.labels().map(ToOwned::to_owned).collect(),
            estimate: self.estimate.clone(),
            analyzing: self.analysis.is_analyzing(),
            dirty: self.dirty,
        }
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn selected(&self) -> Option<AssetId> {
        self.selected
    }

    pub fn inputs(&self) -> &RedactionInputs {
        &self.inputs
    }

    pub fn targets(&self) -> &TargetSelection {
        &self.targets
    }

    pub fn estimate(&self) -> Option<&LatestEstimate> {
        self.estimate.as_ref()
    }

    pub fn analysis(&self) -> &AnalysisState {
        &self.analysis
    }

    /// Parameters a request issued right now would carry.
    pub fn current_parameters(&self) -> RedactionParameters {
        normalize(self.inputs.method, &self.inputs.blur, &self.inputs.mosaic)
    }

    pub fn current_signature(&self) -> RedactionSignature {
        RedactionSignature::new(&self.current_parameters(), &self.targets)
    }

    /// True when no redaction or analysis is waiting on the engine.
    pub fn is_settled(&self) -> bool {
        !self.assets.has_pending() && !self.analysis.is_analyzing()
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub(crate) fn set_selected(&mut self, selected: Option<AssetId>) {
        self.selected = selected;
    }

    pub(crate) fn inputs_mut(&mut self) -> &mut RedactionInputs {
        &mut self.inputs
    }

    pub(crate) fn targets_mut(&mut self) -> &mut TargetSelection {
        &mut self.targets
    }

    pub(crate) fn set_estimate(&mut self, estimate: LatestEstimate) {
        self.estimate = Some(estimate);
    }

    pub(crate) fn analysis_mut(&mut self) -> &mut AnalysisState {
        &mut self.analysis
    }
}
