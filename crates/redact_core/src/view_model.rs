use crate::{AssetId, LatestEstimate, RedactionInputs, RedactionPhase, RiskSummary};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub assets: Vec<AssetRowView>,
    pub selected: Option<SelectedAssetView>,
    pub inputs: RedactionInputs,
    pub targets: Vec<String>,
    pub estimate: Option<LatestEstimate>,
    pub analyzing: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRowView {
    pub asset_id: AssetId,
    pub uri: String,
    pub displayed_uri: String,
    pub phase: RedactionPhase,
    pub is_redacted: bool,
    pub loading: bool,
    /// Cached result was produced with different parameters than the current ones.
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAssetView {
    pub asset_id: AssetId,
    pub analyzing: bool,
    pub risk_summary: RiskSummary,
}
