//! Redaction core: pure state machine and view-model helpers.
mod analysis;
mod assets;
mod effect;
mod geo;
mod msg;
mod params;
mod selection;
mod state;
mod update;
mod view_model;

pub use analysis::{
    AnalysisResultKind, AnalysisState, RiskSummary, ANALYSIS_FAILED, NO_RISKS_IDENTIFIED,
};
pub use assets::{AssetId, AssetStore, ImageAsset, RedactionPhase, RedactionSignature};
pub use effect::Effect;
pub use geo::{GeoRiskEstimate, LatestEstimate};
pub use msg::{Msg, RedactionFailed, RedactionResult};
pub use params::{
    normalize, RedactionMethod, RedactionParameters, DEFAULT_BLUR_INPUT, DEFAULT_BLUR_KSIZE,
    DEFAULT_MOSAIC_INPUT,
};
pub use selection::{TargetSelection, CATEGORY_UNIVERSE};
pub use state::{AppState, RedactionInputs};
pub use update::update;
pub use view_model::{AppViewModel, AssetRowView, SelectedAssetView};
