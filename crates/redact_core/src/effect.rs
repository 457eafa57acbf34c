use crate::{AssetId, RedactionParameters, TargetSelection};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitRedaction {
        asset_id: AssetId,
        generation: u64,
        uri: String,
        parameters: RedactionParameters,
        selection: TargetSelection,
    },
    SubmitAnalysis {
        ticket: u64,
        asset_id: AssetId,
        uri: String,
    },
}
