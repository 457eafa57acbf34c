use crate::{AnalysisResultKind, AssetId, GeoRiskEstimate, RedactionMethod};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Image picker returned a new set of images; replaces the previous set.
    AssetsPicked(Vec<String>),
    /// User opened one image.
    AssetSelected(AssetId),
    /// User went back to the gallery.
    SelectionCleared,
    /// User flipped the redaction switch of an asset.
    RedactionToggled(AssetId),
    /// User asked for a fresh redaction even though one is cached.
    RedactionRerequested(AssetId),
    MethodChanged(RedactionMethod),
    /// Raw text of the blur size input.
    BlurInputChanged(String),
    /// Raw text of the mosaic scale input.
    MosaicInputChanged(String),
    /// User flipped one target category.
    TargetToggled(String),
    /// User asked for a risk analysis of the selected asset.
    AnalyzeClicked,
    /// Engine finished a redaction request.
    RedactionCompleted {
        asset_id: AssetId,
        generation: u64,
        result: Result<RedactionResult, RedactionFailed>,
    },
    /// Engine finished an analysis request.
    AnalysisCompleted {
        ticket: u64,
        result: AnalysisResultKind,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedactionResult {
    pub redacted_uri: String,
    pub estimate: GeoRiskEstimate,
}

/// Redaction failures carry no detail into the data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedactionFailed;
