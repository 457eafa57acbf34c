use std::collections::BTreeMap;

use crate::params::{RedactionMethod, RedactionParameters};
use crate::selection::TargetSelection;

pub type AssetId = u64;

/// Where an asset sits in its redaction lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedactionPhase {
    #[default]
    Idle,
    Requesting,
    Redacted,
    ToggledOff,
    Failed,
}

/// Everything that determined the output of one redaction request.
#[derive(Debug, Clone, PartialEq)]
pub struct RedactionSignature {
    pub method: RedactionMethod,
    pub blur_kernel_size: u64,
    pub mosaic_scale: f64,
    pub selection: TargetSelection,
}

impl RedactionSignature {
    pub fn new(parameters: &RedactionParameters, selection: &TargetSelection) -> Self {
        Self {
            method: parameters.method,
            blur_kernel_size: parameters.blur_kernel_size,
            mosaic_scale: parameters.mosaic_scale,
            selection: selection.clone(),
        }
    }

    /// NaN scales compare equal here so an unchanged NaN input is not stale.
    pub fn matches(&self, other: &RedactionSignature) -> bool {
        self.method == other.method
            && self.blur_kernel_size == other.blur_kernel_size
            && (self.mosaic_scale == other.mosaic_scale
                || (self.mosaic_scale.is_nan() && other.mosaic_scale.is_nan()))
            && self.selection == other.selection
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    pub id: AssetId,
    pub uri: String,
    pub is_redacted: bool,
    pub redacted_uri: Option<String>,
    pub loading: bool,
    pub phase: RedactionPhase,
    /// Token of the most recently issued request.
    pub generation: u64,
    /// Signature of the request currently in flight.
    pub requested: Option<RedactionSignature>,
    /// Signature of the request that produced `redacted_uri`.
    pub applied: Option<RedactionSignature>,
}

impl ImageAsset {
    fn new(id: AssetId, uri: String) -> Self {
        Self {
            id,
            uri,
            is_redacted: false,
            redacted_uri: None,
            loading: false,
            phase: RedactionPhase::Idle,
            generation: 0,
            requested: None,
            applied: None,
        }
    }

    /// The resource the view should show right now.
    pub fn displayed_uri(&self) -> &str {
        match (&self.redacted_uri, self.is_redacted) {
            (Some(redacted), true) => redacted,
            _ => &self.uri,
        }
    }
}

/// Why a toggle or re-request did not issue a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A request must be sent with this generation.
    Request { generation: u64 },
    /// Cached result flipped locally.
    Flipped,
    /// A request is already in flight.
    Busy,
    UnknownAsset,
}

/// Keyed store of selected images. Completions address entries by id and
/// never touch other entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, ImageAsset>,
    next_id: AssetId,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current selection with fresh assets. Ids are never reused,
    /// so responses addressed to replaced assets find no entry.
    pub fn replace_all<I, S>(&mut self, uris: I) -> Vec<AssetId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assets.clear();
        uris.into_iter().map(|uri| self.insert(uri.into())).collect()
    }

    pub fn insert(&mut self, uri: String) -> AssetId {
        self.next_id += 1;
        let id = self.next_id;
        self.assets.insert(id, ImageAsset::new(id, uri));
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&ImageAsset> {
        self.assets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageAsset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Any redaction request still in flight.
    pub fn has_pending(&self) -> bool {
        self.assets.values().any(|asset| asset.loading)
    }

    /// User toggle: flips a cached result locally, otherwise starts a request.
    pub(crate) fn toggle(&mut self, id: AssetId, signature: RedactionSignature) -> ToggleOutcome {
        let Some(asset) = self.assets.get_mut(&id) else {
            return ToggleOutcome::UnknownAsset;
        };
        if asset.loading {
            return ToggleOutcome::Busy;
        }
        if asset.redacted_uri.is_some() {
            asset.is_redacted = !asset.is_redacted;
            asset.phase = if asset.is_redacted {
                RedactionPhase::Redacted
            } else {
                RedactionPhase::ToggledOff
            };
            return ToggleOutcome::Flipped;
        }
        Self::begin(asset, signature)
    }

    /// Explicit re-request, bypassing any cached result.
    pub(crate) fn rerequest(&mut self, id: AssetId, signature: RedactionSignature) -> ToggleOutcome {
        match self.assets.get_mut(&id) {
            None => ToggleOutcome::UnknownAsset,
            Some(asset) if asset.loading => ToggleOutcome::Busy,
            Some(asset) => Self::begin(asset, signature),
        }
    }

    fn begin(asset: &mut ImageAsset, signature: RedactionSignature) -> ToggleOutcome {
        asset.requested = Some(signature);
        asset.loading = true;
        asset.is_redacted = true;
        asset.phase = RedactionPhase::Requesting;
        asset.generation += 1;
        ToggleOutcome::Request {
            generation: asset.generation,
        }
    }

    /// Looks up the entry a completion is addressed to, if it is still the
    /// request the asset is waiting for.
    fn awaiting(&mut self, id: AssetId, generation: u64) -> Option<&mut ImageAsset> {
        self.assets.get_mut(&id).filter(|asset| {
            asset.phase == RedactionPhase::Requesting && asset.generation == generation
        })
    }

    /// Returns false when the completion was stale and nothing changed.
    pub(crate) fn complete_success(
        &mut self,
        id: AssetId,
        generation: u64,
        redacted_uri: String,
    ) -> bool {
        let Some(asset) = self.awaiting(id, generation) else {
            return false;
        };
        asset.redacted_uri = Some(redacted_uri);
        asset.is_redacted = true;
        asset.loading = false;
        asset.phase = RedactionPhase::Redacted;
        asset.applied = asset.requested.take();
        true
    }

    /// `is_redacted` keeps its optimistic value and `redacted_uri` is untouched.
    pub(crate) fn complete_failure(&mut self, id: AssetId, generation: u64) -> bool {
        let Some(asset) = self.awaiting(id, generation) else {
            return false;
        };
        asset.loading = false;
        asset.phase = RedactionPhase::Failed;
        asset.requested = None;
        true
    }
}
