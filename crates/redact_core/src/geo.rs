use crate::AssetId;

/// Location inferred by the redaction backend alongside a redacted image.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRiskEstimate {
    /// `(latitude, longitude)`
    pub coordinates: (f64, f64),
    pub confidence: Vec<f64>,
}

impl GeoRiskEstimate {
    pub fn new(latitude: f64, longitude: f64, confidence: Vec<f64>) -> Self {
        Self {
            coordinates: (latitude, longitude),
            confidence,
        }
    }

    /// Highest-ranked probability, if the backend sent any.
    pub fn top_confidence(&self) -> Option<f64> {
        self.confidence.first().copied()
    }
}

/// The estimate of the last completed redaction and the asset it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LatestEstimate {
    pub asset_id: AssetId,
    pub estimate: GeoRiskEstimate,
}
