use crate::AssetId;

/// Shown when a well-formed response carried no summary text.
pub const NO_RISKS_IDENTIFIED: &str = "Analysis failed or no risks were identified.";
/// Shown when the file could not be read or the request failed.
pub const ANALYSIS_FAILED: &str = "An error occurred during image analysis.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RiskSummary {
    #[default]
    Absent,
    Pending,
    Available(String),
    Failed(String),
}

impl RiskSummary {
    pub fn text(&self) -> Option<&str> {
        match self {
            RiskSummary::Available(text) | RiskSummary::Failed(text) => Some(text),
            RiskSummary::Absent | RiskSummary::Pending => None,
        }
    }
}

/// What the analysis pipeline reported back for one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisResultKind {
    Summary(String),
    /// Response was well formed but had no text at the expected path.
    NoFindings,
    Failed,
}

/// Single-flight analysis state for the selected asset.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisState {
    analyzing: bool,
    ticket: u64,
    asset: Option<AssetId>,
    summary: RiskSummary,
}

impl AnalysisState {
    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn summary(&self) -> &RiskSummary {
        &self.summary
    }

    /// Asset the current summary belongs to.
    pub fn asset(&self) -> Option<AssetId> {
        self.asset
    }

    /// Starts a new analysis, discarding any prior summary. Returns the
    /// ticket, or `None` while another analysis is running.
    pub(crate) fn begin(&mut self, asset: AssetId) -> Option<u64> {
        if self.analyzing {
            return None;
        }
        self.analyzing = true;
        self.ticket += 1;
        self.asset = Some(asset);
        self.summary = RiskSummary::Pending;
        Some(self.ticket)
    }

    /// Applies a completion; stale tickets are ignored.
    pub(crate) fn complete(&mut self, ticket: u64, result: AnalysisResultKind) -> bool {
        if !self.analyzing || ticket != self.ticket {
            return false;
        }
        self.analyzing = false;
        self.summary = match result {
            AnalysisResultKind::Summary(text) => RiskSummary::Available(text),
            AnalysisResultKind::NoFindings => {
                RiskSummary::Available(NO_RISKS_IDENTIFIED.to_string())
            }
            AnalysisResultKind::Failed => RiskSummary::Failed(ANALYSIS_FAILED.to_string()),
        };
        true
    }
}
