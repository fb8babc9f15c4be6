use serde::Deserialize;

/// Body of `POST /api/intelligent-analysis`.
#[derive(Debug, Deserialize)]
pub struct AnalysisRequest {
    /// Text the reader selected in the current document.
    pub selected_text: String,
    /// Document the selection comes from; never part of the results.
    pub current_document_id: u64,
    /// Overrides the configured result limit.
    #[serde(default)]
    pub max_results: Option<usize>,
}
