use insight_digest::Digest;
use section_store::RelatedSnippet;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub query_text: String,
    pub related_snippets: Vec<RelatedSnippet>,
    pub analysis_summary: Digest,
    /// Seconds from request receipt to response.
    pub processing_time: f64,
}
