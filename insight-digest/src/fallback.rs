//! Deterministic digests used when no narrative can be generated.

use section_store::RelatedSnippet;

use crate::KindCounts;

/// Summary for an empty result set.
pub const NO_RELATED_CONTENT: &str = "No related content found in your document library.";

const TOP: usize = 3;

/// Digest used when no summarizer is configured: counts plus the documents
/// of the top three matches, in rank order.
pub fn without_summarizer(snippets: &[RelatedSnippet], counts: &KindCounts) -> String {
    let top: Vec<&str> = snippets
        .iter()
        .take(TOP)
        .map(|s| s.document_name.as_str())
        .collect();
    format!(
        "📊 Analysis Results:\n\
         Found {} related sections across your documents.\n\
         • {} supporting content\n\
         • {} related content\n\
         • {} contradictory content\n\n\
         Top matches from: {}",
        counts.total(),
        counts.supporting,
        counts.related,
        counts.contradictory,
        top.join(", ")
    )
}

/// Digest used when the summarizer failed: counts, the distinct documents of
/// the top three matches and the mean similarity as a percentage.
pub fn after_failure(snippets: &[RelatedSnippet], counts: &KindCounts) -> String {
    let mut key_documents: Vec<&str> = Vec::new();
    for s in snippets.iter().take(TOP) {
        if !key_documents.contains(&s.document_name.as_str()) {
            key_documents.push(&s.document_name);
        }
    }
    format!(
        "📊 Analysis Results:\n\
         Found {} related sections across your documents.\n\
         • {} supporting • {} related • {} contradictory\n\n\
         Key documents: {}\n\
         Average relevance: {:.1}%",
        counts.total(),
        counts.supporting,
        counts.related,
        counts.contradictory,
        key_documents.join(", "),
        average_score(snippets) * 100.0
    )
}

fn average_score(snippets: &[RelatedSnippet]) -> f32 {
    if snippets.is_empty() {
        return 0.0;
    }
    snippets.iter().map(|s| s.similarity_score).sum::<f32>() / snippets.len() as f32
}
