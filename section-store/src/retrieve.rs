//! Related-content ranking over a corpus snapshot.

use tracing::trace;

use crate::classify::{RELEVANCE_FLOOR, RelationshipClassifier};
use crate::corpus::CorpusState;
use crate::record::{DocumentId, RelatedSnippet, SectionKey};
use crate::similarity::cosine;
use crate::snippet::make_snippet;

/// Scores every embedded section outside `exclude` against `query_vector`.
///
/// Keeps matches strictly above [`RELEVANCE_FLOOR`], classifies them, sorts
/// by score descending (stable, so equal scores keep corpus order) and
/// truncates to `max_results`. Sections whose vector length differs from the
/// query's are skipped.
pub fn rank_related(
    state: &CorpusState,
    query_vector: &[f32],
    query_text: &str,
    exclude: DocumentId,
    max_results: usize,
    classifier: &dyn RelationshipClassifier,
) -> Vec<RelatedSnippet> {
    let mut out = Vec::new();
    let mut scanned = 0usize;

    for doc in state.documents().filter(|d| d.meta.id != exclude) {
        for section in &doc.sections {
            let key = SectionKey::new(doc.meta.id, section.id.as_str());
            let Some(vector) = state.embedding(&key) else {
                continue;
            };
            scanned += 1;
            let Some(score) = cosine(query_vector, vector) else {
                trace!(section = %key, "dimension mismatch; skipped");
                continue;
            };
            if score <= RELEVANCE_FLOOR {
                continue;
            }
            out.push(RelatedSnippet {
                id: key.to_string(),
                title: section.title.clone(),
                excerpt: make_snippet(&section.content),
                document_id: doc.meta.id,
                document_name: doc.meta.name.clone(),
                page: section.page,
                section_id: section.id.clone(),
                similarity_score: score,
                kind: classifier.classify(query_text, &section.content, score),
            });
        }
    }

    out.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    out.truncate(max_results);
    trace!(scanned, hits = out.len(), "retrieve::rank_related");
    out
}

#[cfg(test)]
mod tests {
    use pdf_sections::{BoundingBox, HeadingLevel, Section};

    use super::*;
    use crate::classify::KeywordClassifier;
    use crate::record::{DocumentMeta, RelationshipKind};

    fn section(id: &str, content: &str) -> Section {
        Section {
            id: id.into(),
            title: format!("Title {id}"),
            content: content.into(),
            page: 2,
            level: HeadingLevel::H2,
            font_size: 18.0,
            position: BoundingBox::default(),
        }
    }

    /// Vector at `deg` degrees in the plane: cosine against [1, 0] is cos(deg).
    fn at(deg: f32) -> Vec<f32> {
        let r = deg.to_radians();
        vec![r.cos(), r.sin()]
    }

    fn corpus() -> CorpusState {
        let mut state = CorpusState::default();
        state.replace_document(
            DocumentMeta::new(1, "source.pdf"),
            vec![section("section_1_1", "The source itself says so.")],
            vec![("section_1_1".into(), at(0.0))],
        );
        state.replace_document(
            DocumentMeta::new(2, "other.pdf"),
            vec![
                section("section_1_1", "Strong agreement with the claim."),
                section("section_2_2", "However, the data shows otherwise."),
                section("section_3_2", "Loosely connected background."),
                section("section_4_3", "Unrelated material entirely."),
                section("section_5_3", "Never embedded."),
            ],
            vec![
                ("section_1_1".into(), at(20.0)),
                ("section_2_2".into(), at(60.0)),
                ("section_3_2".into(), at(70.0)),
                ("section_4_3".into(), at(85.0)),
            ],
        );
        state.replace_document(
            DocumentMeta::new(3, "third.pdf"),
            vec![section("section_1_1", "Another strong agreement.")],
            vec![("section_1_1".into(), at(30.0))],
        );
        state
    }

    #[test]
    fn ranks_filters_and_classifies() {
        let hits = rank_related(&corpus(), &at(0.0), "the claim", 1, 10, &KeywordClassifier);

        let ids: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["2:section_1_1", "3:section_1_1", "2:section_2_2", "2:section_3_2"]);

        assert!(hits.iter().all(|h| h.document_id != 1));
        assert!(hits.iter().all(|h| h.similarity_score > RELEVANCE_FLOOR));
        assert!(hits.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));

        let kinds: Vec<_> = hits.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            [
                RelationshipKind::Supporting,
                RelationshipKind::Supporting,
                RelationshipKind::Contradictory,
                RelationshipKind::Related,
            ]
        );
        assert_eq!(hits[0].document_name, "other.pdf");
        assert_eq!(hits[0].page, 2);
        assert_eq!(hits[0].excerpt, "Strong agreement with the claim.");
    }

    #[test]
    fn truncates_to_max_results() {
        let hits = rank_related(&corpus(), &at(0.0), "the claim", 1, 2, &KeywordClassifier);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[1].id, "3:section_1_1");
    }

    #[test]
    fn zero_query_vector_finds_nothing() {
        let none = rank_related(&corpus(), &[0.0, 0.0], "anything", 1, 5, &KeywordClassifier);
        assert!(none.is_empty());
    }

    #[test]
    fn mismatched_dimensions_are_skipped() {
        let hits = rank_related(&corpus(), &[1.0, 0.0, 0.0], "q", 1, 5, &KeywordClassifier);
        assert!(hits.is_empty());
    }
}
