//! Embedding executor with concurrency and dimension checks.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use pdf_sections::Section;
use tracing::{debug, info, warn};

use crate::{embed::EmbeddingsProvider, errors::StoreError};

/// Vectors produced for one document, plus the sections that got none.
#[derive(Debug, Default)]
pub struct EmbedOutcome {
    /// `(section id, vector)` in section order.
    pub vectors: Vec<(String, Vec<f32>)>,
    /// Ids of sections whose embedding failed, in section order.
    pub failed: Vec<String>,
}

async fn embed_one(
    provider: Arc<dyn EmbeddingsProvider>,
    index: usize,
    text: String,
    expected_dim: Option<usize>,
) -> (usize, Result<Vec<f32>, StoreError>) {
    let result = provider.embed(&text).await.and_then(|v| match expected_dim {
        Some(want) if v.len() != want => Err(StoreError::VectorSizeMismatch { got: v.len(), want }),
        _ => Ok(v),
    });
    (index, result)
}

/// Embeds the content (never the title) of every section.
///
/// A failing section is logged and skipped; it never aborts the others.
/// With `expected_dim` set, vectors of another length count as failures.
/// Each job owns its text and provider handle, so the returned future is
/// `Send` and can be spawned.
pub async fn embed_sections(
    sections: &[Section],
    provider: Arc<dyn EmbeddingsProvider>,
    expected_dim: Option<usize>,
    concurrency: usize,
) -> EmbedOutcome {
    info!(
        total = sections.len(),
        concurrency, "embed_pool::embed_sections"
    );
    if sections.is_empty() {
        debug!("embed_pool::embed_sections: nothing to embed");
        return EmbedOutcome::default();
    }

    let jobs: Vec<(usize, String)> = sections
        .iter()
        .map(|s| s.content.clone())
        .enumerate()
        .collect();
    let mut results: Vec<(usize, Result<Vec<f32>, StoreError>)> = stream::iter(jobs)
        .map(move |(i, text)| embed_one(Arc::clone(&provider), i, text, expected_dim))
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;
    results.sort_by_key(|(i, _)| *i);

    let mut out = EmbedOutcome::default();
    for (i, result) in results {
        let section_id = sections[i].id.clone();
        match result {
            Ok(v) => out.vectors.push((section_id, v)),
            Err(e) => {
                let err = StoreError::EmbeddingFailed {
                    section_id: section_id.clone(),
                    reason: e.to_string(),
                };
                warn!(error = %err, "section left without embedding");
                out.failed.push(section_id);
            }
        }
    }

    debug!(
        embedded = out.vectors.len(),
        failed = out.failed.len(),
        "embed_pool::embed_sections: done"
    );
    out
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin};

    use pdf_sections::{BoundingBox, HeadingLevel};

    use super::*;

    struct LengthEmbedder;

    impl EmbeddingsProvider for LengthEmbedder {
        fn embed<'a>(
            &'a self,
            text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
            Box::pin(async move {
                if text.contains("fail") {
                    return Err(StoreError::Internal("model refused".into()));
                }
                if text.contains("wide") {
                    return Ok(vec![1.0; 3]);
                }
                Ok(vec![text.len() as f32, 1.0])
            })
        }
    }

    fn section(id: &str, content: &str) -> Section {
        Section {
            id: id.into(),
            title: "Title Words".into(),
            content: content.into(),
            page: 1,
            level: HeadingLevel::H2,
            font_size: 16.0,
            position: BoundingBox::default(),
        }
    }

    #[tokio::test]
    async fn failures_are_skipped_per_section() {
        let sections = vec![
            section("a", "good text"),
            section("b", "please fail"),
            section("c", "wide vector"),
            section("d", "more good text"),
        ];
        let out = embed_sections(&sections, Arc::new(LengthEmbedder), Some(2), 2).await;

        let ids: Vec<_> = out.vectors.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, ["a", "d"]);
        assert_eq!(out.failed, ["b", "c"]);
        assert_eq!(out.vectors[0].1, vec![9.0, 1.0]);
    }

    fn assert_send<T: Send>(_: &T) {}

    #[tokio::test]
    async fn embedding_future_can_be_spawned() {
        let sections = vec![section("a", "good text"), section("b", "more text")];
        let fut = async move { embed_sections(&sections, Arc::new(LengthEmbedder), None, 2).await };
        assert_send(&fut);
        let out = tokio::spawn(fut).await.unwrap();
        assert_eq!(out.vectors.len(), 2);
    }

    #[tokio::test]
    async fn no_dimension_check_when_unset() {
        let sections = vec![section("a", "short"), section("c", "wide vector")];
        let out = embed_sections(&sections, Arc::new(LengthEmbedder), None, 4).await;
        assert_eq!(out.vectors.len(), 2);
        assert!(out.failed.is_empty());
    }
}
