//! Narrative digest over ranked related-content results.
//!
//! Public API: [`Digester::digest`]. It counts the relationship kinds, builds
//! a compact prompt from the top matches, asks the [`Summarizer`] (bounded by
//! a timeout) and falls back to a deterministic template when the summarizer
//! is absent, slow, failing or returns nothing. It never fails.

mod config;
mod error;
mod fallback;
mod prompt;
mod summarizer;

pub use config::{DEFAULT_SUMMARY_TIMEOUT_SECS, DigestConfig};
pub use error::DigestError;
pub use fallback::NO_RELATED_CONTENT;
pub use prompt::build_prompt;
pub use summarizer::{LlmSummarizer, SYSTEM_PROMPT, Summarizer};

use std::sync::Arc;

use section_store::{RelatedSnippet, RelationshipKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Number of results per relationship kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounts {
    pub supporting: usize,
    pub related: usize,
    pub contradictory: usize,
}

impl KindCounts {
    pub fn of(snippets: &[RelatedSnippet]) -> Self {
        snippets.iter().fold(Self::default(), |mut c, s| {
            match s.kind {
                RelationshipKind::Supporting => c.supporting += 1,
                RelationshipKind::Related => c.related += 1,
                RelationshipKind::Contradictory => c.contradictory += 1,
            }
            c
        })
    }

    pub fn total(&self) -> usize {
        self.supporting + self.related + self.contradictory
    }
}

/// Where the summary text came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestSource {
    Llm,
    Template,
}

/// Human-readable digest of a result set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digest {
    pub summary: String,
    #[serde(flatten)]
    pub counts: KindCounts,
    /// Distinct contributing document names, in rank order.
    pub documents: Vec<String>,
    pub source: DigestSource,
}

/// Builds digests, optionally with a narrative summarizer.
#[derive(Clone)]
pub struct Digester {
    summarizer: Option<Arc<dyn Summarizer>>,
    cfg: DigestConfig,
}

impl Digester {
    pub fn new(summarizer: Option<Arc<dyn Summarizer>>, cfg: DigestConfig) -> Self {
        Self { summarizer, cfg }
    }

    /// Template-only digester.
    pub fn templated() -> Self {
        Self::new(None, DigestConfig::default())
    }

    pub fn has_summarizer(&self) -> bool {
        self.summarizer.is_some()
    }

    /// Summarizes `snippets` (ranked, best first) for `query`.
    ///
    /// Empty input yields [`NO_RELATED_CONTENT`]; otherwise the summary is
    /// never empty.
    pub async fn digest(&self, query: &str, snippets: &[RelatedSnippet]) -> Digest {
        let counts = KindCounts::of(snippets);
        let mut documents: Vec<String> = Vec::new();
        for s in snippets {
            if !documents.contains(&s.document_name) {
                documents.push(s.document_name.clone());
            }
        }
        let digest = |summary: String, source| Digest {
            summary,
            counts,
            documents: documents.clone(),
            source,
        };

        if snippets.is_empty() {
            return digest(NO_RELATED_CONTENT.to_string(), DigestSource::Template);
        }

        let Some(summarizer) = &self.summarizer else {
            return digest(
                fallback::without_summarizer(snippets, &counts),
                DigestSource::Template,
            );
        };

        match self.narrate(summarizer.as_ref(), query, snippets, &counts).await {
            Ok(text) => digest(text, DigestSource::Llm),
            Err(e) => {
                warn!(error = %e, "narrative summary failed; using template");
                digest(fallback::after_failure(snippets, &counts), DigestSource::Template)
            }
        }
    }

    async fn narrate(
        &self,
        summarizer: &dyn Summarizer,
        query: &str,
        snippets: &[RelatedSnippet],
        counts: &KindCounts,
    ) -> Result<String, DigestError> {
        let prompt = build_prompt(query, snippets, counts);
        debug!(prompt_len = prompt.len(), "requesting narrative summary");
        let text = tokio::time::timeout(self.cfg.timeout, summarizer.summarize(&prompt))
            .await
            .map_err(|_| DigestError::Timeout(self.cfg.timeout))??;
        let text = text.trim();
        if text.is_empty() {
            return Err(DigestError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::time::Duration;

    use super::*;

    enum Script {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct Scripted(Script);

    impl Summarizer for Scripted {
        fn summarize<'a>(
            &'a self,
            prompt: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<String, DigestError>> + Send + 'a>> {
            Box::pin(async move {
                assert!(prompt.contains("Selected Text:"));
                match &self.0 {
                    Script::Reply(text) => Ok(text.to_string()),
                    Script::Fail => Err(DigestError::EmptyResponse),
                    Script::Hang => {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                        Ok("too late".into())
                    }
                }
            })
        }
    }

    fn snippet(doc: &str, kind: RelationshipKind, score: f32) -> RelatedSnippet {
        RelatedSnippet {
            id: format!("3:{doc}"),
            title: "Heading Text".into(),
            excerpt: "Some excerpt.".into(),
            document_id: 3,
            document_name: doc.into(),
            page: 1,
            section_id: "section_1_1".into(),
            similarity_score: score,
            kind,
        }
    }

    fn sample() -> Vec<RelatedSnippet> {
        vec![
            snippet("a.pdf", RelationshipKind::Supporting, 0.8),
            snippet("b.pdf", RelationshipKind::Related, 0.5),
            snippet("a.pdf", RelationshipKind::Contradictory, 0.45),
        ]
    }

    fn with(script: Script) -> Digester {
        Digester::new(
            Some(Arc::new(Scripted(script))),
            DigestConfig {
                timeout: Duration::from_secs(15),
            },
        )
    }

    #[tokio::test]
    async fn empty_results_have_a_fixed_summary() {
        let d = with(Script::Reply("unused")).digest("query", &[]).await;
        assert_eq!(d.summary, NO_RELATED_CONTENT);
        assert_eq!(d.counts.total(), 0);
        assert!(d.documents.is_empty());
    }

    #[tokio::test]
    async fn uses_the_narrative_when_available() {
        let d = with(Script::Reply("  Both documents agree on costs.  "))
            .digest("costs", &sample())
            .await;
        assert_eq!(d.summary, "Both documents agree on costs.");
        assert_eq!(d.source, DigestSource::Llm);
        assert_eq!(d.documents, ["a.pdf", "b.pdf"]);
        assert_eq!(
            d.counts,
            KindCounts {
                supporting: 1,
                related: 1,
                contradictory: 1
            }
        );
    }

    #[tokio::test]
    async fn absent_summarizer_uses_first_template() {
        let d = Digester::templated().digest("costs", &sample()).await;
        assert_eq!(d.source, DigestSource::Template);
        assert!(d.summary.ends_with("Top matches from: a.pdf, b.pdf, a.pdf"));
    }

    #[tokio::test]
    async fn failing_or_blank_summarizer_uses_second_template() {
        for script in [Script::Fail, Script::Reply("   ")] {
            let d = with(script).digest("costs", &sample()).await;
            assert_eq!(d.source, DigestSource::Template);
            assert!(d.summary.contains("Key documents: a.pdf, b.pdf"));
            assert!(d.summary.ends_with("Average relevance: 58.3%"));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_summarizer_times_out() {
        let d = with(Script::Hang).digest("costs", &sample()).await;
        assert_eq!(d.source, DigestSource::Template);
        assert!(d.summary.contains("Average relevance:"));
    }

    #[test]
    fn digest_serializes_flat_counts() {
        let d = Digest {
            summary: "s".into(),
            counts: KindCounts {
                supporting: 2,
                related: 0,
                contradictory: 1,
            },
            documents: vec!["a.pdf".into()],
            source: DigestSource::Template,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["supporting"], 2);
        assert_eq!(json["source"], "template");
    }
}
