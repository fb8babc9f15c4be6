//! In-memory section corpus with related-content search.
//!
//! This crate owns the process-lifetime state built from PDF documents:
//! - Extract sections through a [`LayoutReader`] and a [`Segmenter`]
//! - Embed each section's content with an [`EmbeddingsProvider`]
//! - Answer "what else relates to this text" queries across all other documents
//!
//! Everything goes through [`SectionStore`], which serializes work per document
//! and lets queries read a consistent snapshot while unrelated documents ingest.

mod classify;
mod config;
mod corpus;
mod embed;
mod embed_pool;
mod errors;
mod record;
mod retrieve;
mod similarity;
mod snippet;

pub use classify::{
    CONTRADICTION_MARKERS, CONTRADICTION_MIN_SCORE, KeywordClassifier, RELEVANCE_FLOOR,
    RelationshipClassifier, SUPPORTING_THRESHOLD,
};
pub use config::StoreConfig;
pub use embed::EmbeddingsProvider;
pub use embed::llm::LlmEmbedder;
pub use errors::{Result, StoreError};
pub use record::{
    DocumentId, DocumentMeta, IngestReport, RelatedQuery, RelatedSnippet, RelationshipKind,
    SectionKey,
};
pub use similarity::cosine;
pub use snippet::make_snippet;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use pdf_sections::{LayoutReader, Section, SectionsError, Segmenter};
use tokio::sync::{Mutex as AsyncMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::corpus::CorpusState;

/// High-level facade over the section corpus.
///
/// This is the single entry point recommended for application code.
pub struct SectionStore {
    cfg: StoreConfig,
    reader: Arc<dyn LayoutReader>,
    segmenter: Segmenter,
    embedder: Option<Arc<dyn EmbeddingsProvider>>,
    classifier: Arc<dyn RelationshipClassifier>,
    state: RwLock<CorpusState>,
    doc_locks: Mutex<HashMap<DocumentId, Arc<AsyncMutex<()>>>>,
}

impl SectionStore {
    /// Constructs a store. Without an embedder, documents are still segmented
    /// but related-content search answers [`StoreError::AnalysisUnavailable`].
    ///
    /// # Errors
    /// Returns `StoreError::Config` if the configuration is invalid.
    pub fn new(
        cfg: StoreConfig,
        reader: Arc<dyn LayoutReader>,
        embedder: Option<Arc<dyn EmbeddingsProvider>>,
    ) -> Result<Self> {
        cfg.validate()?;
        if embedder.is_none() {
            warn!("no embedding provider configured; related-content search is disabled");
        }
        Ok(Self {
            cfg,
            reader,
            segmenter: Segmenter::default(),
            embedder,
            classifier: Arc::new(KeywordClassifier),
            state: RwLock::new(CorpusState::default()),
            doc_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Replaces the relationship classifier.
    pub fn with_classifier(mut self, classifier: Arc<dyn RelationshipClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replaces the segmenter.
    pub fn with_segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn config(&self) -> &StoreConfig {
        &self.cfg
    }

    pub fn has_embedder(&self) -> bool {
        self.embedder.is_some()
    }

    fn document_lock(&self, id: DocumentId) -> Arc<AsyncMutex<()>> {
        let mut locks = self
            .doc_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id).or_default())
    }

    /// Extracts, embeds and installs one document, replacing any previous
    /// version of it.
    ///
    /// Runs exclusively per document id. Parsing happens on the blocking pool
    /// and embedding happens without holding the corpus lock, so other
    /// documents and queries proceed meanwhile.
    ///
    /// # Errors
    /// [`StoreError::DocumentUnreadable`] if the PDF cannot be read; the
    /// previously stored state of this document is left untouched.
    #[instrument(skip_all, fields(document_id = meta.id, bytes = bytes.len()))]
    pub async fn process_document(&self, meta: DocumentMeta, bytes: Vec<u8>) -> Result<IngestReport> {
        let lock = self.document_lock(meta.id);
        let _guard = lock.lock().await;

        let document_id = meta.id;
        let reader = Arc::clone(&self.reader);
        let segmenter = self.segmenter;
        let sections = tokio::task::spawn_blocking(move || {
            pdf_sections::extract_sections(reader.as_ref(), &bytes, &segmenter)
        })
        .await
        .map_err(|e| StoreError::Internal(format!("extraction task failed: {e}")))?
        .map_err(|e| match e {
            SectionsError::DocumentUnreadable { reason } => StoreError::DocumentUnreadable {
                document_id,
                reason,
            },
            other => StoreError::Internal(other.to_string()),
        })?;

        let outcome = match &self.embedder {
            Some(embedder) => {
                embed_pool::embed_sections(
                    &sections,
                    Arc::clone(embedder),
                    self.cfg.embedding_dim,
                    self.cfg.embedding_concurrency,
                )
                .await
            }
            None => embed_pool::EmbedOutcome {
                vectors: Vec::new(),
                failed: sections.iter().map(|s| s.id.clone()).collect(),
            },
        };

        let report = IngestReport {
            document_id,
            sections: sections.len(),
            embedded: outcome.vectors.len(),
            failed_sections: outcome.failed,
        };

        self.state
            .write()
            .await
            .replace_document(meta, sections, outcome.vectors);

        info!(
            document_id,
            sections = report.sections,
            embedded = report.embedded,
            failed = report.failed_sections.len(),
            "document processed"
        );
        Ok(report)
    }

    /// Removes a document's sections and exactly their embeddings.
    ///
    /// Returns the number of embeddings removed, or `None` if the document
    /// was not indexed.
    #[instrument(skip(self))]
    pub async fn remove_document(&self, id: DocumentId) -> Option<usize> {
        let lock = self.document_lock(id);
        let removed = {
            let _guard = lock.lock().await;
            self.state.write().await.remove_document(id)
        };
        self.release_lock(id, lock);
        debug!(document_id = id, ?removed, "document removed");
        removed
    }

    /// Drops the lock entry of `id` unless another task still holds a handle.
    fn release_lock(&self, id: DocumentId, lock: Arc<AsyncMutex<()>>) {
        let mut locks = self
            .doc_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // One handle in the map plus ours.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(&id);
        }
    }

    /// Number of per-document lock entries currently tracked.
    pub fn tracked_locks(&self) -> usize {
        self.doc_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Sections of a document in reading order (possibly empty).
    ///
    /// # Errors
    /// [`StoreError::DocumentNotIndexed`] for an unknown document.
    pub async fn sections(&self, id: DocumentId) -> Result<Vec<Section>> {
        self.state
            .read()
            .await
            .document(id)
            .map(|d| d.sections.clone())
            .ok_or(StoreError::DocumentNotIndexed(id))
    }

    /// One section of a document.
    ///
    /// # Errors
    /// [`StoreError::DocumentNotIndexed`] or [`StoreError::SectionNotFound`].
    pub async fn section(&self, id: DocumentId, section_id: &str) -> Result<Section> {
        let state = self.state.read().await;
        let doc = state.document(id).ok_or(StoreError::DocumentNotIndexed(id))?;
        doc.sections
            .iter()
            .find(|s| s.id == section_id)
            .cloned()
            .ok_or_else(|| StoreError::SectionNotFound {
                document_id: id,
                section_id: section_id.to_string(),
            })
    }

    pub async fn is_indexed(&self, id: DocumentId) -> bool {
        self.state.read().await.document(id).is_some()
    }

    pub async fn document_count(&self) -> usize {
        self.state.read().await.document_count()
    }

    pub async fn section_count(&self) -> usize {
        self.state.read().await.section_count()
    }

    pub async fn embedding_count(&self) -> usize {
        self.state.read().await.embedding_count()
    }

    /// Finds sections in other documents related to `query.text`.
    ///
    /// The query is embedded once before the corpus read lock is taken.
    ///
    /// # Errors
    /// - [`StoreError::InvalidQuery`] for blank text
    /// - [`StoreError::AnalysisUnavailable`] without an embedder or when the
    ///   query cannot be embedded
    #[instrument(skip(self, query), fields(exclude = query.exclude_document))]
    pub async fn find_related(&self, query: RelatedQuery<'_>) -> Result<Vec<RelatedSnippet>> {
        let text = query.text.trim();
        if text.is_empty() {
            return Err(StoreError::InvalidQuery("selected text is empty".into()));
        }
        let embedder = self.embedder.as_ref().ok_or_else(|| {
            StoreError::AnalysisUnavailable("no embedding provider configured".into())
        })?;

        let query_vector = embedder.embed(text).await.map_err(|e| {
            warn!(error = %e, "query embedding failed");
            StoreError::AnalysisUnavailable(format!("query embedding failed: {e}"))
        })?;

        let max_results = query.max_results.unwrap_or(self.cfg.max_results);
        let state = self.state.read().await;
        let hits = retrieve::rank_related(
            &state,
            &query_vector,
            text,
            query.exclude_document,
            max_results,
            self.classifier.as_ref(),
        );
        debug!(hits = hits.len(), max_results, "related content ranked");
        Ok(hits)
    }
}
