use std::sync::Arc;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use insight_digest::{DigestConfig, Digester, LlmSummarizer, Summarizer};
use pdf_sections::PdfiumReader;
use section_store::{EmbeddingsProvider, LlmEmbedder, SectionStore, StoreConfig};
use tracing::info;

use crate::{
    core::{config::AppConfig, library::DocumentLibrary},
    error_handler::AppError,
};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub config: AppConfig,
    /// PDF files and their records.
    pub library: DocumentLibrary,
    /// Sections, embeddings and related-content search.
    pub store: SectionStore,
    /// Narrative digests over search results.
    pub digester: Digester,
    /// LLM profiles, checked by `/health`. `None` in setups without providers.
    pub llm: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        library: DocumentLibrary,
        store: SectionStore,
        digester: Digester,
        llm: Option<Arc<LlmServiceProfiles>>,
    ) -> Self {
        Self {
            config,
            library,
            store,
            digester,
            llm,
        }
    }

    /// Wires the production state from environment variables.
    ///
    /// The pdfium library must be loadable (`PDFIUM_LIB_DIR` or the system
    /// library). Missing LLM configuration is tolerated: sections are still extracted,
    /// related-content search reports itself unavailable and digests use
    /// templates.
    pub fn from_env() -> Result<Self, AppError> {
        let config = AppConfig::from_env()?;
        let library = DocumentLibrary::open(&config.upload_dir)?;

        let llm = Arc::new(
            LlmServiceProfiles::from_env().map_err(|e| AppError::Startup(e.to_string()))?,
        );

        let embedder = llm
            .embedding()
            .map(|client| Arc::new(LlmEmbedder::new(client)) as Arc<dyn EmbeddingsProvider>);
        let store_cfg = StoreConfig::from_env().map_err(|e| AppError::Startup(e.to_string()))?;
        let reader = PdfiumReader::from_env().map_err(|e| AppError::Startup(e.to_string()))?;
        let store = SectionStore::new(store_cfg, Arc::new(reader), embedder)
            .map_err(|e| AppError::Startup(e.to_string()))?;

        let summarizer = llm
            .summary()
            .map(|client| Arc::new(LlmSummarizer::new(client)) as Arc<dyn Summarizer>);
        let digest_cfg = DigestConfig::from_env().map_err(|e| AppError::Startup(e.to_string()))?;
        let digester = Digester::new(summarizer, digest_cfg);

        info!(
            address = %config.address,
            upload_dir = %config.upload_dir.display(),
            analysis = store.has_embedder(),
            narrative = digester.has_summarizer(),
            "application state ready"
        );
        Ok(Self::new(config, library, store, digester, Some(llm)))
    }
}
