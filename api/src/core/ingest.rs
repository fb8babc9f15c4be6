//! Bridges the document library and the section store.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use section_store::{DocumentMeta, IngestReport};
use tracing::{info, warn};

use crate::{
    core::{app_state::AppState, library::DocumentRecord},
    error_handler::{AppError, AppResult},
};

/// Extracts and embeds one stored document and marks it indexed.
///
/// If the record was deleted while the document was being processed, the
/// freshly installed sections are dropped again and the ingest reports
/// [`AppError::DocumentNotFound`].
pub async fn ingest_record(
    state: &AppState,
    record: &DocumentRecord,
    bytes: Vec<u8>,
) -> AppResult<IngestReport> {
    let meta = DocumentMeta::new(record.id, record.filename.clone());
    let report = state.store.process_document(meta, bytes).await?;

    if state.library.get(record.id).await.is_none() {
        let dropped = state.store.remove_document(record.id).await;
        warn!(id = record.id, ?dropped, "document deleted during ingest; index entries dropped");
        return Err(AppError::DocumentNotFound(record.id));
    }
    state
        .library
        .mark_indexed(record.id, report.sections)
        .await;
    Ok(report)
}

/// Ingests every library document, `ingest_concurrency` at a time.
/// Failures are logged per document; returns how many succeeded.
pub async fn ingest_library(state: Arc<AppState>) -> usize {
    let records = state.library.list().await;
    let total = records.len();
    let concurrency = state.config.ingest_concurrency.max(1);

    let ok = stream::iter(records)
        .map(|record| {
            let state = Arc::clone(&state);
            async move {
                let bytes = match state.library.read(&record).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(id = record.id, error = %e, "cannot read library file");
                        return false;
                    }
                };
                match ingest_record(&state, &record, bytes).await {
                    Ok(_) => true,
                    Err(e) => {
                        warn!(id = record.id, filename = %record.filename, error = %e, "ingest failed");
                        false
                    }
                }
            }
        })
        .buffer_unordered(concurrency)
        .filter(|ok| futures::future::ready(*ok))
        .count()
        .await;

    info!(total, ok, "library ingest finished");
    ok
}
