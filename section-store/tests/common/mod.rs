#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pdf_sections::{BoundingBox, LayoutReader, PageLayout, RawSpan, SectionsError};
use section_store::{EmbeddingsProvider, SectionStore, StoreConfig, StoreError};

/// Reads a plain-text script instead of PDF bytes.
///
/// Each line is `page|font size|text`; a line `!unreadable` makes the whole
/// document unreadable.
pub struct ScriptReader;

impl LayoutReader for ScriptReader {
    fn read_layout(&self, bytes: &[u8]) -> pdf_sections::Result<Vec<PageLayout>> {
        let script = std::str::from_utf8(bytes).map_err(|e| SectionsError::unreadable(e.to_string()))?;
        let mut pages: Vec<PageLayout> = Vec::new();
        for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line == "!unreadable" {
                return Err(SectionsError::unreadable("scripted failure"));
            }
            let mut parts = line.splitn(3, '|');
            let (Some(page), Some(size), Some(text)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(SectionsError::unreadable(format!("bad line: {line}")));
            };
            let page: u32 = page.parse().map_err(|_| SectionsError::unreadable("bad page"))?;
            let size: f32 = size.parse().map_err(|_| SectionsError::unreadable("bad size"))?;
            if pages.last().map(|p| p.number) != Some(page) {
                pages.push(PageLayout {
                    number: page,
                    width: 612.0,
                    height: 792.0,
                    spans: Vec::new(),
                });
            }
            if let Some(current) = pages.last_mut() {
                current.spans.push(RawSpan {
                    text: text.to_string(),
                    font_size: size,
                    bbox: BoundingBox {
                        x: 72.0,
                        y: 72.0,
                        width: 200.0,
                        height: size,
                    },
                });
            }
        }
        Ok(pages)
    }
}

/// Axes of the keyword embedding space.
pub const AXES: &[&str] = &["solar", "wind", "budget", "coffee"];

/// Embeds text as keyword counts over [`AXES`]; text containing `explode`
/// fails. Counts calls so tests can observe how often it was used.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: AtomicUsize,
}

impl KeywordEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        AXES.iter()
            .map(|axis| lower.matches(axis).count() as f32)
            .collect()
    }
}

impl EmbeddingsProvider for KeywordEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if text.contains("explode") {
                return Err(StoreError::Internal("embedding backend crashed".into()));
            }
            Ok(Self::vector(text))
        })
    }
}

pub fn store_with(embedder: Option<Arc<KeywordEmbedder>>) -> SectionStore {
    let embedder = embedder.map(|e| e as Arc<dyn EmbeddingsProvider>);
    SectionStore::new(StoreConfig::default(), Arc::new(ScriptReader), embedder)
        .expect("default config is valid")
}

/// A document with two sections about `topic`, one of which mentions it
/// together with `budget`.
pub fn two_section_doc(topic: &str) -> Vec<u8> {
    format!(
        "1|20|{topic} Energy Overview\n\
         1|10|The {topic} programme expanded this year across many regions.\n\
         1|10|Operators reported steady {topic} output.\n\
         2|20|Cost And Budget\n\
         2|10|The budget for {topic} grew while other budget lines shrank.\n"
    )
    .into_bytes()
}
