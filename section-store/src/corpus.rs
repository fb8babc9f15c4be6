//! Owned corpus state: sections per document and embeddings per section.

use std::collections::{BTreeMap, HashMap};

use pdf_sections::Section;

use crate::record::{DocumentId, DocumentMeta, SectionKey};

/// Sections of one processed document, in reading order.
#[derive(Clone, Debug)]
pub struct DocumentEntry {
    pub meta: DocumentMeta,
    pub sections: Vec<Section>,
}

/// Everything the store knows. Mutated only through the methods below so
/// that documents and their embeddings always move together.
#[derive(Debug, Default)]
pub struct CorpusState {
    documents: BTreeMap<DocumentId, DocumentEntry>,
    embeddings: HashMap<SectionKey, Vec<f32>>,
}

impl CorpusState {
    /// Installs a document, replacing any previous sections and embeddings
    /// it had. Vectors for section ids absent from `sections` are ignored.
    pub fn replace_document(
        &mut self,
        meta: DocumentMeta,
        sections: Vec<Section>,
        vectors: Vec<(String, Vec<f32>)>,
    ) {
        let id = meta.id;
        self.remove_document(id);

        for (section_id, vector) in vectors {
            if sections.iter().any(|s| s.id == section_id) {
                self.embeddings
                    .insert(SectionKey::new(id, section_id), vector);
            }
        }
        self.documents.insert(id, DocumentEntry { meta, sections });
    }

    /// Removes a document with exactly the embeddings of its sections.
    /// Returns the number of embeddings removed, or `None` if it was unknown.
    pub fn remove_document(&mut self, id: DocumentId) -> Option<usize> {
        let entry = self.documents.remove(&id)?;
        let removed = entry
            .sections
            .iter()
            .filter(|s| {
                self.embeddings
                    .remove(&SectionKey::new(id, s.id.as_str()))
                    .is_some()
            })
            .count();
        Some(removed)
    }

    pub fn document(&self, id: DocumentId) -> Option<&DocumentEntry> {
        self.documents.get(&id)
    }

    /// Documents in ascending id order.
    pub fn documents(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.documents.values()
    }

    pub fn embedding(&self, key: &SectionKey) -> Option<&[f32]> {
        self.embeddings.get(key).map(Vec::as_slice)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    pub fn section_count(&self) -> usize {
        self.documents.values().map(|d| d.sections.len()).sum()
    }

    pub fn embedding_count(&self) -> usize {
        self.embeddings.len()
    }
}
