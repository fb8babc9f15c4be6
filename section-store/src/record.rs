//! Core data models used by the library.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document identifier assigned by the document library.
pub type DocumentId = u64;

/// What the store knows about a document besides its sections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub id: DocumentId,
    /// Display name reported on related snippets.
    pub name: String,
}

impl DocumentMeta {
    pub fn new(id: DocumentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Global identity of a section: section ids repeat across documents.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionKey {
    pub document_id: DocumentId,
    pub section_id: String,
}

impl SectionKey {
    pub fn new(document_id: DocumentId, section_id: impl Into<String>) -> Self {
        Self {
            document_id,
            section_id: section_id.into(),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.document_id, self.section_id)
    }
}

/// How a matched section relates to the query text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Supporting,
    Contradictory,
    Related,
}

impl RelationshipKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Supporting => "supporting",
            Self::Contradictory => "contradictory",
            Self::Related => "related",
        }
    }
}

impl fmt::Display for RelationshipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query parameters for related-content search.
#[derive(Clone, Copy, Debug)]
pub struct RelatedQuery<'a> {
    pub text: &'a str,
    /// Source document; its sections are never returned.
    pub exclude_document: DocumentId,
    /// Result cap; the store default applies when `None`.
    pub max_results: Option<usize>,
}

/// A ranked match for a related-content query.
///
/// Serialized with the field names used by the HTTP layer:
/// `id` is the global `document:section` key and `content` holds the excerpt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RelatedSnippet {
    pub id: String,
    pub title: String,
    #[serde(rename = "content")]
    pub excerpt: String,
    pub document_id: DocumentId,
    pub document_name: String,
    pub page: u32,
    pub section_id: String,
    pub similarity_score: f32,
    #[serde(rename = "snippet_type")]
    pub kind: RelationshipKind,
}

/// Outcome of processing one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub document_id: DocumentId,
    /// Sections extracted and stored.
    pub sections: usize,
    /// Sections that received an embedding.
    pub embedded: usize,
    /// Sections stored without an embedding (invisible to search).
    pub failed_sections: Vec<String>,
}
