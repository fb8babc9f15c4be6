use thiserror::Error;

/// Errors raised while turning PDF bytes into sections.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum SectionsError {
    /// The PDF could not be opened or its page tree could not be walked.
    #[error("[PDF Sections] document unreadable: {reason}")]
    DocumentUnreadable { reason: String },

    /// The layout backend itself could not be loaded.
    #[error("[PDF Sections] layout reader unavailable: {reason}")]
    ReaderUnavailable { reason: String },
}

impl SectionsError {
    pub fn unreadable(reason: impl Into<String>) -> Self {
        Self::DocumentUnreadable {
            reason: reason.into(),
        }
    }

    pub fn reader_unavailable(reason: impl Into<String>) -> Self {
        Self::ReaderUnavailable {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SectionsError>;
