use std::fmt;

use serde::{Deserialize, Serialize};

/// Axis-aligned box in page space, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Coarse heading level derived from the heading/body font-size ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::H3 => "H3",
            Self::H4 => "H4",
        };
        f.write_str(s)
    }
}

/// A titled block of document text, opened by a heading span.
///
/// `id` is unique within the owning document; across documents the identity
/// is the pair (document id, section id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    /// 1-based page of the heading.
    pub page: u32,
    pub level: HeadingLevel,
    pub font_size: f32,
    /// Bounding box of the heading span.
    pub position: BoundingBox,
}
