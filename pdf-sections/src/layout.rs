//! Layout reader seam and the span collector built on top of it.
//!
//! A [`LayoutReader`] turns PDF bytes into per-page runs of text with their
//! rendered font size and position. [`collect_spans`] flattens that output
//! into the page-ordered [`TextSpan`] sequence consumed by the segmenter.

use tracing::debug;

use crate::errors::Result;
use crate::model::BoundingBox;

/// One run of text as reported by a layout reader.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSpan {
    pub text: String,
    pub font_size: f32,
    pub bbox: BoundingBox,
}

/// All text runs of one page, in visual order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    /// 1-based page number.
    pub number: u32,
    pub width: f32,
    pub height: f32,
    pub spans: Vec<RawSpan>,
}

/// A non-empty text run with its page, ready for segmentation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub page: u32,
    pub font_size: f32,
    pub bbox: BoundingBox,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, page: u32, font_size: f32) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            bbox: BoundingBox::default(),
        }
    }

    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = bbox;
        self
    }
}

/// Source of positioned text runs for a PDF.
///
/// Implementations own any parser state for the duration of the call and
/// release it before returning.
pub trait LayoutReader: Send + Sync {
    /// Reads every page of `bytes`.
    ///
    /// # Errors
    /// `DocumentUnreadable` when the bytes cannot be parsed as a PDF.
    fn read_layout(&self, bytes: &[u8]) -> Result<Vec<PageLayout>>;
}

/// Flattens a reader's pages into page-ordered spans.
///
/// Spans are whitespace-trimmed; runs that are empty after trimming are
/// dropped. No other filtering happens here.
pub fn collect_spans(reader: &dyn LayoutReader, bytes: &[u8]) -> Result<Vec<TextSpan>> {
    let mut pages = reader.read_layout(bytes)?;
    pages.sort_by_key(|p| p.number);

    let mut out = Vec::new();
    for page in pages {
        for raw in page.spans {
            let text = raw.text.trim();
            if text.is_empty() {
                continue;
            }
            out.push(TextSpan {
                text: text.to_string(),
                page: page.number,
                font_size: raw.font_size,
                bbox: raw.bbox,
            });
        }
    }

    debug!(spans = out.len(), "collected text spans");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SectionsError;

    struct FixedReader(Vec<PageLayout>);

    impl LayoutReader for FixedReader {
        fn read_layout(&self, _bytes: &[u8]) -> Result<Vec<PageLayout>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenReader;

    impl LayoutReader for BrokenReader {
        fn read_layout(&self, _bytes: &[u8]) -> Result<Vec<PageLayout>> {
            Err(SectionsError::unreadable("not a pdf"))
        }
    }

    fn raw(text: &str, size: f32) -> RawSpan {
        RawSpan {
            text: text.into(),
            font_size: size,
            bbox: BoundingBox::default(),
        }
    }

    #[test]
    fn flattens_in_page_order_and_drops_blank_runs() {
        let reader = FixedReader(vec![
            PageLayout {
                number: 2,
                spans: vec![raw("second page", 12.0)],
                ..Default::default()
            },
            PageLayout {
                number: 1,
                spans: vec![raw("  first  ", 12.0), raw("   ", 12.0), raw("x", 9.0)],
                ..Default::default()
            },
        ]);

        let spans = collect_spans(&reader, b"").unwrap();
        let texts: Vec<_> = spans.iter().map(|s| (s.page, s.text.as_str())).collect();
        assert_eq!(texts, vec![(1, "first"), (1, "x"), (2, "second page")]);
    }

    #[test]
    fn reader_failure_propagates() {
        let err = collect_spans(&BrokenReader, b"junk").unwrap_err();
        assert!(matches!(err, SectionsError::DocumentUnreadable { .. }));
    }
}
