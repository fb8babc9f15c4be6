//! PDF section outline extraction.
//!
//! Pipeline: a [`LayoutReader`] produces positioned text runs per page,
//! [`collect_spans`] flattens them into page-ordered [`TextSpan`]s and a
//! [`Segmenter`] groups those spans into titled [`Section`]s using font size
//! relative to the body text.

pub mod clean;
pub mod errors;
pub mod layout;
pub mod model;
pub mod pdfium_reader;
pub mod segment;

use tracing::{info, instrument};

pub use clean::{clean_text, is_generic_text};
pub use errors::{Result, SectionsError};
pub use layout::{LayoutReader, PageLayout, RawSpan, TextSpan, collect_spans};
pub use model::{BoundingBox, HeadingLevel, Section};
pub use pdfium_reader::{PDFIUM_LIB_DIR_ENV, PdfiumReader};
pub use segment::{Segmenter, SegmenterOptions, body_font_size, heading_level};

/// Reads `bytes` with `reader` and segments the result into sections.
///
/// A readable PDF without any heading candidates yields an empty list.
///
/// # Errors
/// [`SectionsError::DocumentUnreadable`] when the reader cannot parse the bytes.
#[instrument(skip_all, fields(bytes = bytes.len()))]
pub fn extract_sections(
    reader: &dyn LayoutReader,
    bytes: &[u8],
    segmenter: &Segmenter,
) -> Result<Vec<Section>> {
    let spans = collect_spans(reader, bytes)?;
    let sections = segmenter.segment(&spans);
    info!(spans = spans.len(), sections = sections.len(), "sections extracted");
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLayout(Vec<PageLayout>);

    impl LayoutReader for FixedLayout {
        fn read_layout(&self, _bytes: &[u8]) -> Result<Vec<PageLayout>> {
            Ok(self.0.clone())
        }
    }

    struct Unreadable;

    impl LayoutReader for Unreadable {
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
    fn pages_are_read_in_order() {
        let reader = FixedLayout(vec![
            PageLayout {
                number: 2,
                width: 612.0,
                height: 792.0,
                spans: vec![raw("Second Heading", 18.0), raw("second body text", 10.0)],
            },
            PageLayout {
                number: 1,
                width: 612.0,
                height: 792.0,
                spans: vec![
                    raw("First Heading", 18.0),
                    raw("first body text", 10.0),
                    raw("   ", 10.0),
                    raw("more first body", 10.0),
                ],
            },
        ]);

        let sections = extract_sections(&reader, b"%PDF", &Segmenter::default()).unwrap();
        let ids: Vec<_> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["section_1_1", "section_2_2"]);
        assert_eq!(sections[0].content, "first body text more first body");
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let err = extract_sections(&Unreadable, b"junk", &Segmenter::default()).unwrap_err();
        assert!(matches!(err, SectionsError::DocumentUnreadable { .. }));
    }
}
