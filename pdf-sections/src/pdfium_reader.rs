//! [`LayoutReader`] backed by `pdfium-render`.
//!
//! Pdfium reports each page's text as segments: runs that share font and
//! baseline, with their bounds. A segment's font size is taken from its
//! first character that reports one.

use pdfium_render::prelude::*;
use tracing::{debug, info, warn};

use crate::errors::{Result, SectionsError};
use crate::layout::{LayoutReader, PageLayout, RawSpan};
use crate::model::BoundingBox;

/// Directory holding the pdfium shared library. Unset means the system library.
pub const PDFIUM_LIB_DIR_ENV: &str = "PDFIUM_LIB_DIR";

/// Layout reader over a pdfium binding made once at startup.
pub struct PdfiumReader {
    pdfium: Pdfium,
}

impl PdfiumReader {
    /// Binds to `libpdfium` in `library_dir`, or to the system library.
    ///
    /// # Errors
    /// [`SectionsError::ReaderUnavailable`] if the library cannot be loaded.
    pub fn bind(library_dir: Option<&str>) -> Result<Self> {
        let bindings = match library_dir {
            Some(dir) => {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
            }
            None => Pdfium::bind_to_system_library(),
        }
        .map_err(|e| SectionsError::reader_unavailable(format!("cannot bind pdfium: {e:?}")))?;

        info!(library_dir = library_dir.unwrap_or("<system>"), "pdfium bound");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Binds using [`PDFIUM_LIB_DIR_ENV`].
    pub fn from_env() -> Result<Self> {
        let dir = std::env::var(PDFIUM_LIB_DIR_ENV).ok();
        Self::bind(dir.as_deref().filter(|d| !d.trim().is_empty()))
    }
}

impl LayoutReader for PdfiumReader {
    fn read_layout(&self, bytes: &[u8]) -> Result<Vec<PageLayout>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| SectionsError::unreadable(format!("{e:?}")))?;

        let mut out = Vec::new();
        for (index, page) in document.pages().iter().enumerate() {
            let number = index as u32 + 1;
            let height = page.height().value;
            let spans = match page.text() {
                Ok(text) => page_spans(&text, height),
                Err(e) => {
                    warn!(page = number, error = ?e, "page text unavailable; skipping page");
                    Vec::new()
                }
            };
            debug!(page = number, spans = spans.len(), "page read");
            out.push(PageLayout {
                number,
                width: page.width().value,
                height,
                spans,
            });
        }

        if out.is_empty() {
            return Err(SectionsError::unreadable("document has no pages"));
        }
        Ok(out)
    }
}

fn page_spans(text: &PdfPageText, page_height: f32) -> Vec<RawSpan> {
    text.segments()
        .iter()
        .filter_map(|segment| {
            let content = segment.text();
            if content.trim().is_empty() {
                return None;
            }
            let rect = segment.bounds();
            let bbox = top_left_box(
                rect.left.value,
                rect.bottom.value,
                rect.right.value,
                rect.top.value,
                page_height,
            );
            let char_sizes: Vec<f32> = segment
                .chars()
                .map(|chars| chars.iter().map(|c| c.scaled_font_size().value).collect())
                .unwrap_or_default();
            Some(RawSpan {
                text: content,
                font_size: segment_font_size(&char_sizes, bbox.height),
                bbox,
            })
        })
        .collect()
}

/// Converts PDF user space (origin bottom-left) to a top-left origin box.
fn top_left_box(left: f32, bottom: f32, right: f32, top: f32, page_height: f32) -> BoundingBox {
    let (bottom, top) = if top < bottom { (top, bottom) } else { (bottom, top) };
    BoundingBox {
        x: left.min(right),
        y: page_height - top,
        width: (right - left).abs(),
        height: top - bottom,
    }
}

/// First positive character size; the segment height when none is reported.
fn segment_font_size(char_sizes: &[f32], fallback: f32) -> f32 {
    char_sizes
        .iter()
        .copied()
        .find(|s| s.is_finite() && *s > 0.0)
        .unwrap_or(fallback)
}
