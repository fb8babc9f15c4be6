//! Section segmentation driven by font size relative to the body text.
//!
//! The most frequent span size is taken as body text. Larger, multi-word,
//! non-noise spans open a new section; everything else that is not noise is
//! appended to the open section. Sections that end up without content are
//! dropped.

use std::collections::HashMap;

use tracing::debug;

use crate::clean::{clean_text, is_generic_text};
use crate::layout::TextSpan;
use crate::model::{HeadingLevel, Section};

/// Tunables for [`Segmenter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmenterOptions {
    /// A heading must be larger than `body * heading_ratio`.
    pub heading_ratio: f32,
    /// Minimum whitespace-separated tokens in a heading.
    pub min_heading_tokens: usize,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            heading_ratio: 1.1,
            min_heading_tokens: 2,
        }
    }
}

/// Most frequent font size across `spans`, ties going to the size seen first.
pub fn body_font_size(spans: &[TextSpan]) -> Option<f32> {
    let mut counts: HashMap<u32, (usize, usize)> = HashMap::new();
    for (idx, span) in spans.iter().enumerate() {
        let entry = counts.entry(span.font_size.to_bits()).or_insert((0, idx));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(bits, _)| f32::from_bits(bits))
}

/// Maps a heading/body size ratio to a level: ≥2.0 H1, ≥1.5 H2, ≥1.3 H3, else H4.
pub fn heading_level(font_size: f32, body_size: f32) -> HeadingLevel {
    let ratio = font_size / body_size;
    if ratio >= 2.0 {
        HeadingLevel::H1
    } else if ratio >= 1.5 {
        HeadingLevel::H2
    } else if ratio >= 1.3 {
        HeadingLevel::H3
    } else {
        HeadingLevel::H4
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    options: SegmenterOptions,
}

struct OpenSection {
    section: Section,
    fragments: Vec<String>,
}

impl OpenSection {
    fn close(self, out: &mut Vec<Section>) {
        let content = self.fragments.join(" ").trim().to_string();
        if !content.is_empty() {
            out.push(Section {
                content,
                ..self.section
            });
        }
    }
}

impl Segmenter {
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SegmenterOptions {
        self.options
    }

    fn is_heading(&self, span: &TextSpan, body_size: f32) -> bool {
        span.font_size > body_size * self.options.heading_ratio
            && span.text.split_whitespace().count() >= self.options.min_heading_tokens
            && !is_generic_text(&span.text)
    }

    /// Splits `spans` into sections in reading order.
    ///
    /// Ids are `section_{n}_{page}` where `n` counts heading candidates from 1,
    /// including candidates whose section is later dropped for lack of content.
    /// Deterministic for identical input.
    pub fn segment(&self, spans: &[TextSpan]) -> Vec<Section> {
        let Some(body_size) = body_font_size(spans) else {
            return Vec::new();
        };

        let mut sections = Vec::new();
        let mut open: Option<OpenSection> = None;
        let mut counter = 0usize;

        for span in spans {
            if self.is_heading(span, body_size) {
                if let Some(prev) = open.take() {
                    prev.close(&mut sections);
                }
                counter += 1;
                open = Some(OpenSection {
                    section: Section {
                        id: format!("section_{counter}_{}", span.page),
                        title: clean_text(&span.text),
                        content: String::new(),
                        page: span.page,
                        level: heading_level(span.font_size, body_size),
                        font_size: span.font_size,
                        position: span.bbox,
                    },
                    fragments: Vec::new(),
                });
            } else if let Some(current) = open.as_mut() {
                if is_generic_text(&span.text) {
                    continue;
                }
                let cleaned = clean_text(&span.text);
                if !cleaned.is_empty() {
                    current.fragments.push(cleaned);
                }
            }
        }

        if let Some(last) = open.take() {
            last.close(&mut sections);
        }

        debug!(
            body_size,
            headings = counter,
            sections = sections.len(),
            "segmented spans"
        );
        sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BoundingBox;

    fn span(text: &str, page: u32, size: f32) -> TextSpan {
        TextSpan::new(text, page, size)
    }

    fn single_token_headings() -> Segmenter {
        Segmenter::new(SegmenterOptions {
            min_heading_tokens: 1,
            ..SegmenterOptions::default()
        })
    }

    #[test]
    fn body_size_is_mode_with_first_seen_tie_break() {
        let spans = vec![
            span("a b", 1, 14.0),
            span("c d", 1, 10.0),
            span("e f", 1, 10.0),
            span("g h", 1, 14.0),
        ];
        assert_eq!(body_font_size(&spans), Some(14.0));
        assert_eq!(body_font_size(&[]), None);
    }

    #[test]
    fn heading_level_thresholds() {
        assert_eq!(heading_level(24.0, 12.0), HeadingLevel::H1);
        assert_eq!(heading_level(18.0, 12.0), HeadingLevel::H2);
        assert_eq!(heading_level(15.6, 12.0), HeadingLevel::H3);
        assert_eq!(heading_level(13.5, 12.0), HeadingLevel::H4);
    }

    #[test]
    fn single_heading_collects_following_body() {
        let bbox = BoundingBox {
            x: 72.0,
            y: 48.0,
            width: 150.0,
            height: 24.0,
        };
        let spans = vec![
            span("Introduction", 1, 24.0).with_bbox(bbox),
            span("First body sentence here.", 1, 12.0),
            span("Second body sentence here.", 1, 12.0),
            span("Third body sentence here.", 1, 12.0),
        ];

        let sections = single_token_headings().segment(&spans);
        assert_eq!(sections.len(), 1);
        let s = &sections[0];
        assert_eq!(s.title, "Introduction");
        assert_eq!(s.level, HeadingLevel::H1);
        assert_eq!(s.page, 1);
        assert_eq!(s.position, bbox);
        assert_eq!(s.font_size, 24.0);
        assert_eq!(
            s.content,
            "First body sentence here. Second body sentence here. Third body sentence here."
        );
    }

    #[test]
    fn default_options_require_two_token_headings() {
        let spans = vec![
            span("Introduction", 1, 24.0),
            span("Body text one.", 1, 12.0),
            span("Body text two.", 1, 12.0),
        ];
        assert!(Segmenter::default().segment(&spans).is_empty());

        let spans = vec![
            span("Getting Started", 1, 24.0),
            span("Body text one.", 1, 12.0),
            span("Body text two.", 1, 12.0),
        ];
        let sections = Segmenter::default().segment(&spans);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "section_1_1");
    }

    #[test]
    fn empty_sections_are_dropped_but_consume_ids() {
        let spans = vec![
            span("Chapter One", 1, 20.0),
            span("Chapter Two Part", 2, 20.0),
            span("Real content lives here.", 2, 10.0),
            span("More real content.", 3, 10.0),
            span("Even more content.", 3, 10.0),
            span("Appendix Notes", 3, 16.0),
        ];
        let sections = Segmenter::default().segment(&spans);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].id, "section_2_2");
        assert_eq!(sections[0].title, "Chapter Two Part");
        assert_eq!(
            sections[0].content,
            "Real content lives here. More real content. Even more content."
        );
    }

    #[test]
    fn noise_never_becomes_heading_or_content() {
        let spans = vec![
            span("Page 1", 1, 20.0),
            span("Key Findings", 1, 20.0),
            span("12", 1, 10.0),
            span("Revenue grew steadily.", 1, 10.0),
            span("Email: team@example.com", 1, 10.0),
            span("Costs stayed flat.", 1, 10.0),
        ];
        let sections = Segmenter::default().segment(&spans);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Key Findings");
        assert_eq!(sections[0].content, "Revenue grew steadily. Costs stayed flat.");
    }

    #[test]
    fn text_before_first_heading_is_ignored() {
        let spans = vec![
            span("Preamble without a heading.", 1, 10.0),
            span("Main Topic", 1, 14.0),
            span("Body of the topic.", 1, 10.0),
        ];
        let sections = Segmenter::default().segment(&spans);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].content, "Body of the topic.");
    }

    #[test]
    fn no_spans_or_all_noise_yield_nothing() {
        assert!(Segmenter::default().segment(&[]).is_empty());
        let noise = vec![span("1", 1, 10.0), span("Page 2", 2, 18.0), span("---", 2, 10.0)];
        assert!(Segmenter::default().segment(&noise).is_empty());
    }

    #[test]
    fn uniform_size_produces_no_headings() {
        let spans = vec![span("Same Size Title", 1, 12.0), span("Same size body.", 1, 12.0)];
        assert!(Segmenter::default().segment(&spans).is_empty());
    }

    #[test]
    fn segmentation_is_idempotent() {
        let spans = vec![
            span("Alpha Section", 1, 18.0),
            span("alpha body", 1, 11.0),
            span("Beta Section", 2, 18.0),
            span("beta body", 2, 11.0),
            span("closing remarks", 2, 11.0),
        ];
        let seg = Segmenter::default();
        let first = seg.segment(&spans);
        assert_eq!(first.len(), 2);
        assert_eq!(first, seg.segment(&spans));
    }
}
