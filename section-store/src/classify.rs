//! Relationship classification between a query and a matched section.

use std::sync::OnceLock;

use regex::Regex;

use crate::record::RelationshipKind;

/// Matches at or below this score never reach classification.
pub const RELEVANCE_FLOOR: f32 = 0.3;
/// Above this score a match is `supporting` regardless of vocabulary.
pub const SUPPORTING_THRESHOLD: f32 = 0.7;
/// Contrast vocabulary only counts above this score.
pub const CONTRADICTION_MIN_SCORE: f32 = 0.4;

/// Negation and contrast markers, matched as whole words.
pub const CONTRADICTION_MARKERS: &[&str] = &[
    "however",
    "but",
    "although",
    "contrary",
    "not",
    "no",
    "never",
    "disagree",
    "wrong",
    "incorrect",
    "mistaken",
    "false",
];

/// Decides how a candidate relates to the query text.
///
/// Implementations must be deterministic in `(query, candidate_text, score)`.
pub trait RelationshipClassifier: Send + Sync {
    fn classify(&self, query: &str, candidate_text: &str, score: f32) -> RelationshipKind;
}

/// Fixed-vocabulary classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

static MARKERS: OnceLock<Regex> = OnceLock::new();
static WORD: OnceLock<Regex> = OnceLock::new();

fn markers() -> &'static Regex {
    MARKERS.get_or_init(|| {
        let alternation = CONTRADICTION_MARKERS.join("|");
        Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("marker pattern is valid")
    })
}

fn word() -> &'static Regex {
    WORD.get_or_init(|| Regex::new(r"\w").expect("word pattern is valid"))
}

impl RelationshipClassifier for KeywordClassifier {
    fn classify(&self, query: &str, candidate_text: &str, score: f32) -> RelationshipKind {
        if score > SUPPORTING_THRESHOLD {
            return RelationshipKind::Supporting;
        }
        if score > CONTRADICTION_MIN_SCORE
            && word().is_match(query)
            && markers().is_match(candidate_text)
        {
            return RelationshipKind::Contradictory;
        }
        RelationshipKind::Related
    }
}
