//! Short excerpts of section content.

use std::sync::OnceLock;

use regex::Regex;

/// Sentence fragments shorter than this (after trimming) are skipped.
const MIN_SENTENCE_CHARS: usize = 10;
const MAX_SENTENCES: usize = 4;
/// Length of the fallback excerpt when no sentences qualify.
pub const FALLBACK_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

static TERMINATORS: OnceLock<Regex> = OnceLock::new();

fn terminators() -> &'static Regex {
    TERMINATORS.get_or_init(|| Regex::new(r"[.!?]+").expect("terminator pattern is valid"))
}

/// Reduces `content` to at most four sentences.
///
/// Sentences are split on runs of `.`, `!` or `?`; fragments under ten
/// characters are dropped. Content without terminators, or without any
/// qualifying sentence, falls back to its first 150 characters followed by
/// `...` (or the whole content when it is not longer than that).
pub fn make_snippet(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    if !terminators().is_match(content) {
        return truncate_with_ellipsis(content);
    }

    let sentences: Vec<&str> = terminators()
        .split(content)
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
        .take(MAX_SENTENCES)
        .collect();

    if sentences.is_empty() {
        return truncate_with_ellipsis(content);
    }

    let mut snippet = sentences.join(". ");
    if !snippet.ends_with(['.', '!', '?']) {
        snippet.push('.');
    }
    snippet
}

fn truncate_with_ellipsis(content: &str) -> String {
    match content.char_indices().nth(FALLBACK_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_four_sentences() {
        let content = "First sentence is here. Second sentence is here! Third sentence is here? \
                       Fourth sentence is here. Fifth sentence is here.";
        assert_eq!(
            make_snippet(content),
            "First sentence is here. Second sentence is here. Third sentence is here. Fourth sentence is here."
        );
    }

    #[test]
    fn drops_short_fragments() {
        assert_eq!(
            make_snippet("Fig. 3. The model converges quickly!!! Ok."),
            "The model converges quickly."
        );
    }

    #[test]
    fn long_unpunctuated_content_is_cut_at_150_chars() {
        let content = "word ".repeat(60);
        let snippet = make_snippet(&content);
        assert_eq!(snippet.chars().count(), FALLBACK_CHARS + ELLIPSIS.len());
        assert!(snippet.ends_with(ELLIPSIS));
        assert_eq!(&snippet[..FALLBACK_CHARS], &content[..FALLBACK_CHARS]);
    }

    #[test]
    fn short_content_without_sentences_is_kept() {
        assert_eq!(make_snippet("tiny. bit."), "tiny. bit.");
        assert_eq!(make_snippet(""), "");
    }

    #[test]
    fn unterminated_tail_gets_a_period() {
        assert_eq!(
            make_snippet("A first full sentence here. And a trailing clause without end"),
            "A first full sentence here. And a trailing clause without end."
        );
    }
}
