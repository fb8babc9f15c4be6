//! Text normalization and structural-noise detection for span text.

use std::sync::OnceLock;

use regex::Regex;

/// Texts shorter than this (in characters, after trimming) are noise.
pub const MIN_MEANINGFUL_CHARS: usize = 3;

static WHITESPACE: OnceLock<Regex> = OnceLock::new();
static NOISE: OnceLock<Vec<Regex>> = OnceLock::new();

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

fn noise_patterns() -> &'static [Regex] {
    NOISE.get_or_init(|| {
        [
            r"^(page|p\.?)\s*\d+",
            r"^(version|ver|v\.?)\s*[\d.]+",
            r"^(date|created|modified):\s*",
            r"^(contact|email|phone|address|website|url):\s*",
            r"^\d+$",
            r"^[a-z]$",
            r"^\W+$",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("noise pattern is valid"))
        .collect()
    })
}

fn is_kept_char(c: char) -> bool {
    c.is_alphanumeric()
        || c == '_'
        || c.is_whitespace()
        || matches!(c, '-' | '.' | ',' | ';' | ':' | '!' | '?' | '(' | ')')
}

/// Drops characters outside word characters, whitespace and `- . , ; : ! ? ( )`,
/// then collapses whitespace runs to one space and trims.
pub fn clean_text(text: &str) -> String {
    let kept: String = text.chars().filter(|c| is_kept_char(*c)).collect();
    whitespace().replace_all(kept.trim(), " ").into_owned()
}

/// Whether `text` is structural noise (page numbers, labels, stray symbols).
pub fn is_generic_text(text: &str) -> bool {
    let lowered = text.trim().to_lowercase();
    if lowered.chars().count() < MIN_MEANINGFUL_CHARS {
        return true;
    }
    noise_patterns().iter().any(|re| re.is_match(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleaning_collapses_whitespace_and_strips_symbols() {
        assert_eq!(clean_text("  Hello,\t\n world!  "), "Hello, world!");
        assert_eq!(clean_text("Price: $40 & tax (est.)"), "Price: 40 tax (est.)");
        assert_eq!(clean_text("**Intro**"), "Intro");
        assert_eq!(clean_text("Überblick – Teil 2"), "Überblick Teil 2");
        assert_eq!(clean_text("§§§"), "");
    }

    #[test]
    fn short_text_is_noise() {
        assert!(is_generic_text("ab"));
        assert!(is_generic_text("  x "));
        assert!(!is_generic_text("Scope of work"));
    }

    #[test]
    fn structural_patterns_are_noise() {
        for text in [
            "Page 12",
            "p. 3 of 9",
            "Version 2.1.0",
            "v1.2",
            "Date: 2024-01-01",
            "Created: yesterday",
            "Email: someone@example.com",
            "URL: https://example.com",
            "2024",
            "---",
            "***",
        ] {
            assert!(is_generic_text(text), "{text:?} should be noise");
        }
    }

    #[test]
    fn regular_prose_is_kept() {
        for text in [
            "Introduction to the Program",
            "Pages of history were written",
            "Dated materials remain useful",
            "Contacting the vendor early helps",
        ] {
            assert!(!is_generic_text(text), "{text:?} should be kept");
        }
    }
}
