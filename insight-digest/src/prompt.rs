//! Prompt builder for the narrative digest.

use section_store::RelatedSnippet;

use crate::KindCounts;

/// Selected text longer than this is cut before it goes into the prompt.
pub const MAX_QUERY_CHARS: usize = 500;
/// Number of top-ranked snippets quoted in the prompt.
pub const PROMPT_SNIPPETS: usize = 3;

/// Builds the analysis request for the top-ranked snippets.
pub fn build_prompt(query: &str, snippets: &[RelatedSnippet], counts: &KindCounts) -> String {
    let mut out = String::from("Analyze the following intelligent document search results:\n\n");
    out.push_str(&format!("Selected Text: \"{}\"\n\n", clip(query.trim(), MAX_QUERY_CHARS)));

    out.push_str("Related Content Found:\n");
    for s in snippets.iter().take(PROMPT_SNIPPETS) {
        out.push_str(&format!(
            "- From '{}' ({}, relevance {:.2}): {}\n",
            s.document_name, s.kind, s.similarity_score, s.excerpt
        ));
    }

    out.push_str(&format!(
        "\nStatistics:\n\
         - Supporting content: {} sections\n\
         - Related content: {} sections\n\
         - Contradictory content: {} sections\n\
         - Total: {} sections\n\n",
        counts.supporting,
        counts.related,
        counts.contradictory,
        counts.total()
    ));

    out.push_str(
        "Provide a concise analysis summary highlighting:\n\
         1. Key themes and connections found\n\
         2. Any contradictions or differing viewpoints\n\
         3. Most relevant insights from the related content\n\
         4. Recommendations based on the findings\n\n\
         Keep it under 150 words and focus on actionable insights.",
    );
    out
}

fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use section_store::RelationshipKind;

    use super::*;

    fn snippet(doc: &str, kind: RelationshipKind, score: f32) -> RelatedSnippet {
        RelatedSnippet {
            id: format!("1:{doc}"),
            title: "Heading Text".into(),
            excerpt: format!("Excerpt from {doc}."),
            document_id: 1,
            document_name: doc.into(),
            page: 1,
            section_id: "section_1_1".into(),
            similarity_score: score,
            kind,
        }
    }

    #[test]
    fn quotes_top_three_with_counts() {
        let snippets = vec![
            snippet("a.pdf", RelationshipKind::Supporting, 0.91),
            snippet("b.pdf", RelationshipKind::Contradictory, 0.55),
            snippet("c.pdf", RelationshipKind::Related, 0.41),
            snippet("d.pdf", RelationshipKind::Related, 0.35),
        ];
        let counts = KindCounts::of(&snippets);
        let prompt = build_prompt("  energy policy  ", &snippets, &counts);

        assert!(prompt.contains("Selected Text: \"energy policy\""));
        assert!(prompt.contains("- From 'a.pdf' (supporting, relevance 0.91): Excerpt from a.pdf."));
        assert!(prompt.contains("- From 'c.pdf'"));
        assert!(!prompt.contains("d.pdf"));
        assert!(prompt.contains("- Related content: 2 sections"));
        assert!(prompt.contains("- Total: 4 sections"));
        assert!(prompt.ends_with("focus on actionable insights."));
    }

    #[test]
    fn long_queries_are_clipped() {
        let long = "x".repeat(MAX_QUERY_CHARS + 20);
        let prompt = build_prompt(&long, &[], &KindCounts::default());
        assert!(prompt.contains(&format!("\"{}...\"", "x".repeat(MAX_QUERY_CHARS))));
    }
}
