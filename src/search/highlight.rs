//! Match highlighting as structured segments.
//!
//! Matching is case-insensitive but segments carry the original text, so a
//! renderer can wrap `Kubernetes` rather than `kubernetes`.

use std::ops::Range;

use regex::RegexBuilder;
use serde::Serialize;

/// Maximum characters of a description included in a snippet.
pub const SNIPPET_CHARS: usize = 200;

/// A run of text that either matched a query term or did not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub matched: bool,
}

impl Segment {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_string(),
            matched,
        }
    }
}

/// The first [`SNIPPET_CHARS`] characters of `text`, with `...` appended
/// when anything was cut.
#[must_use]
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Split `text` into segments, marking every case-insensitive occurrence of
/// any of `terms`. Overlapping matches merge into one segment.
#[must_use]
pub fn highlight<S: AsRef<str>>(text: &str, terms: &[S]) -> Vec<Segment> {
    let mut ranges: Vec<Range<usize>> = terms
        .iter()
        .flat_map(|term| find_all(text, term.as_ref()))
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(ranges.len());
    for range in ranges {
        match merged.last_mut() {
            Some(last) if range.start <= last.end => last.end = last.end.max(range.end),
            _ => merged.push(range),
        }
    }

    let mut segments = Vec::with_capacity(merged.len() * 2 + 1);
    let mut cursor = 0;
    for range in merged {
        if range.start > cursor {
            segments.push(Segment::new(&text[cursor..range.start], false));
        }
        segments.push(Segment::new(&text[range.clone()], true));
        cursor = range.end;
    }
    if cursor < text.len() {
        segments.push(Segment::new(&text[cursor..], false));
    }

    segments
}

/// Render segments as a string, wrapping matches in `open` and `close`.
#[must_use]
pub fn render(segments: &[Segment], open: &str, close: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        if segment.matched {
            out.push_str(open);
            out.push_str(&segment.text);
            out.push_str(close);
        } else {
            out.push_str(&segment.text);
        }
    }
    out
}

/// Non-overlapping byte ranges where `text` matches `term` ignoring case.
fn find_all(text: &str, term: &str) -> Vec<Range<usize>> {
    if term.is_empty() {
        return Vec::new();
    }

    match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re.find_iter(text).map(|m| m.range()).collect(),
        Err(e) => {
            tracing::warn!(term, error = %e, "highlight matcher unavailable");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(segments: &[Segment]) -> Vec<&str> {
        segments
            .iter()
            .filter(|s| s.matched)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn preserves_original_case() {
        let segments = highlight("Kubernetes", &["kubernetes"]);
        assert_eq!(segments, vec![Segment::new("Kubernetes", true)]);
    }

    #[test]
    fn marks_every_occurrence() {
        let segments = highlight("Cloud migration to the CLOUD", &["cloud"]);
        assert_eq!(matched(&segments), ["Cloud", "CLOUD"]);
        assert_eq!(render(&segments, "<mark>", "</mark>"), "<mark>Cloud</mark> migration to the <mark>CLOUD</mark>");
    }

    #[test]
    fn multiple_terms() {
        let segments = highlight("Digital Portal Transformation", &["portal", "digital"]);
        assert_eq!(
            render(&segments, "[", "]"),
            "[Digital] [Portal] Transformation"
        );
    }

    #[test]
    fn overlapping_terms_merge() {
        let segments = highlight("Microservices", &["micro", "croser"]);
        assert_eq!(matched(&segments), ["Microser"]);
    }

    #[test]
    fn no_match_is_one_plain_segment() {
        let segments = highlight("Azure", &["aws"]);
        assert_eq!(segments, vec![Segment::new("Azure", false)]);
    }

    #[test]
    fn multibyte_text() {
        let segments = highlight("Café Über", &["über"]);
        assert_eq!(matched(&segments), ["Über"]);
    }

    #[test]
    fn metacharacters_match_literally() {
        let segments = highlight("C++ and Node.js, not Nodexjs", &["c++", "node.js"]);
        assert_eq!(matched(&segments), ["C++", "Node.js"]);
    }

    #[test]
    fn term_case_is_ignored() {
        let segments = highlight("azure devops", &["AZURE"]);
        assert_eq!(matched(&segments), ["azure"]);
    }

    #[test]
    fn empty_term_matches_nothing() {
        let segments = highlight("Azure", &[""]);
        assert_eq!(segments, vec![Segment::new("Azure", false)]);
    }

    #[test]
    fn snippet_truncates_long_text() {
        let long = "x".repeat(250);
        let cut = snippet(&long);
        assert_eq!(cut.len(), SNIPPET_CHARS + 3);
        assert!(cut.ends_with("..."));

        assert_eq!(snippet("short"), "short");
        assert_eq!(snippet(&"y".repeat(SNIPPET_CHARS)), "y".repeat(SNIPPET_CHARS));
    }
}
