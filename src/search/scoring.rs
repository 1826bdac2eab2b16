//! Query tokenization and relevance scoring.
//!
//! Per query term a record earns:
//!
//! | Signal                                   | Points |
//! |------------------------------------------|--------|
//! | title contains the term                  | 10     |
//! | category contains the term               | 8      |
//! | search text contains the term            | 5      |
//! | term starts a word in the search text    | 3      |
//! | each occurrence in the search text       | 1      |
//!
//! The sum is multiplied by the record type's boost, divided by
//! `terms * 10` and clamped to 1.0. The occurrence count includes the first
//! occurrence, so a single hit is credited by both the containment and the
//! occurrence signal. Existing rankings depend on that, so it stays.

use regex::Regex;

use crate::search::SearchRecord;

const TITLE_WEIGHT: f64 = 10.0;
const CATEGORY_WEIGHT: f64 = 8.0;
const TEXT_WEIGHT: f64 = 5.0;
const WORD_START_WEIGHT: f64 = 3.0;
const OCCURRENCE_WEIGHT: f64 = 1.0;

/// Per-term denominator used to normalize raw scores.
const TERM_NORMALIZER: f64 = 10.0;

/// Minimum length, in characters, of a runnable query and of each term.
const MIN_QUERY_CHARS: usize = 2;

/// Split a query into lowercase terms, dropping single characters.
#[must_use]
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|term| term.chars().count() >= MIN_QUERY_CHARS)
        .map(str::to_string)
        .collect()
}

/// A tokenized term with its word-start matcher.
#[derive(Debug, Clone)]
pub struct QueryTerm {
    text: String,
    word_start: Option<Regex>,
}

impl QueryTerm {
    fn new(text: String) -> Self {
        let pattern = format!(r"(?i)\b{}", regex::escape(&text));
        let word_start = match Regex::new(&pattern) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(term = %text, error = %e, "word-start matcher unavailable");
                None
            }
        };
        Self { text, word_start }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    fn starts_word_in(&self, haystack: &str) -> bool {
        self.word_start
            .as_ref()
            .is_some_and(|re| re.is_match(haystack))
    }
}

/// A parsed query, ready to score records against.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    raw: String,
    terms: Vec<QueryTerm>,
}

impl SearchQuery {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            terms: tokenize(raw).into_iter().map(QueryTerm::new).collect(),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub fn terms(&self) -> &[QueryTerm] {
        &self.terms
    }

    /// False for queries too short to search: fewer than two characters
    /// after trimming, or no term longer than one character.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.raw.trim().chars().count() >= MIN_QUERY_CHARS && !self.terms.is_empty()
    }
}

/// Normalized relevance of `record` to `query`, in `[0, 1]`.
#[must_use]
pub fn relevance_score(record: &SearchRecord, query: &SearchQuery) -> f64 {
    let terms = query.terms();
    if terms.is_empty() {
        return 0.0;
    }

    let title = record.title.to_lowercase();
    let category = record.category.to_lowercase();
    let text = record.search_text.as_str();

    let mut score = 0.0;
    for term in terms {
        let needle = term.as_str();

        if title.contains(needle) {
            score += TITLE_WEIGHT;
        }
        if category.contains(needle) {
            score += CATEGORY_WEIGHT;
        }
        if text.contains(needle) {
            score += TEXT_WEIGHT;
        }
        if term.starts_word_in(text) {
            score += WORD_START_WEIGHT;
        }

        #[allow(clippy::cast_precision_loss)]
        let occurrences = text.matches(needle).count() as f64;
        score += occurrences * OCCURRENCE_WEIGHT;
    }

    score *= record.kind.boost();

    #[allow(clippy::cast_precision_loss)]
    let normalizer = terms.len() as f64 * TERM_NORMALIZER;
    (score / normalizer).min(1.0)
}
