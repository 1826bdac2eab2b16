//! Command implementations shared by CLI and MCP server.

use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::corpus::Corpus;
use crate::search::highlight::{Segment, render};
use crate::search::{
    AdvancedFilters, AdvancedResultSet, POPULAR_SEARCHES, SearchOptions, SearchResult,
    SearchResultSet, SearchService, SearchStats, TypeFilter,
};

/// Maximum accepted query length, in characters.
const MAX_QUERY_LENGTH: usize = 1000;

/// Markers wrapped around highlighted matches in text output.
const MATCH_OPEN: &str = "**";
const MATCH_CLOSE: &str = "**";

/// Build the search service for a corpus.
///
/// The corpus comes from `corpus_override`, then the configured path, then
/// the embedded corpus.
///
/// # Errors
///
/// Returns an error if the chosen corpus cannot be loaded.
pub fn open_service(
    corpus_override: Option<&Path>,
    config: &Config,
) -> anyhow::Result<SearchService> {
    let path = corpus_override
        .map(Path::to_path_buf)
        .or_else(|| config.corpus_path());

    let corpus = match path {
        Some(path) => Corpus::load(&path)
            .with_context(|| format!("Failed to load corpus {}", path.display()))?,
        None => Corpus::embedded().context("Failed to load embedded corpus")?,
    };

    Ok(SearchService::new(&corpus))
}

/// Merge command-line overrides with configured search defaults.
#[must_use]
pub fn search_options(
    config: &Config,
    limit: Option<usize>,
    kind: &str,
    min_score: Option<f64>,
    no_highlights: bool,
) -> SearchOptions {
    SearchOptions {
        kind: TypeFilter::parse(kind),
        limit: limit.unwrap_or(config.search.limit),
        include_highlights: config.search.highlights && !no_highlights,
        min_score: min_score.unwrap_or(config.search.min_score),
    }
}

/// Reject queries no portfolio search could sensibly run.
fn validate_query(query: &str) -> anyhow::Result<()> {
    let length = query.chars().count();
    if length > MAX_QUERY_LENGTH {
        anyhow::bail!("Query too long: {length} chars (max {MAX_QUERY_LENGTH})");
    }
    if query.contains('\0') {
        anyhow::bail!("Query contains invalid character: NUL");
    }
    Ok(())
}

/// Run a ranked search.
///
/// # Errors
///
/// Returns an error if the query fails validation.
pub fn search(
    service: &SearchService,
    query: &str,
    options: &SearchOptions,
) -> anyhow::Result<SearchResultSet> {
    validate_query(query)?;
    Ok(service.search(query, options))
}

/// Run a search with post-filters.
///
/// # Errors
///
/// Returns an error if the query fails validation.
pub fn advanced(
    service: &SearchService,
    query: &str,
    filters: &AdvancedFilters,
) -> anyhow::Result<AdvancedResultSet> {
    validate_query(query)?;
    Ok(service.advanced_search(query, filters))
}

fn render_segments(segments: &[Segment]) -> String {
    render(segments, MATCH_OPEN, MATCH_CLOSE)
}

fn format_result(result: &SearchResult) -> String {
    let record = &result.record;
    let title = result
        .highlights
        .as_ref()
        .map_or_else(|| record.title.clone(), |h| render_segments(&h.title));

    let mut block = format!(
        "## {title} [{}]\n**Category:** {} | **Score:** {:.2} | **URL:** {}\n",
        record.kind, record.category, result.score, record.url
    );
    if let Some(description) = result
        .highlights
        .as_ref()
        .and_then(|h| h.description.as_deref())
    {
        block.push_str(&format!("> {}\n", render_segments(description)));
    }
    block.push('\n');
    block
}

fn format_no_matches(set: &SearchResultSet) -> String {
    let mut output = format!("No matches found for '{}'", set.query);
    if !set.suggestions.is_empty() {
        output.push_str(&format!("\n\nTry: {}", set.suggestions.join(", ")));
    }
    output
}

fn format_page(results: &[SearchResult], footer: &str) -> String {
    let mut output: String = results.iter().map(format_result).collect();
    output.push_str(footer);
    output
}

/// Render a result set as markdown-style text.
#[must_use]
pub fn format_results(set: &SearchResultSet) -> String {
    if set.results.is_empty() {
        return format_no_matches(set);
    }

    format_page(&set.results, &format!("*{} result(s) found*", set.total))
}

/// Render an advanced search, noting how many filtered results were cut.
#[must_use]
pub fn format_advanced(set: &AdvancedResultSet) -> String {
    let inner = &set.set;
    if inner.results.is_empty() {
        return format_no_matches(inner);
    }

    let footer = format!(
        "*Showing {} of {} result(s) found*",
        inner.results.len(),
        inner.total
    );
    format_page(&inner.results, &footer)
}

/// Render index statistics.
#[must_use]
pub fn format_stats(stats: &SearchStats) -> String {
    let mut lines = vec![
        format!("Projects:   {}", stats.total_projects),
        format!("Skills:     {}", stats.total_skills),
        format!("Experience: {}", stats.total_experience),
        format!("Total:      {}", stats.total_items),
        String::new(),
    ];
    lines.extend(
        stats
            .by_type
            .iter()
            .map(|(kind, count)| format!("- {kind}: {count}")),
    );

    let mut output = lines.join("\n");
    output.push('\n');
    output
}

/// Render the popular searches, one per line.
#[must_use]
pub fn format_popular() -> String {
    POPULAR_SEARCHES
        .iter()
        .map(|s| format!("- {s}"))
        .collect::<Vec<_>>()
        .join("\n")
}
