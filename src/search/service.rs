//! The search service: one owned index, queried any number of times.

use std::collections::BTreeMap;

use crate::corpus::Corpus;
use crate::search::highlight::{highlight, snippet};
use crate::search::index::SearchIndex;
use crate::search::scoring::{SearchQuery, relevance_score};
use crate::search::{
    AdvancedFilters, AdvancedResultSet, DEFAULT_LIMIT, Highlights, POPULAR_SEARCHES, SearchOptions,
    SearchRecord, SearchResult, SearchResultSet, SearchStats, TypeFilter, group_by_type,
};

/// Number of results the advanced search ranks before post-filtering.
const ADVANCED_BASE_LIMIT: usize = 100;

/// Maximum number of "did you mean" suggestions.
const MAX_SUGGESTIONS: usize = 5;

/// Ranked search over an immutable index.
///
/// Build once with [`SearchService::new`] and share by reference; every
/// method takes `&self` and the index is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchService {
    index: SearchIndex,
}

impl SearchService {
    #[must_use]
    pub fn new(corpus: &Corpus) -> Self {
        Self::from_index(SearchIndex::build(corpus))
    }

    #[must_use]
    pub fn from_index(index: SearchIndex) -> Self {
        Self { index }
    }

    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Rank records against `query`.
    ///
    /// Queries shorter than two characters return no results and the
    /// popular searches as suggestions. A query with no results above
    /// `min_score` returns suggestions drawn from titles and categories.
    #[must_use]
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResultSet {
        let parsed = SearchQuery::parse(query);
        if !parsed.is_runnable() {
            return SearchResultSet {
                query: query.to_string(),
                results: Vec::new(),
                total: 0,
                categories: BTreeMap::new(),
                suggestions: popular_searches(),
            };
        }

        let limit = if options.limit == 0 {
            DEFAULT_LIMIT
        } else {
            options.limit
        };

        let mut results: Vec<SearchResult> = self
            .candidates(options.kind)
            .filter_map(|record| {
                let score = relevance_score(record, &parsed);
                (score >= options.min_score).then(|| SearchResult {
                    record: record.clone(),
                    score,
                    highlights: None,
                })
            })
            .collect();

        // Stable, so ties keep index order.
        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(limit);

        if options.include_highlights {
            let terms: Vec<&str> = parsed.terms().iter().map(|t| t.as_str()).collect();
            for result in &mut results {
                result.highlights = Some(highlights_for(&result.record, &terms));
            }
        }

        let suggestions = if results.is_empty() {
            self.suggestions(query)
        } else {
            Vec::new()
        };

        tracing::debug!(
            query,
            terms = parsed.terms().len(),
            hits = results.len(),
            "search complete"
        );

        SearchResultSet {
            query: query.to_string(),
            total: results.len(),
            categories: group_by_type(&results),
            results,
            suggestions,
        }
    }

    /// Search, then narrow the top results by category, type and technology.
    ///
    /// `total` counts every result that passed the filters, before the
    /// final truncation to `filters.limit`.
    #[must_use]
    pub fn advanced_search(&self, query: &str, filters: &AdvancedFilters) -> AdvancedResultSet {
        let base = self.search(
            query,
            &SearchOptions {
                limit: ADVANCED_BASE_LIMIT,
                ..SearchOptions::default()
            },
        );

        let category = filters
            .category
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("all"))
            .map(str::to_lowercase);
        let kind = filters
            .kind
            .as_deref()
            .map_or(TypeFilter::All, TypeFilter::parse);
        let technology = filters
            .technology
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase);

        let filtered: Vec<SearchResult> = base
            .results
            .into_iter()
            .filter(|r| {
                category
                    .as_ref()
                    .is_none_or(|c| r.record.category.to_lowercase() == *c)
            })
            .filter(|r| kind.admits(r.record.kind))
            // Technologies are part of every record's search text.
            .filter(|r| {
                technology
                    .as_ref()
                    .is_none_or(|t| r.record.search_text.contains(t.as_str()))
            })
            .collect();

        let total = filtered.len();
        let mut results = filtered;
        results.truncate(filters.limit.filter(|&n| n > 0).unwrap_or(DEFAULT_LIMIT));

        AdvancedResultSet {
            set: SearchResultSet {
                query: base.query,
                total,
                categories: group_by_type(&results),
                results,
                suggestions: base.suggestions,
            },
            filters: filters.clone(),
        }
    }

    /// Titles, then categories, that contain `query` ignoring case.
    #[must_use]
    pub fn suggestions(&self, query: &str) -> Vec<String> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut suggestions: Vec<String> = Vec::new();
        let titles = self.index.all().map(|r| r.title.as_str());
        let categories = self.index.all().map(|r| r.category.as_str());

        for candidate in titles.chain(categories) {
            if suggestions.len() == MAX_SUGGESTIONS {
                break;
            }
            if candidate.to_lowercase().contains(&needle)
                && !suggestions.iter().any(|s| s == candidate)
            {
                suggestions.push(candidate.to_string());
            }
        }

        suggestions
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        let mut by_type = BTreeMap::new();
        let mut types = Vec::new();
        for record in self.index.all() {
            *by_type.entry(record.kind).or_insert(0) += 1;
            if !types.contains(&record.kind) {
                types.push(record.kind);
            }
        }

        SearchStats {
            total_projects: self.index.projects().len(),
            total_skills: self.index.skills().len(),
            total_experience: self.index.experience().len(),
            total_items: self.index.len(),
            by_type,
            types,
        }
    }

    fn candidates(&self, filter: TypeFilter) -> Box<dyn Iterator<Item = &SearchRecord> + '_> {
        match filter {
            TypeFilter::All => Box::new(self.index.all()),
            TypeFilter::Only(kind) => Box::new(self.index.of_type(kind)),
        }
    }
}

/// The fixed popular searches list.
#[must_use]
pub fn popular_searches() -> Vec<String> {
    POPULAR_SEARCHES.iter().map(ToString::to_string).collect()
}

fn highlights_for(record: &SearchRecord, terms: &[&str]) -> Highlights {
    Highlights {
        title: highlight(&record.title, terms),
        description: record
            .data
            .description()
            .map(|d| highlight(&snippet(d), terms)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{Experience, Project};
    use crate::search::RecordType;

    fn project(id: u64, title: &str, description: &str) -> Project {
        Project {
            id: Some(crate::corpus::ProjectId::Number(id)),
            title: title.to_string(),
            category: "Platform".to_string(),
            description: description.to_string(),
            ..Project::default()
        }
    }

    fn experience(role: &str, company: &str, description: &str) -> Experience {
        Experience {
            role: role.to_string(),
            company: company.to_string(),
            description: description.to_string(),
            ..Experience::default()
        }
    }

    fn service() -> SearchService {
        SearchService::new(&Corpus {
            projects: vec![
                project(1, "Digital Portal Transformation", "Rebuilt the customer portal."),
                project(2, "Payments Hub", "Unified card processing."),
            ],
            experience: vec![experience(
                "Architect",
                "Acme",
                "Designed a digital portal for brokers.",
            )],
            ..Corpus::default()
        })
    }

    #[test]
    fn short_query_returns_popular_searches() {
        let set = service().search("a", &SearchOptions::default());

        assert_eq!(set.total, 0);
        assert!(set.results.is_empty());
        assert!(set.categories.is_empty());
        assert_eq!(set.suggestions, popular_searches());
    }

    #[test]
    fn title_match_outranks_description_match() {
        let set = service().search("digital portal", &SearchOptions::default());

        assert_eq!(set.results[0].record.id, "1");
        let exp = set
            .results
            .iter()
            .position(|r| r.record.kind == RecordType::Experience)
            .unwrap();
        assert!(set.results[0].score > set.results[exp].score);
    }

    #[test]
    fn limit_zero_uses_default() {
        let options = SearchOptions {
            limit: 0,
            ..SearchOptions::default()
        };
        let set = service().search("portal", &options);
        assert!(!set.results.is_empty());
    }

    #[test]
    fn highlights_can_be_skipped() {
        let options = SearchOptions {
            include_highlights: false,
            ..SearchOptions::default()
        };
        let set = service().search("portal", &options);
        assert!(set.results.iter().all(|r| r.highlights.is_none()));
    }

    #[test]
    fn description_highlights_only_for_described_types() {
        let set = service().search("portal", &SearchOptions::default());
        let top = set.results[0].highlights.as_ref().unwrap();
        assert!(top.description.is_some());
    }

    #[test]
    fn categories_group_results() {
        let set = service().search("portal", &SearchOptions::default());
        assert_eq!(set.categories[&RecordType::Project].len(), 1);
        assert_eq!(set.categories[&RecordType::Experience].len(), 1);
    }

    #[test]
    fn no_match_suggests_from_titles_and_categories() {
        let svc = service();
        let none = svc.search("zzzznonexistent", &SearchOptions::default());
        assert!(none.suggestions.is_empty());

        // min_score above anything reachable forces the fallback
        let options = SearchOptions {
            min_score: 2.0,
            ..SearchOptions::default()
        };
        let set = svc.search("Plat", &options);
        assert_eq!(set.total, 0);
        assert_eq!(set.suggestions, ["Platform"]);
    }

    #[test]
    fn suggestions_deduplicate_and_cap() {
        let projects = (1..=8)
            .map(|i| project(i, &format!("Cloud {i}"), ""))
            .collect();
        let svc = SearchService::new(&Corpus {
            projects,
            ..Corpus::default()
        });

        let suggestions = svc.suggestions("cloud");
        assert_eq!(suggestions.len(), MAX_SUGGESTIONS);
        assert_eq!(suggestions[0], "Cloud 1");

        assert_eq!(svc.suggestions("platform"), ["Platform"]);
    }

    #[test]
    fn advanced_search_filters_by_type() {
        let filters = AdvancedFilters {
            kind: Some("experience".to_string()),
            ..AdvancedFilters::default()
        };
        let set = service().advanced_search("portal", &filters);

        assert_eq!(set.set.total, 1);
        assert_eq!(set.set.results[0].record.kind, RecordType::Experience);
        assert_eq!(set.filters, filters);
    }

    #[test]
    fn advanced_search_total_counts_before_truncation() {
        let filters = AdvancedFilters {
            limit: Some(1),
            ..AdvancedFilters::default()
        };
        let set = service().advanced_search("portal", &filters);

        assert_eq!(set.set.results.len(), 1);
        assert_eq!(set.set.total, 2);
    }

    #[test]
    fn advanced_search_zero_limit_means_default() {
        let filters = AdvancedFilters {
            limit: Some(0),
            ..AdvancedFilters::default()
        };
        let set = service().advanced_search("portal", &filters);

        assert_eq!(set.set.results.len(), 2);
        assert_eq!(set.set.total, 2);
    }

    #[test]
    fn advanced_search_category_is_case_insensitive() {
        let filters = AdvancedFilters {
            category: Some("PLATFORM".to_string()),
            ..AdvancedFilters::default()
        };
        let set = service().advanced_search("portal", &filters);
        assert!(set.set.results.iter().all(|r| r.record.category == "Platform"));
        assert_eq!(set.set.total, 1);
    }

    #[test]
    fn stats_count_each_sub_index() {
        let stats = service().stats();
        assert_eq!(stats.total_projects, 2);
        assert_eq!(stats.total_skills, 0);
        assert_eq!(stats.total_experience, 1);
        assert_eq!(stats.total_items, 3);
        assert_eq!(stats.types, [RecordType::Project, RecordType::Experience]);
        assert_eq!(stats.by_type[&RecordType::Project], 2);
    }
}
