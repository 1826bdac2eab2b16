//! Search index, scoring and result types.
//!
//! - [`index`] flattens a [`Corpus`](crate::corpus::Corpus) into [`SearchRecord`]s
//! - [`scoring`] tokenizes queries and computes relevance
//! - [`highlight`] splits text into matched and unmatched segments
//! - [`service`] ties them together behind [`SearchService`]

pub mod highlight;
pub mod index;
pub mod scoring;
pub mod service;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::{Certification, Experience, Project};

pub use highlight::Segment;
pub use index::SearchIndex;
pub use service::SearchService;

/// Default number of results returned by a search.
pub const DEFAULT_LIMIT: usize = 10;

/// Default minimum normalized score for a record to be returned.
pub const DEFAULT_MIN_SCORE: f64 = 0.1;

/// Curated searches offered when a query is too short to run.
pub const POPULAR_SEARCHES: [&str; 10] = [
    "Enterprise Architecture",
    "Digital Transformation",
    "Cloud Migration",
    "Gen AI",
    "Microservices",
    "API Design",
    "Security Architecture",
    "DevOps",
    "CIAM",
    "Architecture Governance",
];

/// The closed set of record categories in the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Project,
    Skill,
    Certification,
    Experience,
}

impl RecordType {
    pub const ALL: [Self; 4] = [
        Self::Project,
        Self::Skill,
        Self::Certification,
        Self::Experience,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Skill => "skill",
            Self::Certification => "certification",
            Self::Experience => "experience",
        }
    }

    /// Multiplier applied to a record's raw score before normalization.
    #[must_use]
    pub fn boost(self) -> f64 {
        match self {
            Self::Project => 1.2,
            Self::Skill | Self::Certification => 1.1,
            Self::Experience => 1.0,
        }
    }

    /// Look up a type by name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Restricts a search to one record type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(RecordType),
}

impl TypeFilter {
    /// Parse a filter name. Anything other than a known type means `All`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        RecordType::from_name(name).map_or(Self::All, Self::Only)
    }

    #[must_use]
    pub fn admits(self, kind: RecordType) -> bool {
        match self {
            Self::All => true,
            Self::Only(only) => only == kind,
        }
    }
}

/// An individual skill together with the category it was listed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillEntry {
    pub skill: String,
    pub category: String,
}

/// The untransformed source entry a record was built from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordData {
    Project(Project),
    Skill(SkillEntry),
    Certification(Certification),
    Experience(Experience),
}

impl RecordData {
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::Project(_) => RecordType::Project,
            Self::Skill(_) => RecordType::Skill,
            Self::Certification(_) => RecordType::Certification,
            Self::Experience(_) => RecordType::Experience,
        }
    }

    /// The long-form text shown under a result, if this type has one.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        let text = match self {
            Self::Project(p) => p.description.as_str(),
            Self::Experience(e) => e.description.as_str(),
            Self::Skill(_) | Self::Certification(_) => return None,
        };
        (!text.is_empty()).then_some(text)
    }
}

/// One indexed, immutable unit of searchable content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: RecordType,
    pub title: String,
    pub category: String,
    /// Lowercased concatenation of every matchable field.
    pub search_text: String,
    pub url: String,
    pub data: RecordData,
}

/// Title and description split into highlight segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub title: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<Segment>>,
}

/// A ranked record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub record: SearchRecord,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlights: Option<Highlights>,
}

/// Options for filtering and limiting search results.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchOptions {
    pub kind: TypeFilter,
    pub limit: usize,
    pub include_highlights: bool,
    pub min_score: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            kind: TypeFilter::All,
            limit: DEFAULT_LIMIT,
            include_highlights: true,
            min_score: DEFAULT_MIN_SCORE,
        }
    }
}

/// Everything a caller needs to render one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Number of results returned.
    pub total: usize,
    /// Returned results grouped by record type.
    pub categories: BTreeMap<RecordType, Vec<SearchResult>>,
    pub suggestions: Vec<String>,
}

/// Post-filters for [`SearchService::advanced_search`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedFilters {
    /// Exact category name, case-insensitive. `"all"` disables the filter.
    pub category: Option<String>,
    /// Record type name. `"all"` and unknown names disable the filter.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Technology mentioned anywhere in the record.
    pub technology: Option<String>,
    pub limit: Option<usize>,
}

/// Result of an advanced search: the filtered set plus the filters applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedResultSet {
    #[serde(flatten)]
    pub set: SearchResultSet,
    pub filters: AdvancedFilters,
}

/// Index sizes, for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub total_projects: usize,
    /// Skills sub-index size, certifications included.
    pub total_skills: usize,
    pub total_experience: usize,
    pub total_items: usize,
    pub by_type: BTreeMap<RecordType, usize>,
    /// Distinct record types present, in index order.
    pub types: Vec<RecordType>,
}

/// Group results by record type, preserving rank order within each group.
#[must_use]
pub fn group_by_type(results: &[SearchResult]) -> BTreeMap<RecordType, Vec<SearchResult>> {
    let mut groups: BTreeMap<RecordType, Vec<SearchResult>> = BTreeMap::new();
    for result in results {
        groups
            .entry(result.record.kind)
            .or_default()
            .push(result.clone());
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_filter_parses_known_names() {
        assert_eq!(TypeFilter::parse("skill"), TypeFilter::Only(RecordType::Skill));
        assert_eq!(
            TypeFilter::parse(" Experience "),
            TypeFilter::Only(RecordType::Experience)
        );
    }

    #[test]
    fn type_filter_falls_back_to_all() {
        assert_eq!(TypeFilter::parse("all"), TypeFilter::All);
        assert_eq!(TypeFilter::parse("projects"), TypeFilter::All);
        assert_eq!(TypeFilter::parse(""), TypeFilter::All);
    }

    #[test]
    fn boosts() {
        assert!((RecordType::Project.boost() - 1.2).abs() < f64::EPSILON);
        assert!((RecordType::Certification.boost() - 1.1).abs() < f64::EPSILON);
        assert!((RecordType::Experience.boost() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_type_serializes_lowercase() {
        let json = serde_json::to_string(&RecordType::Certification).unwrap();
        assert_eq!(json, "\"certification\"");
    }
}
