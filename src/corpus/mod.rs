//! Portfolio corpus types and loading.
//!
//! The corpus is the human-authored source content behind the search index:
//! project case studies, skill categories with certifications, and work
//! history. Every field is optional on disk so a sparse entry still loads.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The corpus bundled with the binary.
const EMBEDDED_CORPUS: &str = include_str!("../../data/portfolio.json");

/// Errors that can occur when loading a corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Corpus not found at {0}")]
    NotFound(PathBuf),

    #[error("Failed to read corpus: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse corpus: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Identifier supplied by the corpus for a project.
///
/// Authored corpora use both numeric and string ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProjectId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A project case study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: Option<ProjectId>,
    pub title: String,
    pub category: String,
    pub client: String,
    pub duration: String,
    pub description: String,
    pub challenge: String,
    pub solution: String,
    pub technologies: Vec<String>,
    pub outcomes: Vec<String>,
    pub featured: bool,
}

/// A named group of individual skills (e.g., "Cloud & Modern Technology").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    pub category: String,
    pub level: Option<String>,
    pub skills: Vec<String>,
}

/// A professional certification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub level: Option<String>,
}

/// Skills section: technical categories plus certifications.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub technical: Vec<SkillCategory>,
    pub certifications: Vec<Certification>,
}

/// One position in the work history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    #[serde(alias = "title")]
    pub role: String,
    pub company: String,
    pub period: String,
    pub location: String,
    pub description: String,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub impact: String,
}

/// A loaded portfolio corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Corpus {
    pub projects: Vec<Project>,
    pub skills: Skills,
    pub experience: Vec<Experience>,
}

impl Corpus {
    /// Load a corpus from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::NotFound` if the file doesn't exist.
    /// Returns `CorpusError::ReadError` if the file cannot be read.
    /// Returns `CorpusError::ParseError` if the JSON is invalid.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        if !path.exists() {
            return Err(CorpusError::NotFound(path.to_path_buf()));
        }

        let contents = fs::read_to_string(path)?;
        let corpus = Self::from_json(&contents)?;

        tracing::info!(
            path = %path.display(),
            projects = corpus.projects.len(),
            experience = corpus.experience.len(),
            "loaded corpus"
        );

        Ok(corpus)
    }

    /// Parse a corpus from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::ParseError` if the JSON is invalid.
    pub fn from_json(contents: &str) -> Result<Self, CorpusError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// The corpus bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CorpusError::ParseError` if the bundled JSON is invalid.
    pub fn embedded() -> Result<Self, CorpusError> {
        Self::from_json(EMBEDDED_CORPUS)
    }
}
