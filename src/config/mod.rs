//! Configuration loading for folio.

use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::search::{DEFAULT_LIMIT, DEFAULT_MIN_SCORE};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

/// Top-level configuration loaded from config.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Where the portfolio corpus lives.
#[derive(Debug, Default, Deserialize)]
pub struct CorpusConfig {
    /// JSON corpus file. The embedded corpus is used when unset.
    pub path: Option<String>,
}

/// Defaults applied to searches that don't override them.
#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_highlights")]
    pub highlights: bool,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_score() -> f64 {
    DEFAULT_MIN_SCORE
}

fn default_highlights() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            min_score: default_min_score(),
            highlights: default_highlights(),
        }
    }
}

impl Config {
    /// Load config from `$FOLIO_CONFIG` or ~/.config/folio/config.toml,
    /// or return defaults when the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> anyhow::Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load config from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "folio").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// The configured corpus path with `~` expanded.
    #[must_use]
    pub fn corpus_path(&self) -> Option<PathBuf> {
        self.corpus.path.as_deref().map(expand_tilde)
    }
}

/// Expand ~ to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(base_dirs) = BaseDirs::new()
    {
        return base_dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();

        assert!(config.corpus.path.is_none());
        assert_eq!(config.search.limit, DEFAULT_LIMIT);
        assert!(config.search.highlights);
    }

    #[test]
    fn partial_search_section() {
        let config: Config = toml::from_str("[search]\nlimit = 3\n").unwrap();

        assert_eq!(config.search.limit, 3);
        assert!((config.search.min_score - DEFAULT_MIN_SCORE).abs() < f64::EPSILON);
    }

    #[test]
    fn corpus_path_is_expanded() {
        let config: Config = toml::from_str("[corpus]\npath = \"~/corpus.json\"\n").unwrap();

        let path = config.corpus_path().unwrap();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.ends_with("corpus.json"));
    }
}
