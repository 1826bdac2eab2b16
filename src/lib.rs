//! folio - Relevance-ranked search over a portfolio corpus.
//!
//! A portfolio corpus (project case studies, skills with certifications, and
//! work history) is flattened once into an immutable index of uniformly
//! shaped records. Queries are tokenized, scored against every candidate
//! record, ranked, truncated and wrapped with highlight segments and
//! suggestions.
//!
//! # Modules
//!
//! - [`commands`] - High-level operations and text rendering (search, advanced, stats)
//! - [`corpus`] - Corpus types and JSON loading
//! - [`search`] - Index, scoring, highlighting and the search service
//! - [`config`] - Configuration loading
//! - [`cli`] - Command-line interface definitions

pub mod cli;
pub mod commands;
pub mod config;
pub mod corpus;
pub mod search;

#[cfg(feature = "mcp")]
pub mod mcp;
