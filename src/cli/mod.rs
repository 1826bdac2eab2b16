//! CLI interface for folio.
//!
//! Provides command-line argument parsing using clap.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface for folio.
#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Relevance-ranked portfolio search", long_about = None)]
pub struct Cli {
    /// JSON corpus to index instead of the configured or embedded one.
    #[arg(long, global = true)]
    pub corpus: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Search projects, skills, certifications and experience.
    Search {
        /// The search query string.
        query: String,

        /// Maximum number of results to return.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Restrict to one record type (project, skill, certification,
        /// experience). Unknown values search everything.
        #[arg(short = 't', long = "type", default_value = "all")]
        kind: String,

        /// Drop results scoring below this threshold (0.0 to 1.0).
        #[arg(long)]
        min_score: Option<f64>,

        /// Skip match highlighting.
        #[arg(long)]
        no_highlights: bool,

        /// Print the full result set as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search, then filter the top results by category, type or technology.
    Advanced {
        /// The search query string.
        query: String,

        /// Keep only results in this category (case-insensitive).
        #[arg(short, long)]
        category: Option<String>,

        /// Keep only results of this record type.
        #[arg(short = 't', long = "type")]
        kind: Option<String>,

        /// Keep only results mentioning this technology.
        #[arg(short = 'T', long)]
        technology: Option<String>,

        /// Maximum number of results to return.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print the full result set as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show how many records of each type are indexed.
    Stats {
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the curated popular searches.
    Popular,

    /// Start the MCP server for AI editor integration.
    #[cfg(feature = "mcp")]
    Serve,
}
