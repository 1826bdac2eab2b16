use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use folio::cli::{Cli, Commands};
use folio::commands;
use folio::config::Config;
use folio::search::{AdvancedFilters, SearchService};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let Some(command) = cli.command else {
        Cli::parse_from(["folio", "--help"]);
        return Ok(());
    };

    // Only commands that search need the config and corpus.
    let corpus = cli.corpus;
    let load = || -> anyhow::Result<(Config, SearchService)> {
        let config = Config::load()?;
        let service = commands::open_service(corpus.as_deref(), &config)?;
        Ok((config, service))
    };

    match command {
        Commands::Search {
            query,
            limit,
            kind,
            min_score,
            no_highlights,
            json,
        } => {
            let (config, service) = load()?;
            let options = commands::search_options(&config, limit, &kind, min_score, no_highlights);
            let set = commands::search(&service, &query, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                println!("{}", commands::format_results(&set));
            }
        }
        Commands::Advanced {
            query,
            category,
            kind,
            technology,
            limit,
            json,
        } => {
            let (_, service) = load()?;
            let filters = AdvancedFilters {
                category,
                kind,
                technology,
                limit,
            };
            let set = commands::advanced(&service, &query, &filters)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                println!("{}", commands::format_advanced(&set));
            }
        }
        Commands::Stats { json } => {
            let (_, service) = load()?;
            let stats = service.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", commands::format_stats(&stats));
            }
        }
        Commands::Popular => println!("{}", commands::format_popular()),
        #[cfg(feature = "mcp")]
        Commands::Serve => {
            let (config, service) = load()?;
            let defaults = commands::search_options(&config, None, "all", None, false);
            tokio::runtime::Runtime::new()?.block_on(folio::mcp::serve(service, defaults))?;
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for results and MCP traffic.
fn init_tracing(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = match verbose {
        0 => "warn",
        1 => "info,folio=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
