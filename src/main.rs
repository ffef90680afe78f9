//! GeoProfile CLI
//!
//! Command-line interface for the GeoProfile browser.
//! Provides the interactive terminal UI plus scriptable search and profile dumps.

use clap::{Parser, Subcommand};
use console::style;
use geoprofile::config::{normalize_base_url, parse_limit, parse_list};
use geoprofile::logging::{self, LogLevel};
use geoprofile::profile::{registry, SectionOutcome};
use geoprofile::search::search_blocking;
use geoprofile::{AppConfig, HttpApi, ProfileError, ProfilePage, Route, Store};
use indicatif::HumanDuration;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// GeoProfile - Browse geographic statistics profiles
///
/// Search for a country or region and read its agriculture, climate,
/// health and poverty sections from a statistics API.
#[derive(Parser)]
#[command(name = "geoprofile")]
#[command(author = "GeoProfile Contributors")]
#[command(version)]
#[command(about = "Terminal browser for geographic statistics profiles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Statistics API base URL (overrides GEOPROFILE_API)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Maximum search results shown, 0 for no limit
    #[arg(long, global = true)]
    limit: Option<String>,

    /// Delay in milliseconds between choosing a result and navigating
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Request timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Comma-separated focus entity ids highlighted on maps
    #[arg(long, global = true)]
    focus: Option<String>,

    /// Log file path (default: temp dir)
    #[arg(long, global = true)]
    log: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal browser
    Tui {
        /// Entity id to open on start (e.g. 040AF00079)
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Search for locations by name
    Search {
        /// Search text (use -- before text if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Load a profile and print its sections
    Profile {
        /// Entity id, or a `/profile/<id>` path
        id: String,

        /// Only print this topic (slug or title)
        #[arg(short, long)]
        topic: Option<String>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// List the topics and sections every profile shows
    Topics {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    logging::init(config.log_path.as_deref(), config.log_level);
    logging::info("MAIN", &format!("GeoProfile {} starting up", geoprofile::VERSION));

    let result = match cli.command {
        Commands::Tui { profile } => cmd_tui(&config, profile.as_deref()),

        Commands::Search { query, output } => cmd_search(&config, &query, &output),

        Commands::Profile { id, topic, output } => {
            cmd_profile(&config, &id, topic.as_deref(), &output)
        }

        Commands::Topics { output } => cmd_topics(&output),
    };

    logging::flush();

    if let Err(e) = result {
        logging::error("MAIN", &e.to_string());
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Environment config with command-line flags layered on top
fn build_config(cli: &Cli) -> geoprofile::Result<AppConfig> {
    let mut config = AppConfig::from_env()?;

    if let Some(api) = &cli.api {
        config.api_base = normalize_base_url(api)?;
    }
    if let Some(limit) = &cli.limit {
        config.search_limit = parse_limit(limit)?;
    }
    if let Some(ms) = cli.delay_ms {
        config.navigation_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = cli.timeout_ms {
        config.request_timeout = Duration::from_millis(ms.max(1));
    }
    if let Some(focus) = &cli.focus {
        config.focus = parse_list(focus);
    }
    if let Some(path) = &cli.log {
        config.log_path = Some(path.clone());
    }
    if let Some(level) = &cli.log_level {
        config.log_level = LogLevel::parse(level)
            .ok_or_else(|| ProfileError::InvalidConfig(format!("unknown log level '{}'", level)))?;
    }

    Ok(config)
}

/// Accept either a bare id or a `/profile/<id>` path
fn parse_target(raw: &str) -> geoprofile::Result<String> {
    if !raw.starts_with('/') {
        return Ok(raw.trim().to_string());
    }
    Route::parse(raw)?
        .entity_id()
        .map(str::to_string)
        .ok_or_else(|| ProfileError::InvalidRoute(raw.to_string()))
}

/// Interactive browser
fn cmd_tui(config: &AppConfig, profile: Option<&str>) -> geoprofile::Result<()> {
    let start = profile.map(parse_target).transpose()?.map(Route::profile);
    geoprofile::tui::run(config, start)
}

/// Search command implementation
fn cmd_search(config: &AppConfig, query: &str, output: &str) -> geoprofile::Result<()> {
    let api = HttpApi::from_config(config)?;
    let normalized = geoprofile::text::normalize_query(query);

    if output != "json" {
        println!(
            "{} Searching for '{}'",
            style("→").cyan().bold(),
            style(&normalized).yellow()
        );
    }

    let start = Instant::now();
    let results = search_blocking(&api, query, config.search_limit)?;
    let elapsed = start.elapsed();

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!();
    println!(
        "Found {} results in {}:",
        style(results.len()).green(),
        style(HumanDuration(elapsed)).cyan()
    );
    println!();

    for (i, item) in results.iter().enumerate() {
        println!(
            "  {} {} {}",
            style(format!("{:3}.", i + 1)).dim(),
            style(&item.name).cyan(),
            style(item.target()).dim()
        );
    }

    Ok(())
}

/// Profile command implementation
fn cmd_profile(
    config: &AppConfig,
    raw_id: &str,
    topic: Option<&str>,
    output: &str,
) -> geoprofile::Result<()> {
    let id = parse_target(raw_id)?;
    let api = HttpApi::from_config(config)?;

    if output != "json" {
        println!(
            "{} Loading profile {}",
            style("→").cyan().bold(),
            style(&id).yellow()
        );
    }

    let mut store = Store::new(config.focus.clone());
    store.fetch_vars(&api, &config.attr_kinds)?;
    let page = ProfilePage::load(&api, &store, &id)?;

    let topics: Vec<_> = match topic {
        Some(wanted) => {
            let slug = registry::find(wanted)
                .map(|t| t.slug.clone())
                .ok_or_else(|| ProfileError::InvalidConfig(format!("unknown topic '{}'", wanted)))?;
            page.topics.iter().filter(|t| t.slug == slug).collect()
        }
        None => page.topics.iter().collect(),
    };

    if output == "json" {
        let value = match topic {
            Some(_) => serde_json::to_value(&topics)?,
            None => serde_json::to_value(&page)?,
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "{} {} loaded in {}",
        style("✓").green().bold(),
        style(&page.header.title).bold(),
        style(HumanDuration(page.elapsed)).cyan()
    );
    println!();
    for stat in &page.header.stats {
        println!("  {} {}", style(format!("{}:", stat.label)).bold(), stat.value);
    }
    println!("  {} {}", style("Map:").bold(), style(page.header.map.topojson).dim());

    for topic in topics {
        println!();
        println!(
            "{} {}",
            style(topic.title).cyan().bold(),
            style(format!("#{}", topic.slug)).dim()
        );
        for section in &topic.sections {
            match &section.outcome {
                SectionOutcome::Ready(content) => {
                    println!("  {} {}", style("✓").green(), style(&section.title).bold());
                    println!("      {}", content.narrative);
                }
                SectionOutcome::Failed { message } => {
                    println!("  {} {}", style("✗").red(), style(&section.title).bold());
                    println!("      {}", style(message).red());
                }
            }
        }
    }

    Ok(())
}

/// Topics command implementation
fn cmd_topics(output: &str) -> geoprofile::Result<()> {
    let topics = registry::topics();

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(topics)?);
        return Ok(());
    }

    for topic in topics {
        println!(
            "{} {} {}",
            style("→").cyan().bold(),
            style(topic.title).bold(),
            style(&topic.image).dim()
        );
        for entry in &topic.sections {
            let needs: Vec<&str> = entry.section.needs().iter().map(|n| n.key).collect();
            println!(
                "    {} {}",
                style(&entry.title()).cyan(),
                style(format!("[{}]", needs.join(", "))).dim()
            );
        }
    }

    Ok(())
}
