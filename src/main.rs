//! Sitemap-Trail main entry point
//!
//! This is the command-line interface for the Sitemap-Trail URL discovery
//! crawler.

use anyhow::{bail, Context};
use clap::Parser;
use sitemap_trail::config::{load_config_or_default, validate, Config};
use sitemap_trail::crawler::{build_http_client, CrawlRequest};
use sitemap_trail::output::{generate_markdown_summary, print_statistics, write_json, CrawlStatistics};
use sitemap_trail::robots::{default_sitemap_url, discover_sitemaps};
use sitemap_trail::storage::{open_store, ResultStore};
use sitemap_trail::url::storage_key;
use sitemap_trail::{normalize_url, run_crawl};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Sitemap-Trail: sitemap-driven URL discovery
///
/// Sitemap-Trail resolves a site's sitemap hierarchy and records, for every
/// URL it finds, the trail of sitemaps that led to it. Optionally it also
/// follows same-origin HTML links from every sitemap URL.
#[derive(Parser, Debug)]
#[command(name = "sitemap-trail")]
#[command(version)]
#[command(about = "Sitemap-driven URL discovery", long_about = None)]
struct Cli {
    /// Entry sitemap URL (or site URL with --discover)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Politeness delay between requests in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Follow same-origin HTML links from every sitemap URL
    #[arg(long)]
    crawl_html_links: bool,

    /// Maximum HTML link depth
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Write the result as JSON ("-" for stdout)
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Write a markdown summary to this file
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Do not save the result to the database
    #[arg(long)]
    no_save: bool,

    /// List sitemaps declared in the site's robots.txt and exit
    #[arg(long, conflicts_with_all = ["list", "show", "delete", "clear"])]
    discover: bool,

    /// List saved crawl results and exit
    #[arg(long, conflicts_with_all = ["discover", "show", "delete", "clear"])]
    list: bool,

    /// Show statistics for a saved crawl result and exit
    #[arg(long, value_name = "KEY", conflicts_with_all = ["discover", "list", "delete", "clear"])]
    show: Option<String>,

    /// Delete a saved crawl result and exit
    #[arg(long, value_name = "KEY", conflicts_with_all = ["discover", "list", "show", "clear"])]
    delete: Option<String>,

    /// Delete all saved crawl results and exit
    #[arg(long, conflicts_with_all = ["discover", "list", "show", "delete"])]
    clear: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    // Handle different modes
    if cli.discover {
        handle_discover(&cli, &config).await?;
    } else if cli.list {
        handle_list(&config)?;
    } else if let Some(key) = &cli.show {
        handle_show(&config, key)?;
    } else if let Some(key) = &cli.delete {
        handle_delete(&config, key)?;
    } else if cli.clear {
        handle_clear(&config)?;
    } else {
        handle_crawl(&cli, &config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_trail=info,warn"),
            1 => EnvFilter::new("sitemap_trail=debug,info"),
            2 => EnvFilter::new("sitemap_trail=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    if let Some(path) = &cli.config {
        tracing::info!("Loading configuration from: {}", path.display());
    }

    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;

    if let Some(delay) = cli.delay {
        config.crawler.delay_ms = delay;
    }
    if cli.crawl_html_links {
        config.crawler.crawl_html_links = true;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(summary) = &cli.summary {
        config.output.summary_path = Some(summary.display().to_string());
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the default mode: crawls a sitemap and saves the result
async fn handle_crawl(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let Some(url) = &cli.url else {
        bail!("A sitemap URL is required (see --help)");
    };

    let request = CrawlRequest::new(url.as_str())
        .with_delay(config.crawler.delay_ms)
        .with_html_links(config.crawler.crawl_html_links);

    tracing::info!(
        "Delay: {}ms, HTML link crawl: {}, max depth: {}",
        config.crawler.delay_ms,
        config.crawler.crawl_html_links,
        config.crawler.max_depth
    );

    let result = run_crawl(config, &request).await.context("Crawl failed")?;

    if !cli.no_save {
        let key = storage_key(result.sitemap_url.as_deref().unwrap_or(url));
        let mut store = open_store(Path::new(&config.output.database_path))
            .with_context(|| format!("Failed to open {}", config.output.database_path))?;
        store
            .save(&key, &result)
            .with_context(|| format!("Failed to save result to {}", config.output.database_path))?;
        tracing::info!("Saved result as '{}' in {}", key, config.output.database_path);
    }

    if let Some(path) = &cli.json {
        if path == Path::new("-") {
            write_json(&result, std::io::stdout().lock())?;
        } else {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_json(&result, BufWriter::new(file))?;
            tracing::info!("JSON written to {}", path.display());
        }
    }

    if let Some(path) = &config.output.summary_path {
        generate_markdown_summary(&result, Path::new(path))
            .with_context(|| format!("Failed to write summary to {}", path))?;
        tracing::info!("Summary written to {}", path);
    }

    if !cli.quiet && cli.json.as_deref() != Some(Path::new("-")) {
        print_statistics(&CrawlStatistics::from_result(&result));
    }

    Ok(())
}

/// Handles the --discover mode: lists sitemaps declared in robots.txt
async fn handle_discover(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let Some(url) = &cli.url else {
        bail!("A site URL is required with --discover");
    };

    let client = build_http_client(config)?;
    let sitemaps = discover_sitemaps(&client, url).await?;

    if sitemaps.is_empty() {
        let site = normalize_url(url, None)?;
        println!("No sitemaps declared in robots.txt");
        println!("Conventional location: {}", default_sitemap_url(&site)?);
    } else {
        for sitemap in &sitemaps {
            println!("{}", sitemap);
        }
    }

    Ok(())
}

/// Handles the --list mode: shows saved results
fn handle_list(config: &Config) -> anyhow::Result<()> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let keys = store.list()?;

    println!("Database: {}\n", config.output.database_path);

    if keys.is_empty() {
        println!("No saved crawl results");
        return Ok(());
    }

    for stored in &keys {
        println!(
            "  {}  {} bytes  saved {}",
            stored.key,
            stored.size_bytes,
            stored.saved_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    println!("\n{} saved results", keys.len());

    Ok(())
}

/// Handles the --show mode: prints statistics for one saved result
fn handle_show(config: &Config, key: &str) -> anyhow::Result<()> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let Some(stored) = store.load(key)? else {
        bail!("No saved result named '{}'", key);
    };

    println!("Saved: {}\n", stored.saved_at.format("%Y-%m-%d %H:%M:%S UTC"));
    print_statistics(&CrawlStatistics::from_result(&stored.result));

    if !stored.result.errors.is_empty() {
        println!("Errors:");
        for error in &stored.result.errors {
            println!("  - {}", error);
        }
    }

    Ok(())
}

/// Handles the --delete mode
fn handle_delete(config: &Config, key: &str) -> anyhow::Result<()> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    if store.delete(key)? {
        println!("Deleted '{}'", key);
        Ok(())
    } else {
        bail!("No saved result named '{}'", key)
    }
}

/// Handles the --clear mode
fn handle_clear(config: &Config) -> anyhow::Result<()> {
    let mut store = open_store(Path::new(&config.output.database_path))?;
    let removed = store.delete_all()?;
    println!("Deleted {} saved results", removed);
    Ok(())
}
