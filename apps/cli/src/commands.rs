//! CLI command definitions, routing, and tracing setup.

use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use url::Url;

use sitekb_crawler::{CrawlProgress, Crawler};
use sitekb_shared::{AppConfig, CrawlOptions, init_config, load_config, snapshot_dir};
use sitekb_store::{DEFAULT_SEARCH_LIMIT, FileStore, KnowledgeBase};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// sitekb — crawl one organization's website into a searchable knowledge base.
#[derive(Parser)]
#[command(
    name = "sitekb",
    version,
    about = "Crawl a website into a searchable knowledge base with category views.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Crawl the site and (re)build the knowledge base snapshot.
    Build {
        /// Seed URL to crawl (defaults to `defaults.site_url` from config).
        url: Option<String>,

        /// Maximum crawl depth from the seed.
        #[arg(long)]
        max_depth: Option<u32>,

        /// Politeness delay between fetches, in milliseconds.
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Maximum number of URLs to visit.
        #[arg(long)]
        max_pages: Option<usize>,

        /// URL include pattern (regex, repeatable). Defaults to the seed's domain.
        #[arg(long = "include")]
        include_patterns: Vec<String>,

        /// URL exclude pattern (regex, repeatable).
        #[arg(long = "exclude")]
        exclude_patterns: Vec<String>,
    },

    /// Search the knowledge base.
    Search {
        /// Free-text query (must be non-blank).
        query: String,

        /// Maximum number of results.
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// List all entries.
    Entries,

    /// List product entries.
    Products,

    /// List client entries.
    Clients,

    /// List supplier entries.
    Suppliers,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "sitekb=info,sitekb_crawler=info,sitekb_store=info,sitekb_shared=info",
        1 => "sitekb=debug,sitekb_crawler=debug,sitekb_store=debug,sitekb_shared=debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build {
            url,
            max_depth,
            delay_ms,
            max_pages,
            include_patterns,
            exclude_patterns,
        } => {
            cmd_build(
                url.as_deref(),
                max_depth,
                delay_ms,
                max_pages,
                include_patterns,
                exclude_patterns,
            )
            .await
        }
        Command::Search { query, limit } => cmd_search(&query, limit).await,
        Command::Entries => cmd_entries().await,
        Command::Products => cmd_products().await,
        Command::Clients => cmd_clients().await,
        Command::Suppliers => cmd_suppliers().await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show().await,
        },
    }
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

async fn cmd_build(
    url: Option<&str>,
    max_depth: Option<u32>,
    delay_ms: Option<u64>,
    max_pages: Option<usize>,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
) -> Result<()> {
    let config = load_config()?;

    let seed_str = url
        .map(String::from)
        .or_else(|| config.defaults.site_url.clone())
        .ok_or_else(|| {
            eyre!("no URL given and no `defaults.site_url` in config — run `sitekb build <url>`")
        })?;
    let seed = Url::parse(&seed_str).map_err(|e| eyre!("invalid URL '{seed_str}': {e}"))?;

    // CLI flags override config file values, which override defaults.
    let mut options = CrawlOptions::from(&config);
    if let Some(depth) = max_depth {
        options.max_depth = depth;
    }
    if let Some(ms) = delay_ms {
        options.delay_between_requests = Duration::from_millis(ms);
    }
    if let Some(pages) = max_pages {
        options.max_pages = pages;
    }
    if !include_patterns.is_empty() {
        options.include_patterns = include_patterns;
    }
    if !exclude_patterns.is_empty() {
        options.exclude_patterns = exclude_patterns;
    }

    info!(seed = %seed, max_depth = options.max_depth, max_pages = options.max_pages, "building knowledge base");

    let reporter = CliProgress::new();
    let crawler = Crawler::new()?;
    let mut kb = KnowledgeBase::new();
    let report = kb.build(&crawler, &seed, &options, &reporter).await?;
    reporter.finish();

    let snapshot = FileStore::new(snapshot_dir(&config)?);
    let saved = kb.save_to_storage(&snapshot);

    println!();
    println!("  Knowledge base built!");
    println!("  Entries:   {}", kb.len());
    println!("  Products:  {}", kb.products().len());
    println!("  Clients:   {}", kb.clients().len());
    println!("  Suppliers: {}", kb.suppliers().len());
    println!(
        "  Visited:   {} pages ({} filtered, {} failed)",
        report.pages_visited, report.pages_filtered, report.pages_failed
    );
    println!("  Time:      {:.1}s", report.duration.as_secs_f64());
    if !saved {
        println!("  Warning:   snapshot could not be saved — queries will need a rebuild");
    }
    println!();

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Crawl progress shown as an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

impl CrawlProgress for CliProgress {
    fn page_visited(&self, url: &str, visited: usize, max_pages: usize) {
        self.spinner
            .set_message(format!("Crawling [{visited}/{max_pages}] {url}"));
    }

    fn entry_added(&self, title: &str, total: usize) {
        self.spinner
            .set_message(format!("Extracted {total}: {title}"));
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Load the snapshot for the read-only commands.
fn load_knowledge_base(config: &AppConfig) -> Result<KnowledgeBase> {
    let snapshot = FileStore::new(snapshot_dir(config)?);
    let mut kb = KnowledgeBase::new();
    if !kb.load_from_storage(&snapshot) {
        return Err(eyre!(
            "no knowledge base snapshot found — run `sitekb build` first"
        ));
    }
    Ok(kb)
}

async fn cmd_search(query: &str, limit: usize) -> Result<()> {
    if query.trim().is_empty() {
        return Err(eyre!("search query must not be blank"));
    }

    let config = load_config()?;
    let kb = load_knowledge_base(&config)?;
    let results = kb.search(query, limit);

    if results.is_empty() {
        println!("No results for '{query}'.");
        return Ok(());
    }

    for (i, entry) in results.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, entry.title, entry.category);
        println!("   {}", entry.url);
    }
    Ok(())
}

async fn cmd_entries() -> Result<()> {
    let config = load_config()?;
    let kb = load_knowledge_base(&config)?;

    println!("{} entries", kb.len());
    for entry in kb.entries() {
        println!("- {} [{}] {}", entry.title, entry.category, entry.url);
    }
    Ok(())
}

async fn cmd_products() -> Result<()> {
    let config = load_config()?;
    let kb = load_knowledge_base(&config)?;

    for product in kb.products() {
        println!("- {} ({})", product.name, product.category);
        println!("  {}", product.description);
    }
    Ok(())
}

async fn cmd_clients() -> Result<()> {
    let config = load_config()?;
    let kb = load_knowledge_base(&config)?;

    for client in kb.clients() {
        match client.industry {
            Some(industry) => println!("- {} ({industry})", client.name),
            None => println!("- {}", client.name),
        }
    }
    Ok(())
}

async fn cmd_suppliers() -> Result<()> {
    let config = load_config()?;
    let kb = load_knowledge_base(&config)?;

    for supplier in kb.suppliers() {
        match supplier.category {
            Some(category) => println!("- {} ({category})", supplier.name),
            None => println!("- {}", supplier.name),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
